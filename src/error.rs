//! Error types used by the comms channel and the config layer.
//!
//! This module defines two main error enums:
//!
//! - [`ChannelError`] — failures raised by the typed message bus.
//! - [`ConfigError`] — failures raised by the configuration store.
//!
//! Both types provide an `as_label` helper returning a short stable
//! snake_case label for logging/metrics.
//!
//! ## Propagation policy
//! Capability violations ([`ChannelError::EmitterOnly`], [`ChannelError::OwnRole`])
//! are returned synchronously to the caller and are always fatal to that call.
//! Transport faults (frame decode failures, lagged receivers) are contained inside
//! the bus and only reported via `tracing` — they never crash a listening context.

use std::time::Duration;

use thiserror::Error;

use crate::channel::Role;

/// # Errors produced by the typed message bus.
///
/// Capability violations are raised before any message leaves the channel;
/// everything else here concerns the lifecycle of a single call.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ChannelError {
    /// A receive-capable operation was invoked on an `EMITTER_ONLY` channel.
    #[error("cannot use {op} on an EMITTER_ONLY channel")]
    EmitterOnly {
        /// Name of the rejected operation.
        op: &'static str,
    },

    /// An "other role" subscription referenced the channel's own role.
    #[error("cannot subscribe to own role {role} via on_message_from_other")]
    OwnRole {
        /// The channel's bound role.
        role: Role,
    },

    /// A textual role name did not match any member of the closed role set.
    #[error("unknown role name {value:?}")]
    UnknownRole {
        /// The offending input.
        value: String,
    },

    /// The outbound envelope could not be serialized for the wire.
    #[error("failed to encode message: {reason}")]
    Encode {
        /// Serializer error message.
        reason: String,
    },

    /// The channel was closed while (or before) the call was in flight.
    #[error("comms channel is closed")]
    Closed,

    /// No matching reply arrived within the configured window.
    #[error("no reply from {responder} within {timeout:?}")]
    ReplyTimeout {
        /// Role the reply was expected from.
        responder: Role,
        /// The timeout that elapsed.
        timeout: Duration,
    },
}

impl ChannelError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use swgate::ChannelError;
    ///
    /// let err = ChannelError::EmitterOnly { op: "on_message" };
    /// assert_eq!(err.as_label(), "channel_emitter_only");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ChannelError::EmitterOnly { .. } => "channel_emitter_only",
            ChannelError::OwnRole { .. } => "channel_own_role",
            ChannelError::UnknownRole { .. } => "channel_unknown_role",
            ChannelError::Encode { .. } => "channel_encode",
            ChannelError::Closed => "channel_closed",
            ChannelError::ReplyTimeout { .. } => "channel_reply_timeout",
        }
    }
}

/// # Errors produced by the configuration store.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The underlying key/value store failed (open, read or write).
    #[error("config storage error: {reason}")]
    Storage {
        /// Backend error message.
        reason: String,
    },

    /// A stored value could not be decoded into its typed form.
    #[error("failed to decode config key {key:?}: {reason}")]
    Decode {
        /// The config key being read.
        key: &'static str,
        /// Decoder error message.
        reason: String,
    },
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::Storage { .. } => "config_storage",
            ConfigError::Decode { .. } => "config_decode",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_stable() {
        assert_eq!(ChannelError::Closed.as_label(), "channel_closed");
        assert_eq!(
            ChannelError::Encode { reason: "x".into() }.as_label(),
            "channel_encode"
        );
        assert_eq!(
            ConfigError::Decode {
                key: "gateways",
                reason: "x".into()
            }
            .as_label(),
            "config_decode"
        );
    }

    #[test]
    fn test_display_includes_role() {
        let err = ChannelError::OwnRole { role: Role::Window };
        assert!(err.to_string().contains("WINDOW"));
    }
}
