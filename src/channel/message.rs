//! # Typed message envelope and outbound builder.
//!
//! [`Message`] is the wire schema every participant sees: a source role stamped by
//! the sending bus, an optional advisory target, an action tag from the shared
//! vocabulary, and an opaque JSON payload. [`Outbound`] is the caller-facing half —
//! a message *without* a source, because callers never set their own identity
//! (the bus stamps it at send time, which prevents spoofing one's own role).
//!
//! ## Correlation
//! `request_id` / `in_reply_to` carry request/response correlation for
//! [`CommsChannel::send_and_await_reply`](crate::CommsChannel::send_and_await_reply):
//! the requesting bus stamps a fresh `request_id`, responders echo it back via
//! [`Outbound::replying_to`]. Both fields are optional on the wire, so plain
//! fire-and-forget envelopes keep the plain protocol shape.
//!
//! ## Example
//! ```
//! use swgate::{Action, Outbound, Role};
//!
//! let out = Outbound::new(Action::ReloadConfig)
//!     .with_target(Role::Sw)
//!     .with_data(&serde_json::json!({ "gateways": ["https://example.net"] }))
//!     .unwrap();
//!
//! assert_eq!(out.action, Action::ReloadConfig);
//! assert_eq!(out.target, Some(Role::Sw));
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::channel::{Action, Role};
use crate::error::ChannelError;

/// Wire envelope delivered to every participant on the channel.
///
/// Invariants:
/// - `source` is always the sending bus's bound role (stamped at send time).
/// - `target` is advisory metadata only; the transport delivers to everyone.
/// - `action` and `data` pass through the bus untransformed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Role of the sending participant.
    pub source: Role,
    /// Advisory recipient; not enforced by the transport.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<Role>,
    /// Action tag from the shared vocabulary.
    pub action: Action,
    /// Opaque action-specific payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Correlation id stamped by `send_and_await_reply`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<u64>,
    /// Correlation id echoed back by a responder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_reply_to: Option<u64>,
}

impl Message {
    /// Serializes the envelope to its JSON wire form.
    pub(crate) fn to_wire(&self) -> Result<String, ChannelError> {
        serde_json::to_string(self).map_err(|e| ChannelError::Encode {
            reason: e.to_string(),
        })
    }

    /// Parses an envelope from its JSON wire form.
    pub(crate) fn from_wire(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }
}

/// Message-without-source: what callers hand to the bus.
///
/// Built with the usual `with_*` chain; the bus adds `source` (and, for
/// correlated requests, `request_id`) when the message is posted.
#[derive(Debug, Clone, PartialEq)]
pub struct Outbound {
    /// Action tag from the shared vocabulary.
    pub action: Action,
    /// Advisory recipient.
    pub target: Option<Role>,
    /// Opaque action-specific payload.
    pub data: Option<Value>,
    /// Correlation id of the request this message answers.
    pub in_reply_to: Option<u64>,
}

impl Outbound {
    /// Creates an outbound message carrying only an action tag.
    pub fn new(action: Action) -> Self {
        Self {
            action,
            target: None,
            data: None,
            in_reply_to: None,
        }
    }

    /// Attaches an advisory target role.
    #[inline]
    pub fn with_target(mut self, target: Role) -> Self {
        self.target = Some(target);
        self
    }

    /// Attaches an already-built JSON payload.
    #[inline]
    pub fn with_value(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Serializes any `Serialize` payload and attaches it.
    ///
    /// Serialization failures surface as [`ChannelError::Encode`] here, before the
    /// message reaches the transport.
    pub fn with_data<T: Serialize>(mut self, data: &T) -> Result<Self, ChannelError> {
        let value = serde_json::to_value(data).map_err(|e| ChannelError::Encode {
            reason: e.to_string(),
        })?;
        self.data = Some(value);
        Ok(self)
    }

    /// Marks this message as the reply to a correlated request.
    ///
    /// Responders copy the incoming envelope's `request_id` here so the waiting
    /// caller can match the reply to its own request.
    #[inline]
    pub fn replying_to(mut self, request_id: u64) -> Self {
        self.in_reply_to = Some(request_id);
        self
    }

    /// Stamps the sender's role (and optional request id) onto the envelope.
    pub(crate) fn into_message(self, source: Role, request_id: Option<u64>) -> Message {
        Message {
            source,
            target: self.target,
            action: self.action,
            data: self.data,
            request_id,
            in_reply_to: self.in_reply_to,
        }
    }
}
