//! # Role registry: the closed set of bus participants.
//!
//! Every participant on the comms channel is assigned exactly one [`Role`] at
//! construction, and it never changes for the lifetime of that channel instance.
//! The registry is pure: membership checks and the "every role except mine"
//! computation are stateless functions over the closed set.
//!
//! ## Members
//! - [`Role::Sw`] — the installed service worker.
//! - [`Role::Window`] — the visible control page.
//! - [`Role::EmitterOnly`] — write-only contexts that only ever send.
//!
//! "Not my role" is a runtime set difference ([`Role::others`]) checked at
//! subscription time; for a three-member closed set this is as safe as any
//! type-level encoding and much simpler.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ChannelError;

/// Logical identity of a comms-channel participant.
///
/// Serialized on the wire as `"SW"`, `"WINDOW"` or `"EMITTER_ONLY"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// The installed service worker.
    #[serde(rename = "SW")]
    Sw,
    /// The visible control page.
    #[serde(rename = "WINDOW")]
    Window,
    /// A write-only participant; may post but never receive.
    #[serde(rename = "EMITTER_ONLY")]
    EmitterOnly,
}

/// All members of the closed role set, in declaration order.
pub const ALL_ROLES: [Role; 3] = [Role::Sw, Role::Window, Role::EmitterOnly];

impl Role {
    /// Returns the wire name of this role.
    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Sw => "SW",
            Role::Window => "WINDOW",
            Role::EmitterOnly => "EMITTER_ONLY",
        }
    }

    /// Whether a participant bound to this role may register listeners.
    ///
    /// `false` only for [`Role::EmitterOnly`]; every receive-capable operation on
    /// the bus is gated on this.
    #[inline]
    pub fn can_receive(self) -> bool {
        !matches!(self, Role::EmitterOnly)
    }

    /// Returns every role except this one.
    ///
    /// Used to validate "subscribe to a role other than mine" registrations.
    ///
    /// # Example
    /// ```
    /// use swgate::Role;
    ///
    /// assert_eq!(Role::Window.others(), [Role::Sw, Role::EmitterOnly]);
    /// assert!(!Role::Sw.others().contains(&Role::Sw));
    /// ```
    pub fn others(self) -> [Role; 2] {
        match self {
            Role::Sw => [Role::Window, Role::EmitterOnly],
            Role::Window => [Role::Sw, Role::EmitterOnly],
            Role::EmitterOnly => [Role::Sw, Role::Window],
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ChannelError;

    /// Parses a wire name back into a role.
    ///
    /// Accepts exactly the textual names used on the wire; anything else is
    /// [`ChannelError::UnknownRole`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SW" => Ok(Role::Sw),
            "WINDOW" => Ok(Role::Window),
            "EMITTER_ONLY" => Ok(Role::EmitterOnly),
            other => Err(ChannelError::UnknownRole {
                value: other.to_string(),
            }),
        }
    }
}
