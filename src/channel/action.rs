//! # Action vocabulary shared by all participants.
//!
//! [`Action`] tags classify envelopes so recipients can filter without a central
//! broker. The set is a fixed contract between the control page and the service
//! worker; the bus itself never branches on an action — it only carries it.

use serde::{Deserialize, Serialize};

/// Action tag carried by every envelope.
///
/// Serialized as SCREAMING_SNAKE_CASE wire names (`"SW_READY"`, `"RELOAD_CONFIG"`).
/// An unrecognized tag on the wire fails envelope decoding; the bus logs and drops
/// such frames rather than surfacing an error to listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum Action {
    /// Service worker announces (or is asked about) readiness.
    SwReady,
    /// The receiving context should reload its configuration from the store.
    ReloadConfig,
}
