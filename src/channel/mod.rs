//! Typed inter-context comms: roles, envelopes, transport and the bus.
//!
//! This module groups the **protocol data model** and the **bus** used by the
//! control page and the service worker to coordinate over an origin-scoped
//! broadcast primitive with no shared memory.
//!
//! ## Contents
//! - [`Role`] closed registry of participants and the "not my role" computation
//! - [`Action`] shared action vocabulary
//! - [`Message`], [`Outbound`] typed wire envelope and its caller-facing builder
//! - [`Broadcast`] transport binding over the named fan-out channel
//! - [`CommsChannel`] the public bus: send, subscribe-by-role, request/response
//!
//! ## Quick reference
//! - **Senders**: any participant; `EMITTER_ONLY` may *only* send.
//! - **Receivers**: `SW` and `WINDOW`; filtering is fully distributed — every
//!   instance re-evaluates its own predicates on every frame.

mod action;
mod broadcast;
mod comms;
mod message;
mod role;

pub use action::Action;
pub use broadcast::{Broadcast, Frame, BROADCAST_CAPACITY, DEFAULT_CHANNEL_NAME};
pub use comms::{CommsChannel, DEFAULT_REPLY_TIMEOUT};
pub use message::{Message, Outbound};
pub use role::{Role, ALL_ROLES};
