//! # swgate
//!
//! **swgate** is the coordination layer for an IPFS-over-HTTP gateway that runs
//! as an installable service worker plus a control page. The two execution
//! contexts share no memory; everything they exchange — configuration pushes,
//! readiness handshakes, reload requests — travels over an origin-scoped
//! broadcast primitive with no addressing and no acknowledgement.
//!
//! The heart of the crate is the **typed message bus** ([`CommsChannel`]): a
//! thin protocol layer that tags every message with a logical [`Role`], lets a
//! participant subscribe by source role (or "any role but mine"), and provides
//! one-shot request/response correlation on top of fire-and-forget fan-out.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   ┌─────────────────┐                       ┌─────────────────┐
//!   │  control page   │                       │  service worker │
//!   │  Role::Window   │                       │    Role::Sw     │
//!   └───────┬─────────┘                       └────────┬────────┘
//!           │ CommsChannel                             │ CommsChannel
//!           ▼                                          ▼
//!   ┌───────────────────────────────────────────────────────────┐
//!   │        Broadcast (named, origin-scoped fan-out)           │
//!   │   every participant sees every frame; filtering is local  │
//!   └───────────────────────────────────────────────────────────┘
//!           ▲
//!           │ post only (may never receive)
//!   ┌───────┴─────────┐
//!   │ one-off senders │
//!   │Role::EmitterOnly│
//!   └─────────────────┘
//! ```
//!
//! There is no central dispatcher: each [`CommsChannel`] runs its own dispatch
//! worker and re-evaluates its own filters on every envelope. Request/response
//! rides on monotonic request ids echoed back by responders, bounded by a
//! timeout — see [`CommsChannel::send_and_await_reply`].
//!
//! Around the bus sit the two collaborators the page and the worker share:
//! the typed [`Config`] layer over a pluggable [`ConfigStore`], and the
//! subdomain-gateway URL parser ([`subdomain_parts`]).
//!
//! ## Example
//! ```
//! use swgate::{Action, CommsChannel, Outbound, Role};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), swgate::ChannelError> {
//!     let worker = std::sync::Arc::new(CommsChannel::with_channel_name(
//!         Role::Sw,
//!         "readme:handshake",
//!     ));
//!     let page = CommsChannel::with_channel_name(Role::Window, "readme:handshake");
//!
//!     // The worker answers readiness probes from the page.
//!     let responder = std::sync::Arc::clone(&worker);
//!     worker.on_message_from(Role::Window, move |msg| {
//!         if let Some(id) = msg.request_id {
//!             let _ = responder.post_message(Outbound::new(Action::SwReady).replying_to(id));
//!         }
//!     })?;
//!
//!     // The page asks and waits for exactly one matching reply.
//!     let reply = page
//!         .send_and_await_reply(Role::Sw, Outbound::new(Action::SwReady))
//!         .await?;
//!     assert_eq!(reply.source, Role::Sw);
//!     Ok(())
//! }
//! ```

mod channel;
mod config;
mod error;
mod subdomain;

// ---- Public re-exports ----

pub use channel::{
    Action, Broadcast, CommsChannel, Frame, Message, Outbound, Role, ALL_ROLES,
    BROADCAST_CAPACITY, DEFAULT_CHANNEL_NAME, DEFAULT_REPLY_TIMEOUT,
};
pub use config::{
    get_config, keys, set_config, Config, ConfigStore, MemoryStore, DEFAULT_GATEWAY,
    DEFAULT_ROUTER,
};
pub use error::{ChannelError, ConfigError};
pub use subdomain::{
    dnslink_label_decode, dnslink_label_encode, is_inlined_dnslink, subdomain_parts, UrlParts,
};
