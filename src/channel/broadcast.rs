//! # Broadcast transport binding.
//!
//! [`Broadcast`] wraps the origin-scoped fan-out primitive the comms channel is
//! built on: an unordered, at-most-once, one-to-many message channel shared by
//! every participant that opens the same channel name. There is no addressing and
//! no acknowledgement — all filtering happens at the receivers.
//!
//! ## Model
//! A process-global registry maps channel names to a shared
//! [`tokio::sync::broadcast`] sender. Opening a name joins (or creates) that
//! channel, so any context holding the name participates — the same trust model as
//! the platform primitive, where every same-origin context can observe and inject.
//!
//! Each handle gets a process-unique `origin` id stamped on every frame it posts.
//! The transport itself delivers everything to everyone; the comms layer above
//! skips frames carrying its own origin, because the platform primitive never
//! delivers a message back to the handle that posted it.
//!
//! ## Delivery properties
//! - **Per-sender FIFO**: frames from one handle reach a given receiver in post
//!   order; nothing is guaranteed across senders.
//! - **Asynchronous**: delivery happens on a later queue turn, never inside `post`.
//! - **Bounded**: a shared ring buffer holds the most recent
//!   [`BROADCAST_CAPACITY`] frames; receivers that lag observe `Lagged(n)` and
//!   skip the `n` oldest frames (the bus logs and continues).
//! - **Fire-and-forget**: posting with no receivers attached is not an error.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::{Mutex, OnceLock};

use tokio::sync::broadcast;

/// Ring-buffer capacity shared by all receivers of one named channel.
///
/// Message volume on the page/worker handshake is tiny; this mostly guards
/// against a stalled dispatch worker.
pub const BROADCAST_CAPACITY: usize = 256;

/// Well-known channel name shared by the page and the service worker.
pub const DEFAULT_CHANNEL_NAME: &str = "helia:sw";

/// Process-unique handle ids, so a handle can recognize its own frames.
static NEXT_ORIGIN: AtomicU64 = AtomicU64::new(1);

/// Named-channel registry: one shared sender per channel name.
static CHANNELS: OnceLock<Mutex<HashMap<String, broadcast::Sender<Frame>>>> = OnceLock::new();

/// A raw transport frame: serialized envelope plus the posting handle's id.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Id of the handle that posted this frame.
    pub origin: u64,
    /// Serialized JSON envelope.
    pub body: String,
}

/// Handle on a named broadcast channel.
///
/// Cheap to use (the sender is `Arc`-backed internally); each handle has its own
/// `origin` id. Dropping a handle detaches it without affecting other
/// participants — the named channel itself lives for the life of the process,
/// like the origin-scoped platform channel it models.
#[derive(Debug, Clone)]
pub struct Broadcast {
    name: String,
    origin: u64,
    tx: broadcast::Sender<Frame>,
}

impl Broadcast {
    /// Opens (joining or creating) the named channel.
    pub fn open(name: &str) -> Self {
        let registry = CHANNELS.get_or_init(|| Mutex::new(HashMap::new()));
        let tx = {
            // Lock poisoning only happens if another opener panicked while
            // inserting; the map is still usable, so take the inner value.
            let mut map = registry.lock().unwrap_or_else(|e| e.into_inner());
            map.entry(name.to_string())
                .or_insert_with(|| broadcast::channel(BROADCAST_CAPACITY).0)
                .clone()
        };
        Self {
            name: name.to_string(),
            origin: NEXT_ORIGIN.fetch_add(1, AtomicOrdering::Relaxed),
            tx,
        }
    }

    /// Posts a serialized envelope to every other participant.
    ///
    /// Fire-and-forget: if no receivers are attached the frame is dropped and
    /// this still returns immediately.
    pub fn post(&self, body: String) {
        let _ = self.tx.send(Frame {
            origin: self.origin,
            body,
        });
    }

    /// Creates a receiver observing frames posted after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Frame> {
        self.tx.subscribe()
    }

    /// The channel name this handle is bound to.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// This handle's process-unique id.
    #[inline]
    pub fn origin(&self) -> u64 {
        self.origin
    }
}
