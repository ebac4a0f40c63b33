//! # CommsChannel: the typed message bus.
//!
//! [`CommsChannel`] binds one participant, with a fixed [`Role`], to the shared
//! broadcast transport and layers the typed protocol on top of it:
//!
//! - fire-and-forget sends that stamp the bound role as `source`;
//! - accumulating listeners, unfiltered or filtered by source role;
//! - one-shot request/response correlation over the uncorrelated transport.
//!
//! ## Architecture
//! ```text
//!   post_message ──► Broadcast (fan-out) ──► dispatch worker (per channel)
//!                                               │  skip own frames
//!                                               │  decode or drop (warn)
//!                                               ├──► pending replies (one-shot)
//!                                               └──► listeners (filter, invoke)
//! ```
//!
//! There is no central dispatcher: every instance runs its own worker and
//! re-evaluates its own filters on every frame.
//!
//! ## Rules
//! - **Capability gate**: every receive-capable operation fails synchronously
//!   with [`ChannelError::EmitterOnly`] on an `EMITTER_ONLY` channel.
//! - **Isolation**: a panicking listener is caught and logged; the worker and the
//!   other listeners keep running.
//! - **Correlated requests**: [`CommsChannel::send_and_await_reply`] stamps a
//!   monotonic `request_id`; a reply matches if its source is the expected
//!   responder and its `in_reply_to` is absent or equals that id. Uncorrelated
//!   replies settle the oldest pending request first.
//! - **Bounded waits**: every request carries a timeout
//!   ([`DEFAULT_REPLY_TIMEOUT`] unless overridden) and rejects with
//!   [`ChannelError::ReplyTimeout`], releasing its one-shot entry.
//! - **Teardown**: [`CommsChannel::close`] stops the worker and settles in-flight
//!   waits with [`ChannelError::Closed`]; dropping the channel stops the worker
//!   too.
//!
//! ## Example
//! ```
//! use swgate::{Action, CommsChannel, Outbound, Role};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), swgate::ChannelError> {
//! let page = CommsChannel::with_channel_name(Role::Window, "doc:example");
//! let worker = CommsChannel::with_channel_name(Role::Sw, "doc:example");
//!
//! worker.on_message_from(Role::Window, |msg| {
//!     // react to page traffic
//!     let _ = &msg.action;
//! })?;
//!
//! page.post_message(Outbound::new(Action::ReloadConfig).with_target(Role::Sw))?;
//! # page.close();
//! # worker.close();
//! # Ok(())
//! # }
//! ```

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{broadcast::error::RecvError, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::channel::broadcast::{Broadcast, Frame, DEFAULT_CHANNEL_NAME};
use crate::channel::{Message, Outbound, Role};
use crate::error::ChannelError;

/// Default window for [`CommsChannel::send_and_await_reply`].
///
/// Page/worker handshakes settle in milliseconds; ten seconds is generous
/// while still guaranteeing the pending entry is reclaimed.
pub const DEFAULT_REPLY_TIMEOUT: Duration = Duration::from_secs(10);

/// Registered listener callback.
type Handler = Box<dyn Fn(&Message) + Send + Sync + 'static>;

/// A listener with an optional source-role filter (`None` = unfiltered).
struct Listener {
    filter: Option<Role>,
    handler: Handler,
}

/// One-shot entry fulfilling a `send_and_await_reply` call.
struct PendingReply {
    responder: Role,
    request_id: u64,
    tx: oneshot::Sender<Message>,
}

/// State shared between the channel handle and its dispatch worker.
struct Shared {
    listeners: Mutex<Vec<Arc<Listener>>>,
    pendings: Mutex<Vec<PendingReply>>,
    closed: AtomicBool,
}

impl Shared {
    fn new() -> Self {
        Self {
            listeners: Mutex::new(Vec::new()),
            pendings: Mutex::new(Vec::new()),
            closed: AtomicBool::new(false),
        }
    }
}

/// Typed comms channel bound to one participant role.
///
/// Construction opens the transport immediately and (for receive-capable roles)
/// spawns the dispatch worker, so it must happen inside a tokio runtime.
/// The role never changes for the lifetime of the instance.
pub struct CommsChannel {
    role: Role,
    transport: Broadcast,
    shared: Arc<Shared>,
    cancel: CancellationToken,
    next_request: AtomicU64,
}

impl CommsChannel {
    /// Creates a channel on the well-known page/worker channel name.
    pub fn new(role: Role) -> Self {
        Self::with_channel_name(role, DEFAULT_CHANNEL_NAME)
    }

    /// Creates a channel on an explicit channel name.
    ///
    /// Independent channel names never observe each other's traffic; tests and
    /// embedders hosting several logical buses use this.
    pub fn with_channel_name(role: Role, channel_name: &str) -> Self {
        let transport = Broadcast::open(channel_name);
        let shared = Arc::new(Shared::new());
        let cancel = CancellationToken::new();

        // EMITTER_ONLY participants can never receive, so they get no worker.
        if role.can_receive() {
            let rx = transport.subscribe();
            let own_origin = transport.origin();
            tokio::spawn(dispatch_worker(
                rx,
                own_origin,
                Arc::clone(&shared),
                cancel.clone(),
            ));
        }

        debug!(role = %role, channel = channel_name, "comms channel opened");
        Self {
            role,
            transport,
            shared,
            cancel,
            next_request: AtomicU64::new(1),
        }
    }

    /// The role this channel was bound to at construction.
    #[inline]
    pub fn role(&self) -> Role {
        self.role
    }

    /// The broadcast channel name this instance is attached to.
    #[inline]
    pub fn channel_name(&self) -> &str {
        self.transport.name()
    }

    /// Stamps the bound role as `source` and posts the envelope to everyone.
    ///
    /// Fire-and-forget: no acknowledgement, no delivery guarantee. Encoding
    /// failures surface here, synchronously; delivery happens on a later queue
    /// turn in every other participant.
    pub fn post_message(&self, msg: Outbound) -> Result<(), ChannelError> {
        self.ensure_open()?;
        let wire = msg.into_message(self.role, None).to_wire()?;
        self.transport.post(wire);
        Ok(())
    }

    /// Registers `cb` for every envelope received, unfiltered.
    ///
    /// Registrations accumulate; there is no way to remove one short of closing
    /// the channel.
    pub fn on_message<F>(&self, cb: F) -> Result<(), ChannelError>
    where
        F: Fn(&Message) + Send + Sync + 'static,
    {
        self.ensure_open()?;
        self.ensure_can_receive("on_message")?;
        self.push_listener(None, Box::new(cb));
        Ok(())
    }

    /// Registers `cb` for envelopes whose `source` equals `source`.
    pub fn on_message_from<F>(&self, source: Role, cb: F) -> Result<(), ChannelError>
    where
        F: Fn(&Message) + Send + Sync + 'static,
    {
        self.ensure_open()?;
        self.ensure_can_receive("on_message_from")?;
        self.push_listener(Some(source), Box::new(cb));
        Ok(())
    }

    /// Like [`CommsChannel::on_message_from`], but the source must be a role
    /// other than this channel's own.
    ///
    /// One call covers one other role; call once per role to cover several.
    /// Passing the channel's own role is rejected with
    /// [`ChannelError::OwnRole`], checked against [`Role::others`].
    pub fn on_message_from_other<F>(&self, source: Role, cb: F) -> Result<(), ChannelError>
    where
        F: Fn(&Message) + Send + Sync + 'static,
    {
        self.ensure_open()?;
        self.ensure_can_receive("on_message_from_other")?;
        if !self.role.others().contains(&source) {
            return Err(ChannelError::OwnRole { role: self.role });
        }
        self.push_listener(Some(source), Box::new(cb));
        Ok(())
    }

    /// Posts a correlated request and awaits the matching reply, bounded by
    /// [`DEFAULT_REPLY_TIMEOUT`].
    ///
    /// See [`CommsChannel::send_and_await_reply_within`] for the full contract.
    pub async fn send_and_await_reply(
        &self,
        responder: Role,
        msg: Outbound,
    ) -> Result<Message, ChannelError> {
        self.send_and_await_reply_within(responder, msg, DEFAULT_REPLY_TIMEOUT)
            .await
    }

    /// Posts a correlated request and awaits the matching reply.
    ///
    /// The outgoing envelope is stamped with a fresh monotonic `request_id`.
    /// The first envelope observed with `source == responder` whose
    /// `in_reply_to` is absent or equals that id settles the call, exactly
    /// once; an uncorrelated reply settles the oldest pending request first.
    ///
    /// # Errors
    /// - [`ChannelError::EmitterOnly`] — this channel cannot receive.
    /// - [`ChannelError::OwnRole`] — `responder` is this channel's own role.
    /// - [`ChannelError::ReplyTimeout`] — no matching reply within `timeout`;
    ///   the one-shot entry is removed, nothing leaks.
    /// - [`ChannelError::Closed`] — the channel was closed while waiting.
    pub async fn send_and_await_reply_within(
        &self,
        responder: Role,
        msg: Outbound,
        timeout: Duration,
    ) -> Result<Message, ChannelError> {
        self.ensure_open()?;
        self.ensure_can_receive("send_and_await_reply")?;
        if !self.role.others().contains(&responder) {
            return Err(ChannelError::OwnRole { role: self.role });
        }

        let request_id = self.next_request.fetch_add(1, AtomicOrdering::Relaxed);
        let (tx, rx) = oneshot::channel();
        lock(&self.shared.pendings).push(PendingReply {
            responder,
            request_id,
            tx,
        });

        let wire = match msg.into_message(self.role, Some(request_id)).to_wire() {
            Ok(wire) => wire,
            Err(e) => {
                self.remove_pending(request_id);
                return Err(e);
            }
        };
        self.transport.post(wire);

        match tokio::time::timeout(timeout, rx).await {
            Ok(Ok(reply)) => Ok(reply),
            // Sender dropped: the channel was closed under us.
            Ok(Err(_)) => Err(ChannelError::Closed),
            Err(_) => {
                self.remove_pending(request_id);
                Err(ChannelError::ReplyTimeout { responder, timeout })
            }
        }
    }

    /// Closes the channel: stops the dispatch worker, clears listeners and
    /// settles in-flight waits with [`ChannelError::Closed`].
    ///
    /// Idempotent. Every operation after `close` returns
    /// [`ChannelError::Closed`]. Other participants on the same channel name
    /// are unaffected.
    pub fn close(&self) {
        if self.shared.closed.swap(true, AtomicOrdering::SeqCst) {
            return;
        }
        self.cancel.cancel();
        lock(&self.shared.listeners).clear();
        // Dropping the one-shot senders wakes every waiting caller with Closed.
        lock(&self.shared.pendings).clear();
        debug!(role = %self.role, channel = self.transport.name(), "comms channel closed");
    }

    fn ensure_open(&self) -> Result<(), ChannelError> {
        if self.shared.closed.load(AtomicOrdering::SeqCst) {
            return Err(ChannelError::Closed);
        }
        Ok(())
    }

    fn ensure_can_receive(&self, op: &'static str) -> Result<(), ChannelError> {
        if !self.role.can_receive() {
            return Err(ChannelError::EmitterOnly { op });
        }
        Ok(())
    }

    fn push_listener(&self, filter: Option<Role>, handler: Handler) {
        lock(&self.shared.listeners).push(Arc::new(Listener { filter, handler }));
    }

    fn remove_pending(&self, request_id: u64) {
        lock(&self.shared.pendings).retain(|p| p.request_id != request_id);
    }
}

impl Drop for CommsChannel {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Locks a mutex, recovering the inner value if a listener panicked mid-hold.
fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

/// Per-channel worker: receives frames and fans them out to local state.
async fn dispatch_worker(
    mut rx: tokio::sync::broadcast::Receiver<Frame>,
    own_origin: u64,
    shared: Arc<Shared>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            received = rx.recv() => match received {
                Ok(frame) => {
                    // The transport never delivers a frame back to its poster.
                    if frame.origin == own_origin {
                        continue;
                    }
                    match Message::from_wire(&frame.body) {
                        Ok(msg) => dispatch(&shared, &msg),
                        Err(e) => {
                            warn!(error = %e, "dropping undecodable frame");
                        }
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "dispatch worker lagged; skipping oldest frames");
                }
                Err(RecvError::Closed) => break,
            },
        }
    }
}

/// Applies one incoming envelope to pending replies, then to listeners.
fn dispatch(shared: &Shared, msg: &Message) {
    // Pending replies first: oldest matching entry wins, settled exactly once.
    let settled = {
        let mut pendings = lock(&shared.pendings);
        let found = pendings.iter().position(|p| {
            msg.source == p.responder
                && msg.in_reply_to.map_or(true, |id| id == p.request_id)
        });
        found.map(|i| pendings.remove(i))
    };
    if let Some(pending) = settled {
        // The caller may have timed out and gone; that is fine.
        let _ = pending.tx.send(msg.clone());
    }

    // Snapshot outside the lock so a listener may register further listeners.
    let listeners: Vec<Arc<Listener>> = lock(&shared.listeners).clone();
    for listener in listeners {
        if listener.filter.is_some_and(|role| role != msg.source) {
            continue;
        }
        if catch_unwind(AssertUnwindSafe(|| (listener.handler)(msg))).is_err() {
            warn!(source = %msg.source, "listener panicked while handling message");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::Action;
    use serde_json::json;
    use tokio::sync::mpsc;
    use tokio::time::{sleep, timeout};

    const TICK: Duration = Duration::from_millis(100);

    /// Listener that forwards every matched envelope into an inspectable queue.
    fn tap() -> (
        impl Fn(&Message) + Send + Sync + 'static,
        mpsc::UnboundedReceiver<Message>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        (move |msg: &Message| {
            let _ = tx.send(msg.clone());
        }, rx)
    }

    async fn recv_one(rx: &mut mpsc::UnboundedReceiver<Message>) -> Message {
        timeout(TICK, rx.recv()).await.expect("delivery").unwrap()
    }

    async fn assert_quiet(rx: &mut mpsc::UnboundedReceiver<Message>) {
        assert!(timeout(Duration::from_millis(50), rx.recv()).await.is_err());
    }

    #[tokio::test]
    async fn test_emitter_only_cannot_receive() {
        let emitter = CommsChannel::with_channel_name(Role::EmitterOnly, "test:emitter");

        let err = emitter.on_message(|_| {}).unwrap_err();
        assert_eq!(err.as_label(), "channel_emitter_only");
        let err = emitter.on_message_from(Role::Sw, |_| {}).unwrap_err();
        assert_eq!(err.as_label(), "channel_emitter_only");
        let err = emitter.on_message_from_other(Role::Sw, |_| {}).unwrap_err();
        assert_eq!(err.as_label(), "channel_emitter_only");
        let err = emitter
            .send_and_await_reply(Role::Sw, Outbound::new(Action::SwReady))
            .await
            .unwrap_err();
        assert_eq!(err.as_label(), "channel_emitter_only");

        // Sending stays allowed.
        emitter.post_message(Outbound::new(Action::SwReady)).unwrap();
    }

    #[tokio::test]
    async fn test_on_message_from_filters_by_source() {
        let name = "test:filter-by-source";
        let page = CommsChannel::with_channel_name(Role::Window, name);
        let worker = CommsChannel::with_channel_name(Role::Sw, name);
        let emitter = CommsChannel::with_channel_name(Role::EmitterOnly, name);

        let (cb, mut seen) = tap();
        worker.on_message_from(Role::Window, cb).unwrap();

        emitter.post_message(Outbound::new(Action::SwReady)).unwrap();
        page.post_message(Outbound::new(Action::ReloadConfig)).unwrap();

        let got = recv_one(&mut seen).await;
        assert_eq!(got.source, Role::Window);
        assert_eq!(got.action, Action::ReloadConfig);
        assert_quiet(&mut seen).await;
    }

    #[tokio::test]
    async fn test_on_message_from_other_rejects_own_role() {
        let page = CommsChannel::with_channel_name(Role::Window, "test:own-role");
        let err = page.on_message_from_other(Role::Window, |_| {}).unwrap_err();
        assert_eq!(err.as_label(), "channel_own_role");
    }

    #[tokio::test]
    async fn test_own_sends_never_reach_own_listeners() {
        let name = "test:no-self-delivery";
        let page = CommsChannel::with_channel_name(Role::Window, name);
        let worker = CommsChannel::with_channel_name(Role::Sw, name);

        let (cb, mut seen) = tap();
        page.on_message(cb).unwrap();

        page.post_message(Outbound::new(Action::SwReady)).unwrap();
        worker.post_message(Outbound::new(Action::ReloadConfig)).unwrap();

        // Only the worker's envelope arrives; the page's own does not.
        let got = recv_one(&mut seen).await;
        assert_eq!(got.source, Role::Sw);
        assert_quiet(&mut seen).await;
    }

    #[tokio::test]
    async fn test_roundtrip_preserves_action_and_data_and_stamps_source() {
        let name = "test:roundtrip";
        let page = CommsChannel::with_channel_name(Role::Window, name);
        let worker = CommsChannel::with_channel_name(Role::Sw, name);

        let (cb, mut seen) = tap();
        worker.on_message(cb).unwrap();

        let payload = json!({ "gateways": ["https://example.net"], "n": 3 });
        page.post_message(
            Outbound::new(Action::ReloadConfig)
                .with_target(Role::Sw)
                .with_value(payload.clone()),
        )
        .unwrap();

        let got = recv_one(&mut seen).await;
        assert_eq!(got.source, Role::Window);
        assert_eq!(got.target, Some(Role::Sw));
        assert_eq!(got.action, Action::ReloadConfig);
        assert_eq!(got.data, Some(payload));
    }

    #[tokio::test]
    async fn test_send_and_await_reply_resolves_with_correlated_reply() {
        let name = "test:request-reply";
        let page = Arc::new(CommsChannel::with_channel_name(Role::Window, name));
        let worker = Arc::new(CommsChannel::with_channel_name(Role::Sw, name));

        let responder = Arc::clone(&worker);
        worker
            .on_message_from(Role::Window, move |msg| {
                if let Some(id) = msg.request_id {
                    let reply = Outbound::new(Action::SwReady)
                        .with_value(json!({ "echo": id }))
                        .replying_to(id);
                    responder.post_message(reply).unwrap();
                }
            })
            .unwrap();

        let reply = page
            .send_and_await_reply(Role::Sw, Outbound::new(Action::SwReady))
            .await
            .unwrap();
        assert_eq!(reply.source, Role::Sw);
        assert_eq!(reply.action, Action::SwReady);
        assert!(reply.in_reply_to.is_some());
    }

    #[tokio::test]
    async fn test_concurrent_requests_resolve_their_own_replies() {
        let name = "test:concurrent-correlated";
        let page = Arc::new(CommsChannel::with_channel_name(Role::Window, name));
        let worker = Arc::new(CommsChannel::with_channel_name(Role::Sw, name));

        let responder = Arc::clone(&worker);
        worker
            .on_message_from(Role::Window, move |msg| {
                if let Some(id) = msg.request_id {
                    let reply = Outbound::new(Action::SwReady)
                        .with_value(json!({ "echo": id }))
                        .replying_to(id);
                    responder.post_message(reply).unwrap();
                }
            })
            .unwrap();

        let (a, b) = tokio::join!(
            page.send_and_await_reply(Role::Sw, Outbound::new(Action::SwReady)),
            page.send_and_await_reply(Role::Sw, Outbound::new(Action::SwReady)),
        );
        let (a, b) = (a.unwrap(), b.unwrap());
        assert_ne!(a.in_reply_to, b.in_reply_to);
        assert_eq!(a.data, Some(json!({ "echo": a.in_reply_to.unwrap() })));
        assert_eq!(b.data, Some(json!({ "echo": b.in_reply_to.unwrap() })));
    }

    #[tokio::test]
    async fn test_uncorrelated_reply_settles_oldest_pending_first() {
        let name = "test:uncorrelated-order";
        let page = Arc::new(CommsChannel::with_channel_name(Role::Window, name));
        let worker = CommsChannel::with_channel_name(Role::Sw, name);

        let first = {
            let page = Arc::clone(&page);
            tokio::spawn(async move {
                page.send_and_await_reply(Role::Sw, Outbound::new(Action::SwReady))
                    .await
            })
        };
        // Let the first request register before the second.
        sleep(Duration::from_millis(20)).await;
        let second = {
            let page = Arc::clone(&page);
            tokio::spawn(async move {
                page.send_and_await_reply(Role::Sw, Outbound::new(Action::SwReady))
                    .await
            })
        };
        sleep(Duration::from_millis(20)).await;

        // Legacy responder: no in_reply_to at all.
        worker
            .post_message(Outbound::new(Action::SwReady).with_value(json!({ "n": 1 })))
            .unwrap();
        let got_first = first.await.unwrap().unwrap();
        assert_eq!(got_first.data, Some(json!({ "n": 1 })));

        worker
            .post_message(Outbound::new(Action::SwReady).with_value(json!({ "n": 2 })))
            .unwrap();
        let got_second = second.await.unwrap().unwrap();
        assert_eq!(got_second.data, Some(json!({ "n": 2 })));
    }

    #[tokio::test]
    async fn test_reply_timeout_rejects_and_cleans_up() {
        let name = "test:reply-timeout";
        let page = CommsChannel::with_channel_name(Role::Window, name);
        // A worker exists but never answers.
        let _worker = CommsChannel::with_channel_name(Role::Sw, name);

        let err = page
            .send_and_await_reply_within(
                Role::Sw,
                Outbound::new(Action::SwReady),
                Duration::from_millis(50),
            )
            .await
            .unwrap_err();
        assert_eq!(err.as_label(), "channel_reply_timeout");
        // The one-shot entry is gone.
        assert!(lock(&page.shared.pendings).is_empty());
    }

    #[tokio::test]
    async fn test_awaiting_own_role_is_rejected() {
        let page = CommsChannel::with_channel_name(Role::Window, "test:await-own");
        let err = page
            .send_and_await_reply(Role::Window, Outbound::new(Action::SwReady))
            .await
            .unwrap_err();
        assert_eq!(err.as_label(), "channel_own_role");
    }

    #[tokio::test]
    async fn test_close_settles_inflight_waits_and_rejects_new_calls() {
        let name = "test:close";
        let page = Arc::new(CommsChannel::with_channel_name(Role::Window, name));

        let waiting = {
            let page = Arc::clone(&page);
            tokio::spawn(async move {
                page.send_and_await_reply(Role::Sw, Outbound::new(Action::SwReady))
                    .await
            })
        };
        sleep(Duration::from_millis(20)).await;

        page.close();
        let err = waiting.await.unwrap().unwrap_err();
        assert_eq!(err.as_label(), "channel_closed");

        assert!(page.post_message(Outbound::new(Action::SwReady)).is_err());
        assert!(page.on_message(|_| {}).is_err());
        // Idempotent.
        page.close();
    }

    #[tokio::test]
    async fn test_undecodable_frames_are_dropped_not_fatal() {
        let name = "test:bad-frame";
        let page = CommsChannel::with_channel_name(Role::Window, name);
        let worker = CommsChannel::with_channel_name(Role::Sw, name);

        let (cb, mut seen) = tap();
        page.on_message(cb).unwrap();

        // Inject garbage straight onto the transport, then a valid envelope.
        let raw = Broadcast::open(name);
        raw.post("definitely not json".to_string());
        worker.post_message(Outbound::new(Action::SwReady)).unwrap();

        // The worker survived the garbage and still delivers the valid frame.
        let got = recv_one(&mut seen).await;
        assert_eq!(got.source, Role::Sw);
        assert_quiet(&mut seen).await;
    }

    #[tokio::test]
    async fn test_panicking_listener_does_not_stop_dispatch() {
        let name = "test:panicking-listener";
        let page = CommsChannel::with_channel_name(Role::Window, name);
        let worker = CommsChannel::with_channel_name(Role::Sw, name);

        page.on_message(|_| panic!("listener bug")).unwrap();
        let (cb, mut seen) = tap();
        page.on_message(cb).unwrap();

        worker.post_message(Outbound::new(Action::SwReady)).unwrap();
        let got = recv_one(&mut seen).await;
        assert_eq!(got.action, Action::SwReady);

        // And the next frame still flows.
        worker.post_message(Outbound::new(Action::ReloadConfig)).unwrap();
        let got = recv_one(&mut seen).await;
        assert_eq!(got.action, Action::ReloadConfig);
    }

    #[tokio::test]
    async fn test_listener_registrations_accumulate() {
        let name = "test:accumulate";
        let page = CommsChannel::with_channel_name(Role::Window, name);
        let worker = CommsChannel::with_channel_name(Role::Sw, name);

        let (cb1, mut seen1) = tap();
        let (cb2, mut seen2) = tap();
        page.on_message_from(Role::Sw, cb1).unwrap();
        page.on_message_from(Role::Sw, cb2).unwrap();

        worker.post_message(Outbound::new(Action::SwReady)).unwrap();
        assert_eq!(recv_one(&mut seen1).await.action, Action::SwReady);
        assert_eq!(recv_one(&mut seen2).await.action, Action::SwReady);
    }
}
