//! Background execution with ordered hand-back to a presentation context.
//!
//! Interactive front ends own state that must only be touched from one
//! place (a UI thread, a console loop). [`ExecutionBridge::start`] runs a
//! dispatch on a worker task and queues its result; the owner drains the
//! [`PresentationQueue`] on its own thread and each result callback runs
//! there, exactly once.
//!
//! ```no_run
//! # use gplay_dispatch::{bridge, ActionRouter, Request, PlayStoreService};
//! # use std::sync::Arc;
//! # async fn demo(service: Arc<dyn PlayStoreService>) {
//! let router = Arc::new(ActionRouter::new(service));
//! let (bridge, mut queue) = bridge::channel::<Vec<String>>(router, tokio::runtime::Handle::current());
//!
//! bridge.start("search", Request::from_pairs([("query", "chess")]), |log, id, outcome| {
//!     log.push(format!("{id}: {}", outcome.is_success()));
//! });
//!
//! let mut log = Vec::new();
//! queue.deliver_next(&mut log).await;
//! # }
//! ```

use crate::outcome::Outcome;
use crate::params::Request;
use crate::router::ActionRouter;
use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicU8, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Identifier of one background run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RunId(u64);

impl RunId {
    /// Wrap a raw run number.
    #[must_use]
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Numeric value.
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "run-{}", self.0)
    }
}

/// Lifecycle of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Worker still running, or result queued but not yet delivered
    Running,
    /// Result callback has run in the presentation context
    Delivered,
}

const STATE_RUNNING: u8 = 0;
const STATE_DELIVERED: u8 = 1;

/// Caller-side view of a started run.
#[derive(Debug, Clone)]
pub struct RunHandle {
    id: RunId,
    state: Arc<AtomicU8>,
}

impl RunHandle {
    /// Run identifier.
    #[must_use]
    pub fn id(&self) -> RunId {
        self.id
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> RunState {
        match self.state.load(Ordering::Acquire) {
            STATE_DELIVERED => RunState::Delivered,
            _ => RunState::Running,
        }
    }

    /// True once the callback has run.
    #[must_use]
    pub fn is_delivered(&self) -> bool {
        self.state() == RunState::Delivered
    }
}

type Callback<C> = Box<dyn FnOnce(&mut C, RunId, Outcome) + Send + 'static>;

/// A finished run waiting to be handed to the presentation context.
pub struct Delivery<C: 'static> {
    id: RunId,
    outcome: Outcome,
    callback: Callback<C>,
    state: Arc<AtomicU8>,
    pending: Arc<AtomicUsize>,
}

impl<C: 'static> Delivery<C> {
    /// Run this result belongs to.
    #[must_use]
    pub fn id(&self) -> RunId {
        self.id
    }

    /// The outcome about to be delivered.
    #[must_use]
    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    /// Invoke the result callback. Consumes the delivery, so it can only
    /// happen once.
    pub fn deliver(self, context: &mut C) {
        self.state.store(STATE_DELIVERED, Ordering::Release);
        self.pending.fetch_sub(1, Ordering::AcqRel);
        (self.callback)(context, self.id, self.outcome);
    }
}

impl<C: 'static> fmt::Debug for Delivery<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Delivery")
            .field("id", &self.id)
            .field("outcome", &self.outcome)
            .finish_non_exhaustive()
    }
}

/// Starts runs on worker tasks.
///
/// Cloning is not supported; share it behind a reference. Runs started
/// from one bridge are independent of each other and may finish in any
/// order.
pub struct ExecutionBridge<C: 'static> {
    router: Arc<ActionRouter>,
    runtime: Handle,
    sender: mpsc::UnboundedSender<Delivery<C>>,
    next_id: AtomicU64,
    pending: Arc<AtomicUsize>,
}

/// Receiving end owned by the presentation context.
pub struct PresentationQueue<C: 'static> {
    receiver: mpsc::UnboundedReceiver<Delivery<C>>,
}

/// Create a bridge and the queue its results arrive on.
#[must_use]
pub fn channel<C: 'static>(
    router: Arc<ActionRouter>,
    runtime: Handle,
) -> (ExecutionBridge<C>, PresentationQueue<C>) {
    let (sender, receiver) = mpsc::unbounded_channel();
    let bridge = ExecutionBridge {
        router,
        runtime,
        sender,
        next_id: AtomicU64::new(1),
        pending: Arc::new(AtomicUsize::new(0)),
    };
    (bridge, PresentationQueue { receiver })
}

impl<C: 'static> ExecutionBridge<C> {
    /// Dispatch `action` on a worker task and queue `on_result` for the
    /// presentation context.
    ///
    /// Returns immediately. The worker never touches presentation state;
    /// a panic anywhere in the run is delivered as an internal error.
    pub fn start<F>(&self, action: impl Into<String>, request: Request, on_result: F) -> RunHandle
    where
        F: FnOnce(&mut C, RunId, Outcome) + Send + 'static,
    {
        let id = RunId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let action = action.into();
        let state = Arc::new(AtomicU8::new(STATE_RUNNING));
        self.pending.fetch_add(1, Ordering::AcqRel);

        debug!(run = %id, %action, "starting background run");

        let router = Arc::clone(&self.router);
        let worker = self
            .runtime
            .spawn(async move { router.dispatch(&action, &request).await });

        let sender = self.sender.clone();
        let delivery_state = Arc::clone(&state);
        let pending = Arc::clone(&self.pending);
        self.runtime.spawn(async move {
            let outcome = match worker.await {
                Ok(outcome) => outcome,
                Err(err) if err.is_panic() => {
                    warn!(run = %id, "worker panicked");
                    Outcome::from_panic(err.into_panic().as_ref())
                }
                Err(err) => {
                    warn!(run = %id, error = %err, "worker did not complete");
                    Outcome::internal(err.to_string())
                }
            };

            let delivery = Delivery {
                id,
                outcome,
                callback: Box::new(on_result),
                state: delivery_state,
                pending: Arc::clone(&pending),
            };
            if sender.send(delivery).is_err() {
                pending.fetch_sub(1, Ordering::AcqRel);
                debug!(run = %id, "presentation queue closed, dropping result");
            }
        });

        RunHandle { id, state }
    }

    /// Runs started but not yet delivered.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::Acquire)
    }
}

impl<C: 'static> PresentationQueue<C> {
    /// Wait for the next finished run.
    ///
    /// Returns `None` once the bridge is dropped and every queued result
    /// has been taken.
    pub async fn next(&mut self) -> Option<Delivery<C>> {
        self.receiver.recv().await
    }

    /// Take a finished run without waiting.
    pub fn try_next(&mut self) -> Option<Delivery<C>> {
        self.receiver.try_recv().ok()
    }

    /// Wait for the next finished run and deliver it. Returns false when
    /// the queue is closed.
    pub async fn deliver_next(&mut self, context: &mut C) -> bool {
        match self.next().await {
            Some(delivery) => {
                delivery.deliver(context);
                true
            }
            None => false,
        }
    }

    /// Deliver every result already queued. Returns how many ran.
    pub fn deliver_pending(&mut self, context: &mut C) -> usize {
        let mut delivered = 0;
        while let Some(delivery) = self.try_next() {
            delivery.deliver(context);
            delivered += 1;
        }
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::FailureKind;
    use crate::test_support::RecordingService;
    use std::collections::HashMap;

    #[derive(Default)]
    struct View {
        results: HashMap<RunId, Outcome>,
        deliveries: usize,
    }

    fn setup() -> (ExecutionBridge<View>, PresentationQueue<View>) {
        let router = Arc::new(ActionRouter::new(Arc::new(RecordingService::default())));
        channel(router, Handle::current())
    }

    fn record(view: &mut View, id: RunId, outcome: Outcome) {
        view.deliveries += 1;
        view.results.insert(id, outcome);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_runs_deliver_once_each() {
        let (bridge, mut queue) = setup();
        let mut view = View::default();

        let first = bridge.start("app", Request::from_pairs([("appId", "a")]), record);
        let second = bridge.start(
            "search",
            Request::from_pairs([("query", "b")]),
            record,
        );
        assert_ne!(first.id(), second.id());

        assert!(queue.deliver_next(&mut view).await);
        assert!(queue.deliver_next(&mut view).await);

        assert_eq!(view.deliveries, 2);
        assert!(view.results[&first.id()].is_success());
        assert!(view.results[&second.id()].is_success());
        assert!(first.is_delivered());
        assert!(second.is_delivered());
        assert_eq!(bridge.pending(), 0);

        drop(bridge);
        assert!(queue.next().await.is_none());
        assert_eq!(view.deliveries, 2);
    }

    #[tokio::test]
    async fn test_state_changes_only_on_delivery() {
        let (bridge, mut queue) = setup();
        let mut view = View::default();

        let handle = bridge.start("developer", Request::from_pairs([("developerId", "x")]), record);
        assert_eq!(bridge.pending(), 1);

        let delivery = queue.next().await.expect("run finishes");
        assert_eq!(delivery.id(), handle.id());
        assert!(delivery.outcome().is_success());
        assert_eq!(handle.state(), RunState::Running);
        assert_eq!(view.deliveries, 0);

        delivery.deliver(&mut view);
        assert_eq!(handle.state(), RunState::Delivered);
        assert_eq!(view.deliveries, 1);
        assert_eq!(bridge.pending(), 0);
    }

    #[tokio::test]
    async fn test_panicking_run_delivers_internal_error() {
        let (bridge, mut queue) = setup();
        let mut view = View::default();

        let handle = bridge.start("app", Request::from_pairs([("appId", "panic")]), record);
        assert!(queue.deliver_next(&mut view).await);

        let outcome = &view.results[&handle.id()];
        assert_eq!(outcome.failure_kind(), Some(FailureKind::InternalError));
    }

    #[tokio::test]
    async fn test_failures_are_delivered_too() {
        let (bridge, mut queue) = setup();
        let mut view = View::default();

        bridge.start("reviews", Request::default(), record);
        bridge.start("charts", Request::default(), record);

        for _ in 0..2 {
            assert!(queue.deliver_next(&mut view).await);
        }
        assert_eq!(view.deliveries, 2);
        assert!(view
            .results
            .values()
            .all(|outcome| outcome.failure_kind() == Some(FailureKind::InvalidInput)));
        assert_eq!(queue.deliver_pending(&mut view), 0);
    }

    #[test]
    fn test_run_id_display() {
        assert_eq!(RunId(7).to_string(), "run-7");
        assert_eq!(RunId(7).get(), 7);
    }
}
