//! # Cancellable asynchronous task.
//!
//! A [`Task`] wraps an operation factory `FnOnce(AbortSignal) -> Future`.
//! Construction does no work; the factory runs at most once, on the first
//! [`perform`](Task::perform).
//!
//! ## Lifecycle
//! ```text
//! Task::new(factory)                         status = Idle
//!   │
//!   ├─► perform()/execute()/.await ──► status = Pending
//!   │      └─► spawn on runtime:
//!   │            ├─ signal fired? ──► Aborted (factory never invoked)
//!   │            └─ spawn factory(signal) as its own task
//!   │                 race(signal, join handle)
//!   │                 ├─ Ok(v)               ──► Fulfilled
//!   │                 ├─ Err(cancellation)   ──► Aborted
//!   │                 ├─ Err(other)/panic    ──► Rejected
//!   │                 └─ signal fired        ──► Aborted (operation detached, keeps running)
//!   │
//!   └─► abort() while Idle ──► trigger signal ──► Aborted (Dropped)
//!       abort() while Pending ──► trigger signal ──► wait until settled
//! ```
//!
//! ## Rules
//! - Exactly one terminal transition; state is immutable afterwards.
//! - Once the signal has fired the settlement is `Aborted`, even if the
//!   operation produced a value in the same step.
//! - Listeners are notified **before** awaiters of the result are woken, so an
//!   awaiter always observes bookkeeping done by listeners.
//! - Aborting never drops a running operation: it is detached and winds down
//!   on its own once it observes the signal. Its late output is discarded.
//! - The state lock is never held across an `.await` or while user code runs.

use std::any::Any;
use std::fmt;
use std::future::{IntoFuture, ready};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use parking_lot::Mutex;
use tokio::{runtime::Handle, sync::oneshot};
use tracing::trace;

use crate::error::{DEFAULT_ABORT_REASON, TaskError};
use crate::signal::{AbortSignal, race};

use super::listeners::{ListenerId, Listeners};
use super::status::{TaskEventKind, TaskId, TaskStatus};

/// Result a task settles with.
pub type TaskResult<T> = Result<T, TaskError>;

/// Memoized, cloneable handle to a task's settlement.
pub type TaskFuture<T> = Shared<BoxFuture<'static, TaskResult<T>>>;

type Factory<T> = Box<dyn FnOnce(AbortSignal) -> BoxFuture<'static, TaskResult<T>> + Send>;

/// A single cancellable asynchronous unit of work with observable state.
///
/// `Task` is a cheap handle (`Arc` inside); clones refer to the same task.
///
/// # Example
/// ```
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// use jobvisor::{AbortSignal, Task, TaskError, TaskStatus};
///
/// let task = Task::new(|_signal: AbortSignal| async { Ok::<_, TaskError>(21 * 2) });
/// assert_eq!(task.status(), TaskStatus::Idle);
///
/// assert_eq!(task.clone().await.unwrap(), 42);
/// assert_eq!(task.status(), TaskStatus::Fulfilled);
/// assert_eq!(task.value(), Some(42));
/// # }
/// ```
pub struct Task<T> {
    inner: Arc<Inner<T>>,
}

struct Inner<T> {
    id: TaskId,
    signal: AbortSignal,
    runtime: Option<Handle>,
    state: Mutex<State<T>>,
    listeners: Listeners<T>,
}

struct State<T> {
    status: TaskStatus,
    value: Option<T>,
    error: Option<TaskError>,
    factory: Option<Factory<T>>,
    handle: Option<TaskFuture<T>>,
    settled_tx: Option<oneshot::Sender<TaskResult<T>>>,
}

impl<T: Clone> State<T> {
    fn result(&self) -> TaskResult<T> {
        match (&self.value, &self.error) {
            (_, Some(error)) => Err(error.clone()),
            (Some(value), None) => Ok(value.clone()),
            (None, None) => Err(TaskError::Detached),
        }
    }
}

/// Terminal transition computed under the state lock, delivered after it.
struct Settlement<T> {
    kind: TaskEventKind,
    result: TaskResult<T>,
    tx: Option<oneshot::Sender<TaskResult<T>>>,
}

impl<T> Task<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Creates an idle task; `factory` runs on the ambient Tokio runtime once started.
    pub fn new<F, Fut>(factory: F) -> Self
    where
        F: FnOnce(AbortSignal) -> Fut + Send + 'static,
        Fut: Future<Output = TaskResult<T>> + Send + 'static,
    {
        Self::with_runtime(None, factory)
    }

    /// Creates an idle task whose operation is spawned on `runtime` once started.
    ///
    /// `None` spawns on the runtime current at start time, detached from the
    /// caller's own future.
    pub fn with_runtime<F, Fut>(runtime: Option<Handle>, factory: F) -> Self
    where
        F: FnOnce(AbortSignal) -> Fut + Send + 'static,
        Fut: Future<Output = TaskResult<T>> + Send + 'static,
    {
        let factory: Factory<T> = Box::new(move |signal| factory(signal).boxed());
        Self {
            inner: Arc::new(Inner {
                id: TaskId::next(),
                signal: AbortSignal::new(),
                runtime,
                state: Mutex::new(State {
                    status: TaskStatus::Idle,
                    value: None,
                    error: None,
                    factory: Some(factory),
                    handle: None,
                    settled_tx: None,
                }),
                listeners: Listeners::new(),
            }),
        }
    }

    /// Starts the task (first call only) and returns the memoized result handle.
    ///
    /// Later calls return the same handle whatever the current status. If the
    /// signal already fired, the handle resolves to a cancellation error and
    /// the factory is never invoked.
    ///
    /// A started operation is spawned onto the runtime: it progresses whether
    /// or not the returned handle is polled. Must be called within a Tokio
    /// runtime unless one was passed to [`Task::with_runtime`].
    pub fn perform(&self) -> TaskFuture<T> {
        let mut state = self.inner.state.lock();
        if let Some(handle) = &state.handle {
            return handle.clone();
        }

        let mut settlement = None;
        let mut factory = None;
        if state.status == TaskStatus::Idle {
            match self.inner.signal.reason() {
                Some(reason) => {
                    factory = state.factory.take();
                    settlement =
                        self.transition(&mut state, Err(TaskError::Dropped { reason }));
                }
                None => {
                    let (tx, rx) = oneshot::channel();
                    let handle = async move { rx.await.unwrap_or(Err(TaskError::Detached)) }
                        .boxed()
                        .shared();
                    state.status = TaskStatus::Pending;
                    state.settled_tx = Some(tx);
                    state.handle = Some(handle.clone());
                    let factory = state.factory.take();
                    drop(state);

                    trace!(task = %self.inner.id, status = "pending", "task started");
                    self.launch(factory);
                    return handle;
                }
            }
        }

        let handle = ready(state.result()).boxed().shared();
        state.handle = Some(handle.clone());
        drop(state);
        drop(factory);
        if let Some(settlement) = settlement {
            self.finish(settlement);
        }
        handle
    }

    /// Alias of [`perform`](Task::perform).
    #[inline]
    pub fn execute(&self) -> TaskFuture<T> {
        self.perform()
    }

    /// Starts the task without keeping the result handle.
    #[inline]
    pub fn start(&self) {
        drop(self.perform());
    }

    /// Aborts the task and returns once it has settled.
    ///
    /// - terminal: no-op
    /// - idle: fires the signal and settles `Aborted` immediately; the factory is never invoked
    /// - pending: fires the signal and waits for the in-flight race to settle
    ///
    /// The expected cancellation error is swallowed; `abort` itself never fails.
    /// If the operation settled before the signal fired, the task keeps that outcome.
    pub async fn abort(&self, reason: Option<&str>) {
        let Some(handle) = self.cancel(reason) else {
            return;
        };
        if let Err(err) = handle.await {
            if !err.is_cancellation() {
                trace!(task = %self.inner.id, error = %err, "error swallowed by abort");
            }
        }
    }

    /// Synchronous half of [`abort`](Task::abort): fires the signal without waiting.
    ///
    /// Returns the pending result handle when the task was in flight, `None` otherwise.
    pub fn cancel(&self, reason: Option<&str>) -> Option<TaskFuture<T>> {
        let reason: Arc<str> = Arc::from(reason.unwrap_or(DEFAULT_ABORT_REASON));
        let mut state = self.inner.state.lock();
        match state.status {
            TaskStatus::Idle => {
                self.inner.signal.trigger(reason.clone());
                let detached = self.inner.listeners.detach_signal_scoped();
                let factory = state.factory.take();
                let reason = self.inner.signal.reason().unwrap_or(reason);
                let settlement = self.transition(&mut state, Err(TaskError::Dropped { reason }));
                drop(state);
                drop((detached, factory));

                if let Some(settlement) = settlement {
                    self.finish(settlement);
                }
                None
            }
            TaskStatus::Pending => {
                let detached = if self.inner.signal.trigger(reason) {
                    self.inner.listeners.detach_signal_scoped()
                } else {
                    Vec::new()
                };
                let handle = state.handle.clone();
                drop(state);
                drop(detached);
                handle
            }
            _ => None,
        }
    }

    /// Registers a lifecycle listener and returns a handle to remove it.
    ///
    /// A listener fires at most once, when the task settles with the matching
    /// outcome. Fulfill/reject listeners are scoped to the task's signal: they
    /// are discarded once it fires. Registering on a settled task is a no-op.
    pub fn add_listener<F>(&self, kind: TaskEventKind, listener: F) -> ListenerId
    where
        F: Fn(&Task<T>) + Send + Sync + 'static,
    {
        let id = self.inner.listeners.allocate();
        let state = self.inner.state.lock();
        let relevant = !state.status.is_terminal()
            && !(kind.scoped_to_signal() && self.inner.signal.is_triggered());
        if relevant {
            self.inner.listeners.insert(id, kind, Arc::new(listener));
        }
        drop(state);
        id
    }

    /// Removes a listener; returns `false` if it was not registered (or already fired).
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.inner.listeners.remove(id)
    }

    fn launch(&self, factory: Option<Factory<T>>) {
        let guard = SettleOnDrop(Some(self.clone()));
        let signal = self.inner.signal.clone();
        let work = async move {
            let result = match factory {
                Some(factory) if !signal.is_triggered() => {
                    match panic::catch_unwind(AssertUnwindSafe(|| factory(signal.clone()))) {
                        Ok(op) => {
                            // Own task: losing the race detaches the operation
                            // instead of dropping it mid-await.
                            let running = tokio::spawn(AssertUnwindSafe(op).catch_unwind());
                            match race(&signal, running).await {
                                Ok(Ok(Ok(result))) => result,
                                Ok(Ok(Err(panic))) => Err(panicked(panic.as_ref())),
                                Ok(Err(_cancelled)) => Err(TaskError::Detached),
                                Err(aborted) => Err(aborted),
                            }
                        }
                        Err(panic) => Err(panicked(panic.as_ref())),
                    }
                }
                _ => Err(signal.abort_error()),
            };
            guard.complete(result);
        };

        match &self.inner.runtime {
            Some(runtime) => {
                runtime.spawn(work);
            }
            None => {
                tokio::spawn(work);
            }
        }
    }

    fn settle(&self, result: TaskResult<T>) {
        let settlement = {
            let mut state = self.inner.state.lock();
            self.transition(&mut state, result)
        };
        if let Some(settlement) = settlement {
            self.finish(settlement);
        }
    }

    fn transition(&self, state: &mut State<T>, result: TaskResult<T>) -> Option<Settlement<T>> {
        if state.status.is_terminal() {
            return None;
        }

        let result = match result {
            Err(err) if err.is_cancellation() => Err(err),
            _ if self.inner.signal.is_triggered() => Err(self.inner.signal.abort_error()),
            other => other,
        };
        let kind = match &result {
            Ok(value) => {
                state.value = Some(value.clone());
                TaskEventKind::Fulfill
            }
            Err(err) => {
                state.error = Some(err.clone());
                if err.is_cancellation() {
                    TaskEventKind::Abort
                } else {
                    TaskEventKind::Reject
                }
            }
        };
        state.status = kind.status();
        state.factory = None;

        Some(Settlement {
            kind,
            result,
            tx: state.settled_tx.take(),
        })
    }

    fn finish(&self, settlement: Settlement<T>) {
        trace!(
            task = %self.inner.id,
            status = settlement.kind.status().as_label(),
            "task settled"
        );
        self.inner.listeners.notify(settlement.kind, self);
        if let Some(tx) = settlement.tx {
            let _ = tx.send(settlement.result);
        }
    }
}

impl<T> Task<T> {
    /// Process-unique identifier.
    pub fn id(&self) -> TaskId {
        self.inner.id
    }

    /// Current lifecycle state.
    pub fn status(&self) -> TaskStatus {
        self.inner.state.lock().status
    }

    /// True once the task has settled.
    pub fn is_terminal(&self) -> bool {
        self.status().is_terminal()
    }

    /// The signal handed to the operation factory.
    pub fn signal(&self) -> &AbortSignal {
        &self.inner.signal
    }

    /// The error the task settled with, if any.
    pub fn error(&self) -> Option<TaskError> {
        self.inner.state.lock().error.clone()
    }

    /// True if both handles refer to the same task.
    #[inline]
    pub fn ptr_eq(&self, other: &Task<T>) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T: Clone> Task<T> {
    /// The value the task fulfilled with, if any.
    pub fn value(&self) -> Option<T> {
        self.inner.state.lock().value.clone()
    }
}

impl<T> Clone for Task<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> PartialEq for Task<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<T> Eq for Task<T> {}

impl<T> fmt::Debug for Task<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("id", &self.inner.id)
            .field("status", &self.status())
            .finish_non_exhaustive()
    }
}

impl<T> IntoFuture for Task<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Output = TaskResult<T>;
    type IntoFuture = TaskFuture<T>;

    fn into_future(self) -> Self::IntoFuture {
        self.perform()
    }
}

impl<T> IntoFuture for &Task<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Output = TaskResult<T>;
    type IntoFuture = TaskFuture<T>;

    fn into_future(self) -> Self::IntoFuture {
        self.perform()
    }
}

/// Settles the task `Detached` if the spawned operation is dropped unfinished.
struct SettleOnDrop<T>(Option<Task<T>>)
where
    T: Clone + Send + Sync + 'static;

impl<T> SettleOnDrop<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn complete(mut self, result: TaskResult<T>) {
        if let Some(task) = self.0.take() {
            task.settle(result);
        }
    }
}

impl<T> Drop for SettleOnDrop<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn drop(&mut self) {
        if let Some(task) = self.0.take() {
            task.settle(Err(TaskError::Detached));
        }
    }
}

fn panicked(payload: &(dyn Any + Send)) -> TaskError {
    let info = if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    };
    TaskError::Panicked { info: info.into() }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use tokio::time;

    use super::*;

    fn counted(
        calls: &Arc<AtomicUsize>,
        delay: Duration,
        value: &'static str,
    ) -> Task<&'static str> {
        let calls = Arc::clone(calls);
        Task::new(move |_signal: AbortSignal| async move {
            calls.fetch_add(1, Ordering::SeqCst);
            time::sleep(delay).await;
            Ok(value)
        })
    }

    fn counter(task: &Task<&'static str>, kind: TaskEventKind) -> Arc<AtomicUsize> {
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        task.add_listener(kind, move |_| {
            h.fetch_add(1, Ordering::SeqCst);
        });
        hits
    }

    #[tokio::test(start_paused = true)]
    async fn construction_is_lazy() {
        let calls = Arc::new(AtomicUsize::new(0));
        let task = counted(&calls, Duration::from_millis(1), "x");
        time::sleep(Duration::from_millis(10)).await;
        assert_eq!(task.status(), TaskStatus::Idle);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn factory_runs_once_across_all_entry_points() {
        let calls = Arc::new(AtomicUsize::new(0));
        let task = counted(&calls, Duration::from_millis(1), "x");

        let first = task.perform();
        assert_eq!(task.status(), TaskStatus::Pending);
        let second = task.execute();

        assert_eq!(first.await.unwrap(), "x");
        assert_eq!(second.await.unwrap(), "x");
        assert_eq!((&task).await.unwrap(), "x");
        assert_eq!(task.perform().await.unwrap(), "x");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(task.status(), TaskStatus::Fulfilled);
    }

    #[tokio::test(start_paused = true)]
    async fn operation_progresses_without_being_polled() {
        let calls = Arc::new(AtomicUsize::new(0));
        let task = counted(&calls, Duration::from_millis(5), "bg");
        task.start();

        time::sleep(Duration::from_millis(20)).await;
        assert_eq!(task.status(), TaskStatus::Fulfilled);
        assert_eq!(task.value(), Some("bg"));
    }

    #[tokio::test]
    async fn application_error_rejects() {
        let task: Task<u32> =
            Task::new(|_signal| async { Err(TaskError::fail(anyhow::anyhow!("bad input"))) });
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        task.add_listener(TaskEventKind::Reject, move |t| {
            assert_eq!(t.status(), TaskStatus::Rejected);
            h.fetch_add(1, Ordering::SeqCst);
        });

        let err = task.perform().await.unwrap_err();
        assert_eq!(err.as_label(), "task_failed");
        assert_eq!(task.status(), TaskStatus::Rejected);
        assert!(task.value().is_none());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn cancellation_error_from_operation_settles_aborted() {
        let task: Task<u32> = Task::new(|_signal| async { Err(TaskError::aborted("gave up")) });
        let err = task.perform().await.unwrap_err();
        assert!(err.is_cancellation());
        assert_eq!(task.status(), TaskStatus::Aborted);
    }

    fn explode() -> TaskResult<u32> {
        panic!("kaboom")
    }

    #[tokio::test]
    async fn panic_settles_rejected() {
        let task: Task<u32> = Task::new(|_signal| async { explode() });
        let err = task.perform().await.unwrap_err();
        match err {
            TaskError::Panicked { info } => assert_eq!(&*info, "kaboom"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(task.status(), TaskStatus::Rejected);
    }

    #[tokio::test(start_paused = true)]
    async fn abort_idle_settles_without_invoking_factory() {
        let calls = Arc::new(AtomicUsize::new(0));
        let task = counted(&calls, Duration::from_millis(1), "x");
        let aborted = counter(&task, TaskEventKind::Abort);

        task.abort(Some("never needed")).await;

        assert_eq!(task.status(), TaskStatus::Aborted);
        assert_eq!(aborted.load(Ordering::SeqCst), 1);
        assert!(matches!(task.error(), Some(TaskError::Dropped { .. })));

        let err = task.perform().await.unwrap_err();
        assert_eq!(err.reason(), Some("never needed"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn abort_pending_returns_after_settlement() {
        let calls = Arc::new(AtomicUsize::new(0));
        let task = counted(&calls, Duration::from_secs(3600), "slow");
        let fulfilled = counter(&task, TaskEventKind::Fulfill);
        let aborted = counter(&task, TaskEventKind::Abort);

        let handle = task.perform();
        time::sleep(Duration::from_millis(1)).await;
        task.abort(Some("user typed again")).await;

        assert_eq!(task.status(), TaskStatus::Aborted);
        assert_eq!(aborted.load(Ordering::SeqCst), 1);
        assert_eq!(fulfilled.load(Ordering::SeqCst), 0);
        let err = handle.await.unwrap_err();
        assert_eq!(err.reason(), Some("user typed again"));
        assert!(matches!(err, TaskError::Aborted { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn abort_before_the_spawned_operation_runs_skips_factory() {
        let calls = Arc::new(AtomicUsize::new(0));
        let task = counted(&calls, Duration::from_millis(1), "x");

        task.start();
        task.abort(None).await;

        assert_eq!(task.status(), TaskStatus::Aborted);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn signal_firing_detaches_outcome_listeners() {
        let calls = Arc::new(AtomicUsize::new(0));
        let task = counted(&calls, Duration::from_secs(1), "x");
        task.start();
        let handle = task.cancel(None).expect("pending handle");

        let late = counter(&task, TaskEventKind::Fulfill);
        let abort_after = counter(&task, TaskEventKind::Abort);
        let _ = handle.await;

        assert_eq!(late.load(Ordering::SeqCst), 0);
        assert_eq!(abort_after.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn abort_after_settlement_is_noop() {
        let task: Task<u32> = Task::new(|_signal| async { Ok(1) });
        assert_eq!(task.perform().await.unwrap(), 1);

        task.abort(Some("too late")).await;
        assert_eq!(task.status(), TaskStatus::Fulfilled);
        assert!(!task.signal().is_triggered());
    }

    #[tokio::test(start_paused = true)]
    async fn removed_listener_never_fires() {
        let calls = Arc::new(AtomicUsize::new(0));
        let task = counted(&calls, Duration::from_millis(1), "x");
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        let id = task.add_listener(TaskEventKind::Fulfill, move |_| {
            h.fetch_add(1, Ordering::SeqCst);
        });

        assert!(task.remove_listener(id));
        assert!(!task.remove_listener(id));
        task.perform().await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn settlement_drains_listeners() {
        let calls = Arc::new(AtomicUsize::new(0));
        let task = counted(&calls, Duration::from_millis(1), "x");
        for kind in TaskEventKind::ALL {
            task.add_listener(kind, |_| {});
        }
        assert_eq!(task.inner.listeners.len(), 3);

        task.perform().await.unwrap();
        assert_eq!(task.inner.listeners.len(), 0);

        task.add_listener(TaskEventKind::Abort, |_| {});
        assert_eq!(task.inner.listeners.len(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn aborted_operation_finishes_its_cleanup() {
        let stopped = Arc::new(AtomicUsize::new(0));
        let flag = Arc::clone(&stopped);
        let task: Task<()> = Task::new(move |signal: AbortSignal| async move {
            signal.triggered().await;
            time::sleep(Duration::from_millis(1)).await;
            flag.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        task.start();
        time::sleep(Duration::from_millis(1)).await;
        task.abort(None).await;

        assert_eq!(task.status(), TaskStatus::Aborted);
        assert_eq!(task.signal().reason().as_deref(), Some(DEFAULT_ABORT_REASON));
        assert_eq!(stopped.load(Ordering::SeqCst), 0);

        time::sleep(Duration::from_millis(100)).await;
        assert_eq!(stopped.load(Ordering::SeqCst), 1);
        assert_eq!(task.status(), TaskStatus::Aborted);
        assert!(task.value().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn panic_while_building_the_operation_rejects() {
        let task: Task<u32> = Task::new(|_signal| -> futures::future::Ready<TaskResult<u32>> {
            panic!("no backend configured")
        });
        let err = task.perform().await.unwrap_err();
        assert_eq!(err.as_label(), "task_panicked");
        assert_eq!(task.status(), TaskStatus::Rejected);
    }

    #[test]
    fn explicit_runtime_drives_the_operation() {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .expect("runtime");
        let task: Task<u8> = Task::with_runtime(Some(runtime.handle().clone()), |_signal| async {
            Ok(9)
        });

        let value = futures::executor::block_on(task.perform()).unwrap();
        assert_eq!(value, 9);
    }
}
