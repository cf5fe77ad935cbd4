//! # Job: single-flight coordinator over tasks.
//!
//! A [`Job`] owns zero or one pending [`Task`]. Every `perform(args)` builds a
//! new task from the job's [`Operation`] and applies the job's
//! [`ConcurrencyMode`] against the task that is already pending.
//!
//! ## Architecture
//! ```text
//! perform(args)
//!   ├─► Task::with_runtime(cfg.runtime, |signal| operation.call(args, signal))
//!   ├─► register fulfill/reject/abort listeners (bookkeeping, Weak<job>)
//!   ├─► lock: perform_count += 1, decide admission
//!   │     ├─ nothing pending      → last_pending = new        → start new
//!   │     ├─ pending + Drop       → (slots untouched)         → abort new (never starts)
//!   │     └─ pending + Restart    → last_pending = new        → abort old, start new
//!   └─► return new task
//!
//! listener(task settled)
//!   ├─► lock: last_fulfilled | last_rejected | last_aborted (+ last_settled)
//!   │         if task == last_pending → last_pending = None   (job idle)
//!   └─► publish TaskFulfilled/TaskRejected/TaskAborted (+ JobIdle)
//! ```
//!
//! ## Rules
//! - At most one task is `last_pending` at any time; slots change under one lock.
//! - A superseded task settling late only updates its `last_*` slot, never the status.
//! - Aborted tasks do not update `last_settled`.
//! - `perform()` never fails; outcomes are observed through the returned task.

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::debug;

use crate::events::{Bus, Event, EventKind};
use crate::policies::ConcurrencyMode;
use crate::signal::AbortSignal;
use crate::tasks::{Task, TaskEventKind, TaskResult};

use super::config::JobConfig;
use super::guard::AbortOnDrop;
use super::operation::{OperationFn, OperationRef};

/// Reason a new task is aborted with when the job is busy in `Drop` mode.
pub const DROP_REASON: &str = "dropped: job already has a pending task";

/// Reason the pending task is aborted with in `Restart` mode.
pub const RESTART_REASON: &str = "restarted: superseded by a newer perform";

/// Whether a job currently has a pending task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobStatus {
    /// No task pending.
    #[default]
    Idle,
    /// `last_pending` is set.
    Pending,
}

impl JobStatus {
    /// Returns a short stable label for use in logs.
    pub fn as_label(self) -> &'static str {
        match self {
            JobStatus::Idle => "idle",
            JobStatus::Pending => "pending",
        }
    }
}

/// Consistent copy of a job's observable fields, taken under one lock.
#[derive(Debug, Clone)]
pub struct JobSnapshot<T> {
    pub status: JobStatus,
    pub perform_count: u64,
    pub last_pending: Option<Task<T>>,
    pub last_fulfilled: Option<Task<T>>,
    pub last_rejected: Option<Task<T>>,
    pub last_aborted: Option<Task<T>>,
    pub last_settled: Option<Task<T>>,
}

/// Policy-driven coordinator permitting at most one pending task.
///
/// `Job` is a cheap handle; clones share the same slots and counter.
///
/// # Example
/// ```
/// # #[tokio::main(flavor = "current_thread", start_paused = true)]
/// # async fn main() {
/// use std::time::Duration;
/// use jobvisor::{AbortSignal, ConcurrencyMode, Job, TaskError, TaskStatus, timeout};
///
/// let search = Job::with_mode(
///     |query: &'static str, signal: AbortSignal| async move {
///         timeout(&signal, Duration::from_millis(50)).await?;
///         Ok::<_, TaskError>(format!("results for {query}"))
///     },
///     ConcurrencyMode::Restart,
/// );
///
/// let first = search.perform("ru");
/// let second = search.perform("rust");
///
/// assert_eq!(second.clone().await.unwrap(), "results for rust");
/// assert_eq!(first.status(), TaskStatus::Aborted);
/// assert_eq!(search.last_fulfilled(), Some(second));
/// # }
/// ```
pub struct Job<T, A = ()> {
    inner: Arc<JobInner<T, A>>,
}

struct JobInner<T, A> {
    name: Arc<str>,
    config: JobConfig,
    operation: OperationRef<T, A>,
    bus: Bus,
    state: Mutex<JobState<T>>,
}

struct JobState<T> {
    perform_count: u64,
    last_pending: Option<Task<T>>,
    last_fulfilled: Option<Task<T>>,
    last_rejected: Option<Task<T>>,
    last_aborted: Option<Task<T>>,
    last_settled: Option<Task<T>>,
}

impl<T> JobState<T> {
    fn new() -> Self {
        Self {
            perform_count: 0,
            last_pending: None,
            last_fulfilled: None,
            last_rejected: None,
            last_aborted: None,
            last_settled: None,
        }
    }

    fn status(&self) -> JobStatus {
        if self.last_pending.is_some() {
            JobStatus::Pending
        } else {
            JobStatus::Idle
        }
    }
}

/// Admission decision taken under the state lock, applied after it.
enum Admission<T> {
    Start,
    Drop,
    Restart(Task<T>),
}

impl<T, A> Job<T, A>
where
    T: Clone + Send + Sync + 'static,
    A: Send + 'static,
{
    /// Creates a job in `Drop` mode.
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(A, AbortSignal) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = TaskResult<T>> + Send + 'static,
    {
        Self::with_config(f, JobConfig::default())
    }

    /// Creates a job with the given concurrency mode.
    pub fn with_mode<F, Fut>(f: F, mode: ConcurrencyMode) -> Self
    where
        F: Fn(A, AbortSignal) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = TaskResult<T>> + Send + 'static,
    {
        Self::with_config(f, JobConfig::with_mode(mode))
    }

    /// Creates a job from a closure and a full configuration.
    pub fn with_config<F, Fut>(f: F, config: JobConfig) -> Self
    where
        F: Fn(A, AbortSignal) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = TaskResult<T>> + Send + 'static,
    {
        Self::from_operation(OperationFn::arc(f), config)
    }

    /// Creates a job from an existing operation.
    pub fn from_operation(operation: OperationRef<T, A>, config: JobConfig) -> Self {
        Self {
            inner: Arc::new(JobInner {
                name: Arc::from(config.name.as_ref()),
                bus: Bus::new(config.bus_capacity_clamped()),
                config,
                operation,
                state: Mutex::new(JobState::new()),
            }),
        }
    }

    /// Builds a task bound to `args`, applies the concurrency mode and returns it.
    ///
    /// The returned task may already be (or soon become) `Aborted` when the
    /// job was busy in `Drop` mode; awaiting it then yields a cancellation error.
    /// Must be called within a Tokio runtime unless [`JobConfig::runtime`] is set.
    pub fn perform(&self, args: A) -> Task<T> {
        let operation = Arc::clone(&self.inner.operation);
        let task = Task::with_runtime(self.inner.config.runtime.clone(), move |signal| {
            operation.call(args, signal)
        });
        self.observe(&task);

        let mode = self.inner.config.mode;
        let (admission, perform_count) = {
            let mut state = self.inner.state.lock();
            state.perform_count += 1;
            let admission = match (state.last_pending.clone(), mode) {
                (None, _) => {
                    state.last_pending = Some(task.clone());
                    Admission::Start
                }
                (Some(_), ConcurrencyMode::Drop) => Admission::Drop,
                (Some(prev), ConcurrencyMode::Restart) => {
                    state.last_pending = Some(task.clone());
                    Admission::Restart(prev)
                }
            };
            (admission, state.perform_count)
        };

        let name = &self.inner.name;
        match admission {
            Admission::Start => {
                debug!(job = %name, task = %task.id(), perform_count, "task started");
                self.publish_with(|| {
                    Event::new(EventKind::TaskStarted, name.clone())
                        .with_task(task.id())
                        .with_perform_count(perform_count)
                });
                task.start();
            }
            Admission::Drop => {
                debug!(job = %name, task = %task.id(), perform_count, mode = mode.as_label(), "job busy, dropping task");
                self.publish_with(|| {
                    Event::new(EventKind::TaskDropped, name.clone())
                        .with_task(task.id())
                        .with_reason(DROP_REASON)
                        .with_perform_count(perform_count)
                });
                let _ = task.cancel(Some(DROP_REASON));
            }
            Admission::Restart(prev) => {
                debug!(job = %name, task = %task.id(), superseded = %prev.id(), perform_count, mode = mode.as_label(), "restarting job");
                self.publish_with(|| {
                    Event::new(EventKind::TaskSuperseded, name.clone())
                        .with_task(prev.id())
                        .with_reason(RESTART_REASON)
                        .with_perform_count(perform_count)
                });
                let _ = prev.cancel(Some(RESTART_REASON));
                self.publish_with(|| {
                    Event::new(EventKind::TaskStarted, name.clone())
                        .with_task(task.id())
                        .with_perform_count(perform_count)
                });
                task.start();
            }
        }
        task
    }

    /// Aborts the pending task, if any, and returns once it has settled.
    pub async fn abort(&self, reason: Option<&str>) {
        if let Some(task) = self.last_pending() {
            task.abort(reason).await;
        }
    }

    /// Requests abort of the pending task without waiting.
    ///
    /// Returns `false` if nothing was pending.
    pub fn cancel(&self, reason: Option<&str>) -> bool {
        match self.last_pending() {
            Some(task) => {
                let _ = task.cancel(reason);
                true
            }
            None => false,
        }
    }

    /// Returns a teardown hook that cancels the pending task once, when dropped.
    ///
    /// Intended for an external lifecycle owner: keep the guard alive for the
    /// owner's scope.
    pub fn abort_on_drop(&self) -> AbortOnDrop<T, A> {
        AbortOnDrop::new(self.clone())
    }

    fn observe(&self, task: &Task<T>) {
        for kind in TaskEventKind::ALL {
            let job: Weak<JobInner<T, A>> = Arc::downgrade(&self.inner);
            task.add_listener(kind, move |task| {
                if let Some(job) = job.upgrade() {
                    job.on_settled(kind, task);
                }
            });
        }
    }
}

impl<T, A> Job<T, A> {
    /// Receiver for job events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.inner.bus.subscribe()
    }

    /// Job name from its configuration.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Concurrency mode from its configuration.
    pub fn mode(&self) -> ConcurrencyMode {
        self.inner.config.mode
    }

    /// `Pending` while `last_pending` is set.
    pub fn status(&self) -> JobStatus {
        self.inner.state.lock().status()
    }

    /// Number of `perform()` calls so far (dropped ones included).
    pub fn perform_count(&self) -> u64 {
        self.inner.state.lock().perform_count
    }

    /// The task currently pending.
    pub fn last_pending(&self) -> Option<Task<T>> {
        self.inner.state.lock().last_pending.clone()
    }

    /// The most recent task that fulfilled.
    pub fn last_fulfilled(&self) -> Option<Task<T>> {
        self.inner.state.lock().last_fulfilled.clone()
    }

    /// The most recent task that rejected.
    pub fn last_rejected(&self) -> Option<Task<T>> {
        self.inner.state.lock().last_rejected.clone()
    }

    /// The most recent task that was aborted.
    pub fn last_aborted(&self) -> Option<Task<T>> {
        self.inner.state.lock().last_aborted.clone()
    }

    /// The most recent task that fulfilled or rejected.
    pub fn last_settled(&self) -> Option<Task<T>> {
        self.inner.state.lock().last_settled.clone()
    }

    /// All observable fields at one instant.
    pub fn snapshot(&self) -> JobSnapshot<T> {
        let state = self.inner.state.lock();
        JobSnapshot {
            status: state.status(),
            perform_count: state.perform_count,
            last_pending: state.last_pending.clone(),
            last_fulfilled: state.last_fulfilled.clone(),
            last_rejected: state.last_rejected.clone(),
            last_aborted: state.last_aborted.clone(),
            last_settled: state.last_settled.clone(),
        }
    }

    fn publish_with(&self, make: impl FnOnce() -> Event) {
        self.inner.bus.publish_with(make);
    }
}

impl<T, A> JobInner<T, A> {
    fn on_settled(&self, kind: TaskEventKind, task: &Task<T>) {
        let became_idle = {
            let mut state = self.state.lock();
            match kind {
                TaskEventKind::Fulfill => {
                    state.last_fulfilled = Some(task.clone());
                    state.last_settled = Some(task.clone());
                }
                TaskEventKind::Reject => {
                    state.last_rejected = Some(task.clone());
                    state.last_settled = Some(task.clone());
                }
                TaskEventKind::Abort => {
                    state.last_aborted = Some(task.clone());
                }
            }
            let was_pending = state
                .last_pending
                .as_ref()
                .is_some_and(|pending| pending.ptr_eq(task));
            if was_pending {
                state.last_pending = None;
            }
            was_pending
        };

        debug!(job = %self.name, task = %task.id(), status = kind.status().as_label(), became_idle, "job task settled");

        self.bus.publish_with(|| {
            let ev = Event::new(kind.into(), self.name.clone()).with_task(task.id());
            match task.error() {
                Some(err) => ev.with_reason(match err.reason() {
                    Some(reason) => Arc::<str>::from(reason),
                    None => Arc::from(err.to_string()),
                }),
                None => ev,
            }
        });

        if became_idle {
            self.bus.publish_with(|| {
                Event::new(EventKind::JobIdle, self.name.clone()).with_task(task.id())
            });
        }
    }
}

impl<T, A> Clone for Job<T, A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T, A> fmt::Debug for Job<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("Job")
            .field("name", &self.inner.name)
            .field("mode", &self.inner.config.mode)
            .field("status", &state.status())
            .field("perform_count", &state.perform_count)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use futures::FutureExt;
    use tokio::time;

    use super::*;
    use crate::error::TaskError;
    use crate::jobs::operation::{BoxOperationFuture, Operation};
    use crate::signal::timeout;
    use crate::tasks::TaskStatus;

    fn delayed(mode: ConcurrencyMode) -> Job<u32, u32> {
        Job::with_config(
            |n: u32, signal: AbortSignal| async move {
                timeout(&signal, Duration::from_millis(10)).await?;
                Ok(n)
            },
            JobConfig::with_mode(mode).named("delayed"),
        )
    }

    fn drain(rx: &mut broadcast::Receiver<Event>) -> Vec<EventKind> {
        let mut kinds = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            kinds.push(ev.kind);
        }
        kinds
    }

    #[tokio::test(start_paused = true)]
    async fn idle_job_starts_the_task() {
        let job = delayed(ConcurrencyMode::Drop);
        assert_eq!(job.status(), JobStatus::Idle);

        let task = job.perform(3);
        assert_eq!(job.status(), JobStatus::Pending);
        assert_eq!(task.status(), TaskStatus::Pending);
        assert_eq!(job.last_pending(), Some(task.clone()));

        assert_eq!(task.clone().await.unwrap(), 3);
        assert_eq!(job.status(), JobStatus::Idle);
        assert_eq!(job.last_settled(), Some(task));
    }

    #[tokio::test(start_paused = true)]
    async fn drop_mode_events_in_order() {
        let job = delayed(ConcurrencyMode::Drop);
        let mut rx = job.subscribe();

        let first = job.perform(1);
        let second = job.perform(2);
        assert_eq!(second.status(), TaskStatus::Aborted);
        first.clone().await.unwrap();

        assert_eq!(
            drain(&mut rx),
            [
                EventKind::TaskStarted,
                EventKind::TaskDropped,
                EventKind::TaskAborted,
                EventKind::TaskFulfilled,
                EventKind::JobIdle,
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn restart_mode_events_in_order() {
        let job = delayed(ConcurrencyMode::Restart);
        let mut rx = job.subscribe();

        let _first = job.perform(1);
        let second = job.perform(2);
        second.clone().await.unwrap();

        assert_eq!(
            drain(&mut rx),
            [
                EventKind::TaskStarted,
                EventKind::TaskSuperseded,
                EventKind::TaskStarted,
                EventKind::TaskAborted,
                EventKind::TaskFulfilled,
                EventKind::JobIdle,
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn aborted_event_carries_the_reason() {
        let job = delayed(ConcurrencyMode::Drop);
        let mut rx = job.subscribe();

        let _first = job.perform(1);
        let _dropped = job.perform(2);

        let reasons: Vec<_> = std::iter::from_fn(|| rx.try_recv().ok())
            .filter(|ev| ev.kind == EventKind::TaskAborted)
            .map(|ev| ev.reason)
            .collect();
        let expected: Arc<str> = Arc::from(DROP_REASON);
        assert_eq!(reasons, [Some(expected)]);
    }

    #[tokio::test(start_paused = true)]
    async fn snapshot_observed_on_event_is_consistent() {
        let job = delayed(ConcurrencyMode::Drop);
        let mut rx = job.subscribe();

        let task = job.perform(7);
        time::sleep(Duration::from_millis(50)).await;

        while let Ok(ev) = rx.try_recv() {
            if ev.kind == EventKind::JobIdle {
                let snap = job.snapshot();
                assert_eq!(snap.status, JobStatus::Idle);
                assert!(snap.last_pending.is_none());
                assert_eq!(snap.last_fulfilled, Some(task.clone()));
                assert_eq!(snap.perform_count, 1);
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn bookkeeping_runs_without_subscribers() {
        let job = delayed(ConcurrencyMode::Restart);
        let first = job.perform(1);
        let second = job.perform(2);
        assert_eq!(second.clone().await.unwrap(), 2);

        assert_eq!(job.last_aborted(), Some(first));
        assert_eq!(job.last_fulfilled(), Some(second));
        assert_eq!(job.status(), JobStatus::Idle);

        let mut rx = job.subscribe();
        let third = job.perform(3);
        third.clone().await.unwrap();
        let seqs: Vec<u64> = std::iter::from_fn(|| rx.try_recv().ok())
            .map(|ev| ev.seq)
            .collect();
        assert_eq!(seqs.len(), 3);
        assert!(seqs.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_reports_whether_anything_was_pending() {
        let job = delayed(ConcurrencyMode::Drop);
        assert!(!job.cancel(None));

        let task = job.perform(1);
        assert!(job.cancel(Some("navigated away")));
        let err = task.clone().await.unwrap_err();
        assert_eq!(err.reason(), Some("navigated away"));
        assert_eq!(job.status(), JobStatus::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn rejected_task_is_recorded_and_job_recovers() {
        let job: Job<u32, bool> = Job::new(|fail: bool, _signal: AbortSignal| async move {
            if fail {
                Err(TaskError::fail(anyhow::anyhow!("backend down")))
            } else {
                Ok(1)
            }
        });

        let bad = job.perform(true);
        assert!(bad.clone().await.is_err());
        assert_eq!(job.last_rejected(), Some(bad.clone()));
        assert_eq!(job.last_settled(), Some(bad));
        assert_eq!(job.status(), JobStatus::Idle);

        let good = job.perform(false);
        assert_eq!(good.clone().await.unwrap(), 1);
        assert_eq!(job.last_settled(), Some(good));
        assert_eq!(job.perform_count(), 2);
    }

    struct Counting {
        calls: AtomicUsize,
    }

    impl Operation<usize, ()> for Counting {
        fn call(&self, (): (), _signal: AbortSignal) -> BoxOperationFuture<usize> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move { Ok(n) }.boxed()
        }
    }

    #[tokio::test]
    async fn custom_operation_is_shared_across_invocations() {
        let op = Arc::new(Counting {
            calls: AtomicUsize::new(0),
        });
        let job = Job::from_operation(op.clone(), JobConfig::default());

        assert_eq!(job.perform(()).await.unwrap(), 1);
        assert_eq!(job.perform(()).await.unwrap(), 2);
        assert_eq!(op.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn job_handle_can_be_dropped_while_tasks_run() {
        let job = delayed(ConcurrencyMode::Drop);
        let task = job.perform(5);
        drop(job);
        assert_eq!(task.await.unwrap(), 5);
    }
}
