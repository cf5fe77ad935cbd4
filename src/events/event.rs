//! # Job lifecycle events.
//!
//! The [`EventKind`] enum classifies what a [`Job`](crate::Job) reports:
//! - **Admission events**: what `perform()` decided (started, dropped, superseded)
//! - **Settlement events**: how one of the job's tasks ended
//! - **Job events**: the job returned to idle
//!
//! The [`Event`] struct carries the job name, task id, reason and counter.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Events are published **after** the job's bookkeeping was updated, so a
//! snapshot taken on receipt already reflects the event.
//!
//! ## Example
//! ```rust
//! use jobvisor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::TaskDropped, "search")
//!     .with_reason("job busy")
//!     .with_perform_count(2);
//!
//! assert_eq!(ev.kind, EventKind::TaskDropped);
//! assert_eq!(&*ev.job, "search");
//! assert_eq!(ev.perform_count, Some(2));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use crate::tasks::{TaskEventKind, TaskId};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of job events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Admission events ===
    /// A new task became the job's pending task and was started.
    ///
    /// Sets:
    /// - `task`: new task id
    /// - `perform_count`: counter after this invocation
    TaskStarted,

    /// Drop mode: the new task was aborted because another one is pending.
    ///
    /// Sets:
    /// - `task`: dropped task id
    /// - `reason`: abort reason
    /// - `perform_count`: counter after this invocation
    TaskDropped,

    /// Restart mode: the pending task was aborted in favor of a new one.
    ///
    /// Sets:
    /// - `task`: superseded task id
    /// - `reason`: abort reason
    /// - `perform_count`: counter after this invocation
    TaskSuperseded,

    // === Settlement events ===
    /// One of the job's tasks fulfilled.
    TaskFulfilled,

    /// One of the job's tasks rejected.
    ///
    /// Sets:
    /// - `reason`: error message
    TaskRejected,

    /// One of the job's tasks settled aborted.
    ///
    /// Sets:
    /// - `reason`: cancellation reason
    TaskAborted,

    // === Job events ===
    /// The pending task settled; the job is idle again.
    ///
    /// Sets:
    /// - `task`: the task that was pending
    JobIdle,
}

impl From<TaskEventKind> for EventKind {
    fn from(kind: TaskEventKind) -> Self {
        match kind {
            TaskEventKind::Fulfill => EventKind::TaskFulfilled,
            TaskEventKind::Reject => EventKind::TaskRejected,
            TaskEventKind::Abort => EventKind::TaskAborted,
        }
    }
}

/// Job event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Debug, Clone)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Name of the job that published the event.
    pub job: Arc<str>,
    /// Task the event is about, if applicable.
    pub task: Option<TaskId>,
    /// Human-readable reason (abort reason, error message).
    pub reason: Option<Arc<str>>,
    /// Job `perform_count` at admission time.
    pub perform_count: Option<u64>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind, job: impl Into<Arc<str>>) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            job: job.into(),
            task: None,
            reason: None,
            perform_count: None,
        }
    }

    /// Attaches a task id.
    #[inline]
    pub fn with_task(mut self, task: TaskId) -> Self {
        self.task = Some(task);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches the job's perform counter.
    #[inline]
    pub fn with_perform_count(mut self, n: u64) -> Self {
        self.perform_count = Some(n);
        self
    }

    /// True for `TaskFulfilled`, `TaskRejected` and `TaskAborted`.
    #[inline]
    pub fn is_settlement(&self) -> bool {
        matches!(
            self.kind,
            EventKind::TaskFulfilled | EventKind::TaskRejected | EventKind::TaskAborted
        )
    }
}
