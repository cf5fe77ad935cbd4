//! Task status, lifecycle notification kinds and task identifiers.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

/// Global counter for task identifiers.
static TASK_SEQ: AtomicU64 = AtomicU64::new(1);

/// Lifecycle state of a [`Task`](crate::Task).
///
/// ```text
/// Idle ──► Pending ──► Fulfilled | Rejected | Aborted
///   └────────────────────────────────────────► Aborted   (abort before start)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskStatus {
    /// Constructed, operation not invoked yet.
    #[default]
    Idle,
    /// Operation in flight.
    Pending,
    /// Operation resolved with a value.
    Fulfilled,
    /// Operation failed with a non-cancellation error.
    Rejected,
    /// Signal fired before or while the operation ran.
    Aborted,
}

impl TaskStatus {
    /// True for `Fulfilled`, `Rejected` and `Aborted`.
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TaskStatus::Fulfilled | TaskStatus::Rejected | TaskStatus::Aborted
        )
    }

    /// Returns a short stable label for use in logs.
    pub fn as_label(self) -> &'static str {
        match self {
            TaskStatus::Idle => "idle",
            TaskStatus::Pending => "pending",
            TaskStatus::Fulfilled => "fulfilled",
            TaskStatus::Rejected => "rejected",
            TaskStatus::Aborted => "aborted",
        }
    }
}

/// Kind of lifecycle notification a listener subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskEventKind {
    /// Task settled `Fulfilled`.
    Fulfill,
    /// Task settled `Rejected`.
    Reject,
    /// Task settled `Aborted`.
    Abort,
}

impl TaskEventKind {
    /// All kinds, in declaration order.
    pub const ALL: [TaskEventKind; 3] = [
        TaskEventKind::Fulfill,
        TaskEventKind::Reject,
        TaskEventKind::Abort,
    ];

    /// Terminal status this notification announces.
    pub fn status(self) -> TaskStatus {
        match self {
            TaskEventKind::Fulfill => TaskStatus::Fulfilled,
            TaskEventKind::Reject => TaskStatus::Rejected,
            TaskEventKind::Abort => TaskStatus::Aborted,
        }
    }

    /// Whether firing the task's signal detaches listeners of this kind.
    #[inline]
    pub(crate) fn scoped_to_signal(self) -> bool {
        !matches!(self, TaskEventKind::Abort)
    }
}

/// Process-unique task identifier (monotonic).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(u64);

impl TaskId {
    pub(crate) fn next() -> Self {
        Self(TASK_SEQ.fetch_add(1, AtomicOrdering::Relaxed))
    }

    /// Raw numeric value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task-{}", self.0)
    }
}
