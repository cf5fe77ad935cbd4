//! Error types produced by tasks and jobs.
//!
//! Every failure a [`Task`](crate::Task) can settle with is a [`TaskError`].
//! Errors fall into two families:
//!
//! - **cancellation**: [`TaskError::Aborted`] and [`TaskError::Dropped`], raised
//!   when the task's signal fires; see [`TaskError::is_cancellation`].
//! - **application**: [`TaskError::Failed`] wraps whatever the operation returned,
//!   plus [`TaskError::Panicked`] and [`TaskError::Detached`] for operations that
//!   never produced a result.
//!
//! `TaskError` is `Clone` so every awaiter of a shared task result observes the same error.

use std::sync::Arc;

use thiserror::Error;

/// Reason used when `abort`/`cancel` is called without one.
pub const DEFAULT_ABORT_REASON: &str = "aborted";

/// # Errors produced by task execution.
///
/// Cancellation errors are a designed outcome, not a failure of the task:
/// a Job that drops or restarts a task never escalates them.
#[non_exhaustive]
#[derive(Error, Debug, Clone)]
pub enum TaskError {
    /// The task's signal fired while the operation was pending.
    #[error("aborted: {reason}")]
    Aborted {
        /// Reason carried by the signal.
        reason: Arc<str>,
    },

    /// The task was aborted before it ever started; its operation was never invoked.
    #[error("dropped before start: {reason}")]
    Dropped {
        /// Reason carried by the signal.
        reason: Arc<str>,
    },

    /// The operation failed with an application error.
    #[error("execution failed: {0}")]
    Failed(Arc<anyhow::Error>),

    /// The operation panicked while running.
    #[error("operation panicked: {info}")]
    Panicked {
        /// Panic payload rendered as text.
        info: Arc<str>,
    },

    /// The runtime dropped the operation before it settled.
    #[error("operation detached before settling (runtime shut down)")]
    Detached,
}

impl TaskError {
    /// Wraps an application error.
    ///
    /// # Example
    /// ```
    /// use jobvisor::TaskError;
    ///
    /// let err = TaskError::fail(anyhow::anyhow!("connection refused"));
    /// assert_eq!(err.as_label(), "task_failed");
    /// assert!(!err.is_cancellation());
    /// ```
    pub fn fail(error: impl Into<anyhow::Error>) -> Self {
        TaskError::Failed(Arc::new(error.into()))
    }

    /// Builds an [`Aborted`](TaskError::Aborted) error.
    pub fn aborted(reason: impl Into<Arc<str>>) -> Self {
        TaskError::Aborted {
            reason: reason.into(),
        }
    }

    /// Builds a [`Dropped`](TaskError::Dropped) error.
    pub fn dropped(reason: impl Into<Arc<str>>) -> Self {
        TaskError::Dropped {
            reason: reason.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::Aborted { .. } => "task_aborted",
            TaskError::Dropped { .. } => "task_dropped",
            TaskError::Failed(_) => "task_failed",
            TaskError::Panicked { .. } => "task_panicked",
            TaskError::Detached => "task_detached",
        }
    }

    /// True for the cancellation family (`Aborted`, `Dropped`).
    ///
    /// # Example
    /// ```
    /// use jobvisor::TaskError;
    ///
    /// assert!(TaskError::aborted("restarted").is_cancellation());
    /// assert!(TaskError::dropped("busy").is_cancellation());
    /// assert!(!TaskError::Detached.is_cancellation());
    /// ```
    pub fn is_cancellation(&self) -> bool {
        matches!(self, TaskError::Aborted { .. } | TaskError::Dropped { .. })
    }

    /// Returns the cancellation reason, if this is a cancellation error.
    pub fn reason(&self) -> Option<&str> {
        match self {
            TaskError::Aborted { reason } | TaskError::Dropped { reason } => Some(reason),
            _ => None,
        }
    }

    /// Returns the application error exactly as the operation produced it.
    pub fn application_error(&self) -> Option<&anyhow::Error> {
        match self {
            TaskError::Failed(error) => Some(error.as_ref()),
            _ => None,
        }
    }
}

impl From<anyhow::Error> for TaskError {
    fn from(error: anyhow::Error) -> Self {
        TaskError::Failed(Arc::new(error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("quota exceeded")]
    struct QuotaExceeded;

    #[test]
    fn application_error_survives_unchanged() {
        let err = TaskError::fail(QuotaExceeded);
        let inner = err.application_error().expect("application error");
        assert!(inner.downcast_ref::<QuotaExceeded>().is_some());
        assert_eq!(err.to_string(), "execution failed: quota exceeded");
    }

    #[test]
    fn cancellation_family_carries_reason() {
        assert_eq!(TaskError::aborted("superseded").reason(), Some("superseded"));
        assert_eq!(TaskError::dropped("busy").reason(), Some("busy"));
        assert_eq!(TaskError::fail(QuotaExceeded).reason(), None);
    }

    #[test]
    fn labels_are_stable() {
        let labels: Vec<_> = [
            TaskError::aborted("x"),
            TaskError::dropped("x"),
            TaskError::fail(QuotaExceeded),
            TaskError::Panicked { info: "boom".into() },
            TaskError::Detached,
        ]
        .iter()
        .map(TaskError::as_label)
        .collect();
        assert_eq!(
            labels,
            [
                "task_aborted",
                "task_dropped",
                "task_failed",
                "task_panicked",
                "task_detached"
            ]
        );
    }
}
