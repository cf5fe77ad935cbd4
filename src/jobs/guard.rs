//! # Teardown hook for an external lifecycle owner.
//!
//! [`AbortOnDrop`] cancels a job's pending task when the owning scope ends.
//! It fires at most once: on [`fire`](AbortOnDrop::fire) or on drop,
//! whichever comes first. [`disarm`](AbortOnDrop::disarm) consumes it without firing.

use std::borrow::Cow;

use super::job::Job;

/// Reason the pending task is aborted with when the guard fires.
pub const TEARDOWN_REASON: &str = "teardown: owner scope ended";

/// Cancels the job's pending task once, when dropped.
#[must_use = "the job is aborted as soon as the guard is dropped"]
pub struct AbortOnDrop<T, A = ()>
where
    T: Clone + Send + Sync + 'static,
    A: Send + 'static,
{
    job: Option<Job<T, A>>,
    reason: Cow<'static, str>,
}

impl<T, A> AbortOnDrop<T, A>
where
    T: Clone + Send + Sync + 'static,
    A: Send + 'static,
{
    pub(crate) fn new(job: Job<T, A>) -> Self {
        Self {
            job: Some(job),
            reason: Cow::Borrowed(TEARDOWN_REASON),
        }
    }

    /// Returns a guard that aborts with `reason` instead of the default.
    pub fn with_reason(mut self, reason: impl Into<Cow<'static, str>>) -> Self {
        self.reason = reason.into();
        self
    }

    /// Fires now.
    pub fn fire(mut self) {
        self.trigger();
    }

    /// Consumes the guard without aborting anything.
    pub fn disarm(mut self) {
        self.job = None;
    }

    fn trigger(&mut self) {
        if let Some(job) = self.job.take() {
            job.cancel(Some(&*self.reason));
        }
    }
}

impl<T, A> Drop for AbortOnDrop<T, A>
where
    T: Clone + Send + Sync + 'static,
    A: Send + 'static,
{
    fn drop(&mut self) {
        self.trigger();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::jobs::JobStatus;
    use crate::signal::{AbortSignal, timeout};
    use crate::tasks::TaskStatus;

    use super::*;

    fn slow() -> Job<(), ()> {
        Job::new(|(), signal: AbortSignal| async move {
            timeout(&signal, Duration::from_secs(60)).await
        })
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_guard_aborts_pending_work() {
        let job = slow();
        let task = {
            let _guard = job.abort_on_drop();
            job.perform(())
        };

        let err = task.clone().await.unwrap_err();
        assert_eq!(err.reason(), Some(TEARDOWN_REASON));
        assert_eq!(task.status(), TaskStatus::Aborted);
        assert_eq!(job.status(), JobStatus::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn fire_uses_custom_reason() {
        let job = slow();
        let guard = job.abort_on_drop().with_reason("component unmounted");
        let task = job.perform(());

        guard.fire();
        let err = task.await.unwrap_err();
        assert_eq!(err.reason(), Some("component unmounted"));
    }

    #[tokio::test(start_paused = true)]
    async fn disarmed_guard_leaves_the_job_alone() {
        let job = slow();
        let guard = job.abort_on_drop();
        let task = job.perform(());

        guard.disarm();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(task.status(), TaskStatus::Pending);
        assert_eq!(job.status(), JobStatus::Pending);
    }
}
