//! # Racing work against a signal.
//!
//! [`race`] settles with whichever side finishes first: the operation's own
//! output, or [`TaskError::Aborted`] carrying the signal's reason.
//!
//! ## Precedence
//! ```text
//! signal already fired ─► Err(Aborted) without polling the operation
//! both ready in one poll ─► Err(Aborted)   (signal branch is polled first)
//! operation finished while the signal fired ─► Err(Aborted)
//! otherwise ─► Ok(output)
//! ```
//!
//! The losing branch is dropped as soon as `select!` returns, which also
//! unregisters the signal waiter.

use std::time::Duration;

use tokio::time;

use crate::{error::TaskError, signal::AbortSignal};

/// Races `op` against `signal`; the signal always wins ties.
///
/// # Example
/// ```
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// use jobvisor::{AbortSignal, race};
///
/// let signal = AbortSignal::new();
/// assert_eq!(race(&signal, async { 7 }).await.unwrap(), 7);
///
/// signal.trigger("stop");
/// let err = race(&signal, async { 7 }).await.unwrap_err();
/// assert_eq!(err.reason(), Some("stop"));
/// # }
/// ```
pub async fn race<F>(signal: &AbortSignal, op: F) -> Result<F::Output, TaskError>
where
    F: Future,
{
    if signal.is_triggered() {
        return Err(signal.abort_error());
    }

    tokio::select! {
        biased;
        reason = signal.triggered() => Err(TaskError::aborted(reason)),
        output = op => match signal.reason() {
            Some(reason) => Err(TaskError::aborted(reason)),
            None => Ok(output),
        },
    }
}

/// Sleeps for `duration` unless `signal` fires first.
pub async fn timeout(signal: &AbortSignal, duration: Duration) -> Result<(), TaskError> {
    race(signal, time::sleep(duration)).await
}
