//! # One-shot cancellation signal.
//!
//! [`AbortSignal`] pairs a [`CancellationToken`] with a write-once reason.
//! Once triggered it never un-fires, and the first reason wins.
//!
//! ## Rules
//! - The reason is stored **before** the token is cancelled, so every waiter
//!   woken by the token observes it.
//! - Cloning is cheap and every clone observes the same trigger.
//! - Tokens handed out by [`AbortSignal::token`] are children: they follow the
//!   trigger but never fire it.

use std::sync::{Arc, OnceLock};

use tokio_util::sync::CancellationToken;

use crate::error::{DEFAULT_ABORT_REASON, TaskError};

/// One-shot trigger carrying a reason once fired.
///
/// # Example
/// ```
/// use jobvisor::AbortSignal;
///
/// let signal = AbortSignal::new();
/// assert!(!signal.is_triggered());
///
/// assert!(signal.trigger("user left the page"));
/// assert!(!signal.trigger("ignored"));
/// assert_eq!(signal.reason().as_deref(), Some("user left the page"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct AbortSignal {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    token: CancellationToken,
    reason: OnceLock<Arc<str>>,
}

impl AbortSignal {
    /// Creates an untriggered signal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fires the signal with `reason`.
    ///
    /// Returns `false` (and keeps the first reason) if it had already fired.
    pub fn trigger(&self, reason: impl Into<Arc<str>>) -> bool {
        if self.inner.reason.set(reason.into()).is_err() {
            return false;
        }
        self.inner.token.cancel();
        true
    }

    /// True once the signal has fired.
    pub fn is_triggered(&self) -> bool {
        self.inner.reason.get().is_some()
    }

    /// Reason the signal fired with, if it has.
    pub fn reason(&self) -> Option<Arc<str>> {
        self.inner.reason.get().cloned()
    }

    /// Waits until the signal fires and returns its reason.
    ///
    /// Completes immediately if it already fired. Dropping the future
    /// unregisters the waiter.
    pub async fn triggered(&self) -> Arc<str> {
        self.inner.token.cancelled().await;
        self.reason()
            .unwrap_or_else(|| Arc::from(DEFAULT_ABORT_REASON))
    }

    /// A child token for operations that cooperate through `tokio_util`.
    ///
    /// It is cancelled when the signal fires. Cancelling it only affects the
    /// child; use [`trigger`](Self::trigger) to fire the signal.
    pub fn token(&self) -> CancellationToken {
        self.inner.token.child_token()
    }

    /// The cancellation error an in-flight race rejects with.
    pub fn abort_error(&self) -> TaskError {
        TaskError::aborted(
            self.reason()
                .unwrap_or_else(|| Arc::from(DEFAULT_ABORT_REASON)),
        )
    }
}
