//! # Per-job concurrency mode
//!
//! A [`Job`](crate::Job) runs at most **one** task at a time.
//! When `perform()` is called while a task is pending, the mode decides what happens.
//!
//! ## Variants
//! - `Drop`: the **new** task is aborted before it starts; the pending one continues.
//! - `Restart`: the **pending** task is aborted and the new one starts immediately.
//!
//! ## Invariants
//! - Tasks of the same job never run in parallel (use separate jobs for parallel work).
//! - In both modes, `perform()` returns the new task; callers may await it even when dropped.

/// Policy controlling how `perform()` is handled when a job is busy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConcurrencyMode {
    /// Skip the new invocation if one is already pending (default).
    ///
    /// Use when:
    /// - Only the first trigger matters
    /// - Redundant work should be avoided
    /// - Example: a submit button clicked twice
    #[default]
    Drop,

    /// Abort the pending invocation and start the new one.
    ///
    /// Use when:
    /// - A new request invalidates the old one
    /// - Priority goes to the latest trigger
    /// - Example: search-as-you-type (each keystroke cancels the previous query)
    Restart,
}

impl ConcurrencyMode {
    /// Returns a short stable label for use in logs.
    pub fn as_label(self) -> &'static str {
        match self {
            ConcurrencyMode::Drop => "drop",
            ConcurrencyMode::Restart => "restart",
        }
    }
}
