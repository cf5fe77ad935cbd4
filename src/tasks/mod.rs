//! # Task abstractions.
//!
//! This module provides the cancellable task primitive:
//! - [`Task`] - lazily started, single-settlement async operation with its own signal
//! - [`TaskStatus`] - `Idle → Pending → Fulfilled | Rejected | Aborted`
//! - [`TaskEventKind`] / [`ListenerId`] - per-task lifecycle notifications
//! - [`TaskFuture`] - memoized result handle shared by every awaiter

mod listeners;
mod status;
mod task;

pub use listeners::{Listener, ListenerId};
pub use status::{TaskEventKind, TaskId, TaskStatus};
pub use task::{Task, TaskFuture, TaskResult};
