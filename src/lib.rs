//! # jobvisor
//!
//! **Jobvisor** provides cancellable async tasks and single-flight jobs for Rust.
//!
//! It targets event-driven callers that must not race against themselves:
//! a double-clicked submit button, a search box re-queried on every keystroke,
//! a poller that fires before the previous poll returned. A [`Job`] guarantees
//! at most one pending [`Task`] and applies a [`ConcurrencyMode`] when it is
//! invoked again while busy.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   caller ── Job::perform(args) ──────────────────────────────────────┐
//!                │                                                     │
//!                ▼                                                     │
//!   ┌──────────────────────────────┐                                   │
//!   │ Job (ConcurrencyMode)        │  slots: last_pending,             │
//!   │  - Drop: abort the new task  │         last_fulfilled,           │
//!   │  - Restart: abort the old one│         last_rejected,            │
//!   └──────┬───────────────────────┘         last_aborted, last_settled│
//!          │ Task::perform()                                           │
//!          ▼                                                           │
//!   ┌──────────────────────────────┐     ┌──────────────────────┐      │
//!   │ Task                         │────►│ race(signal, op)     │      │
//!   │  Idle → Pending → terminal   │     │  signal wins ties    │      │
//!   │  own AbortSignal             │     └──────────────────────┘      │
//!   └──────┬───────────────────────┘                                   │
//!          │ fulfill / reject / abort listeners                        │
//!          ▼                                                           │
//!   Job bookkeeping ──► Bus (broadcast Event) ──► observers            │
//!                                                                      │
//!   returned Task ◄────────────────────────────────────────────────────┘
//! ```
//!
//! ### Task lifecycle
//! ```text
//! Task::new(factory)        Idle       (nothing runs yet)
//!   ├─► perform()           Pending    (factory spawned, raced against the signal)
//!   │     ├─ Ok(v)          Fulfilled
//!   │     ├─ Err(e)         Rejected
//!   │     └─ signal fired   Aborted
//!   └─► abort() while Idle  Aborted    (factory never invoked)
//! ```
//!
//! ## Features
//! | Area              | Description                                                    | Key types                                  |
//! |-------------------|----------------------------------------------------------------|--------------------------------------------|
//! | **Tasks**         | Lazy, single-settlement, abortable async operations.           | [`Task`], [`TaskStatus`], [`TaskFuture`]   |
//! | **Jobs**          | At most one pending task; drop or restart on re-invocation.    | [`Job`], [`JobConfig`], [`ConcurrencyMode`]|
//! | **Cancellation**  | One-shot signal with reason; race/timeout composers.           | [`AbortSignal`], [`race`], [`timeout`]     |
//! | **Events**        | Per-task listeners and a per-job broadcast of lifecycle events.| [`TaskEventKind`], [`Event`], [`EventKind`]|
//! | **Errors**        | Cancellation vs application errors.                            | [`TaskError`]                              |
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use jobvisor::{AbortSignal, Job, TaskError, TaskStatus, timeout};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     // Drop mode (default): a second click while saving is ignored.
//!     let save = Job::new(|doc: String, signal: AbortSignal| async move {
//!         timeout(&signal, Duration::from_millis(5)).await?;
//!         Ok::<_, TaskError>(doc.len())
//!     });
//!
//!     let first = save.perform("draft".to_string());
//!     let second = save.perform("draft".to_string());
//!
//!     assert_eq!(first.clone().await.unwrap(), 5);
//!     assert_eq!(second.status(), TaskStatus::Aborted);
//!     assert_eq!(save.perform_count(), 2);
//! }
//! ```

mod error;
mod events;
mod jobs;
mod policies;
mod signal;
mod tasks;

// ---- Public re-exports ----

pub use error::{DEFAULT_ABORT_REASON, TaskError};
pub use events::{Bus, Event, EventKind};
pub use jobs::{
    AbortOnDrop, BoxOperationFuture, DROP_REASON, Job, JobConfig, JobSnapshot, JobStatus,
    Operation, OperationFn, OperationRef, RESTART_REASON, TEARDOWN_REASON,
};
pub use policies::ConcurrencyMode;
pub use signal::{AbortSignal, race, timeout};
pub use tasks::{Listener, ListenerId, Task, TaskEventKind, TaskFuture, TaskId, TaskResult, TaskStatus};
