//! # Jobs: policy-driven coordination of tasks.
//!
//! A job permits at most one pending [`Task`](crate::Task) and applies a
//! [`ConcurrencyMode`](crate::ConcurrencyMode) when invoked again while busy.
//!
//! - [`Job`] - the coordinator (`perform`, `abort`, `last_*` slots)
//! - [`JobConfig`] - name, mode, bus capacity, execution context
//! - [`Operation`] / [`OperationFn`] - what a job runs per invocation
//! - [`AbortOnDrop`] - teardown hook for an external lifecycle owner

mod config;
mod guard;
mod job;
mod operation;

pub use config::JobConfig;
pub use guard::{AbortOnDrop, TEARDOWN_REASON};
pub use job::{DROP_REASON, Job, JobSnapshot, JobStatus, RESTART_REASON};
pub use operation::{BoxOperationFuture, Operation, OperationFn, OperationRef};
