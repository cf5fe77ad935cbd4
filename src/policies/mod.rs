//! Concurrency policies.
//!
//! ## Contents
//! - [`ConcurrencyMode`] what a busy job does with a new invocation (drop / restart)
//!
//! ## Quick wiring
//! ```text
//! JobConfig { mode: ConcurrencyMode, .. }
//!      └─► Job::perform() uses:
//!           - Drop    → abort the new task, keep the pending one
//!           - Restart → abort the pending task, start the new one
//! ```

mod concurrency;

pub use concurrency::ConcurrencyMode;
