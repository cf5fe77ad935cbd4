//! Cancellation signal and the composer that races work against it.
//!
//! ## Contents
//! - [`AbortSignal`] one-shot trigger carrying a reason
//! - [`race`] settle with the operation or the signal, whichever comes first
//! - [`timeout`] a cancellable sleep: `race(signal, sleep(duration))`

mod abort;
mod race;

pub use abort::AbortSignal;
pub use race::{race, timeout};
