//! # Job operations and the function-backed implementation.
//!
//! An [`Operation`] is what a [`Job`](crate::Job) runs per `perform(args)`:
//! it receives the invocation arguments and the new task's [`AbortSignal`]
//! and returns a fresh future.
//!
//! [`OperationFn`] wraps a closure `F: Fn(A, AbortSignal) -> Fut`, producing a
//! new future per invocation. No state is shared between invocations unless
//! the closure captures it explicitly (e.g. through an `Arc`).
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use jobvisor::{AbortSignal, Operation, OperationFn, TaskError};
//!
//! let op: Arc<dyn Operation<usize, String>> =
//!     OperationFn::arc(|query: String, _signal: AbortSignal| async move {
//!         Ok::<_, TaskError>(query.len())
//!     });
//! # let _ = op;
//! ```

use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;

use crate::signal::AbortSignal;
use crate::tasks::TaskResult;

/// Boxed future returned by an [`Operation`].
pub type BoxOperationFuture<T> = BoxFuture<'static, TaskResult<T>>;

/// Shared reference to an operation.
pub type OperationRef<T, A> = Arc<dyn Operation<T, A>>;

/// # Asynchronous operation a job performs.
///
/// Implementations should watch `signal` and return early once it fires;
/// cancellation is cooperative and the task only changes what it *observes*.
///
/// # Example
/// ```
/// use jobvisor::{AbortSignal, BoxOperationFuture, Operation, TaskError};
/// use futures::FutureExt;
///
/// struct Echo;
///
/// impl Operation<String, String> for Echo {
///     fn call(&self, args: String, _signal: AbortSignal) -> BoxOperationFuture<String> {
///         async move { Ok::<_, TaskError>(args) }.boxed()
///     }
/// }
/// ```
pub trait Operation<T, A>: Send + Sync + 'static {
    /// Creates the future for one invocation.
    fn call(&self, args: A, signal: AbortSignal) -> BoxOperationFuture<T>;
}

/// Function-backed operation.
#[derive(Debug)]
pub struct OperationFn<F> {
    f: F,
}

impl<F> OperationFn<F> {
    /// Creates a new function-backed operation.
    ///
    /// Prefer [`OperationFn::arc`] when you immediately need an [`OperationRef`].
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Creates the operation and returns it as a shared handle.
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self::new(f))
    }
}

impl<T, A, F, Fut> Operation<T, A> for OperationFn<F>
where
    F: Fn(A, AbortSignal) -> Fut + Send + Sync + 'static, // Fn, not FnMut
    Fut: Future<Output = TaskResult<T>> + Send + 'static,
{
    fn call(&self, args: A, signal: AbortSignal) -> BoxOperationFuture<T> {
        (self.f)(args, signal).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn each_call_builds_a_fresh_future() {
        let op: OperationRef<u32, u32> =
            OperationFn::arc(|n: u32, _signal: AbortSignal| async move { Ok(n * 2) });

        let a = op.call(1, AbortSignal::new());
        let b = op.call(5, AbortSignal::new());
        assert_eq!(b.await.unwrap(), 10);
        assert_eq!(a.await.unwrap(), 2);
    }

    #[tokio::test]
    async fn operation_receives_the_signal() {
        let op: OperationRef<bool, ()> = OperationFn::arc(|(), signal: AbortSignal| async move {
            Ok(signal.is_triggered())
        });

        let signal = AbortSignal::new();
        signal.trigger("before call");
        assert!(op.call((), signal).await.unwrap());
    }
}
