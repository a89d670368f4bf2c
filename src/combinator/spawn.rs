//! Submission returning a future.

use crate::error::TaskError;
use crate::future::{Future, Promise};
use crate::runtime;
use crate::task::Task;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Enqueues a callable on the runtime and returns the future of its result.
///
/// The callable runs on a worker thread inside a panic boundary: a normal
/// return resolves the future with the value, a panic resolves it with the
/// captured failure. Nothing unwinds across the worker.
///
/// Arguments travel by closure capture:
///
/// ```rust,ignore
/// let base = 40;
/// let answer = spindle::spawn(move || base + 2);
/// assert_eq!(answer.get(), 42);
/// ```
///
/// # Panics
///
/// Panics when no runtime is running (a contract violation, as with
/// [`enqueue`](crate::enqueue)).
pub fn spawn<F, T>(callable: F) -> Future<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let promise = Promise::new();
    let future = promise.get_future();
    let task = Task::new(move || match catch_unwind(AssertUnwindSafe(callable)) {
        Ok(value) => promise.set_value(value),
        Err(payload) => promise.set_error(TaskError::from_panic(payload)),
    });
    runtime::enqueue(task);
    future
}
