//! The unit of work scheduled by the runtime.
//!
//! A [`Task`] is a type-erased, single-shot callable: one boxed closure
//! behind a two-pointer handle. Move semantics carry the whole lifecycle —
//! [`Task::run`] consumes the handle, so a task executes at most once, and a
//! task that is dropped without running releases its captures exactly once.
//! Queues move `Task`s by value; ownership of the callable is never shared.

use core::fmt;

/// A type-erased, invocable-once unit of work.
pub struct Task {
    callable: Box<dyn FnOnce() + Send + 'static>,
}

impl Task {
    /// Wraps a callable for scheduling.
    ///
    /// The closure is boxed here; allocation failure aborts the process via
    /// the global allocator, matching the runtime's no-progress-under-OOM
    /// stance.
    #[must_use]
    pub fn new<F>(callable: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            callable: Box::new(callable),
        }
    }

    /// Invokes the callable, consuming the task.
    ///
    /// Panics from the callable propagate to the caller; the promise wrapper
    /// installed by `spawn`/`then` is the catch boundary, not this method.
    pub fn run(self) {
        (self.callable)();
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task").finish_non_exhaustive()
    }
}
