//! The producer half of a shared state.

use crate::error::TaskError;
use crate::future::state::SharedState;
use crate::future::{schedule_after_value, schedule_global, Future};
use std::sync::Arc;

/// The producer handle: exactly one party resolves the state.
///
/// A promise is not cloneable; combinators that resolve one promise from
/// several continuations share it behind an `Arc`. Resolving twice is a
/// contract violation (debug assertion; the second resolution is dropped in
/// release builds).
pub struct Promise<T> {
    state: Arc<SharedState<T>>,
}

impl<T: Send + 'static> Promise<T> {
    /// Creates an unresolved promise.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(SharedState::new()),
        }
    }

    /// Returns a consumer handle onto this promise's state.
    #[must_use]
    pub fn get_future(&self) -> Future<T> {
        Future::from_state(Arc::clone(&self.state))
    }

    /// Resolves with a value and schedules every registered continuation in
    /// registration order.
    ///
    /// On a worker thread, continuations go to that worker's own deque; off
    /// the workers they go through the global submission path (or run
    /// inline when no runtime exists). The call is therefore not
    /// necessarily cheap: it may hand arbitrary continuations to the
    /// scheduler before returning.
    pub fn set_value(&self, value: T) {
        for task in self.state.complete(Ok(value)) {
            schedule_after_value(task);
        }
    }

    /// Resolves with a failure.
    ///
    /// Continuations are scheduled through the global path only — a failing
    /// producer is never made to run arbitrary continuation bodies on its
    /// own thread.
    pub fn set_error(&self, error: TaskError) {
        for task in self.state.complete(Err(error)) {
            schedule_global(task);
        }
    }
}

impl<T: Send + 'static> Default for Promise<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> core::fmt::Debug for Promise<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Promise")
            .field("ready", &self.state.is_ready())
            .finish()
    }
}
