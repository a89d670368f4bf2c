//! The consumer half of a shared state.

use crate::error::TaskError;
use crate::future::state::SharedState;
use crate::future::{schedule_global, Promise};
use crate::task::Task;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// The consumer handle onto an eventually-resolved value.
///
/// Futures are cheap clones of the same state; any number of consumers may
/// observe readiness, register continuations with [`then`](Future::then) or
/// wait. The resolved value itself is moved out by the first
/// [`get`](Future::get)/[`try_get`](Future::try_get).
///
/// # Spinning
///
/// [`wait`](Future::wait) and the getters busy-spin. Never call them from a
/// task running on a single-worker pool: the worker that would resolve the
/// future is the one spinning, and the wait cannot end.
#[must_use = "a future does nothing unless waited on, chained or detached"]
pub struct Future<T> {
    state: Arc<SharedState<T>>,
}

impl<T> Clone for Future<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T> core::fmt::Debug for Future<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Future")
            .field("ready", &self.state.is_ready())
            .finish()
    }
}

impl<T: Send + 'static> Future<T> {
    pub(crate) fn from_state(state: Arc<SharedState<T>>) -> Self {
        Self { state }
    }

    /// Returns true once the producer has resolved.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.state.is_ready()
    }

    /// Busy-spins until the producer resolves.
    pub fn wait(&self) {
        self.state.wait();
    }

    /// Waits, then moves the result out.
    ///
    /// # Errors
    ///
    /// Returns the captured failure when the producing task panicked.
    ///
    /// # Panics
    ///
    /// Panics if the result was already consumed through another handle.
    pub fn try_get(self) -> Result<T, TaskError> {
        self.state.wait();
        self.state.take_result()
    }

    /// Waits, then returns the value — or re-raises the producer's panic
    /// with its original message.
    ///
    /// # Panics
    ///
    /// Panics with the captured message when the producing task failed, or
    /// if the result was already consumed through another handle.
    pub fn get(self) -> T {
        match self.try_get() {
            Ok(value) => value,
            Err(error) => std::panic::panic_any(error.message().to_owned()),
        }
    }

    /// Explicitly abandons the handle without waiting.
    ///
    /// Dropping has the same effect; `detach` exists to make fire-and-forget
    /// chains read as intent rather than as an accident.
    pub fn detach(self) {}

    /// Registers a transform of this future's value, returning the future
    /// of the transform's result.
    ///
    /// The continuation never runs on the registering thread while a
    /// runtime is active: registered on a pending state it is scheduled by
    /// the resolving `set_value`/`set_error`; registered on an already-ready
    /// state it goes through the global submission path as a fresh task.
    ///
    /// An upstream failure skips `transform` and resolves the returned
    /// future with the same error; a panic inside `transform` resolves it
    /// with the captured failure.
    pub fn then<U, F>(&self, transform: F) -> Future<U>
    where
        T: Clone,
        U: Send + 'static,
        F: FnOnce(T) -> U + Send + 'static,
    {
        let upstream = Arc::clone(&self.state);
        let next = Promise::new();
        let downstream = next.get_future();
        let continuation = Task::new(move || match upstream.clone_result() {
            Ok(value) => match catch_unwind(AssertUnwindSafe(move || transform(value))) {
                Ok(output) => next.set_value(output),
                Err(payload) => next.set_error(TaskError::from_panic(payload)),
            },
            Err(error) => next.set_error(error),
        });
        if let Err(continuation) = self.state.register(continuation) {
            schedule_global(continuation);
        }
        downstream
    }

    /// Registers an observer of this future's raw outcome. Combinators use
    /// this to see failures as well as values.
    pub(crate) fn watch<F>(&self, observer: F)
    where
        T: Clone,
        F: FnOnce(Result<T, TaskError>) + Send + 'static,
    {
        let upstream = Arc::clone(&self.state);
        let continuation = Task::new(move || observer(upstream.clone_result()));
        if let Err(continuation) = self.state.register(continuation) {
            schedule_global(continuation);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{catch_unwind, AssertUnwindSafe};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn get_returns_the_exact_value_set() {
        let promise = Promise::new();
        let future = promise.get_future();
        promise.set_value(String::from("exact"));
        assert_eq!(future.get(), "exact");
    }

    #[test]
    fn get_re_raises_the_captured_failure() {
        let promise: Promise<i32> = Promise::new();
        let future = promise.get_future();
        promise.set_error(TaskError::new("boom"));
        let payload = catch_unwind(AssertUnwindSafe(move || future.get()))
            .expect_err("get must re-raise");
        let message = payload
            .downcast::<String>()
            .expect("re-raised payload is the captured message");
        assert_eq!(*message, "boom");
    }

    #[test]
    fn clones_observe_the_same_state() {
        let promise = Promise::new();
        let future = promise.get_future();
        let sibling = future.clone();
        promise.set_value(7);
        assert!(sibling.is_ready());
        assert_eq!(future.get(), 7);
    }

    #[test]
    fn then_chains_transforms_in_order() {
        let promise = Promise::new();
        let future = promise.get_future();
        let chained = future.then(|x: i32| x * 3).then(|x| x + 4);
        promise.set_value(2);
        assert_eq!(chained.get(), 10);
    }

    #[test]
    fn then_associativity_law() {
        let g = |x: i32| x + 10;
        let h = |x: i32| x * 2;

        let first = Promise::new();
        let split = first.get_future().then(g).then(h);
        first.set_value(3);

        let second = Promise::new();
        let fused = second.get_future().then(move |x| h(g(x)));
        second.set_value(3);

        assert_eq!(split.get(), fused.get());
    }

    #[test]
    fn panic_inside_transform_becomes_the_downstream_error() {
        let promise = Promise::new();
        let future = promise.get_future();
        let chained = future.then(|_: i32| -> i32 { panic!("mid-chain") });
        promise.set_value(1);
        let err = chained.try_get().expect_err("panic must be captured");
        assert_eq!(err.message(), "mid-chain");
    }

    #[test]
    fn then_on_ready_state_still_delivers() {
        // Without a runtime the late registration runs inline; the
        // scheduled-not-inline property is covered by the e2e suite.
        let promise = Promise::new();
        let future = promise.get_future();
        promise.set_value(5);
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_in = Arc::clone(&hits);
        future
            .then(move |v: i32| {
                assert_eq!(v, 5);
                hits_in.fetch_add(1, Ordering::SeqCst);
            })
            .detach();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn multiple_continuations_start_in_registration_order() {
        let promise = Promise::new();
        let future = promise.get_future();
        let order = Arc::new(parking_lot::Mutex::new(Vec::new()));
        for id in 0..4 {
            let order = Arc::clone(&order);
            future.then(move |_: i32| order.lock().push(id)).detach();
        }
        promise.set_value(0);
        assert_eq!(*order.lock(), vec![0, 1, 2, 3]);
    }
}
