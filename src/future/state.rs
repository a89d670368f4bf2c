//! The rendezvous node shared by a promise and its futures.

use crate::error::TaskError;
use crate::task::Task;
use parking_lot::Mutex;
use smallvec::SmallVec;
use std::sync::atomic::{AtomicBool, Ordering};

/// Continuation storage; most states carry zero or one continuation.
pub(crate) type Continuations = SmallVec<[Task; 4]>;

/// Shared state between one producer and any number of consumers.
///
/// `ready` transitions false→true exactly once, release-stored under the
/// mutex that also guards the slot write; a consumer that acquire-loads
/// `ready == true` therefore observes the exact result the producer placed.
pub(crate) struct SharedState<T> {
    ready: AtomicBool,
    inner: Mutex<Inner<T>>,
}

struct Inner<T> {
    result: Option<Result<T, TaskError>>,
    continuations: Continuations,
}

impl<T> SharedState<T> {
    pub(crate) fn new() -> Self {
        Self {
            ready: AtomicBool::new(false),
            inner: Mutex::new(Inner {
                result: None,
                continuations: SmallVec::new(),
            }),
        }
    }

    pub(crate) fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Busy-spins until the state is ready. The runtime targets
    /// sub-microsecond task bodies; blocking primitives would cost more
    /// than the spin.
    pub(crate) fn wait(&self) {
        while !self.is_ready() {
            std::hint::spin_loop();
        }
    }

    /// Publishes the result and drains the continuation list in
    /// registration order. The caller schedules the drained tasks after
    /// this returns, outside the state mutex.
    ///
    /// Completing twice is a contract violation; the second completion is
    /// dropped in release builds.
    pub(crate) fn complete(&self, result: Result<T, TaskError>) -> Continuations {
        let mut inner = self.inner.lock();
        debug_assert!(!self.ready.load(Ordering::Relaxed), "promise completed twice");
        if self.ready.load(Ordering::Relaxed) {
            return SmallVec::new();
        }
        inner.result = Some(result);
        self.ready.store(true, Ordering::Release);
        std::mem::take(&mut inner.continuations)
    }

    /// Appends a continuation, or hands it back when the state is already
    /// ready — late registrations are scheduled by the caller, never run
    /// against the list.
    pub(crate) fn register(&self, task: Task) -> Result<(), Task> {
        let mut inner = self.inner.lock();
        if self.ready.load(Ordering::Relaxed) {
            return Err(task);
        }
        inner.continuations.push(task);
        Ok(())
    }

    /// Moves the result out. Precondition: ready.
    ///
    /// # Panics
    ///
    /// Panics if the value was already consumed by another getter — two
    /// `get()` calls on clones of one future are a contract violation.
    pub(crate) fn take_result(&self) -> Result<T, TaskError> {
        let mut inner = self.inner.lock();
        inner
            .result
            .take()
            .expect("future result already consumed")
    }
}

impl<T: Clone> SharedState<T> {
    /// Clones the result out, leaving the slot for other consumers.
    /// Precondition: ready.
    pub(crate) fn clone_result(&self) -> Result<T, TaskError> {
        let inner = self.inner.lock();
        inner
            .result
            .clone()
            .expect("state read before it was ready")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn complete_flips_ready_exactly_once() {
        let state = SharedState::new();
        assert!(!state.is_ready());
        let drained = state.complete(Ok(5));
        assert!(state.is_ready());
        assert!(drained.is_empty());
        assert_eq!(state.take_result().expect("value"), 5);
    }

    #[test]
    fn register_before_ready_queues_in_order() {
        let state: SharedState<i32> = SharedState::new();
        let order = Arc::new(parking_lot::Mutex::new(Vec::new()));
        for id in 0..3 {
            let order = Arc::clone(&order);
            state
                .register(Task::new(move || order.lock().push(id)))
                .expect("state not ready yet");
        }
        let drained = state.complete(Ok(0));
        assert_eq!(drained.len(), 3);
        for task in drained {
            task.run();
        }
        assert_eq!(*order.lock(), vec![0, 1, 2]);
    }

    #[test]
    fn register_after_ready_hands_the_task_back() {
        let state: SharedState<i32> = SharedState::new();
        drop(state.complete(Ok(1)));
        let late = state.register(Task::new(|| {}));
        assert!(late.is_err(), "ready state must not accept continuations");
    }

    #[test]
    fn clone_result_leaves_the_slot() {
        let state = SharedState::new();
        drop(state.complete(Ok(String::from("shared"))));
        assert_eq!(state.clone_result().expect("value"), "shared");
        assert_eq!(state.take_result().expect("value"), "shared");
    }

    #[test]
    fn wait_observes_a_resolution_from_another_thread() {
        let state = Arc::new(SharedState::new());
        let producer = Arc::clone(&state);
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_in = Arc::clone(&hits);
        let handle = std::thread::spawn(move || {
            std::thread::sleep(std::time::Duration::from_millis(5));
            drop(producer.complete(Ok(9)));
            hits_in.fetch_add(1, Ordering::SeqCst);
        });
        state.wait();
        assert!(state.is_ready());
        handle.join().expect("producer join");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
