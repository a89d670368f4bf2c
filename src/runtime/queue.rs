//! Per-worker queues.
//!
//! Each worker owns two queues with different access patterns:
//!
//! - a [`SubmissionQueue`], a bounded ring written by the pool dispatcher
//!   and drained by the owning worker (single producer, single consumer by
//!   usage discipline);
//! - a [`LocalQueue`], a work-stealing deque. The owner pushes and pops one
//!   end (LIFO); peers steal single tasks from the other end (FIFO) through
//!   [`Stealer`] handles.
//!
//! Both are thin wrappers over the crossbeam implementations. The deque
//! grows on push, so a local push never fails; the submission ring reports
//! fullness to the dispatcher, which retries on another worker.
//!
//! The deque additionally maintains a shared depth gauge. It is approximate
//! by contract — owner operations and thief steals race on it — and feeds
//! the half-the-victim steal heuristic and the pool's saturation metric.

use crate::task::Task;
use crossbeam_deque::{Steal, Stealer as DequeStealer, Worker as DequeWorker};
use crossbeam_queue::ArrayQueue;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Bounded submission ring between the pool dispatcher and one worker.
#[derive(Debug)]
pub struct SubmissionQueue {
    inner: ArrayQueue<Task>,
}

impl SubmissionQueue {
    /// Creates a ring with room for `capacity` tasks.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: ArrayQueue::new(capacity),
        }
    }

    /// Attempts to enqueue a task; a full ring hands the task back.
    ///
    /// # Errors
    ///
    /// Returns `Err(task)` when the ring is at capacity.
    pub fn push(&self, task: Task) -> Result<(), Task> {
        self.inner.push(task)
    }

    /// Dequeues the oldest task, if any.
    #[must_use]
    pub fn pop(&self) -> Option<Task> {
        self.inner.pop()
    }

    /// Returns true if the ring holds no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the number of queued tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns the fixed capacity of the ring.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.inner.capacity()
    }
}

/// Owner side of a worker's work-stealing deque.
///
/// Only the owning worker thread pushes and pops; the handle is therefore
/// not shared across threads (thieves get [`Stealer`]s instead).
#[derive(Debug)]
pub struct LocalQueue {
    inner: DequeWorker<Task>,
    depth: Arc<AtomicUsize>,
}

impl LocalQueue {
    /// Creates an empty deque.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: DequeWorker::new_lifo(),
            depth: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Pushes a task onto the owner end.
    pub fn push(&self, task: Task) {
        // Gauge first: a thief that wins the task before the owner's
        // increment would otherwise decrement past zero and pin the gauge
        // high forever.
        self.depth.fetch_add(1, Ordering::Relaxed);
        self.inner.push(task);
    }

    /// Pops the most recently pushed task (LIFO).
    #[must_use]
    pub fn pop(&self) -> Option<Task> {
        let task = self.inner.pop();
        if task.is_some() {
            decrement_gauge(&self.depth);
        }
        task
    }

    /// Returns true if the deque looks empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Creates a thief handle for this deque.
    #[must_use]
    pub fn stealer(&self) -> Stealer {
        Stealer {
            inner: self.inner.stealer(),
            depth: Arc::clone(&self.depth),
        }
    }
}

impl Default for LocalQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Thief handle onto a worker's deque.
#[derive(Debug, Clone)]
pub struct Stealer {
    inner: DequeStealer<Task>,
    depth: Arc<AtomicUsize>,
}

impl Stealer {
    /// Steals the oldest task from the victim (FIFO), if any.
    ///
    /// Transient interference from the owner or other thieves is retried
    /// internally; `None` means the deque was observed empty.
    #[must_use]
    pub fn steal(&self) -> Option<Task> {
        loop {
            match self.inner.steal() {
                Steal::Success(task) => {
                    decrement_gauge(&self.depth);
                    return Some(task);
                }
                Steal::Empty => return None,
                Steal::Retry => {}
            }
        }
    }

    /// Returns the approximate depth of the victim's deque.
    #[must_use]
    pub fn len(&self) -> usize {
        self.depth.load(Ordering::Relaxed)
    }

    /// Returns true if the victim's deque looks empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Saturating decrement: racing observers may otherwise push the gauge
/// below zero and wrap.
fn decrement_gauge(gauge: &AtomicUsize) {
    let _ = gauge.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |depth| {
        Some(depth.saturating_sub(1))
    });
}
