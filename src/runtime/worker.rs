//! Worker threads.
//!
//! Each worker drains its submission ring into its local deque, pops tasks
//! LIFO and runs them, and steals from peers when idle. A thread-local slot
//! publishes the running worker's deque so promise resolution on a worker
//! thread can schedule continuations locally, without touching any shared
//! queue.
//!
//! # Shutdown protocol
//!
//! The fleet shares one shutdown word and one active-worker counter.
//! `Hard` exits the loop immediately, abandoning queued tasks. `Soft` lets a
//! worker deactivate once both of its queues are empty; deactivated workers
//! keep looping — running late submissions and stealing for still-active
//! peers — until the active count reaches zero, at which point everyone
//! exits.

use crate::runtime::pool::ShutdownMode;
use crate::runtime::queue::{LocalQueue, Stealer, SubmissionQueue};
use crate::task::Task;
use crate::tracing_compat::{error, trace};
use std::cell::RefCell;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Rc;
use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};
use std::sync::Arc;

thread_local! {
    /// The local deque of the worker running on this thread, if any.
    static CURRENT_WORKER: RefCell<Option<Rc<LocalQueue>>> = const { RefCell::new(None) };
}

/// Pushes a task onto the current worker's deque, or hands it back when the
/// calling thread is not a worker.
pub(crate) fn enqueue_local_on_current(task: Task) -> Result<(), Task> {
    CURRENT_WORKER.with(|slot| match slot.borrow().as_ref() {
        Some(local) => {
            local.push(task);
            Ok(())
        }
        None => Err(task),
    })
}

const RUN: u8 = 0;
const SOFT: u8 = 1;
const HARD: u8 = 2;

/// Fleet-wide shutdown word.
#[derive(Debug)]
pub(crate) struct ShutdownFlag {
    word: AtomicU8,
}

impl ShutdownFlag {
    pub(crate) fn new() -> Self {
        Self {
            word: AtomicU8::new(RUN),
        }
    }

    /// Publishes a shutdown request to the fleet.
    pub(crate) fn request(&self, mode: ShutdownMode) {
        let word = match mode {
            ShutdownMode::Soft => SOFT,
            ShutdownMode::Hard => HARD,
        };
        self.word.store(word, Ordering::Release);
    }

    /// Returns the requested mode, if any.
    pub(crate) fn current(&self) -> Option<ShutdownMode> {
        match self.word.load(Ordering::Relaxed) {
            SOFT => Some(ShutdownMode::Soft),
            HARD => Some(ShutdownMode::Hard),
            _ => None,
        }
    }
}

/// The cross-thread face of one worker: where the dispatcher submits and
/// where thieves steal.
#[derive(Debug)]
pub(crate) struct WorkerShared {
    pub(crate) submissions: SubmissionQueue,
    pub(crate) stealer: Stealer,
}

impl WorkerShared {
    /// Approximate depth of this worker's deque.
    pub(crate) fn wsq_size(&self) -> usize {
        self.stealer.len()
    }
}

/// Thread-side state of one worker.
#[derive(Debug)]
pub(crate) struct Worker {
    index: usize,
    local: LocalQueue,
    shared: Arc<WorkerShared>,
    peers: Arc<[Arc<WorkerShared>]>,
    shutdown: Arc<ShutdownFlag>,
    active_workers: Arc<AtomicUsize>,
}

impl Worker {
    pub(crate) fn new(
        index: usize,
        local: LocalQueue,
        shared: Arc<WorkerShared>,
        peers: Arc<[Arc<WorkerShared>]>,
        shutdown: Arc<ShutdownFlag>,
        active_workers: Arc<AtomicUsize>,
    ) -> Self {
        Self {
            index,
            local,
            shared,
            peers,
            shutdown,
            active_workers,
        }
    }

    /// Runs the scheduling loop until shutdown completes.
    pub(crate) fn run(self) {
        let Worker {
            index,
            local,
            shared,
            peers,
            shutdown,
            active_workers,
        } = self;

        let local = Rc::new(local);
        CURRENT_WORKER.with(|slot| *slot.borrow_mut() = Some(Rc::clone(&local)));
        trace!(worker = index, "worker started");

        // Stealing on a single-worker pool is pure overhead.
        let stealing_enabled = peers.len() >= 2;
        let mut victim_cursor = index;
        let mut active = true;

        loop {
            if shutdown.current() == Some(ShutdownMode::Hard) {
                break;
            }

            // Refill from the submission ring only when local work ran dry;
            // insertion order is preserved for a single submitter.
            if local.is_empty() {
                while let Some(task) = shared.submissions.pop() {
                    local.push(task);
                }
            }

            if let Some(task) = local.pop() {
                // Spawned/chained tasks carry their own panic boundary; this
                // one keeps a raw panicking task from taking the worker (and
                // the shutdown protocol) down with it.
                if catch_unwind(AssertUnwindSafe(|| task.run())).is_err() {
                    error!(worker = index, "task panicked; worker continues");
                }
            } else {
                if stealing_enabled {
                    steal_half(index, &mut victim_cursor, &peers, &local);
                }
                std::hint::spin_loop();
            }

            if shutdown.current() == Some(ShutdownMode::Soft)
                && local.is_empty()
                && shared.submissions.is_empty()
            {
                if active {
                    active = false;
                    active_workers.fetch_sub(1, Ordering::AcqRel);
                }
                // Keep looping — and stealing — for any still-active peer.
                if active_workers.load(Ordering::Acquire) == 0 {
                    break;
                }
            }
        }

        CURRENT_WORKER.with(|slot| *slot.borrow_mut() = None);
        trace!(worker = index, "worker exited");
    }
}

/// Picks the next victim after `cursor` (skipping `me`) and attempts up to
/// half of its observed deque depth in steals, moving each success onto the
/// thief's own deque.
fn steal_half(
    me: usize,
    cursor: &mut usize,
    peers: &Arc<[Arc<WorkerShared>]>,
    local: &Rc<LocalQueue>,
) {
    loop {
        *cursor = (*cursor + 1) % peers.len();
        if *cursor != me {
            break;
        }
    }
    let victim = &peers[*cursor];

    let budget = victim.wsq_size() / 2;
    let mut stolen = 0_usize;
    for _ in 0..budget {
        match victim.stealer.steal() {
            Some(task) => {
                local.push(task);
                stolen += 1;
            }
            None => break,
        }
    }
    if stolen > 0 {
        trace!(worker = me, victim = *cursor, stolen, "stole batch");
    }
}
