//! The scheduler: queues, workers, thread pool and the process-wide façade.
//!
//! The façade holds at most one active pool behind a read-write lock — the
//! ownership-safe rendition of an installed dispatch pointer. A
//! compare-and-set on a `running` flag guarantees a single active runtime;
//! after finalization the slot is cleared and a fresh runtime may be
//! initialized.
//!
//! Contract violations (submitting while stopped, finalizing twice) panic
//! with a descriptive message rather than being silently ignored.

pub mod config;
pub mod pool;
pub mod queue;
pub(crate) mod worker;

pub use config::{PoolConfig, DEFAULT_QUEUE_CAPACITY};
pub use pool::{DefaultThreadPool, ShutdownMode, ThreadPool};

use crate::task::Task;
use crate::tracing_compat::info;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Guards single-initialization; cleared after finalize.
static RUNNING: AtomicBool = AtomicBool::new(false);

/// The installed pool, present exactly while the runtime is running.
static ACTIVE_POOL: RwLock<Option<Arc<dyn ThreadPool>>> = RwLock::new(None);

/// Starts the process-wide runtime with a [`DefaultThreadPool`].
///
/// Returns `false` when a runtime is already running (the existing runtime
/// is left untouched). Worker threads are running when this returns `true`.
pub fn initialize_runtime(config: PoolConfig) -> bool {
    if RUNNING
        .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        .is_err()
    {
        return false;
    }
    let pool = DefaultThreadPool::new(config);
    pool.init();
    *ACTIVE_POOL.write() = Some(Arc::new(pool));
    info!("runtime initialized");
    true
}

/// Starts the process-wide runtime with a caller-provided pool.
///
/// The pool must already be accepting tasks. Returns `false` when a runtime
/// is already running.
pub fn initialize_runtime_with<P: ThreadPool>(pool: P) -> bool {
    if RUNNING
        .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        .is_err()
    {
        return false;
    }
    *ACTIVE_POOL.write() = Some(Arc::new(pool));
    info!("runtime initialized with custom pool");
    true
}

/// Returns true while a runtime is installed and accepting tasks.
#[must_use]
pub fn is_running() -> bool {
    RUNNING.load(Ordering::Acquire)
}

/// Fire-and-forget submission to the active pool.
///
/// # Panics
///
/// Panics when no runtime is running — submitting to a stopped runtime is a
/// contract violation.
pub fn enqueue(task: Task) {
    let guard = ACTIVE_POOL.read();
    let pool = guard
        .as_ref()
        .expect("enqueue() called while the runtime is not running");
    pool.enqueue(task);
}

/// Advisory load metric of the active pool: queued tasks over capacity.
///
/// # Panics
///
/// Panics when no runtime is running.
#[must_use]
pub fn saturation() -> f64 {
    let guard = ACTIVE_POOL.read();
    let pool = guard
        .as_ref()
        .expect("saturation() called while the runtime is not running");
    pool.saturation()
}

/// Drains every queue, stops the runtime and joins every worker.
pub fn finalize_soft() {
    finalize(ShutdownMode::Soft);
}

/// Stops the runtime as soon as possible, abandoning queued tasks, and
/// joins every worker.
pub fn finalize_hard() {
    finalize(ShutdownMode::Hard);
}

fn finalize(mode: ShutdownMode) {
    // Keep the pool installed while workers drain: tasks running during a
    // soft shutdown may still submit through the global path.
    let pool = ACTIVE_POOL
        .read()
        .clone()
        .expect("finalize called while the runtime is not running");
    pool.finalize(mode);
    *ACTIVE_POOL.write() = None;
    RUNNING.store(false, Ordering::Release);
    info!(?mode, "runtime finalized");
}
