//! The worker fleet.
//!
//! [`DefaultThreadPool`] owns a fixed set of workers and dispatches
//! submitted tasks round-robin across their submission rings. The
//! [`ThreadPool`] trait is the seam the runtime façade installs a pool
//! behind; alternative pool implementations plug in through
//! [`initialize_runtime_with`](crate::initialize_runtime_with).

use crate::runtime::config::PoolConfig;
use crate::runtime::queue::{LocalQueue, SubmissionQueue};
use crate::runtime::worker::{ShutdownFlag, Worker, WorkerShared};
use crate::task::Task;
use crate::tracing_compat::{debug, info};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};
use std::thread::JoinHandle;

/// How a pool winds down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownMode {
    /// Drain every queue, then exit. Every enqueued task completes.
    Soft,
    /// Exit as soon as possible, abandoning queued tasks.
    Hard,
}

/// A pool of workers the runtime can dispatch tasks to.
pub trait ThreadPool: Send + Sync + 'static {
    /// Submits a task for execution. Blocks (spinning) while every worker's
    /// submission ring is full.
    fn enqueue(&self, task: Task);

    /// Requests shutdown and joins every worker before returning.
    fn finalize(&self, mode: ShutdownMode);

    /// Advisory load metric: queued tasks over total queue capacity.
    fn saturation(&self) -> f64;
}

/// The default worker fleet: round-robin dispatch plus work stealing.
#[derive(Debug)]
pub struct DefaultThreadPool {
    config: PoolConfig,
    fleet: OnceLock<Arc<[Arc<WorkerShared>]>>,
    handles: Mutex<Vec<JoinHandle<()>>>,
    shutdown: Arc<ShutdownFlag>,
    active_workers: Arc<AtomicUsize>,
    round_robin: AtomicUsize,
}

impl DefaultThreadPool {
    /// Creates an idle pool from a (normalized) configuration.
    ///
    /// No threads start until [`init`](Self::init) is called.
    #[must_use]
    pub fn new(mut config: PoolConfig) -> Self {
        config.normalize();
        Self {
            config,
            fleet: OnceLock::new(),
            handles: Mutex::new(Vec::new()),
            shutdown: Arc::new(ShutdownFlag::new()),
            active_workers: Arc::new(AtomicUsize::new(0)),
            round_robin: AtomicUsize::new(0),
        }
    }

    /// Builds every worker's queues and starts every worker thread.
    ///
    /// Must be called exactly once, before any [`enqueue`](Self::enqueue).
    ///
    /// # Panics
    ///
    /// Panics on a second call, or if a worker thread cannot be spawned.
    pub fn init(&self) {
        let count = self.config.worker_threads;
        let capacity = self.config.queue_capacity;
        self.active_workers.store(count, Ordering::Release);

        let mut locals = Vec::with_capacity(count);
        let mut fleet = Vec::with_capacity(count);
        for _ in 0..count {
            let local = LocalQueue::new();
            fleet.push(Arc::new(WorkerShared {
                submissions: SubmissionQueue::new(capacity),
                stealer: local.stealer(),
            }));
            locals.push(local);
        }
        let fleet: Arc<[Arc<WorkerShared>]> = fleet.into();
        self.fleet
            .set(Arc::clone(&fleet))
            .expect("init() called twice");

        let mut handles = self.handles.lock();
        for (index, local) in locals.into_iter().enumerate() {
            let worker = Worker::new(
                index,
                local,
                Arc::clone(&fleet[index]),
                Arc::clone(&fleet),
                Arc::clone(&self.shutdown),
                Arc::clone(&self.active_workers),
            );
            let handle = std::thread::Builder::new()
                .name(format!("{}-{index}", self.config.thread_name_prefix))
                .spawn(move || worker.run())
                .expect("failed to spawn worker thread");
            handles.push(handle);
        }
        debug!(workers = count, capacity, "pool initialized");
    }

    fn fleet(&self) -> &Arc<[Arc<WorkerShared>]> {
        self.fleet.get().expect("pool used before init()")
    }
}

impl ThreadPool for DefaultThreadPool {
    /// Round-robin dispatch: try the cursor's worker, advance and retry on a
    /// full ring until some worker accepts, then advance once more so the
    /// next submission starts at a fresh worker.
    fn enqueue(&self, mut task: Task) {
        let fleet = self.fleet();
        let count = fleet.len();
        let mut index = self.round_robin.load(Ordering::Relaxed) % count;
        let mut attempts = 0_usize;
        loop {
            match fleet[index].submissions.push(task) {
                Ok(()) => {
                    self.round_robin.store((index + 1) % count, Ordering::Relaxed);
                    return;
                }
                Err(rejected) => {
                    task = rejected;
                    index = (index + 1) % count;
                    attempts += 1;
                    if attempts % count == 0 {
                        // Every ring was full; ease off while workers drain.
                        std::hint::spin_loop();
                    }
                }
            }
        }
    }

    fn finalize(&self, mode: ShutdownMode) {
        let mut handles = self.handles.lock();
        debug_assert!(
            !handles.is_empty(),
            "finalize() called twice or before init()"
        );
        info!(?mode, "pool shutting down");
        self.shutdown.request(mode);
        for handle in handles.drain(..) {
            let _ = handle.join();
        }
    }

    fn saturation(&self) -> f64 {
        let fleet = self.fleet();
        let queued: usize = fleet.iter().map(|worker| worker.wsq_size()).sum();
        let total = fleet.len() * self.config.queue_capacity;
        queued as f64 / total as f64
    }
}

impl Drop for DefaultThreadPool {
    fn drop(&mut self) {
        let mut handles = self.handles.lock();
        if handles.is_empty() {
            return;
        }
        self.shutdown.request(ShutdownMode::Hard);
        for handle in handles.drain(..) {
            let _ = handle.join();
        }
    }
}
