#![allow(dead_code)]
//! Shared integration test utilities.
//!
//! Import with:
//! ```
//! mod common;
//! use common::*;
//! ```

use spindle::PoolConfig;
use std::sync::{Mutex, MutexGuard, Once};

static INIT_LOGGING: Once = Once::new();

/// The process-wide runtime is a singleton; tests that use it take this
/// lock so the harness's parallel test threads cannot interleave
/// initialize/finalize cycles.
static RUNTIME_LOCK: Mutex<()> = Mutex::new(());

/// Initialize test logging. Safe to call multiple times; the first call
/// wins.
pub fn init_test_logging() {
    INIT_LOGGING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(true)
            .with_ansi(false)
            .try_init();
    });
}

fn runtime_lock() -> MutexGuard<'static, ()> {
    // A panicking test (some assert panics on purpose) may poison the lock;
    // the runtime itself is cleaned up by RuntimeSession's Drop.
    RUNTIME_LOCK
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// An initialized runtime scoped to one test.
///
/// Holds the singleton lock for the duration of the test and finalizes the
/// runtime on drop (including the unwind path), so every test starts from a
/// stopped runtime.
pub struct RuntimeSession {
    _lock: MutexGuard<'static, ()>,
}

impl RuntimeSession {
    /// Starts a runtime with the given shape.
    pub fn start(worker_threads: usize, queue_capacity: usize) -> Self {
        init_test_logging();
        let lock = runtime_lock();
        assert!(
            spindle::initialize_runtime(
                PoolConfig::new()
                    .worker_threads(worker_threads)
                    .queue_capacity(queue_capacity)
            ),
            "no other runtime may be active when a session starts"
        );
        Self { _lock: lock }
    }
}

impl Drop for RuntimeSession {
    fn drop(&mut self) {
        if spindle::is_running() {
            spindle::finalize_soft();
        }
    }
}
