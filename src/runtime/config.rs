//! Pool configuration.
//!
//! # Defaults
//!
//! | Field | Default |
//! |-------|---------|
//! | `worker_threads` | available CPU parallelism |
//! | `queue_capacity` | 1024 |
//! | `thread_name_prefix` | `"spindle-worker"` |

use std::thread;

/// Default capacity of each worker's submission ring and local deque.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Default prefix for worker thread names.
pub const DEFAULT_THREAD_NAME_PREFIX: &str = "spindle-worker";

/// Configuration for a [`DefaultThreadPool`](crate::DefaultThreadPool).
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Number of worker threads (default: available parallelism).
    pub worker_threads: usize,
    /// Capacity of each worker's submission ring (default: 1024).
    pub queue_capacity: usize,
    /// Name prefix for worker threads; workers are named `{prefix}-{index}`.
    pub thread_name_prefix: String,
}

impl PoolConfig {
    /// Creates a configuration with the defaults above.
    #[must_use]
    pub fn new() -> Self {
        Self {
            worker_threads: default_worker_threads(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            thread_name_prefix: DEFAULT_THREAD_NAME_PREFIX.to_owned(),
        }
    }

    /// Sets the number of worker threads.
    #[must_use]
    pub fn worker_threads(mut self, count: usize) -> Self {
        self.worker_threads = count;
        self
    }

    /// Sets the per-worker queue capacity.
    #[must_use]
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Sets the worker thread name prefix.
    #[must_use]
    pub fn thread_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.thread_name_prefix = prefix.into();
        self
    }

    /// Clamps out-of-range values to safe minimums.
    ///
    /// A pool needs at least one worker and room for at least one queued
    /// task per worker.
    pub fn normalize(&mut self) {
        if self.worker_threads == 0 {
            self.worker_threads = 1;
        }
        if self.queue_capacity == 0 {
            self.queue_capacity = 1;
        }
        if self.thread_name_prefix.is_empty() {
            self.thread_name_prefix = DEFAULT_THREAD_NAME_PREFIX.to_owned();
        }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn default_worker_threads() -> usize {
    thread::available_parallelism().map_or(1, usize::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_contract() {
        let config = PoolConfig::default();
        assert!(config.worker_threads >= 1);
        assert_eq!(config.queue_capacity, DEFAULT_QUEUE_CAPACITY);
        assert_eq!(config.thread_name_prefix, DEFAULT_THREAD_NAME_PREFIX);
    }

    #[test]
    fn normalize_clamps_zeroes() {
        let mut config = PoolConfig::new()
            .worker_threads(0)
            .queue_capacity(0)
            .thread_name_prefix("");
        config.normalize();
        assert_eq!(config.worker_threads, 1);
        assert_eq!(config.queue_capacity, 1);
        assert_eq!(config.thread_name_prefix, DEFAULT_THREAD_NAME_PREFIX);
    }

    #[test]
    fn setters_chain() {
        let config = PoolConfig::new()
            .worker_threads(3)
            .queue_capacity(8)
            .thread_name_prefix("pool");
        assert_eq!(config.worker_threads, 3);
        assert_eq!(config.queue_capacity, 8);
        assert_eq!(config.thread_name_prefix, "pool");
    }
}
