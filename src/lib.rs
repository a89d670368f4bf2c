//! Spindle: a low-latency work-stealing task runtime with promise chaining.
//!
//! # Overview
//!
//! Spindle is an in-process execution engine for very small units of work.
//! User callables are wrapped as [`Task`]s, dispatched round-robin to a fixed
//! fleet of worker threads, and composed through a [`Future`]/[`Promise`]
//! pair with `then`-chaining. The design targets millions of sub-microsecond
//! task bodies submitted from one thread and/or from within running tasks.
//!
//! # Architecture
//!
//! - Every worker owns a bounded single-producer/single-consumer submission
//!   ring (fed by the pool dispatcher) and a work-stealing deque (LIFO for
//!   the owner, FIFO for thieves).
//! - Continuations resolved on a worker are pushed onto that worker's own
//!   deque, avoiding all cross-thread cost on the hot path.
//! - Idle workers steal roughly half of a victim's deque at a time.
//! - Shutdown is cooperative: soft shutdown drains every queue before the
//!   fleet exits, hard shutdown abandons queued work.
//!
//! # Example
//!
//! ```rust,ignore
//! use spindle::{initialize_runtime, finalize_soft, spawn, PoolConfig};
//!
//! assert!(initialize_runtime(PoolConfig::default()));
//! let answer = spawn(|| 6 * 7).then(|n| n.to_string()).get();
//! assert_eq!(answer, "42");
//! finalize_soft();
//! ```
//!
//! # Module Structure
//!
//! - [`task`]: the type-erased, single-shot unit of work
//! - [`error`]: captured task failures
//! - [`future`]: `SharedState`, `Promise`, `Future` and `then`-chaining
//! - [`runtime`]: queues, workers, thread pool and the process-wide façade
//! - [`combinator`]: `spawn`, `when_all`, `when_any`
//! - [`tracing_compat`]: feature-gated structured logging

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod combinator;
pub mod error;
pub mod future;
pub mod runtime;
pub mod task;
pub mod tracing_compat;

pub use combinator::{
    spawn, when_all, when_all_vec, when_any, when_any_vec, AnyResult, WhenAllTuple,
};
pub use error::TaskError;
pub use future::{Future, Promise};
pub use runtime::{
    enqueue, finalize_hard, finalize_soft, initialize_runtime, initialize_runtime_with,
    is_running, saturation, DefaultThreadPool, PoolConfig, ShutdownMode, ThreadPool,
};
pub use task::Task;
