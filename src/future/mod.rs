//! Promise/future chaining over the scheduler.
//!
//! A [`Promise`] and its [`Future`]s share one state node: a readiness flag,
//! a value-or-error slot and a list of continuation tasks. Resolving the
//! promise drains the list and hands each continuation to the scheduler —
//! preferentially onto the resolving worker's own deque, where the push is
//! free of cross-thread cost.
//!
//! `Future::then` composes: it registers a continuation that feeds a fresh
//! promise, so chains of transforms run link by link through the scheduler
//! with constant stack depth.

mod future;
mod promise;
mod state;

pub use future::Future;
pub use promise::Promise;

use crate::runtime;
use crate::task::Task;

/// Schedules a continuation after a successful resolution: the resolving
/// worker's deque when on a worker thread, the global path otherwise, inline
/// as a last resort when no runtime is running.
pub(crate) fn schedule_after_value(task: Task) {
    match runtime::worker::enqueue_local_on_current(task) {
        Ok(()) => {}
        Err(task) => schedule_global(task),
    }
}

/// Schedules a continuation through the global submission path, so an
/// arbitrary continuation body never runs on the scheduling thread while a
/// runtime exists. Without a runtime the task runs inline.
pub(crate) fn schedule_global(task: Task) {
    if runtime::is_running() {
        runtime::enqueue(task);
    } else {
        task.run();
    }
}
