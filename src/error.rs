//! Task failure types.
//!
//! A callable that panics inside the runtime never unwinds across a worker
//! thread. The panic is caught at the promise boundary and converted into a
//! [`TaskError`], which travels through the shared state like any value:
//! surfaced by [`Future::get`](crate::Future::get), folded into downstream
//! continuations by `then`, or aggregated by `when_all`.
//!
//! Errors are cloneable by construction: one failure may have to reach a
//! waiting getter and several registered continuations at once.

use std::any::Any;
use std::sync::Arc;

/// Message used when a panic payload is neither `&str` nor `String`.
const OPAQUE_PANIC: &str = "task panicked with a non-string payload";

/// A captured task failure.
///
/// Wraps the panic message of a failed callable. The payload itself is not
/// retained (panic payloads are not cloneable); the message is, which is
/// what every consumer of a failed future needs.
#[derive(Debug, Clone, thiserror::Error)]
#[error("task failed: {message}")]
pub struct TaskError {
    message: Arc<str>,
}

impl TaskError {
    /// Creates an error with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into().into(),
        }
    }

    /// Extracts the message from a caught panic payload.
    ///
    /// `&str` and `String` payloads (the ones `panic!` produces) are carried
    /// verbatim; anything else becomes a fixed placeholder.
    #[must_use]
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = match payload.downcast::<String>() {
            Ok(text) => *text,
            Err(payload) => match payload.downcast::<&'static str>() {
                Ok(text) => (*text).to_owned(),
                Err(_) => OPAQUE_PANIC.to_owned(),
            },
        };
        Self::new(message)
    }

    /// Returns the captured message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    fn panic_payload(f: impl FnOnce()) -> Box<dyn Any + Send> {
        catch_unwind(AssertUnwindSafe(f)).expect_err("closure should panic")
    }

    #[test]
    fn captures_static_str_payload() {
        let err = TaskError::from_panic(panic_payload(|| panic!("boom")));
        assert_eq!(err.message(), "boom");
    }

    #[test]
    fn captures_formatted_string_payload() {
        let err = TaskError::from_panic(panic_payload(|| panic!("code {}", 7)));
        assert_eq!(err.message(), "code 7");
    }

    #[test]
    fn opaque_payload_gets_placeholder() {
        let err = TaskError::from_panic(panic_payload(|| std::panic::panic_any(17_u32)));
        assert_eq!(err.message(), OPAQUE_PANIC);
    }

    #[test]
    fn clones_share_the_message() {
        let err = TaskError::new("shared");
        let copy = err.clone();
        assert_eq!(err.message(), copy.message());
        assert_eq!(format!("{err}"), "task failed: shared");
    }
}
