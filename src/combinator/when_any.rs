//! Any-of aggregation.
//!
//! The first input to resolve with a *value* wins; a `won` latch guarantees
//! single fulfillment, and every later resolution is a no-op. An input that
//! fails does not win and does not fail the aggregate — its failure is
//! swallowed. Consequence: if every input fails, the aggregate never
//! resolves; callers racing fallible work should aggregate `Result` values
//! instead.

use crate::future::{Future, Promise};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// The winner of a two-way [`when_any`], tagged by input position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnyResult<A, B> {
    /// The first input resolved first.
    First(A),
    /// The second input resolved first.
    Second(B),
}

impl<A, B> AnyResult<A, B> {
    /// Returns true if the first input won.
    #[must_use]
    pub const fn is_first(&self) -> bool {
        matches!(self, Self::First(_))
    }

    /// Returns true if the second input won.
    #[must_use]
    pub const fn is_second(&self) -> bool {
        matches!(self, Self::Second(_))
    }

    /// Returns the first input's value, if it won.
    pub fn into_first(self) -> Option<A> {
        match self {
            Self::First(value) => Some(value),
            Self::Second(_) => None,
        }
    }

    /// Returns the second input's value, if it won.
    pub fn into_second(self) -> Option<B> {
        match self {
            Self::First(_) => None,
            Self::Second(value) => Some(value),
        }
    }
}

/// Resolves with the first of two futures to produce a value, tagged with
/// its input position.
pub fn when_any<A, B>(first: Future<A>, second: Future<B>) -> Future<AnyResult<A, B>>
where
    A: Clone + Send + 'static,
    B: Clone + Send + 'static,
{
    let promise = Arc::new(Promise::new());
    let aggregate = promise.get_future();
    let won = Arc::new(AtomicBool::new(false));

    {
        let promise = Arc::clone(&promise);
        let won = Arc::clone(&won);
        first.watch(move |outcome| {
            if let Ok(value) = outcome {
                if !won.swap(true, Ordering::AcqRel) {
                    promise.set_value(AnyResult::First(value));
                }
            }
        });
    }
    {
        let won = Arc::clone(&won);
        second.watch(move |outcome| {
            if let Ok(value) = outcome {
                if !won.swap(true, Ordering::AcqRel) {
                    promise.set_value(AnyResult::Second(value));
                }
            }
        });
    }
    aggregate
}

/// Homogeneous any-of: resolves with the winning input's index and value.
///
/// # Panics
///
/// Panics on an empty input — an aggregate over nothing could never
/// resolve.
pub fn when_any_vec<T>(futures: Vec<Future<T>>) -> Future<(usize, T)>
where
    T: Clone + Send + 'static,
{
    assert!(
        !futures.is_empty(),
        "when_any_vec() requires at least one input future"
    );
    let promise = Arc::new(Promise::new());
    let aggregate = promise.get_future();
    let won = Arc::new(AtomicBool::new(false));

    for (index, future) in futures.iter().enumerate() {
        let promise = Arc::clone(&promise);
        let won = Arc::clone(&won);
        future.watch(move |outcome| {
            if let Ok(value) = outcome {
                if !won.swap(true, Ordering::AcqRel) {
                    promise.set_value((index, value));
                }
            }
        });
    }
    aggregate
}
