//! Combinators layered on the runtime: submission with a result handle and
//! aggregation of several futures into one.
//!
//! - [`spawn`] enqueues a callable and returns the [`Future`](crate::Future)
//!   of its result.
//! - [`when_all`] resolves once every input has resolved, collecting the
//!   values positionally; the first failing input fails the aggregate.
//! - [`when_any`] resolves with the first input value to arrive.
//!
//! Heterogeneous inputs use tuples (`when_all`) or the two-place
//! [`AnyResult`] (`when_any`); the `_vec` forms aggregate any number of
//! same-typed futures.

mod spawn;
mod when_all;
mod when_any;

pub use spawn::spawn;
pub use when_all::{when_all, when_all_vec, WhenAllTuple};
pub use when_any::{when_any, when_any_vec, AnyResult};
