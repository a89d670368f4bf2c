//! All-of aggregation.
//!
//! `when_all((a, b, c))` resolves once `a`, `b` and `c` all have, with the
//! tuple of their values in input order. Each input carries its own storage
//! slot; a shared countdown detects the last arrival and a `done` latch
//! makes the success path and the error path mutually exclusive, so exactly
//! one resolution reaches the aggregate promise.
//!
//! Error policy: the first input to fail fails the aggregate immediately
//! with that failure; every later arrival — value or error — is a no-op.

use crate::future::{Future, Promise};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Tuples of futures that can be aggregated positionally.
///
/// Implemented for arities 0 through 8; nest tuples for more.
pub trait WhenAllTuple {
    /// Tuple of the input futures' value types, in input order.
    type Output: Send + 'static;

    /// Consumes the input futures and returns the aggregate future.
    fn when_all(self) -> Future<Self::Output>;
}

/// Resolves once every input future has resolved, with the values in input
/// order; the first failing input fails the aggregate instead.
///
/// The zero-input aggregate `when_all(())` is already resolved with `()`.
pub fn when_all<L: WhenAllTuple>(futures: L) -> Future<L::Output> {
    futures.when_all()
}

impl WhenAllTuple for () {
    type Output = ();

    fn when_all(self) -> Future<()> {
        let promise = Promise::new();
        let ready = promise.get_future();
        promise.set_value(());
        ready
    }
}

macro_rules! impl_when_all_tuple {
    ($( $future:ident : $ty:ident : $idx:tt ),+) => {
        impl<$($ty),+> WhenAllTuple for ($(Future<$ty>,)+)
        where
            $($ty: Clone + Send + 'static,)+
        {
            type Output = ($($ty,)+);

            fn when_all(self) -> Future<Self::Output> {
                let ($($future,)+) = self;
                let count = 0_usize $(+ { let _ = stringify!($future); 1 })+;
                let promise = Arc::new(Promise::<Self::Output>::new());
                let aggregate = promise.get_future();
                let slots = Arc::new(($(Mutex::new(None::<$ty>),)+));
                let remaining = Arc::new(AtomicUsize::new(count));
                let done = Arc::new(AtomicBool::new(false));

                // The last arrival moves every slot into the output tuple.
                let assemble = {
                    let slots = Arc::clone(&slots);
                    Arc::new(move || {
                        ($(slots
                            .$idx
                            .lock()
                            .take()
                            .expect("input future resolved without storing a value"),)+)
                    })
                };

                $(
                {
                    let promise = Arc::clone(&promise);
                    let slots = Arc::clone(&slots);
                    let remaining = Arc::clone(&remaining);
                    let done = Arc::clone(&done);
                    let assemble = Arc::clone(&assemble);
                    $future.watch(move |outcome| match outcome {
                        Ok(value) => {
                            *slots.$idx.lock() = Some(value);
                            if remaining.fetch_sub(1, Ordering::AcqRel) == 1
                                && !done.swap(true, Ordering::AcqRel)
                            {
                                promise.set_value(assemble());
                            }
                        }
                        Err(error) => {
                            if !done.swap(true, Ordering::AcqRel) {
                                promise.set_error(error);
                            }
                        }
                    });
                }
                )+

                aggregate
            }
        }
    };
}

impl_when_all_tuple!(f0: T0: 0);
impl_when_all_tuple!(f0: T0: 0, f1: T1: 1);
impl_when_all_tuple!(f0: T0: 0, f1: T1: 1, f2: T2: 2);
impl_when_all_tuple!(f0: T0: 0, f1: T1: 1, f2: T2: 2, f3: T3: 3);
impl_when_all_tuple!(f0: T0: 0, f1: T1: 1, f2: T2: 2, f3: T3: 3, f4: T4: 4);
impl_when_all_tuple!(f0: T0: 0, f1: T1: 1, f2: T2: 2, f3: T3: 3, f4: T4: 4, f5: T5: 5);
impl_when_all_tuple!(f0: T0: 0, f1: T1: 1, f2: T2: 2, f3: T3: 3, f4: T4: 4, f5: T5: 5, f6: T6: 6);
impl_when_all_tuple!(
    f0: T0: 0,
    f1: T1: 1,
    f2: T2: 2,
    f3: T3: 3,
    f4: T4: 4,
    f5: T5: 5,
    f6: T6: 6,
    f7: T7: 7
);

/// Homogeneous all-of: resolves with every value in input order, or with
/// the first failure. An empty input resolves immediately with an empty
/// vector.
pub fn when_all_vec<T>(futures: Vec<Future<T>>) -> Future<Vec<T>>
where
    T: Clone + Send + 'static,
{
    let count = futures.len();
    let promise = Arc::new(Promise::new());
    let aggregate = promise.get_future();
    if count == 0 {
        promise.set_value(Vec::new());
        return aggregate;
    }

    let slots = Arc::new(Mutex::new(vec![None::<T>; count]));
    let remaining = Arc::new(AtomicUsize::new(count));
    let done = Arc::new(AtomicBool::new(false));

    for (index, future) in futures.iter().enumerate() {
        let promise = Arc::clone(&promise);
        let slots = Arc::clone(&slots);
        let remaining = Arc::clone(&remaining);
        let done = Arc::clone(&done);
        future.watch(move |outcome| match outcome {
            Ok(value) => {
                slots.lock()[index] = Some(value);
                if remaining.fetch_sub(1, Ordering::AcqRel) == 1
                    && !done.swap(true, Ordering::AcqRel)
                {
                    let values = slots
                        .lock()
                        .iter_mut()
                        .map(|slot| {
                            slot.take()
                                .expect("input future resolved without storing a value")
                        })
                        .collect();
                    promise.set_value(values);
                }
            }
            Err(error) => {
                if !done.swap(true, Ordering::AcqRel) {
                    promise.set_error(error);
                }
            }
        });
    }
    aggregate
}
