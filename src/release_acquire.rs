//! The lock-free cell variant with racy computation and a single atomic
//! publish.

use core::fmt;
use core::ptr;
use core::sync::atomic::{AtomicPtr, Ordering};

#[cfg(not(feature = "std"))]
use alloc::boxed::Box;

use crate::cell::{ImmutableError, Lazy};
use crate::slot::Slot;
use crate::UNINIT_MSG;

////////////////////////////////////////////////////////////////////////////////////////////////////
// ReleaseAcquireLazy
////////////////////////////////////////////////////////////////////////////////////////////////////

/// A lock-free cell computing its value on first access.
///
/// Readers never block: [`get`][Lazy::get] is an acquire load of the slot
/// pointer once initialized. Racing initializers may each run the supplier
/// independently, but only one result is ever published, through a single
/// release-ordered compare-and-exchange; the losers discard their local
/// result and return the published one (the *witness*).
///
/// Because extra computations are silently discarded, the supplier must be
/// free of problematic side effects, or its side effects must be idempotent.
/// This trade-off is deliberate: it buys never-blocking reads at the price
/// of the exactly-once guarantee.
///
/// There is no `reset`.
///
/// # Examples
///
/// ```
/// use memo_cell::{Lazy, ReleaseAcquireLazy};
///
/// let cell = ReleaseAcquireLazy::new(|| Some(42));
/// assert!(!cell.is_initialized());
/// assert_eq!(cell.get(), Some(42));
/// ```
pub struct ReleaseAcquireLazy<T, F = fn() -> Option<T>> {
    supplier: F,
    /// Null while uninitialized, otherwise the uniquely published slot.
    slot: AtomicPtr<Slot<T>>,
}

/********** impl Send + Sync **********************************************************************/

// SAFETY: the published allocation is owned by the cell, so sending the cell
// sends at most one `T` and one `F`.
unsafe impl<T: Send, F: Send> Send for ReleaseAcquireLazy<T, F> {}
// SAFETY: shared access may run the supplier on any thread and drop a losing
// result there (`F: Sync`, `T: Send`) and clone the published value through
// a shared reference (`T: Sync`); the published allocation is never freed or
// replaced while shared borrows exist.
unsafe impl<T: Send + Sync, F: Sync> Sync for ReleaseAcquireLazy<T, F> {}

/********** impl inherent *************************************************************************/

impl<T, F: Fn() -> Option<T>> ReleaseAcquireLazy<T, F> {
    /// Creates a new uninitialized [`ReleaseAcquireLazy`] with the given
    /// `supplier`.
    #[inline]
    pub const fn new(supplier: F) -> Self {
        Self { supplier, slot: AtomicPtr::new(ptr::null_mut()) }
    }
}

/********** impl Lazy *****************************************************************************/

impl<T, F: Fn() -> Option<T>> Lazy<T> for ReleaseAcquireLazy<T, F> {
    #[inline]
    fn get(&self) -> Option<T>
    where
        T: Clone,
    {
        // (ra:1) this acquire load syncs-with the release CAS (ra:2)
        let current = self.slot.load(Ordering::Acquire);
        if !current.is_null() {
            // SAFETY: a non-null slot has been published through (ra:2) and
            // is neither freed nor replaced while `&self` borrows exist.
            return unsafe { (*current).get() };
        }

        // run the supplier without any lock; concurrent callers may each
        // reach this point and compute independently
        let computed = Box::into_raw(Box::new(Slot::wrap((self.supplier)())));

        // (ra:2) release on success publishes the fully written allocation to
        // the acquire loads (ra:1), (ra:3) and (ra:4); acquire on failure
        // makes the witness published by another thread's CAS visible
        match self.slot.compare_exchange(
            ptr::null_mut(),
            computed,
            Ordering::Release,
            Ordering::Acquire,
        ) {
            // SAFETY: this thread just published `computed`; see (ra:1).
            Ok(_) => unsafe { (*computed).get() },
            Err(witness) => {
                // another thread published first; discard the local result
                // SAFETY: `computed` was never shared, this is its only owner.
                drop(unsafe { Box::from_raw(computed) });
                // SAFETY: the witness is the published slot; see (ra:1).
                unsafe { (*witness).get() }
            }
        }
    }

    #[inline]
    fn set(&mut self, value: T) -> Result<(), ImmutableError> {
        // plain (unordered) overwrite; exclusive access makes this the
        // single-writer scenario the operation is intended for
        let new = Box::into_raw(Box::new(Slot::Present(value)));
        let old = core::mem::replace(self.slot.get_mut(), new);
        if !old.is_null() {
            // SAFETY: `&mut self` guarantees no shared borrows into the old
            // allocation remain, so it can be reclaimed.
            drop(unsafe { Box::from_raw(old) });
        }

        Ok(())
    }

    #[inline]
    fn is_initialized(&self) -> bool {
        // (ra:3) this acquire load syncs-with the release CAS (ra:2)
        !self.slot.load(Ordering::Acquire).is_null()
    }
}

/********** impl Debug ****************************************************************************/

impl<T: fmt::Debug, F> fmt::Debug for ReleaseAcquireLazy<T, F> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let current = self.slot.load(Ordering::Acquire);
        let value = if current.is_null() {
            None
        } else {
            // SAFETY: a non-null slot is published and stable; see (ra:1).
            unsafe { (*current).value() }
        };

        f.debug_struct("ReleaseAcquireLazy").field("value", &value).finish()
    }
}

/********** impl Display **************************************************************************/

impl<T: fmt::Display, F> fmt::Display for ReleaseAcquireLazy<T, F> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // (ra:4) this acquire load syncs-with the release CAS (ra:2)
        let current = self.slot.load(Ordering::Acquire);
        if current.is_null() {
            write!(f, "{}", UNINIT_MSG)
        } else {
            // SAFETY: a non-null slot is published and stable; see (ra:1).
            write!(f, "{}", unsafe { &*current })
        }
    }
}

/********** impl Drop *****************************************************************************/

impl<T, F> Drop for ReleaseAcquireLazy<T, F> {
    #[inline]
    fn drop(&mut self) {
        let ptr = *self.slot.get_mut();
        if !ptr.is_null() {
            // SAFETY: the cell owns the published allocation and no borrows
            // into it can outlive the cell.
            drop(unsafe { Box::from_raw(ptr) });
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Barrier};
    use std::thread;

    use crate::Lazy;

    use super::ReleaseAcquireLazy;

    const THREADS: usize = 8;

    generate_lazy_tests!(ReleaseAcquireLazy);

    #[test]
    fn single_publish_under_race() {
        let invocations = Arc::new(AtomicUsize::new(0));
        let barrier = Arc::new(Barrier::new(THREADS));

        let count = Arc::clone(&invocations);
        let cell = Arc::new(ReleaseAcquireLazy::new(move || {
            count.fetch_add(1, Ordering::Relaxed);
            // every invocation produces a distinct allocation
            Some(Arc::new(42))
        }));

        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let barrier = Arc::clone(&barrier);
                let cell = Arc::clone(&cell);
                thread::spawn(move || {
                    barrier.wait();
                    cell.get().unwrap()
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        // the supplier may have run more than once, but never zero times
        assert!(invocations.load(Ordering::Relaxed) >= 1);

        // after the race settles, every caller observes the one published
        // value, identity-equal across all of them
        let witness = cell.get().unwrap();
        assert_eq!(*witness, 42);
        for result in &results {
            assert!(Arc::ptr_eq(&witness, result));
        }
    }

    #[test]
    fn losing_results_are_dropped() {
        struct CountDrops(Arc<AtomicUsize>);

        impl Drop for CountDrops {
            fn drop(&mut self) {
                self.0.fetch_add(1, Ordering::Relaxed);
            }
        }

        let drops = Arc::new(AtomicUsize::new(0));
        let invocations = Arc::new(AtomicUsize::new(0));
        let barrier = Arc::new(Barrier::new(THREADS));

        let drop_counter = Arc::clone(&drops);
        let invocation_counter = Arc::clone(&invocations);
        let cell = Arc::new(ReleaseAcquireLazy::new(move || {
            invocation_counter.fetch_add(1, Ordering::Relaxed);
            Some(Arc::new(CountDrops(Arc::clone(&drop_counter))))
        }));

        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let barrier = Arc::clone(&barrier);
                let cell = Arc::clone(&cell);
                thread::spawn(move || {
                    barrier.wait();
                    cell.get();
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        // every computed result is reclaimed: the losers during the race,
        // the published winner when the cell itself is dropped
        drop(cell);
        assert_eq!(drops.load(Ordering::Relaxed), invocations.load(Ordering::Relaxed));
    }

    #[test]
    fn set_overwrites_published_value() {
        let mut cell = ReleaseAcquireLazy::new(|| Some(1));
        assert_eq!(cell.get(), Some(1));

        cell.set(7).unwrap();
        assert_eq!(cell.get(), Some(7));
        assert!(cell.is_initialized());
    }

    #[test]
    fn set_before_first_get_skips_supplier() {
        let invocations = AtomicUsize::new(0);
        let mut cell = ReleaseAcquireLazy::new(|| {
            invocations.fetch_add(1, Ordering::Relaxed);
            Some(1)
        });

        cell.set(7).unwrap();
        assert_eq!(cell.get(), Some(7));
        assert_eq!(invocations.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn is_sync() {
        fn assert_sync<T: Sync>() {}
        fn assert_send<T: Send>() {}

        assert_sync::<ReleaseAcquireLazy<i32>>();
        assert_send::<ReleaseAcquireLazy<i32>>();
    }
}
