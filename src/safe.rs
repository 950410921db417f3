//! The blocking, exactly-once cell variant using double-checked locking.

use core::cell::UnsafeCell;
use core::fmt;
use core::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::cell::{ImmutableError, Lazy};
use crate::slot::Slot;
use crate::UNINIT_MSG;

////////////////////////////////////////////////////////////////////////////////////////////////////
// SafeLazy
////////////////////////////////////////////////////////////////////////////////////////////////////

/// A thread-safe cell computing its value at most once, on first access.
///
/// Reads use double-checked initialization: once the cell is initialized,
/// [`get`][Lazy::get] is a single atomic flag check and takes no lock.
/// Before that, callers serialize on an internal mutex and exactly one of
/// them runs the supplier; the others block until the result is published
/// and then observe it.
///
/// # Supplier panics
///
/// A panicking supplier leaves the cell uninitialized and the panic
/// propagates to the caller that triggered the computation. The cell is
/// *not* poisoned: the next [`get`][Lazy::get] retries the computation.
///
/// # Examples
///
/// ```
/// use memo_cell::{Lazy, SafeLazy};
///
/// let cell = SafeLazy::new(|| Some((0..100).sum::<u32>()));
/// assert!(!cell.is_initialized());
/// assert_eq!(cell.get(), Some(4950));
/// assert!(cell.is_initialized());
/// ```
pub struct SafeLazy<T, F = fn() -> Option<T>> {
    supplier: F,
    lock: Mutex<()>,
    ready: AtomicBool,
    slot: UnsafeCell<Slot<T>>,
}

/********** impl Send + Sync **********************************************************************/

// SAFETY: the slot only ever holds values produced by the supplier or moved
// in through `&mut self`, so sending the cell sends at most one `T` and one
// `F`.
unsafe impl<T: Send, F: Send> Send for SafeLazy<T, F> {}
// SAFETY: shared access may run the supplier on any thread (`F: Sync`,
// `T: Send`) and clone the published value through a shared reference
// (`T: Sync`); the slot itself is only written while the mutex is held and
// before the ready flag is published.
unsafe impl<T: Send + Sync, F: Sync> Sync for SafeLazy<T, F> {}

/********** impl inherent *************************************************************************/

impl<T, F: Fn() -> Option<T>> SafeLazy<T, F> {
    /// Creates a new uninitialized [`SafeLazy`] with the given `supplier`.
    #[inline]
    pub const fn new(supplier: F) -> Self {
        Self {
            supplier,
            lock: Mutex::new(()),
            ready: AtomicBool::new(false),
            slot: UnsafeCell::new(Slot::Uninit),
        }
    }

    /// Clears the slot back to uninitialized, so the next
    /// [`get`][Lazy::get] runs the supplier again.
    ///
    /// Requires exclusive access, so it can not race with an in-flight
    /// computation.
    #[inline]
    pub fn reset(&mut self) {
        *self.slot.get_mut() = Slot::Uninit;
        *self.ready.get_mut() = false;
    }
}

/********** impl Lazy *****************************************************************************/

impl<T, F: Fn() -> Option<T>> Lazy<T> for SafeLazy<T, F> {
    #[inline]
    fn get(&self) -> Option<T>
    where
        T: Clone,
    {
        // (safe:1) this acquire load syncs-with the release store (safe:2)
        if !self.ready.load(Ordering::Acquire) {
            let _guard = self.lock.lock();
            // re-check: another thread may have initialized the slot between
            // the unsynchronized check and this thread taking the lock
            if !self.ready.load(Ordering::Acquire) {
                // a supplier panic propagates here, before the slot or the
                // ready flag are touched, so the next call retries
                let value = (self.supplier)();
                // SAFETY: the mutex is held and `ready` is still unset, so no
                // other thread reads or writes the slot concurrently.
                unsafe { *self.slot.get() = Slot::wrap(value) };
                // (safe:2) this release store syncs-with the acquire loads
                // (safe:1), (safe:3) and (safe:4)
                self.ready.store(true, Ordering::Release);
            }
        }

        // SAFETY: the ready flag has been observed (or just been set) with
        // acquire ordering, so the slot write that preceded it is visible and
        // the slot is never written again except through `&mut self`.
        unsafe { (*self.slot.get()).get() }
    }

    #[inline]
    fn set(&mut self, value: T) -> Result<(), ImmutableError> {
        // bypasses both the lock and the supplier; exclusive access stands in
        // for the data-race hazard the original leaves to the caller
        *self.slot.get_mut() = Slot::Present(value);
        *self.ready.get_mut() = true;
        Ok(())
    }

    #[inline]
    fn is_initialized(&self) -> bool {
        // (safe:3) this acquire load syncs-with the release store (safe:2)
        self.ready.load(Ordering::Acquire)
    }
}

/********** impl Debug ****************************************************************************/

impl<T: fmt::Debug, F> fmt::Debug for SafeLazy<T, F> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let value = if self.ready.load(Ordering::Acquire) {
            // SAFETY: the acquire load observed the published ready flag, so
            // the initialized slot is visible and no longer written to.
            unsafe { (*self.slot.get()).value() }
        } else {
            None
        };

        f.debug_struct("SafeLazy").field("value", &value).finish()
    }
}

/********** impl Display **************************************************************************/

impl<T: fmt::Display, F> fmt::Display for SafeLazy<T, F> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // (safe:4) this acquire load syncs-with the release store (safe:2)
        if self.ready.load(Ordering::Acquire) {
            // SAFETY: same as in the Debug impl above.
            let slot = unsafe { &*self.slot.get() };
            write!(f, "{}", slot)
        } else {
            write!(f, "{}", UNINIT_MSG)
        }
    }
}
