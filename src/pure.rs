//! The unsynchronized cell variant for single-threaded access.

use core::cell::UnsafeCell;
use core::fmt;

use crate::cell::{ImmutableError, Lazy};
use crate::slot::Slot;

////////////////////////////////////////////////////////////////////////////////////////////////////
// PureLazy
////////////////////////////////////////////////////////////////////////////////////////////////////

/// A cell computing its value on first access, with no synchronization at
/// all.
///
/// The interior [`UnsafeCell`] makes this type `!Sync`, so the single-thread
/// contract the unsynchronized logic depends on is enforced at compile time
/// rather than left as a documented hazard.
///
/// If the supplier itself reads the same cell again, both invocations run to
/// completion and the outer one's result wins; the cell never observes a
/// partially written slot.
///
/// # Examples
///
/// ```
/// use memo_cell::{Lazy, PureLazy};
///
/// let cell = PureLazy::new(|| Some(42));
/// assert!(!cell.is_initialized());
/// assert_eq!(cell.get(), Some(42));
/// assert!(cell.is_initialized());
/// ```
pub struct PureLazy<T, F = fn() -> Option<T>> {
    supplier: F,
    slot: UnsafeCell<Slot<T>>,
}

/********** impl inherent *************************************************************************/

impl<T, F: Fn() -> Option<T>> PureLazy<T, F> {
    /// Creates a new uninitialized [`PureLazy`] with the given `supplier`.
    #[inline]
    pub const fn new(supplier: F) -> Self {
        Self { supplier, slot: UnsafeCell::new(Slot::Uninit) }
    }
}

/********** impl Lazy *****************************************************************************/

impl<T, F: Fn() -> Option<T>> Lazy<T> for PureLazy<T, F> {
    #[inline]
    fn get(&self) -> Option<T>
    where
        T: Clone,
    {
        // SAFETY: the type is `!Sync`, so this is the only thread accessing
        // the slot; the borrow ends before the supplier runs.
        let initialized = unsafe { (*self.slot.get()).is_initialized() };
        if !initialized {
            // a supplier panic propagates here and leaves the slot untouched
            let value = Slot::wrap((self.supplier)());
            // SAFETY: no borrow of the slot is held across the supplier call,
            // so a reentrant `get` inside the supplier has fully completed by
            // the time this write happens.
            unsafe { *self.slot.get() = value };
        }

        // SAFETY: single-threaded access as above; the slot is initialized.
        unsafe { (*self.slot.get()).get() }
    }

    #[inline]
    fn set(&mut self, value: T) -> Result<(), ImmutableError> {
        *self.slot.get_mut() = Slot::Present(value);
        Ok(())
    }

    #[inline]
    fn is_initialized(&self) -> bool {
        // SAFETY: the type is `!Sync`, no concurrent writer can exist.
        unsafe { (*self.slot.get()).is_initialized() }
    }
}

/********** impl Debug ****************************************************************************/

impl<T: fmt::Debug, F> fmt::Debug for PureLazy<T, F> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // SAFETY: the type is `!Sync`, no concurrent writer can exist.
        let slot = unsafe { &*self.slot.get() };
        f.debug_struct("PureLazy").field("value", &slot.value()).finish()
    }
}

/********** impl Display **************************************************************************/

impl<T: fmt::Display, F> fmt::Display for PureLazy<T, F> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // SAFETY: the type is `!Sync`, no concurrent writer can exist.
        let slot = unsafe { &*self.slot.get() };
        write!(f, "{}", slot)
    }
}
