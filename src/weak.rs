//! The weakly held, immutable cell variant.

use core::fmt;

#[cfg(not(feature = "std"))]
use alloc::sync::{Arc, Weak};
#[cfg(feature = "std")]
use std::sync::{Arc, Weak};

use crate::cell::{ImmutableError, Lazy};

////////////////////////////////////////////////////////////////////////////////////////////////////
// WeakConstant
////////////////////////////////////////////////////////////////////////////////////////////////////

/// A cell wrapping a precomputed value behind a reclaimable handle.
///
/// The cell holds only a [`Weak`] reference to a value owned elsewhere
/// through one or more [`Arc`] handles. Dropping the last strong handle
/// reclaims the value, after which [`get`][Lazy::get] returns [`None`] —
/// without distinguishing "reclaimed" from any other absence.
///
/// The cell itself always counts as initialized; only the referent may
/// vanish. [`set`][Lazy::set] fails unconditionally.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use memo_cell::{Lazy, WeakConstant};
///
/// let strong = Arc::new(42);
/// let cell = WeakConstant::new(&strong);
/// assert_eq!(cell.get().as_deref(), Some(&42));
///
/// drop(strong);
/// assert_eq!(cell.get(), None);
/// assert!(cell.is_initialized());
/// ```
pub struct WeakConstant<T> {
    reference: Weak<T>,
}

/********** impl inherent *************************************************************************/

impl<T> WeakConstant<T> {
    /// Creates a new [`WeakConstant`] downgrading the given strong handle.
    #[inline]
    pub fn new(value: &Arc<T>) -> Self {
        Self { reference: Arc::downgrade(value) }
    }
}

/********** impl Lazy *****************************************************************************/

impl<T> Lazy<Arc<T>> for WeakConstant<T> {
    #[inline]
    fn get(&self) -> Option<Arc<T>> {
        self.reference.upgrade()
    }

    #[inline]
    fn set(&mut self, _: Arc<T>) -> Result<(), ImmutableError> {
        Err(ImmutableError(()))
    }

    #[inline]
    fn is_initialized(&self) -> bool {
        true
    }
}

/********** impl Debug ****************************************************************************/

impl<T: fmt::Debug> fmt::Debug for WeakConstant<T> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("WeakConstant").field("value", &self.reference.upgrade()).finish()
    }
}

/********** impl Display **************************************************************************/

impl<T: fmt::Display> fmt::Display for WeakConstant<T> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.reference.upgrade() {
            Some(value) => write!(f, "{}", value),
            None => write!(f, "none"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::Lazy;

    use super::WeakConstant;

    #[test]
    fn reads_while_strong_handle_lives() {
        let strong = Arc::new("referent");
        let cell = WeakConstant::new(&strong);

        assert!(cell.is_initialized());
        let read = cell.get().unwrap();
        assert!(Arc::ptr_eq(&strong, &read));
    }

    // The original design relies on a garbage collector reclaiming the
    // referent at some unspecified point. Here reclamation is deterministic:
    // dropping the last strong handle is the explicit invalidation step.
    #[test]
    fn reclaimed_after_last_strong_handle_drops() {
        let strong = Arc::new(42);
        let cell = WeakConstant::new(&strong);
        let extra = Arc::clone(&strong);

        drop(strong);
        assert_eq!(cell.get().as_deref(), Some(&42));

        drop(extra);
        assert_eq!(cell.get(), None);
        // the cell itself still counts as initialized
        assert!(cell.is_initialized());
    }

    #[test]
    fn set_is_rejected() {
        let strong = Arc::new(1);
        let mut cell = WeakConstant::new(&strong);
        assert!(cell.set(Arc::new(2)).is_err());
        assert_eq!(cell.get().as_deref(), Some(&1));
    }

    #[test]
    fn display() {
        let strong = Arc::new(42);
        let cell = WeakConstant::new(&strong);
        assert_eq!(cell.to_string(), "42");

        drop(strong);
        assert_eq!(cell.to_string(), "none");
    }
}
