//! The eagerly initialized, immutable cell variant.

use core::fmt;

use crate::cell::{ImmutableError, Lazy};
use crate::slot::Slot;

////////////////////////////////////////////////////////////////////////////////////////////////////
// Constant
////////////////////////////////////////////////////////////////////////////////////////////////////

/// A cell wrapping a precomputed, immutable value.
///
/// The value is supplied at construction, so [`get`][Lazy::get] never
/// computes anything and [`is_initialized`][Lazy::is_initialized] is always
/// `true`. [`set`][Lazy::set] fails unconditionally.
///
/// # Examples
///
/// ```
/// use memo_cell::{Constant, Lazy};
///
/// let mut cell = Constant::new(42);
/// assert!(cell.is_initialized());
/// assert_eq!(cell.get(), Some(42));
/// assert!(cell.set(7).is_err());
/// ```
pub struct Constant<T> {
    slot: Slot<T>,
}

/********** impl inherent *************************************************************************/

impl<T> Constant<T> {
    /// Creates a new [`Constant`] wrapping `value`.
    #[inline]
    pub const fn new(value: T) -> Self {
        Self { slot: Slot::Present(value) }
    }

    /// Creates a new [`Constant`] whose result is absent.
    ///
    /// The cell counts as initialized, but [`get`][Lazy::get] returns
    /// [`None`].
    #[inline]
    pub const fn absent() -> Self {
        Self { slot: Slot::Absent }
    }
}

/********** impl Lazy *****************************************************************************/

impl<T> Lazy<T> for Constant<T> {
    #[inline]
    fn get(&self) -> Option<T>
    where
        T: Clone,
    {
        self.slot.get()
    }

    #[inline]
    fn set(&mut self, _: T) -> Result<(), ImmutableError> {
        Err(ImmutableError(()))
    }

    #[inline]
    fn is_initialized(&self) -> bool {
        true
    }
}

/********** impl Debug ****************************************************************************/

impl<T: fmt::Debug> fmt::Debug for Constant<T> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Constant").field("value", &self.slot.value()).finish()
    }
}

/********** impl Display **************************************************************************/

impl<T: fmt::Display> fmt::Display for Constant<T> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.slot)
    }
}

#[cfg(test)]
mod tests {
    use crate::Lazy;

    use super::Constant;

    #[test]
    fn always_initialized() {
        let cell = Constant::new("eager");
        assert!(cell.is_initialized());
        assert_eq!(cell.get(), Some("eager"));
        // repeated reads return the same value
        assert_eq!(cell.get(), Some("eager"));
    }

    #[test]
    fn set_is_rejected() {
        let mut cell = Constant::new(1);
        assert!(cell.set(2).is_err());
        assert_eq!(cell.get(), Some(1));
    }

    #[test]
    fn absent() {
        let cell = Constant::<i32>::absent();
        assert!(cell.is_initialized());
        assert_eq!(cell.get(), None);
        assert_eq!(cell.to_string(), "none");
    }

    #[test]
    fn display() {
        assert_eq!(Constant::new(42).to_string(), "42");
    }
}
