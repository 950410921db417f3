//! The three-state storage slot shared by all cell variants.

use core::fmt;

use crate::UNINIT_MSG;

use self::Slot::{Absent, Present, Uninit};

////////////////////////////////////////////////////////////////////////////////////////////////////
// Slot
////////////////////////////////////////////////////////////////////////////////////////////////////

/// The storage slot of a cell.
///
/// A single slot distinguishes "nothing computed yet" ([`Uninit`]) from
/// "computed, and the result is absent" ([`Absent`]), so every variant can
/// cache a legitimately empty result without re-running its supplier.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum Slot<T> {
    /// The supplier has not (successfully) run yet.
    Uninit,
    /// The computed (or explicitly assigned) value.
    Present(T),
    /// The computation ran and produced nothing.
    Absent,
}

/********** impl inherent *************************************************************************/

impl<T> Slot<T> {
    /// Wraps a computation result, mapping [`None`] to [`Absent`].
    #[inline]
    pub(crate) fn wrap(value: Option<T>) -> Self {
        match value {
            Some(value) => Present(value),
            None => Absent,
        }
    }

    /// Returns a reference to the contained value, if any.
    #[inline]
    pub(crate) fn value(&self) -> Option<&T> {
        match self {
            Present(value) => Some(value),
            _ => None,
        }
    }

    /// Returns a clone of the contained value, if any.
    #[inline]
    pub(crate) fn get(&self) -> Option<T>
    where
        T: Clone,
    {
        self.value().cloned()
    }

    /// Returns `true` unless the slot is still [`Uninit`].
    #[inline]
    pub(crate) fn is_initialized(&self) -> bool {
        !matches!(self, Uninit)
    }
}

/*********** impl Display *************************************************************************/

impl<T: fmt::Display> fmt::Display for Slot<T> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Uninit => write!(f, "{}", UNINIT_MSG),
            Present(value) => write!(f, "{}", value),
            Absent => write!(f, "none"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Slot;

    #[test]
    fn wrap_maps_none_to_absent() {
        assert_eq!(Slot::wrap(Some(1)), Slot::Present(1));
        assert_eq!(Slot::wrap(None::<i32>), Slot::Absent);
    }

    #[test]
    fn absent_is_initialized() {
        let slot = Slot::wrap(None::<i32>);
        assert!(slot.is_initialized());
        assert_eq!(slot.get(), None);

        assert!(!Slot::<i32>::Uninit.is_initialized());
    }

    #[test]
    fn display() {
        assert_eq!(Slot::<i32>::Uninit.to_string(), "Lazy value not initialized");
        assert_eq!(Slot::Present(42).to_string(), "42");
        assert_eq!(Slot::<i32>::Absent.to_string(), "none");
    }
}
