//! The contract shared by every cell variant and the error type for
//! rejected mutation.

use core::fmt;

////////////////////////////////////////////////////////////////////////////////////////////////////
// Lazy (trait)
////////////////////////////////////////////////////////////////////////////////////////////////////

/// The common contract of all deferred-computation value cells.
///
/// A cell owns a zero-argument computation (or a precomputed value) and a
/// single storage slot with three logical states: *uninitialized*,
/// *initialized with a value* and *initialized with an absent value* (the
/// computation legitimately produced nothing).
///
/// How the first transition out of *uninitialized* is synchronized is the
/// implementing variant's choice; the contract only promises that any value
/// observed through [`get`][Lazy::get] is fully formed.
///
/// The trait is object safe, so heterogeneous variants can be used behind
/// one interface:
///
/// ```
/// use memo_cell::{Constant, Lazy, PureLazy};
///
/// let cells: Vec<Box<dyn Lazy<i32>>> = vec![
///     Box::new(Constant::new(1)),
///     Box::new(PureLazy::new(|| Some(2))),
/// ];
///
/// assert_eq!(cells[0].get(), Some(1));
/// assert_eq!(cells[1].get(), Some(2));
/// ```
pub trait Lazy<T> {
    /// Returns the cached result, computing it first if necessary.
    ///
    /// [`None`] means the computation produced an absent result;
    /// [`is_initialized`][Lazy::is_initialized] disambiguates "absent" from
    /// "not yet computed".
    ///
    /// # Panics
    ///
    /// If the cell's supplier panics, the panic propagates to the caller that
    /// triggered the computation and the cell remains uninitialized, so a
    /// subsequent call retries the computation.
    fn get(&self) -> Option<T>
    where
        T: Clone;

    /// Overwrites the cached value without running the supplier.
    ///
    /// Requiring exclusive access makes this an explicit single-writer escape
    /// hatch: it can never race with a concurrent [`get`][Lazy::get].
    ///
    /// # Errors
    ///
    /// Fails with [`ImmutableError`] on immutable variants
    /// ([`Constant`][crate::Constant] and [`WeakConstant`][crate::WeakConstant]).
    fn set(&mut self, value: T) -> Result<(), ImmutableError>;

    /// Returns `true` if the slot holds a (possibly absent) result.
    ///
    /// Always `true` for the constant variants, even if a weakly held
    /// referent has since been reclaimed.
    fn is_initialized(&self) -> bool;
}

////////////////////////////////////////////////////////////////////////////////////////////////////
// ImmutableError
////////////////////////////////////////////////////////////////////////////////////////////////////

const IMMUTABLE_MSG: &str = "the cell is immutable and can not be assigned";

/// An error indicating that a cell rejected a [`set`][Lazy::set] call because
/// it is immutable by contract.
#[derive(Copy, Clone, Debug, Hash, Eq, Ord, PartialEq, PartialOrd)]
pub struct ImmutableError(pub(crate) ());

/*********** impl Display *************************************************************************/

impl fmt::Display for ImmutableError {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", IMMUTABLE_MSG)
    }
}

/*********** impl Error ***************************************************************************/

#[cfg(feature = "std")]
impl std::error::Error for ImmutableError {}
