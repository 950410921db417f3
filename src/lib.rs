//! This crate provides a set of deferred-computation value cells, which
//! compute their value at most once, on first access, and serve the cached
//! result to all subsequent callers.
//!
//! All cells expose the same contract through the [`Lazy`] trait, but differ
//! in the synchronization strategy used to guard the first computation, so
//! callers can pick the cheapest variant that matches their actual
//! concurrency exposure.
//!
//! # Variants
//!
//! ## Constant / WeakConstant
//!
//! [`Constant`] wraps an eagerly supplied, immutable value behind the cell
//! contract. [`WeakConstant`] does the same for a value behind a reclaimable
//! weak handle, which may vanish out from under the reader once the last
//! strong handle is dropped.
//!
//! ## SafeLazy
//!
//! [`SafeLazy`] uses double-checked locking: a lock-free fast path once
//! initialized and a mutex-serialized slow path that guarantees the supplier
//! runs at most once, even under arbitrary contention. Requires the `std`
//! cargo feature (enabled by default).
//!
//! ## ReleaseAcquireLazy
//!
//! [`ReleaseAcquireLazy`] is lock-free: readers never block and racing
//! initializers may each run the supplier, but a single atomic publish
//! ensures only one result is ever observed. The losing computations are
//! discarded, so the supplier must be free of problematic side effects.
//!
//! ## PureLazy
//!
//! [`PureLazy`] performs no synchronization at all and is therefore `!Sync`;
//! the compiler rejects any attempt to share it across threads. It is the
//! cheapest variant for single-threaded or externally serialized access.
//!
//! # Absent results
//!
//! Suppliers return `Option<T>`: a computation may legitimately produce
//! nothing, and that absent result is cached like any other. After a supplier
//! returns [`None`], [`Lazy::is_initialized`] reports `true` and later reads
//! return [`None`] without invoking the supplier again.

#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
#![deny(missing_docs)]
#![forbid(clippy::undocumented_unsafe_blocks)]

#[cfg(not(feature = "std"))]
extern crate alloc;


mod cell;
mod constant;
mod pure;
mod release_acquire;
mod slot;
mod weak;

#[cfg(feature = "std")]
mod safe;

#[cfg(not(feature = "std"))]
use alloc::sync::Arc;
#[cfg(feature = "std")]
use std::sync::Arc;

pub use crate::cell::{ImmutableError, Lazy};
pub use crate::constant::Constant;
pub use crate::pure::PureLazy;
pub use crate::release_acquire::ReleaseAcquireLazy;
pub use crate::weak::WeakConstant;

#[cfg(feature = "std")]
pub use crate::safe::SafeLazy;

/// The fixed marker rendered by `Display` implementations while a cell is
/// still uninitialized.
pub(crate) const UNINIT_MSG: &str = "Lazy value not initialized";

/// Creates a [`Constant`] cell wrapping the precomputed `value`.
///
/// # Examples
///
/// ```
/// use memo_cell::Lazy;
///
/// let cell = memo_cell::value(42);
/// assert!(cell.is_initialized());
/// assert_eq!(cell.get(), Some(42));
/// ```
#[inline]
pub const fn value<T>(value: T) -> Constant<T> {
    Constant::new(value)
}

/// Creates a [`WeakConstant`] cell holding a reclaimable handle to `value`.
///
/// The cell keeps only a [`Weak`][std::sync::Weak] reference; once the last
/// strong handle is dropped, [`get`][Lazy::get] returns [`None`].
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use memo_cell::Lazy;
///
/// let strong = Arc::new("shared");
/// let cell = memo_cell::weak(&strong);
/// assert!(cell.get().is_some());
///
/// drop(strong);
/// assert_eq!(cell.get(), None);
/// ```
#[inline]
pub fn weak<T>(value: &Arc<T>) -> WeakConstant<T> {
    WeakConstant::new(value)
}

/// Creates a [`SafeLazy`] cell deferring the computation of `supplier`.
///
/// This is the appropriate default for values shared between threads: the
/// supplier is guaranteed to run at most once.
///
/// # Examples
///
/// ```
/// use memo_cell::Lazy;
///
/// let cell = memo_cell::lazy(|| Some("expensive".to_string()));
/// assert!(!cell.is_initialized());
/// assert_eq!(cell.get().as_deref(), Some("expensive"));
/// assert!(cell.is_initialized());
/// ```
#[cfg(feature = "std")]
#[inline]
pub const fn lazy<T, F: Fn() -> Option<T>>(supplier: F) -> SafeLazy<T, F> {
    SafeLazy::new(supplier)
}

/// Creates a [`ReleaseAcquireLazy`] cell deferring the computation of
/// `supplier`.
///
/// Readers never block, but racing callers may each invoke the supplier; all
/// but one result is discarded.
///
/// # Examples
///
/// ```
/// use memo_cell::Lazy;
///
/// let cell = memo_cell::relaxed(|| Some(1 + 1));
/// assert_eq!(cell.get(), Some(2));
/// ```
#[inline]
pub const fn relaxed<T, F: Fn() -> Option<T>>(supplier: F) -> ReleaseAcquireLazy<T, F> {
    ReleaseAcquireLazy::new(supplier)
}

/// Creates a [`PureLazy`] cell deferring the computation of `supplier`.
///
/// The returned cell performs no synchronization and is `!Sync`.
///
/// # Examples
///
/// ```
/// use memo_cell::Lazy;
///
/// let cell = memo_cell::pure(|| Some(vec![1, 2, 3]));
/// assert_eq!(cell.get(), Some(vec![1, 2, 3]));
/// ```
#[inline]
pub const fn pure<T, F: Fn() -> Option<T>>(supplier: F) -> PureLazy<T, F> {
    PureLazy::new(supplier)
}
