//! Helpers over the standard `source()` chain.
//!
//! These are the familiar `unwrap`/`is`/`as` primitives, spelled for
//! `std::error::Error`.

use std::error::Error as StdError;

use crate::Error;

/// Iterate over `err` and every error reachable through `source()`.
pub fn iter<'a>(
    err: &'a (dyn StdError + 'static),
) -> impl Iterator<Item = &'a (dyn StdError + 'static)> {
    std::iter::successors(Some(err), |err| (*err).source())
}

/// The direct cause of `err`, if any.
pub fn unwrap<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a (dyn StdError + 'static)> {
    err.source()
}

/// The first error of type `T` in the chain.
pub fn find<'a, T>(err: &'a (dyn StdError + 'static)) -> Option<&'a T>
where
    T: StdError + 'static,
{
    iter(err).find_map(|e| e.downcast_ref::<T>())
}

/// Whether the chain holds an [`Error`] of the same kind as `target`.
pub fn is(err: &(dyn StdError + 'static), target: &Error) -> bool {
    target.is(err)
}

/// The innermost error of the chain.
pub fn root_cause<'a>(err: &'a (dyn StdError + 'static)) -> &'a (dyn StdError + 'static) {
    iter(err).last().unwrap_or(err)
}
