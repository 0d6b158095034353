#![forbid(unsafe_code)]

//! The per-item observation handle (`@each`).
//!
//! A collection owns at most one handle, built on first access by an
//! [`EachFactory`] and returned as the same `Rc` ever after. The protocol
//! forwards every structural edit to the handle's hooks so it can move its
//! per-member observation from removed elements to added ones.
//!
//! The handle is for deriving values per member. Replacement of the
//! collection as a whole is observed through [`Property::Content`] instead.
//!
//! [`Property::Content`]: crate::Property::Content

use std::rc::Rc;

use crate::change::ArrayChange;

/// Hooks the change protocol drives on the per-item handle.
pub trait EachProxy<A: ?Sized> {
    /// Called before the edit, while removed elements are still present.
    fn array_will_change(&self, array: &A, change: ArrayChange);

    /// Called after the edit, once added elements are in place.
    fn array_did_change(&self, array: &A, change: ArrayChange);
}

/// Builds the handle for a collection on first `each()` access.
pub type EachFactory<A> = Box<dyn Fn(&A) -> Rc<dyn EachProxy<A>>>;

/// Handle used when a collection has no factory installed.
#[derive(Debug, Default, Clone, Copy)]
pub struct InertEachProxy;

impl<A: ?Sized> EachProxy<A> for InertEachProxy {
    fn array_will_change(&self, _array: &A, _change: ArrayChange) {}

    fn array_did_change(&self, _array: &A, _change: ArrayChange) {}
}
