#![forbid(unsafe_code)]

//! The enumerable capability: content-change hooks and their observers.
//!
//! [`Enumerable`] is the unordered layer the array protocol builds on. Its
//! hooks announce that content is about to change / has changed, fire the
//! `[]` and `length` property notifications, and emit
//! `@enumerable:before` / `@enumerable:change` to enumerable observers.
//!
//! # Invariants
//!
//! 1. `[]` is announced on every change; `length` only when the change may
//!    alter the element count (an unknown extent on either side, or differing
//!    removed/added counts).
//! 2. Before-notifications go `[]` then `length`; after-notifications go
//!    `length` then `[]`, so the two nest.
//! 3. `hasEnumerableObservers` notifications follow the same pre-state
//!    heuristic as `hasArrayObservers` (see [`ObservableArray`]).
//!
//! [`ObservableArray`]: crate::ObservableArray

use std::borrow::Cow;
use std::rc::Rc;

use crate::access::ArrayAccess;
use crate::change::{ContentDelta, has_delta};
use crate::logging::{debug, trace, warn};
use crate::properties::{Property, PropertyChange, Subscription};
use crate::state::ArrayState;

/// Event fired before enumerable content changes.
pub const ENUMERABLE_BEFORE: &str = "@enumerable:before";
/// Event fired after enumerable content changed.
pub const ENUMERABLE_CHANGE: &str = "@enumerable:change";

/// Default method name for the before event.
pub const ENUMERABLE_WILL_CHANGE: &str = "enumerableWillChange";
/// Default method name for the after event.
pub const ENUMERABLE_DID_CHANGE: &str = "enumerableDidChange";

/// A target receiving content-change callbacks for an enumerable `A` of `T`.
///
/// `removing` and `adding` carry the affected elements when they were
/// materialized, otherwise their count or [`ContentDelta::Unknown`].
pub trait EnumerableObserver<A: ?Sized, T> {
    fn enumerable_will_change(
        &self,
        _array: &A,
        _removing: &ContentDelta<T>,
        _adding: &ContentDelta<T>,
    ) {
    }

    fn enumerable_did_change(
        &self,
        _array: &A,
        _removing: &ContentDelta<T>,
        _adding: &ContentDelta<T>,
    ) {
    }

    /// Run the handler registered as `method`.
    fn invoke(&self, method: &str, array: &A, removing: &ContentDelta<T>, adding: &ContentDelta<T>) {
        match method {
            ENUMERABLE_WILL_CHANGE => self.enumerable_will_change(array, removing, adding),
            ENUMERABLE_DID_CHANGE => self.enumerable_did_change(array, removing, adding),
            _ => {
                warn!(method, "enumerable observer has no handler for method");
            }
        }
    }
}

/// Method names an enumerable observer is registered under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumerableObserverOptions {
    pub will_change: Cow<'static, str>,
    pub did_change: Cow<'static, str>,
}

impl Default for EnumerableObserverOptions {
    fn default() -> Self {
        Self {
            will_change: Cow::Borrowed(ENUMERABLE_WILL_CHANGE),
            did_change: Cow::Borrowed(ENUMERABLE_DID_CHANGE),
        }
    }
}

impl EnumerableObserverOptions {
    #[must_use]
    pub fn with_will_change(mut self, method: impl Into<Cow<'static, str>>) -> Self {
        self.will_change = method.into();
        self
    }

    #[must_use]
    pub fn with_did_change(mut self, method: impl Into<Cow<'static, str>>) -> Self {
        self.did_change = method.into();
        self
    }
}

/// Enumerable collections: protocol state plus the content-change hooks.
///
/// Implementors supply [`array_state`](Enumerable::array_state); every other
/// method has a default. Overriding a hook replaces the built-in `[]` /
/// `length` / observer notifications for that phase.
pub trait Enumerable: ArrayAccess {
    /// The protocol state embedded in this collection.
    fn array_state(&self) -> &ArrayState<Self::Item, Self>;

    /// Element at position `idx` of an enumeration; delegates to `object_at`.
    fn next_object(&self, idx: usize) -> Option<Self::Item> {
        self.object_at(isize::try_from(idx).ok()?)
    }

    /// Whether any enumerable observer is registered.
    fn has_enumerable_observers(&self) -> bool {
        let observers = self.array_state().enumerable_observers();
        observers.has_listeners(ENUMERABLE_CHANGE) || observers.has_listeners(ENUMERABLE_BEFORE)
    }

    fn add_enumerable_observer<O>(&self, target: &Rc<O>)
    where
        O: EnumerableObserver<Self, Self::Item> + 'static,
    {
        self.add_enumerable_observer_with(target, EnumerableObserverOptions::default());
    }

    fn add_enumerable_observer_with<O>(&self, target: &Rc<O>, options: EnumerableObserverOptions)
    where
        O: EnumerableObserver<Self, Self::Item> + 'static,
    {
        let had_observers = self.has_enumerable_observers();
        if !had_observers {
            self.property_will_change(Property::HasEnumerableObservers);
        }
        let target: Rc<dyn EnumerableObserver<Self, Self::Item>> = Rc::clone(target) as _;
        let observers = self.array_state().enumerable_observers();
        observers.add_listener(ENUMERABLE_BEFORE, Rc::clone(&target), options.will_change);
        observers.add_listener(ENUMERABLE_CHANGE, target, options.did_change);
        debug!(had_observers, "added enumerable observer");
        if !had_observers {
            self.property_did_change(Property::HasEnumerableObservers);
        }
    }

    fn remove_enumerable_observer<O>(&self, target: &Rc<O>)
    where
        O: EnumerableObserver<Self, Self::Item> + 'static,
    {
        self.remove_enumerable_observer_with(target, EnumerableObserverOptions::default());
    }

    fn remove_enumerable_observer_with<O>(&self, target: &Rc<O>, options: EnumerableObserverOptions)
    where
        O: EnumerableObserver<Self, Self::Item> + 'static,
    {
        let had_observers = self.has_enumerable_observers();
        if had_observers {
            self.property_will_change(Property::HasEnumerableObservers);
        }
        let target: Rc<dyn EnumerableObserver<Self, Self::Item>> = Rc::clone(target) as _;
        let observers = self.array_state().enumerable_observers();
        observers.remove_listener(ENUMERABLE_BEFORE, &target, &options.will_change);
        observers.remove_listener(ENUMERABLE_CHANGE, &target, &options.did_change);
        debug!(had_observers, "removed enumerable observer");
        if had_observers {
            self.property_did_change(Property::HasEnumerableObservers);
        }
    }

    /// Announce that content is about to change.
    fn enumerable_content_will_change(
        &self,
        removing: ContentDelta<Self::Item>,
        adding: ContentDelta<Self::Item>,
    ) {
        let delta = has_delta(&removing, &adding);
        trace!(has_delta = delta, "enumerable content will change");
        self.property_will_change(Property::Content);
        if delta {
            self.property_will_change(Property::Length);
        }
        self.array_state()
            .enumerable_observers()
            .send_event(ENUMERABLE_BEFORE, |target, method| {
                target.invoke(method, self, &removing, &adding);
            });
    }

    /// Announce that content has changed.
    fn enumerable_content_did_change(
        &self,
        removing: ContentDelta<Self::Item>,
        adding: ContentDelta<Self::Item>,
    ) {
        let delta = has_delta(&removing, &adding);
        trace!(has_delta = delta, "enumerable content did change");
        self.array_state()
            .enumerable_observers()
            .send_event(ENUMERABLE_CHANGE, |target, method| {
                target.invoke(method, self, &removing, &adding);
            });
        if delta {
            self.property_did_change(Property::Length);
        }
        self.property_did_change(Property::Content);
    }

    /// Fire the before-notification for `key`.
    fn property_will_change(&self, key: Property) {
        self.array_state().property_will_change(key);
    }

    /// Fire the after-notification for `key`, clearing its memoized value.
    fn property_did_change(&self, key: Property) {
        self.array_state().property_did_change(key);
    }

    /// Subscribe to before/after notifications of `key`.
    fn observe_property(&self, key: Property, callback: impl Fn(&PropertyChange) + 'static) -> Subscription {
        self.array_state().observe(key, callback)
    }
}
