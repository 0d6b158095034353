#![forbid(unsafe_code)]

//! The two-phase change-notification protocol.
//!
//! Any primitive that mutates an [`ObservableArray`] must call
//! [`will_change`](ObservableArray::will_change) immediately before touching
//! its backing storage and [`did_change`](ObservableArray::did_change)
//! immediately after, both with the same [`ArrayChange`]. The protocol then
//! keeps every observer and derived value consistent without the collection
//! ever re-scanning itself.
//!
//! # Sequence
//!
//! `will_change`:
//! 1. `@each` pre-hook (only if the handle exists),
//! 2. `@array:before` to array observers,
//! 3. removed elements materialized (only with enumerable observers and a
//!    known removal extent),
//! 4. [`Enumerable::enumerable_content_will_change`].
//!
//! `did_change`:
//! 1. added elements materialized (same condition, post-mutation state),
//! 2. [`Enumerable::enumerable_content_did_change`],
//! 3. `@each` post-hook,
//! 4. `@array:change` to array observers,
//! 5. `firstObject` / `lastObject` notified if their value moved.
//!
//! # Failure Modes
//!
//! - **Unbalanced calls**: the pairing is trusted, not checked. A mutation
//!   without its `did_change` leaves cached first/last values and observers
//!   silently stale; no error is raised.

use std::rc::Rc;

use crate::change::{ArrayChange, ContentDelta, Extent};
use crate::each::EachProxy;
use crate::enumerable::Enumerable;
use crate::logging::{debug, trace};
use crate::observers::{ARRAY_BEFORE, ARRAY_CHANGE, ArrayObserver, ArrayObserverOptions};
use crate::properties::Property;

/// Index-ordered collections that publish structural changes.
///
/// Implementors provide only `length`, `lookup` and `array_state`; the whole
/// protocol is default-implemented.
pub trait ObservableArray: Enumerable {
    /// Whether any array observer is registered for either event.
    fn has_array_observers(&self) -> bool {
        let observers = self.array_state().array_observers();
        observers.has_listeners(ARRAY_BEFORE) || observers.has_listeners(ARRAY_CHANGE)
    }

    /// Register `target` with the default method names.
    fn add_array_observer<O>(&self, target: &Rc<O>)
    where
        O: ArrayObserver<Self> + 'static,
    {
        self.add_array_observer_with(target, ArrayObserverOptions::default());
    }

    /// Register `target` under the method names in `options`.
    ///
    /// `hasArrayObservers` is announced around the add whenever there were
    /// no observers beforehand.
    fn add_array_observer_with<O>(&self, target: &Rc<O>, options: ArrayObserverOptions)
    where
        O: ArrayObserver<Self> + 'static,
    {
        let had_observers = self.has_array_observers();
        if !had_observers {
            self.property_will_change(Property::HasArrayObservers);
        }
        let target: Rc<dyn ArrayObserver<Self>> = Rc::clone(target) as _;
        let observers = self.array_state().array_observers();
        observers.add_listener(ARRAY_BEFORE, Rc::clone(&target), options.will_change);
        observers.add_listener(ARRAY_CHANGE, target, options.did_change);
        debug!(had_observers, "added array observer");
        if !had_observers {
            self.property_did_change(Property::HasArrayObservers);
        }
    }

    /// Unregister `target` registered with the default method names.
    fn remove_array_observer<O>(&self, target: &Rc<O>)
    where
        O: ArrayObserver<Self> + 'static,
    {
        self.remove_array_observer_with(target, ArrayObserverOptions::default());
    }

    /// Unregister `target` registered under `options`.
    ///
    /// Removing a pair that was never registered is a no-op apart from the
    /// notification below. `hasArrayObservers` is announced around the
    /// removal whenever there were observers beforehand, even if others
    /// remain afterwards.
    fn remove_array_observer_with<O>(&self, target: &Rc<O>, options: ArrayObserverOptions)
    where
        O: ArrayObserver<Self> + 'static,
    {
        let had_observers = self.has_array_observers();
        if had_observers {
            self.property_will_change(Property::HasArrayObservers);
        }
        let target: Rc<dyn ArrayObserver<Self>> = Rc::clone(target) as _;
        let observers = self.array_state().array_observers();
        observers.remove_listener(ARRAY_BEFORE, &target, &options.will_change);
        observers.remove_listener(ARRAY_CHANGE, &target, &options.did_change);
        debug!(had_observers, "removed array observer");
        if had_observers {
            self.property_did_change(Property::HasArrayObservers);
        }
    }

    /// Announce an edit about to happen. Call before touching storage.
    fn will_change(&self, change: ArrayChange) {
        trace!(
            start = change.start,
            removed = ?change.removed,
            added = ?change.added,
            "array will change"
        );
        let state = self.array_state();
        if let Some(each) = state.each_handle() {
            each.array_will_change(self, change);
        }
        state.array_observers().send_event(ARRAY_BEFORE, |target, method| {
            target.invoke(method, self, change);
        });
        let removing = materialize(self, change.start, change.removed);
        self.enumerable_content_will_change(removing, change.added.into());
    }

    /// Announce an edit that just happened. Call after touching storage.
    fn did_change(&self, change: ArrayChange) {
        trace!(
            start = change.start,
            removed = ?change.removed,
            added = ?change.added,
            "array did change"
        );
        let adding = materialize(self, change.start, change.added);
        self.enumerable_content_did_change(change.removed.into(), adding);
        let state = self.array_state();
        if let Some(each) = state.each_handle() {
            each.array_did_change(self, change);
        }
        state.array_observers().send_event(ARRAY_CHANGE, |target, method| {
            target.invoke(method, self, change);
        });
        refresh_first_and_last(self);
    }

    /// The first element, memoized until it moves.
    fn first_object(&self) -> Option<Self::Item> {
        self.array_state()
            .first_object_cache()
            .get_or_compute(|| self.object_at(0))
    }

    /// The last element, memoized until it moves.
    fn last_object(&self) -> Option<Self::Item> {
        self.array_state().last_object_cache().get_or_compute(|| {
            let length = isize::try_from(self.length()).unwrap_or(isize::MAX);
            self.object_at(length - 1)
        })
    }

    /// The `"[]"` property: the collection itself.
    fn content(&self) -> &Self {
        self
    }

    /// The `@each` handle, built on first access and identical thereafter.
    fn each(&self) -> Rc<dyn EachProxy<Self>> {
        self.array_state().each_or_init(self)
    }
}

/// The elements at `[start, start + extent)` when enumerable observers exist
/// and the extent is known; otherwise the raw extent.
fn materialize<A>(array: &A, start: usize, extent: Extent) -> ContentDelta<A::Item>
where
    A: ObservableArray + ?Sized,
{
    match extent {
        Extent::Count(count) if array.has_enumerable_observers() => ContentDelta::Items(
            (start..start.saturating_add(count))
                .map_while(|idx| array.object_at(isize::try_from(idx).ok()?))
                .collect(),
        ),
        other => other.into(),
    }
}

/// Notify `firstObject` / `lastObject` if the current ends differ from the
/// cached values. An uncached value compares as absent.
fn refresh_first_and_last<A>(array: &A)
where
    A: ObservableArray + ?Sized,
{
    let state = array.array_state();
    let length = isize::try_from(array.length()).unwrap_or(isize::MAX);
    let cached_first = state.first_object_cache().cache_for().flatten();
    let cached_last = state.last_object_cache().cache_for().flatten();

    if array.object_at(0) != cached_first {
        trace!("firstObject moved");
        array.property_will_change(Property::FirstObject);
        array.property_did_change(Property::FirstObject);
    }
    if array.object_at(length - 1) != cached_last {
        trace!("lastObject moved");
        array.property_will_change(Property::LastObject);
        array.property_did_change(Property::LastObject);
    }
}
