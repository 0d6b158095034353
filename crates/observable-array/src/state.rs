#![forbid(unsafe_code)]

//! Per-instance protocol state.
//!
//! Every observable collection embeds one [`ArrayState`] and hands it out
//! through [`Enumerable::array_state`]. It holds everything the protocol
//! mutates: the observer registries, property subscribers, the memoized
//! first/last values and the lazily built `@each` handle.
//!
//! All fields use interior mutability and are borrowed only for the duration
//! of a single bookkeeping step, never across a callback.
//!
//! [`Enumerable::array_state`]: crate::Enumerable::array_state

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::cache::CachedProperty;
use crate::each::{EachFactory, EachProxy, InertEachProxy};
use crate::enumerable::EnumerableObserver;
use crate::events::Listeners;
use crate::logging::debug;
use crate::observers::ArrayObserver;
use crate::properties::{Property, PropertyChange, PropertyNotifier, Subscription};

/// Protocol state for a collection of `T` whose concrete type is `A`.
pub struct ArrayState<T, A: ?Sized> {
    array_observers: Listeners<dyn ArrayObserver<A>>,
    enumerable_observers: Listeners<dyn EnumerableObserver<A, T>>,
    properties: PropertyNotifier,
    first_object: CachedProperty<Option<T>>,
    last_object: CachedProperty<Option<T>>,
    each: RefCell<Option<Rc<dyn EachProxy<A>>>>,
    each_factory: Option<EachFactory<A>>,
}

impl<T, A: ?Sized> Default for ArrayState<T, A> {
    fn default() -> Self {
        Self {
            array_observers: Listeners::new(),
            enumerable_observers: Listeners::new(),
            properties: PropertyNotifier::new(),
            first_object: CachedProperty::new(),
            last_object: CachedProperty::new(),
            each: RefCell::new(None),
            each_factory: None,
        }
    }
}

impl<T: fmt::Debug, A: ?Sized> fmt::Debug for ArrayState<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayState")
            .field("array_observers", &self.array_observers)
            .field("enumerable_observers", &self.enumerable_observers)
            .field("properties", &self.properties)
            .field("first_object", &self.first_object)
            .field("last_object", &self.last_object)
            .field("has_each", &self.each.borrow().is_some())
            .finish()
    }
}

impl<T, A: ?Sized> ArrayState<T, A> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the factory that builds the `@each` handle.
    #[must_use]
    pub fn with_each_factory(
        mut self,
        factory: impl Fn(&A) -> Rc<dyn EachProxy<A>> + 'static,
    ) -> Self {
        self.each_factory = Some(Box::new(factory));
        self
    }

    #[must_use]
    pub fn array_observers(&self) -> &Listeners<dyn ArrayObserver<A>> {
        &self.array_observers
    }

    #[must_use]
    pub fn enumerable_observers(&self) -> &Listeners<dyn EnumerableObserver<A, T>> {
        &self.enumerable_observers
    }

    #[must_use]
    pub fn properties(&self) -> &PropertyNotifier {
        &self.properties
    }

    /// Subscribe to before/after notifications of `key`.
    pub fn observe(&self, key: Property, callback: impl Fn(&PropertyChange) + 'static) -> Subscription {
        self.properties.observe(key, callback)
    }

    #[must_use]
    pub fn first_object_cache(&self) -> &CachedProperty<Option<T>> {
        &self.first_object
    }

    #[must_use]
    pub fn last_object_cache(&self) -> &CachedProperty<Option<T>> {
        &self.last_object
    }

    /// Announce that `key` is about to change.
    pub fn property_will_change(&self, key: Property) {
        self.properties.will_change(key);
    }

    /// Announce that `key` has changed, clearing its memoized value first.
    pub fn property_did_change(&self, key: Property) {
        match key {
            Property::FirstObject => self.first_object.invalidate(),
            Property::LastObject => self.last_object.invalidate(),
            _ => {}
        }
        self.properties.did_change(key);
    }

    /// The `@each` handle if it has been built, without building it.
    #[must_use]
    pub fn each_handle(&self) -> Option<Rc<dyn EachProxy<A>>> {
        self.each.borrow().clone()
    }

    /// The `@each` handle, building it from `array` on first call.
    pub fn each_or_init(&self, array: &A) -> Rc<dyn EachProxy<A>> {
        if let Some(handle) = self.each_handle() {
            return handle;
        }
        let handle: Rc<dyn EachProxy<A>> = match &self.each_factory {
            Some(factory) => factory(array),
            None => Rc::new(InertEachProxy),
        };
        debug!(custom_factory = self.each_factory.is_some(), "built @each handle");
        let mut slot = self.each.borrow_mut();
        // A factory that itself read `each` has already filled the slot.
        Rc::clone(slot.get_or_insert(handle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::properties::PropertyPhase;
    use std::cell::Cell;

    struct Host;

    #[test]
    fn each_defaults_to_inert_handle() {
        let state: ArrayState<u8, Host> = ArrayState::new();
        assert!(state.each_handle().is_none());
        let handle = state.each_or_init(&Host);
        assert!(Rc::ptr_eq(&handle, &state.each_or_init(&Host)));
        assert!(state.each_handle().is_some());
    }

    #[test]
    fn factory_runs_once() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let state: ArrayState<u8, Host> = ArrayState::new().with_each_factory(move |_host: &Host| {
            counter.set(counter.get() + 1);
            Rc::new(InertEachProxy) as Rc<dyn EachProxy<Host>>
        });
        let _ = state.each_or_init(&Host);
        let _ = state.each_or_init(&Host);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn did_change_clears_only_its_own_cache() {
        let state: ArrayState<u8, Host> = ArrayState::new();
        assert_eq!(state.first_object_cache().get_or_compute(|| Some(1)), Some(1));
        assert_eq!(state.last_object_cache().get_or_compute(|| Some(2)), Some(2));

        state.property_did_change(Property::FirstObject);
        assert_eq!(state.first_object_cache().cache_for(), None);
        assert_eq!(state.last_object_cache().cache_for(), Some(Some(2)));

        state.property_did_change(Property::Length);
        assert_eq!(state.last_object_cache().cache_for(), Some(Some(2)));
    }

    #[test]
    fn observe_delivers_both_phases() {
        let state: ArrayState<u8, Host> = ArrayState::new();
        let phases = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&phases);
        let _sub = state.observe(Property::Length, move |change| {
            sink.borrow_mut().push(change.phase);
        });
        state.property_will_change(Property::Length);
        state.property_did_change(Property::Length);
        state.property_did_change(Property::Content);
        assert_eq!(
            *phases.borrow(),
            vec![PropertyPhase::Before, PropertyPhase::After]
        );
    }
}
