#![forbid(unsafe_code)]

//! Named-event listener registry.
//!
//! [`Listeners<L>`] maps an event name to an ordered list of
//! `(target, method)` pairs, where `target` is an `Rc<L>` (usually a trait
//! object) and `method` names the handler the target should run.
//!
//! # Invariants
//!
//! 1. A `(target, method)` pair appears at most once per event; target
//!    identity is `Rc` pointer identity.
//! 2. [`send_event`](Listeners::send_event) visits listeners in insertion
//!    order.
//! 3. Dispatch iterates a snapshot, so a listener may add or remove
//!    listeners (including itself) while being notified. Such edits take
//!    effect from the next `send_event`.

use std::borrow::Cow;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use ahash::AHashMap;
use smallvec::SmallVec;

struct Listener<L: ?Sized> {
    target: Rc<L>,
    method: Cow<'static, str>,
}

impl<L: ?Sized> Clone for Listener<L> {
    fn clone(&self) -> Self {
        Self {
            target: Rc::clone(&self.target),
            method: self.method.clone(),
        }
    }
}

/// Ordered `(target, method)` listeners keyed by event name.
pub struct Listeners<L: ?Sized> {
    events: RefCell<AHashMap<Cow<'static, str>, Vec<Listener<L>>>>,
}

impl<L: ?Sized> Default for Listeners<L> {
    fn default() -> Self {
        Self {
            events: RefCell::new(AHashMap::new()),
        }
    }
}

impl<L: ?Sized> fmt::Debug for Listeners<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let events = self.events.borrow();
        let mut map = f.debug_map();
        for (name, listeners) in events.iter() {
            let methods: Vec<&str> = listeners.iter().map(|l| l.method.as_ref()).collect();
            map.entry(name, &methods);
        }
        map.finish()
    }
}

impl<L: ?Sized> Listeners<L> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `target.method` for `event`.
    ///
    /// Returns `false` if the pair was already registered.
    pub fn add_listener(
        &self,
        event: impl Into<Cow<'static, str>>,
        target: Rc<L>,
        method: impl Into<Cow<'static, str>>,
    ) -> bool {
        let method = method.into();
        let mut events = self.events.borrow_mut();
        let listeners = events.entry(event.into()).or_default();
        if listeners
            .iter()
            .any(|l| Rc::ptr_eq(&l.target, &target) && l.method == method)
        {
            return false;
        }
        listeners.push(Listener { target, method });
        true
    }

    /// Unregister `target.method` for `event`.
    ///
    /// Returns `false` (and does nothing) if the pair was not registered.
    pub fn remove_listener(&self, event: &str, target: &Rc<L>, method: &str) -> bool {
        let mut events = self.events.borrow_mut();
        let Some(listeners) = events.get_mut(event) else {
            return false;
        };
        let Some(pos) = listeners
            .iter()
            .position(|l| Rc::ptr_eq(&l.target, target) && l.method == method)
        else {
            return false;
        };
        listeners.remove(pos);
        if listeners.is_empty() {
            events.remove(event);
        }
        true
    }

    /// Whether `event` has at least one listener.
    #[must_use]
    pub fn has_listeners(&self, event: &str) -> bool {
        self.listener_count(event) > 0
    }

    #[must_use]
    pub fn listener_count(&self, event: &str) -> usize {
        self.events.borrow().get(event).map_or(0, Vec::len)
    }

    /// Invoke `dispatch(target, method)` for every listener of `event`.
    ///
    /// Returns the number of listeners visited.
    pub fn send_event(&self, event: &str, mut dispatch: impl FnMut(&L, &str)) -> usize {
        let snapshot: SmallVec<[Listener<L>; 4]> = match self.events.borrow().get(event) {
            Some(listeners) => listeners.iter().cloned().collect(),
            None => return 0,
        };
        for listener in &snapshot {
            dispatch(&listener.target, &listener.method);
        }
        snapshot.len()
    }
}
