#![forbid(unsafe_code)]

//! Property-change notification primitives.
//!
//! A [`PropertyNotifier`] delivers before/after notifications for named
//! properties of one collection. Subscribers register a callback for a
//! [`Property`] and receive a [`PropertyChange`] for every
//! `will_change` / `did_change` of that key.
//!
//! # Design
//!
//! Callbacks are owned by the returned [`Subscription`]; the notifier only
//! keeps `Weak` pointers and prunes dead entries lazily during notification.
//! Dropping the `Subscription` therefore unsubscribes before the next cycle.
//!
//! # Invariants
//!
//! 1. Subscribers for a key are notified in registration order.
//! 2. No borrow of the subscriber list is held while a callback runs, so a
//!    callback may subscribe, unsubscribe or trigger nested notifications.

use std::borrow::Cow;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use smallvec::SmallVec;

/// Observable property keys of a collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Property {
    /// `"[]"`: the content as a whole.
    Content,
    /// `"length"`.
    Length,
    /// `"firstObject"`.
    FirstObject,
    /// `"lastObject"`.
    LastObject,
    /// `"hasArrayObservers"`.
    HasArrayObservers,
    /// `"hasEnumerableObservers"`.
    HasEnumerableObservers,
    /// Any other key a concrete collection chooses to publish.
    Named(Cow<'static, str>),
}

impl Property {
    /// Canonical key string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Content => "[]",
            Self::Length => "length",
            Self::FirstObject => "firstObject",
            Self::LastObject => "lastObject",
            Self::HasArrayObservers => "hasArrayObservers",
            Self::HasEnumerableObservers => "hasEnumerableObservers",
            Self::Named(name) => name,
        }
    }

    /// A custom key.
    #[must_use]
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Self::Named(name.into())
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which half of a change is being announced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PropertyPhase {
    /// The value is about to change.
    Before,
    /// The value has changed; caches have been cleared.
    After,
}

/// A single notification delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PropertyChange {
    pub key: Property,
    pub phase: PropertyPhase,
}

type Callback = dyn Fn(&PropertyChange);

struct Entry {
    key: Property,
    callback: Weak<Callback>,
}

/// RAII guard for a property subscription.
///
/// Dropping it removes the callback before the next notification cycle.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    _callback: Rc<Callback>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

/// Per-collection registry of property subscribers.
#[derive(Default)]
pub struct PropertyNotifier {
    entries: RefCell<Vec<Entry>>,
}

impl fmt::Debug for PropertyNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyNotifier")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl PropertyNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `callback` to before/after notifications of `key`.
    pub fn observe(&self, key: Property, callback: impl Fn(&PropertyChange) + 'static) -> Subscription {
        let callback: Rc<Callback> = Rc::new(callback);
        self.entries.borrow_mut().push(Entry {
            key,
            callback: Rc::downgrade(&callback),
        });
        Subscription {
            _callback: callback,
        }
    }

    /// Announce that `key` is about to change.
    pub fn will_change(&self, key: Property) {
        self.notify(PropertyChange {
            key,
            phase: PropertyPhase::Before,
        });
    }

    /// Announce that `key` has changed.
    pub fn did_change(&self, key: Property) {
        self.notify(PropertyChange {
            key,
            phase: PropertyPhase::After,
        });
    }

    /// Live subscribers across all keys.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|entry| entry.callback.strong_count() > 0)
            .count()
    }

    /// Whether anyone is subscribed to `key`.
    #[must_use]
    pub fn is_observed(&self, key: &Property) -> bool {
        self.entries
            .borrow()
            .iter()
            .any(|entry| entry.key == *key && entry.callback.strong_count() > 0)
    }

    fn notify(&self, change: PropertyChange) {
        let live: SmallVec<[Rc<Callback>; 4]> = {
            let mut entries = self.entries.borrow_mut();
            entries.retain(|entry| entry.callback.strong_count() > 0);
            entries
                .iter()
                .filter(|entry| entry.key == change.key)
                .filter_map(|entry| entry.callback.upgrade())
                .collect()
        };
        for callback in live {
            callback(&change);
        }
    }
}
