#![forbid(unsafe_code)]

//! Array observer targets and their registration options.
//!
//! An array observer is registered under two events, `@array:before` and
//! `@array:change`, each paired with a method name. When an event fires the
//! registry calls [`ArrayObserver::invoke`] with that method name; the default
//! `invoke` routes the two default names to the typed handlers.

use std::borrow::Cow;

use crate::change::ArrayChange;
use crate::logging::warn;

/// Event fired before a structural edit.
pub const ARRAY_BEFORE: &str = "@array:before";
/// Event fired after a structural edit.
pub const ARRAY_CHANGE: &str = "@array:change";

/// Default method name for the before event.
pub const ARRAY_WILL_CHANGE: &str = "arrayWillChange";
/// Default method name for the after event.
pub const ARRAY_DID_CHANGE: &str = "arrayDidChange";

/// A target receiving before/after callbacks for structural edits of `A`.
///
/// Both handlers default to no-ops so observers implement only what they
/// need. Targets registered with custom method names override
/// [`invoke`](ArrayObserver::invoke).
pub trait ArrayObserver<A: ?Sized> {
    fn array_will_change(&self, _array: &A, _change: ArrayChange) {}

    fn array_did_change(&self, _array: &A, _change: ArrayChange) {}

    /// Run the handler registered as `method`.
    fn invoke(&self, method: &str, array: &A, change: ArrayChange) {
        match method {
            ARRAY_WILL_CHANGE => self.array_will_change(array, change),
            ARRAY_DID_CHANGE => self.array_did_change(array, change),
            _ => {
                warn!(method, "array observer has no handler for method");
            }
        }
    }
}

/// Method names an array observer is registered under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayObserverOptions {
    /// Method invoked on `@array:before`.
    pub will_change: Cow<'static, str>,
    /// Method invoked on `@array:change`.
    pub did_change: Cow<'static, str>,
}

impl Default for ArrayObserverOptions {
    fn default() -> Self {
        Self {
            will_change: Cow::Borrowed(ARRAY_WILL_CHANGE),
            did_change: Cow::Borrowed(ARRAY_DID_CHANGE),
        }
    }
}

impl ArrayObserverOptions {
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
