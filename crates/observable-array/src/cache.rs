#![forbid(unsafe_code)]

//! Memoized property values with a non-computing peek.
//!
//! # Design
//!
//! [`CachedProperty<T>`] stores the last computed value of a derived property
//! alongside a dirty flag. [`get_or_compute`](CachedProperty::get_or_compute)
//! runs the supplied compute closure only when the cache is dirty;
//! [`cache_for`](CachedProperty::cache_for) returns whatever is cached without
//! computing anything. The change protocol uses the peek to decide whether a
//! derived value actually moved.
//!
//! # Invariants
//!
//! 1. `cache_for()` never runs a compute closure.
//! 2. After `invalidate()`, `cache_for()` returns `None` until the next
//!    `get_or_compute()`.
//! 3. Version increments by exactly 1 per computation.
//!
//! # Failure Modes
//!
//! - **Compute closure panics**: nothing is stored and the dirty flag stays
//!   set, so the next `get_or_compute()` retries.
//! - **Re-entrant compute**: the closure runs with no borrow held, so it may
//!   read (or even compute) the same property without panicking. The outer
//!   result wins.

use std::cell::{Cell, RefCell};

/// A per-instance memoized value.
///
/// Unlike a shared handle, a `CachedProperty` is owned by the state of the
/// collection it belongs to; the compute closure is supplied at read time.
pub struct CachedProperty<T> {
    /// Cached result (None before first computation and after invalidation).
    cached: RefCell<Option<T>>,
    /// Whether the cached value is stale.
    dirty: Cell<bool>,
    /// Monotonically increasing version, bumped on each computation.
    version: Cell<u64>,
}

impl<T> Default for CachedProperty<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for CachedProperty<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedProperty")
            .field("cached", &self.cached.borrow())
            .field("dirty", &self.dirty.get())
            .field("version", &self.version.get())
            .finish()
    }
}

impl<T> CachedProperty<T> {
    /// An empty, dirty cache.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cached: RefCell::new(None),
            dirty: Cell::new(true),
            version: Cell::new(0),
        }
    }

    /// Whether the next `get_or_compute()` will run its closure.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    /// Drop the cached value. The next `get_or_compute()` recomputes.
    pub fn invalidate(&self) {
        self.dirty.set(true);
        self.cached.borrow_mut().take();
    }

    /// Number of computations performed so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version.get()
    }
}

impl<T: Clone> CachedProperty<T> {
    /// Return the cached value, computing and storing it first if dirty.
    pub fn get_or_compute(&self, compute: impl FnOnce() -> T) -> T {
        if !self.dirty.get() {
            if let Some(value) = self.cached.borrow().as_ref() {
                return value.clone();
            }
        }
        let value = compute();
        *self.cached.borrow_mut() = Some(value.clone());
        self.dirty.set(false);
        self.version.set(self.version.get() + 1);
        value
    }

    /// Peek at the cached value without computing.
    #[must_use]
    pub fn cache_for(&self) -> Option<T> {
        if self.dirty.get() {
            return None;
        }
        self.cached.borrow().clone()
    }
}
