#![forbid(unsafe_code)]

//! Observable, index-ordered collections.
//!
//! This crate lets any type expose array-like read access (`length` plus
//! indexed lookup) and propagate structural-change notifications to:
//!
//! - registered array observers (`@array:before` / `@array:change`),
//! - the enumerable-change hooks and their observers,
//! - the per-item observation handle (`@each`),
//! - memoized `first_object` / `last_object` values.
//!
//! # Architecture
//!
//! The capability is layered as a stack of traits, each adding default
//! methods on top of the primitives below it:
//!
//! 1. [`ArrayAccess`]: `length` and `lookup` → `object_at`, `index_of`,
//!    `slice`, ...
//! 2. [`Enumerable`]: owns the [`ArrayState`] and the enumerable hooks.
//! 3. [`ObservableArray`]: the two-phase `will_change` / `did_change`
//!    protocol, array observers, cached first/last, `@each`.
//! 4. [`MutableArray`]: `replace` plus the mutation helpers built on it.
//!
//! [`ObservableVec`] is the `RefCell<Vec<T>>`-backed reference collection.
//!
//! # Invariants
//!
//! 1. Every mutation is bracketed by exactly one `will_change` and one
//!    `did_change` carrying the same [`ArrayChange`].
//! 2. Listeners run synchronously in registration order.
//! 3. No interior borrow is held while a listener runs.
//! 4. `first_object` / `last_object` notify only when the recomputed value
//!    differs from the cached one.

pub mod access;
pub mod cache;
pub mod change;
pub mod each;
pub mod enumerable;
pub mod error;
pub mod events;
mod logging;
pub mod mutable;
pub mod observers;
pub mod properties;
pub mod protocol;
pub mod state;
pub mod vec;

pub use access::{ArrayAccess, ArrayIter};
pub use cache::CachedProperty;
pub use change::{ArrayChange, ContentDelta, Extent};
pub use each::{EachFactory, EachProxy, InertEachProxy};
pub use enumerable::{Enumerable, EnumerableObserver, EnumerableObserverOptions};
pub use error::{ArrayError, Result};
pub use events::Listeners;
pub use mutable::MutableArray;
pub use observers::{ArrayObserver, ArrayObserverOptions};
pub use properties::{Property, PropertyChange, PropertyNotifier, PropertyPhase, Subscription};
pub use protocol::ObservableArray;
pub use state::ArrayState;
pub use vec::ObservableVec;
