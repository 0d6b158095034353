#![forbid(unsafe_code)]

//! `RefCell<Vec<T>>`-backed observable collection.
//!
//! [`ObservableVec`] is the reference implementation of every trait in this
//! crate. Its only storage primitive is [`MutableArray::replace`], which
//! brackets a `Vec::splice` with the change protocol.
//!
//! # Example
//!
//! ```
//! use observable_array::{ArrayAccess, MutableArray, ObservableArray, ObservableVec};
//!
//! let items = ObservableVec::from_vec(vec!['a', 'b', 'c']);
//! assert_eq!(items.first_object(), Some('a'));
//!
//! items.unshift_object('z').unwrap();
//! assert_eq!(items.first_object(), Some('z'));
//! assert_eq!(items.slice(Some(1), None), vec!['a', 'b', 'c']);
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::access::ArrayAccess;
use crate::change::ArrayChange;
use crate::each::EachProxy;
use crate::enumerable::Enumerable;
use crate::error::{ArrayError, Result};
use crate::logging::debug;
use crate::mutable::MutableArray;
use crate::protocol::ObservableArray;
use crate::state::ArrayState;

/// An observable, index-ordered `Vec`.
///
/// All methods take `&self`; observers receive `&ObservableVec<T>` and may
/// read it from inside any callback and mutate it from inside did-phase
/// callbacks.
///
/// Mutating from a will-phase callback breaks the pairing contract: the
/// pending splice is clamped to whatever storage remains, and observers still
/// receive the original descriptor.
pub struct ObservableVec<T> {
    items: RefCell<Vec<T>>,
    state: ArrayState<T, ObservableVec<T>>,
}

impl<T> Default for ObservableVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for ObservableVec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableVec")
            .field("items", &self.items.borrow())
            .field("state", &self.state)
            .finish()
    }
}

impl<T> ObservableVec<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::from_vec(Vec::new())
    }

    #[must_use]
    pub fn from_vec(items: Vec<T>) -> Self {
        Self {
            items: RefCell::new(items),
            state: ArrayState::new(),
        }
    }

    /// Install the factory that builds the `@each` handle on first access.
    #[must_use]
    pub fn with_each_factory(
        mut self,
        factory: impl Fn(&Self) -> Rc<dyn EachProxy<Self>> + 'static,
    ) -> Self {
        self.state = self.state.with_each_factory(factory);
        self
    }

    /// Run `f` over the current contents.
    ///
    /// Must not mutate this collection from inside `f`.
    pub fn with_items<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        f(&self.items.borrow())
    }

    /// Take the contents out, bypassing the change protocol.
    #[must_use]
    pub fn into_inner(self) -> Vec<T> {
        self.items.into_inner()
    }
}

impl<T> From<Vec<T>> for ObservableVec<T> {
    fn from(items: Vec<T>) -> Self {
        Self::from_vec(items)
    }
}

impl<T> FromIterator<T> for ObservableVec<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl<T: Clone + PartialEq> ArrayAccess for ObservableVec<T> {
    type Item = T;

    fn length(&self) -> usize {
        self.items.borrow().len()
    }

    fn lookup(&self, idx: usize) -> Option<T> {
        self.items.borrow().get(idx).cloned()
    }
}

impl<T: Clone + PartialEq> Enumerable for ObservableVec<T> {
    fn array_state(&self) -> &ArrayState<T, Self> {
        &self.state
    }
}

impl<T: Clone + PartialEq> ObservableArray for ObservableVec<T> {}

impl<T: Clone + PartialEq> MutableArray for ObservableVec<T> {
    /// Splice `items` in at `start`.
    ///
    /// `start` may equal `length()` (append) but not exceed it.
    /// `remove_count` is clamped to the elements available after `start`;
    /// observers see the clamped count.
    fn replace(&self, start: usize, remove_count: usize, items: Vec<T>) -> Result<()> {
        let length = self.length();
        if start > length {
            debug!(start, length, "rejected replace past end");
            return Err(ArrayError::out_of_range(start, length));
        }
        let removed = remove_count.min(length - start);
        let change = ArrayChange::new(start, removed, items.len());

        self.will_change(change);
        {
            let mut storage = self.items.borrow_mut();
            let len = storage.len();
            // A will-phase callback may have shrunk the storage.
            let from = start.min(len);
            let to = start.saturating_add(removed).min(len);
            if to - from != removed {
                debug!(start, removed, len, "storage shrank during will_change");
            }
            storage.splice(from..to, items).for_each(drop);
        }
        self.did_change(change);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observers::ArrayObserver;
    use std::cell::Cell;

    #[derive(Default)]
    struct Lengths(RefCell<Vec<(usize, usize)>>);

    impl ArrayObserver<ObservableVec<i32>> for Lengths {
        fn array_will_change(&self, array: &ObservableVec<i32>, _change: ArrayChange) {
            self.0.borrow_mut().push((0, array.length()));
        }

        fn array_did_change(&self, array: &ObservableVec<i32>, _change: ArrayChange) {
            self.0.borrow_mut().push((1, array.length()));
        }
    }

    #[test]
    fn observers_see_storage_before_and_after() {
        let items = ObservableVec::from_vec(vec![1, 2, 3]);
        let lengths = Rc::new(Lengths::default());
        items.add_array_observer(&lengths);

        items.replace(1, 2, Vec::new()).unwrap();
        assert_eq!(*lengths.0.borrow(), vec![(0, 3), (1, 1)]);
    }

    #[test]
    fn replace_clamps_remove_count() {
        struct Last(RefCell<Option<ArrayChange>>);
        impl ArrayObserver<ObservableVec<i32>> for Last {
            fn array_did_change(&self, _array: &ObservableVec<i32>, change: ArrayChange) {
                *self.0.borrow_mut() = Some(change);
            }
        }

        let items = ObservableVec::from_vec(vec![1, 2, 3]);
        let last = Rc::new(Last(RefCell::new(None)));
        items.add_array_observer(&last);

        items.replace(2, 10, vec![7, 8]).unwrap();
        assert_eq!(items.to_array(), vec![1, 2, 7, 8]);
        assert_eq!(*last.0.borrow(), Some(ArrayChange::new(2, 1, 2)));
    }

    #[test]
    fn replace_past_end_is_rejected() {
        let items = ObservableVec::from_vec(vec![1]);
        assert_eq!(
            items.replace(2, 0, vec![5]),
            Err(ArrayError::IndexOutOfRange { index: 2, length: 1 })
        );
        assert_eq!(items.to_array(), vec![1]);
    }

    #[test]
    fn observer_may_read_during_callbacks() {
        struct Reader(RefCell<Vec<Vec<i32>>>);
        impl ArrayObserver<ObservableVec<i32>> for Reader {
            fn array_did_change(&self, array: &ObservableVec<i32>, _change: ArrayChange) {
                self.0.borrow_mut().push(array.to_array());
            }
        }

        let items = ObservableVec::from_vec(vec![1]);
        let reader = Rc::new(Reader(RefCell::new(Vec::new())));
        items.add_array_observer(&reader);
        items.push_object(2).unwrap();
        items.push_object(3).unwrap();
        assert_eq!(*reader.0.borrow(), vec![vec![1, 2], vec![1, 2, 3]]);
        assert_eq!(items.last_object(), Some(3));
    }

    #[test]
    fn will_phase_shrink_does_not_panic() {
        struct PopOnce(Cell<bool>);
        impl ArrayObserver<ObservableVec<i32>> for PopOnce {
            fn array_will_change(&self, array: &ObservableVec<i32>, _change: ArrayChange) {
                if !self.0.replace(true) {
                    array.pop_object().unwrap();
                }
            }
        }

        let items = ObservableVec::from_vec(vec![1, 2, 3]);
        items.add_array_observer(&Rc::new(PopOnce(Cell::new(false))));

        assert_eq!(items.replace(1, 2, vec![9]), Ok(()));
        assert_eq!(items.to_array(), vec![1, 9]);
    }

    #[test]
    fn conversions_and_with_items() {
        let items: ObservableVec<i32> = (1..=4).collect();
        assert_eq!(items.with_items(|slice| slice.iter().sum::<i32>()), 10);
        let from: ObservableVec<i32> = vec![9].into();
        assert_eq!(from.into_inner(), vec![9]);
        assert!(format!("{items:?}").starts_with("ObservableVec"));
        assert_eq!(ObservableVec::<u8>::default().length(), 0);
    }
}
