#![forbid(unsafe_code)]

//! Mutation on top of the change protocol.
//!
//! [`MutableArray::replace`] is the single primitive a concrete collection
//! implements; it must wrap its edit in `will_change` / `did_change`. Every
//! other mutation here is expressed through `replace`, so observers always
//! see well-formed change pairs.

use crate::error::{ArrayError, Result};
use crate::protocol::ObservableArray;

pub trait MutableArray: ObservableArray {
    /// Remove `remove_count` elements at `start` and insert `items` there.
    ///
    /// Implementations must call `will_change` before and `did_change` after
    /// the edit with the same descriptor.
    fn replace(&self, start: usize, remove_count: usize, items: Vec<Self::Item>) -> Result<()>;

    /// Setter of the `"[]"` property: replace the entire contents.
    fn set_content(&self, items: Vec<Self::Item>) -> Result<()> {
        self.replace(0, self.length(), items)
    }

    /// Remove every element. No notification when already empty.
    fn clear(&self) -> Result<()> {
        let length = self.length();
        if length == 0 {
            return Ok(());
        }
        self.replace(0, length, Vec::new())
    }

    /// Insert `item` at `idx`; `idx == length()` appends.
    fn insert_at(&self, idx: usize, item: Self::Item) -> Result<()> {
        let length = self.length();
        if idx > length {
            return Err(ArrayError::out_of_range(idx, length));
        }
        self.replace(idx, 0, vec![item])
    }

    /// Remove `count` elements starting at `start`.
    fn remove_at(&self, start: usize, count: usize) -> Result<()> {
        let length = self.length();
        if start >= length {
            return Err(ArrayError::out_of_range(start, length));
        }
        self.replace(start, count, Vec::new())
    }

    fn push_object(&self, item: Self::Item) -> Result<()> {
        self.insert_at(self.length(), item)
    }

    /// Remove and return the last element.
    fn pop_object(&self) -> Result<Option<Self::Item>> {
        let length = self.length();
        if length == 0 {
            return Ok(None);
        }
        let last = self.lookup(length - 1);
        self.remove_at(length - 1, 1)?;
        Ok(last)
    }

    /// Remove and return the first element.
    fn shift_object(&self) -> Result<Option<Self::Item>> {
        if self.length() == 0 {
            return Ok(None);
        }
        let first = self.lookup(0);
        self.remove_at(0, 1)?;
        Ok(first)
    }

    fn unshift_object(&self, item: Self::Item) -> Result<()> {
        self.insert_at(0, item)
    }

    /// Reverse in place as one whole-range replacement.
    fn reverse_objects(&self) -> Result<()> {
        let length = self.length();
        if length == 0 {
            return Ok(());
        }
        let mut reversed = self.to_array();
        reversed.reverse();
        self.replace(0, length, reversed)
    }

    /// Replace the contents with `items`; clears when `items` is empty.
    fn set_objects(&self, items: Vec<Self::Item>) -> Result<()> {
        if items.is_empty() {
            return self.clear();
        }
        self.replace(0, self.length(), items)
    }

    /// Remove every occurrence of `value`, scanning from the end.
    fn remove_object(&self, value: &Self::Item) -> Result<()> {
        let mut idx = self.length();
        while idx > 0 {
            idx -= 1;
            if self.lookup(idx).as_ref() == Some(value) {
                self.remove_at(idx, 1)?;
            }
        }
        Ok(())
    }

    /// Append `value` unless it is already present.
    fn add_object(&self, value: Self::Item) -> Result<()> {
        if self.contains(&value) {
            return Ok(());
        }
        self.push_object(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::ArrayAccess;
    use crate::change::ArrayChange;
    use crate::observers::ArrayObserver;
    use crate::vec::ObservableVec;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Changes(RefCell<Vec<ArrayChange>>);

    impl ArrayObserver<ObservableVec<char>> for Changes {
        fn array_did_change(&self, _array: &ObservableVec<char>, change: ArrayChange) {
            self.0.borrow_mut().push(change);
        }
    }

    fn observed(items: &str) -> (ObservableVec<char>, Rc<Changes>) {
        let array: ObservableVec<char> = items.chars().collect();
        let changes = Rc::new(Changes::default());
        array.add_array_observer(&changes);
        (array, changes)
    }

    fn text(array: &ObservableVec<char>) -> String {
        array.objects().collect()
    }

    #[test]
    fn set_content_replaces_everything() {
        let (array, changes) = observed("abc");
        array.set_content(vec!['x', 'y']).unwrap();
        assert_eq!(text(&array), "xy");
        assert_eq!(*changes.0.borrow(), vec![ArrayChange::new(0, 3, 2)]);
    }

    #[test]
    fn clear_is_silent_when_empty() {
        let (array, changes) = observed("ab");
        array.clear().unwrap();
        array.clear().unwrap();
        assert_eq!(array.length(), 0);
        assert_eq!(*changes.0.borrow(), vec![ArrayChange::new(0, 2, 0)]);
    }

    #[test]
    fn insert_and_remove_bounds() {
        let (array, changes) = observed("ac");
        array.insert_at(1, 'b').unwrap();
        array.insert_at(3, 'd').unwrap();
        assert_eq!(text(&array), "abcd");
        assert_eq!(
            array.insert_at(9, 'z'),
            Err(ArrayError::out_of_range(9, 4))
        );
        assert_eq!(array.remove_at(4, 1), Err(ArrayError::out_of_range(4, 4)));

        array.remove_at(1, 2).unwrap();
        assert_eq!(text(&array), "ad");
        // Rejected calls never reach observers.
        assert_eq!(changes.0.borrow().len(), 3);
    }

    #[test]
    fn stack_and_queue_operations() {
        let (array, _changes) = observed("b");
        array.push_object('c').unwrap();
        array.unshift_object('a').unwrap();
        assert_eq!(text(&array), "abc");

        assert_eq!(array.pop_object(), Ok(Some('c')));
        assert_eq!(array.shift_object(), Ok(Some('a')));
        assert_eq!(array.shift_object(), Ok(Some('b')));
        assert_eq!(array.pop_object(), Ok(None));
        assert_eq!(array.shift_object(), Ok(None));
    }

    #[test]
    fn reverse_is_one_whole_replacement() {
        let (array, changes) = observed("abc");
        array.reverse_objects().unwrap();
        assert_eq!(text(&array), "cba");
        assert_eq!(*changes.0.borrow(), vec![ArrayChange::new(0, 3, 3)]);

        let (empty, changes) = observed("");
        empty.reverse_objects().unwrap();
        assert!(changes.0.borrow().is_empty());
    }

    #[test]
    fn set_objects_with_empty_clears() {
        let (array, _changes) = observed("abc");
        array.set_objects(vec!['q']).unwrap();
        assert_eq!(text(&array), "q");
        array.set_objects(Vec::new()).unwrap();
        assert_eq!(array.length(), 0);
    }

    #[test]
    fn remove_object_removes_every_occurrence() {
        let (array, changes) = observed("abacad");
        array.remove_object(&'a').unwrap();
        assert_eq!(text(&array), "bcd");
        assert_eq!(
            *changes.0.borrow(),
            vec![
                ArrayChange::new(4, 1, 0),
                ArrayChange::new(2, 1, 0),
                ArrayChange::new(0, 1, 0),
            ]
        );
        array.remove_object(&'z').unwrap();
        assert_eq!(changes.0.borrow().len(), 3);
    }

    #[test]
    fn add_object_skips_duplicates() {
        let (array, changes) = observed("ab");
        array.add_object('b').unwrap();
        array.add_object('c').unwrap();
        assert_eq!(text(&array), "abc");
        assert_eq!(changes.0.borrow().len(), 1);
    }
}
