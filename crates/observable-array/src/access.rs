#![forbid(unsafe_code)]

//! Read-only derived access over an indexed collection.
//!
//! Everything here is built from two primitives: [`ArrayAccess::length`] and
//! [`ArrayAccess::lookup`]. Indices taken by the derived operations are
//! signed; negative offsets count back from the end where an operation says
//! so, and out-of-range reads yield `None` rather than panicking.
//!
//! Element matching uses `PartialEq`. Collections of shared objects that need
//! reference identity can hold `Rc`s wrapped in a newtype comparing with
//! `Rc::ptr_eq`.

use std::collections::VecDeque;
use std::iter::FusedIterator;

/// Array-like read access.
pub trait ArrayAccess {
    type Item: Clone + PartialEq;

    /// Number of elements.
    fn length(&self) -> usize;

    /// Element at `idx`, for `idx < length()`.
    fn lookup(&self, idx: usize) -> Option<Self::Item>;

    /// Element at `idx`, or `None` when `idx < 0` or `idx >= length()`.
    fn object_at(&self, idx: isize) -> Option<Self::Item> {
        let idx = usize::try_from(idx).ok()?;
        if idx >= self.length() {
            return None;
        }
        self.lookup(idx)
    }

    /// `object_at` for every index, in order. Absent entries stay `None`.
    fn objects_at(&self, indexes: &[isize]) -> Vec<Option<Self::Item>> {
        indexes.iter().map(|&idx| self.object_at(idx)).collect()
    }

    /// First index of `value` at or after `start_at` (default 0).
    ///
    /// A negative `start_at` is an offset from the end.
    fn index_of(&self, value: &Self::Item, start_at: Option<isize>) -> Option<usize> {
        let len = signed_len(self.length());
        let mut start = start_at.unwrap_or(0);
        if start < 0 {
            start += len;
        }
        (start.max(0)..len)
            .find(|&idx| self.object_at(idx).as_ref() == Some(value))
            .and_then(|idx| usize::try_from(idx).ok())
    }

    /// Last index of `value` at or before `start_at` (default `length - 1`).
    ///
    /// A `start_at` at or past the end scans from the last element; a negative
    /// one is an offset from the end.
    fn last_index_of(&self, value: &Self::Item, start_at: Option<isize>) -> Option<usize> {
        let len = signed_len(self.length());
        let mut start = match start_at {
            Some(start) if start < len => start,
            _ => len - 1,
        };
        if start < 0 {
            start += len;
        }
        (0..=start)
            .rev()
            .find(|&idx| self.object_at(idx).as_ref() == Some(value))
            .and_then(|idx| usize::try_from(idx).ok())
    }

    /// Elements in `[begin, end)`.
    ///
    /// `begin` defaults to 0 and `end` to `length()`; `end` is clamped to
    /// `length()`; negative bounds are offsets from the end. Empty when
    /// `begin >= end`.
    ///
    /// A `begin` that still lies before the first element after the offset
    /// is clamped to 0, so the result never contains absent entries.
    fn slice(&self, begin: Option<isize>, end: Option<isize>) -> Vec<Self::Item> {
        let len = signed_len(self.length());
        let mut begin = begin.unwrap_or(0);
        let mut end = end.map_or(len, |end| end.min(len));
        if begin < 0 {
            begin += len;
        }
        if end < 0 {
            end += len;
        }
        (begin.max(0)..end)
            .filter_map(|idx| self.object_at(idx))
            .collect()
    }

    /// Whether `value` is present.
    fn contains(&self, value: &Self::Item) -> bool {
        self.index_of(value, None).is_some()
    }

    /// All elements, in order, as a plain `Vec`.
    fn to_array(&self) -> Vec<Self::Item> {
        self.objects().collect()
    }

    /// By-value iterator over the elements via `object_at`.
    fn objects(&self) -> ArrayIter<'_, Self> {
        ArrayIter {
            array: self,
            front: 0,
            back: self.length(),
        }
    }
}

fn signed_len(len: usize) -> isize {
    isize::try_from(len).unwrap_or(isize::MAX)
}

/// Iterator returned by [`ArrayAccess::objects`].
///
/// The range is fixed when the iterator is created; elements removed since
/// then are skipped.
pub struct ArrayIter<'a, A: ?Sized> {
    array: &'a A,
    front: usize,
    back: usize,
}

impl<A: ArrayAccess + ?Sized> Iterator for ArrayIter<'_, A> {
    type Item = A::Item;

    fn next(&mut self) -> Option<Self::Item> {
        while self.front < self.back {
            let idx = self.front;
            self.front += 1;
            if let Some(item) = self.array.object_at(signed_len(idx)) {
                return Some(item);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.back - self.front))
    }
}

impl<A: ArrayAccess + ?Sized> DoubleEndedIterator for ArrayIter<'_, A> {
    fn next_back(&mut self) -> Option<Self::Item> {
        while self.front < self.back {
            self.back -= 1;
            if let Some(item) = self.array.object_at(signed_len(self.back)) {
                return Some(item);
            }
        }
        None
    }
}

impl<A: ArrayAccess + ?Sized> FusedIterator for ArrayIter<'_, A> {}

impl<T: Clone + PartialEq> ArrayAccess for [T] {
    type Item = T;

    fn length(&self) -> usize {
        self.len()
    }

    fn lookup(&self, idx: usize) -> Option<T> {
        self.get(idx).cloned()
    }
}

impl<T: Clone + PartialEq> ArrayAccess for Vec<T> {
    type Item = T;

    fn length(&self) -> usize {
        self.len()
    }

    fn lookup(&self, idx: usize) -> Option<T> {
        self.get(idx).cloned()
    }
}

impl<T: Clone + PartialEq> ArrayAccess for VecDeque<T> {
    type Item = T;

    fn length(&self) -> usize {
        self.len()
    }

    fn lookup(&self, idx: usize) -> Option<T> {
        self.get(idx).cloned()
    }
}
