#![forbid(unsafe_code)]

//! Change descriptors passed through the notification protocol.
//!
//! A structural edit is described by a start index and two extents: how many
//! elements were removed and how many were added. Either extent may be
//! [`Extent::Unknown`], meaning "the whole collection may have changed".

use std::ops::Range;

/// Size of one side of a structural edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Extent {
    /// A concrete element count.
    Count(usize),
    /// Unknown extent; treat as total invalidation.
    #[default]
    Unknown,
}

impl Extent {
    /// The concrete count, if known.
    #[must_use]
    pub const fn count(self) -> Option<usize> {
        match self {
            Self::Count(n) => Some(n),
            Self::Unknown => None,
        }
    }

    #[must_use]
    pub const fn is_known(self) -> bool {
        matches!(self, Self::Count(_))
    }
}

impl From<usize> for Extent {
    fn from(n: usize) -> Self {
        Self::Count(n)
    }
}

impl From<Option<usize>> for Extent {
    fn from(n: Option<usize>) -> Self {
        n.map_or(Self::Unknown, Self::Count)
    }
}

/// Descriptor of one structural edit: `(start, removed, added)`.
///
/// The default value is the whole-collection sentinel: start 0 with both
/// extents unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArrayChange {
    pub start: usize,
    pub removed: Extent,
    pub added: Extent,
}

impl ArrayChange {
    /// A concrete edit at `start` removing `removed` and adding `added`.
    #[must_use]
    pub const fn new(start: usize, removed: usize, added: usize) -> Self {
        Self {
            start,
            removed: Extent::Count(removed),
            added: Extent::Count(added),
        }
    }

    /// The whole collection may have been replaced.
    #[must_use]
    pub const fn whole() -> Self {
        Self {
            start: 0,
            removed: Extent::Unknown,
            added: Extent::Unknown,
        }
    }

    /// An edit at `start` whose extents are not known.
    #[must_use]
    pub const fn at(start: usize) -> Self {
        Self {
            start,
            removed: Extent::Unknown,
            added: Extent::Unknown,
        }
    }

    /// Build a descriptor from optional parts.
    ///
    /// An omitted `start` yields [`ArrayChange::whole`] whatever the counts
    /// say. Otherwise each omitted count becomes [`Extent::Unknown`].
    #[must_use]
    pub fn from_parts(start: Option<usize>, removed: Option<usize>, added: Option<usize>) -> Self {
        match start {
            None => Self::whole(),
            Some(start) => Self {
                start,
                removed: removed.into(),
                added: added.into(),
            },
        }
    }

    #[must_use]
    pub const fn with_removed(mut self, removed: Extent) -> Self {
        self.removed = removed;
        self
    }

    #[must_use]
    pub const fn with_added(mut self, added: Extent) -> Self {
        self.added = added;
        self
    }

    /// Whether this is the whole-collection sentinel.
    #[must_use]
    pub fn is_whole(&self) -> bool {
        *self == Self::whole()
    }

    /// Index range of the removed elements (pre-mutation), if concrete.
    #[must_use]
    pub fn removed_range(&self) -> Option<Range<usize>> {
        self.removed.count().map(|n| self.start..self.start.saturating_add(n))
    }

    /// Index range of the added elements (post-mutation), if concrete.
    #[must_use]
    pub fn added_range(&self) -> Option<Range<usize>> {
        self.added.count().map(|n| self.start..self.start.saturating_add(n))
    }
}

/// One side of a change as delivered to the enumerable hooks.
///
/// Elements are materialized only when someone observes enumerable content
/// and the extent is concrete; otherwise the raw count or sentinel is passed
/// through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentDelta<T> {
    Items(Vec<T>),
    Count(usize),
    Unknown,
}

impl<T> ContentDelta<T> {
    /// Number of elements this delta stands for.
    #[must_use]
    pub fn extent(&self) -> Extent {
        match self {
            Self::Items(items) => Extent::Count(items.len()),
            Self::Count(n) => Extent::Count(*n),
            Self::Unknown => Extent::Unknown,
        }
    }

    /// The materialized elements, if any.
    #[must_use]
    pub fn items(&self) -> Option<&[T]> {
        match self {
            Self::Items(items) => Some(items),
            _ => None,
        }
    }
}

impl<T> From<Extent> for ContentDelta<T> {
    fn from(extent: Extent) -> Self {
        match extent {
            Extent::Count(n) => Self::Count(n),
            Extent::Unknown => Self::Unknown,
        }
    }
}

/// Whether a change alters the element count (or might).
pub(crate) fn has_delta<T>(removing: &ContentDelta<T>, adding: &ContentDelta<T>) -> bool {
    match (removing.extent(), adding.extent()) {
        (Extent::Count(removed), Extent::Count(added)) => removed != added,
        _ => true,
    }
}
