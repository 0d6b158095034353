#![forbid(unsafe_code)]

//! Errors raised by the mutation layer.
//!
//! Reads and the notification protocol never fail: out-of-range lookups yield
//! `None` and protocol misuse is trusted. Only [`MutableArray`] operations
//! that address a position outside the collection return an error.
//!
//! [`MutableArray`]: crate::MutableArray

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ArrayError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArrayError {
    #[error("index {index} out of range (length {length})")]
    IndexOutOfRange { index: usize, length: usize },
}

impl ArrayError {
    #[must_use]
    pub fn out_of_range(index: usize, length: usize) -> Self {
        Self::IndexOutOfRange { index, length }
    }
}
