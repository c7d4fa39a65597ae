//! Error types for the few operations whose failure a caller can act on.
//!
//! Absence (a missing key, an empty container) is never an error; those
//! operations return `Option`.

use core::fmt;

/// An index was outside the range accepted by a positional operation.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct IndexError {
    pub index: usize,
    pub len: usize,
}

impl fmt::Display for IndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "index {} out of range for array of length {}",
            self.index, self.len
        )
    }
}

impl std::error::Error for IndexError {}

/// `Cursor::remove_current` was called with no current element.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RemoveError {
    /// No element was returned by `next` since the cursor was created,
    /// restarted, or last removed an element.
    NoCurrent,
}

impl fmt::Display for RemoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoveError::NoCurrent => f.write_str("cursor has no current element to remove"),
        }
    }
}

impl std::error::Error for RemoveError {}
