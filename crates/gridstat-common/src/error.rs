//! Error type returned by every fallible grid operation.
//!
//! - **`GridErrorKind`**: the three categories callers branch on
//! - **`GridError`**: the category plus the offending index and bound
//!
//! `OutOfRange` and `InvalidDimension` are recoverable: the command is rejected
//! and the previous snapshot stays current. `InconsistentIndex` marks a broken
//! internal invariant and is only ever produced by verification helpers; the
//! engine itself panics with it instead of returning it.

use core::fmt;

use thiserror::Error;

use crate::CellId;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum GridErrorKind {
    OutOfRange,
    InvalidDimension,
    InconsistentIndex,
}

impl fmt::Display for GridErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::OutOfRange => "OutOfRange",
            Self::InvalidDimension => "InvalidDimension",
            Self::InconsistentIndex => "InconsistentIndex",
        })
    }
}

/// Which coordinate an error refers to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Axis {
    Row,
    Column,
    Cell,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Row => "row",
            Self::Column => "column",
            Self::Cell => "cell id",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum GridError {
    #[error("{axis} {index} is out of range (valid: 0..{len})")]
    OutOfRange { axis: Axis, index: usize, len: usize },

    #[error("{axis} count {value} is invalid (valid: 1..={max})")]
    InvalidDimension { axis: Axis, value: usize, max: usize },

    #[error("sorted index is inconsistent: {detail}")]
    InconsistentIndex { detail: String },
}

impl GridError {
    pub fn kind(&self) -> GridErrorKind {
        match self {
            Self::OutOfRange { .. } => GridErrorKind::OutOfRange,
            Self::InvalidDimension { .. } => GridErrorKind::InvalidDimension,
            Self::InconsistentIndex { .. } => GridErrorKind::InconsistentIndex,
        }
    }

    pub fn row_out_of_range(index: usize, len: usize) -> Self {
        Self::OutOfRange {
            axis: Axis::Row,
            index,
            len,
        }
    }

    pub fn column_out_of_range(index: usize, len: usize) -> Self {
        Self::OutOfRange {
            axis: Axis::Column,
            index,
            len,
        }
    }

    pub fn unknown_cell(id: CellId, live: usize) -> Self {
        Self::OutOfRange {
            axis: Axis::Cell,
            index: id as usize,
            len: live,
        }
    }

    pub fn inconsistent<S: Into<String>>(detail: S) -> Self {
        Self::InconsistentIndex {
            detail: detail.into(),
        }
    }
}

impl PartialEq<GridErrorKind> for GridError {
    fn eq(&self, other: &GridErrorKind) -> bool {
        self.kind() == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_bounds() {
        let err = GridError::row_out_of_range(12, 10);
        assert_eq!(err.to_string(), "row 12 is out of range (valid: 0..10)");

        let err = GridError::InvalidDimension {
            axis: Axis::Column,
            value: 0,
            max: 100,
        };
        assert_eq!(err.to_string(), "column count 0 is invalid (valid: 1..=100)");
        assert_eq!(err, GridErrorKind::InvalidDimension);
    }

    #[test]
    fn unknown_cell_is_out_of_range() {
        let err = GridError::unknown_cell(99, 4);
        assert_eq!(err.kind(), GridErrorKind::OutOfRange);
        assert!(err.to_string().starts_with("cell id 99"));
    }
}
