//! Row/column coordinates and their mapping onto dense cell ids.
//!
//! Ids are assigned row-major (`row * columns + col`), so a coordinate and an id
//! are interchangeable once the column count is known. Row deletion renumbers the
//! rows below it to keep this mapping exact.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{CellId, GridError};

/// Zero-based grid position.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CellCoord {
    pub row: usize,
    pub col: usize,
}

impl CellCoord {
    #[inline(always)]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Recover the coordinate a dense id encodes.
    ///
    /// Panics if `columns` is zero; a grid with live cells always has at least one column.
    #[inline]
    pub fn from_id(id: CellId, columns: usize) -> Self {
        assert!(columns > 0, "cannot decode cell id {id} with zero columns");
        let id = id as usize;
        Self {
            row: id / columns,
            col: id % columns,
        }
    }

    #[inline]
    pub fn to_id(self, columns: usize) -> CellId {
        (self.row * columns + self.col) as CellId
    }

    /// Check the coordinate against a `rows x columns` grid.
    pub fn check_within(self, rows: usize, columns: usize) -> Result<Self, GridError> {
        if self.row >= rows {
            return Err(GridError::row_out_of_range(self.row, rows));
        }
        if self.col >= columns {
            return Err(GridError::column_out_of_range(self.col, columns));
        }
        Ok(self)
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}C{}", self.row, self.col)
    }
}

impl From<CellCoord> for (usize, usize) {
    fn from(coord: CellCoord) -> Self {
        (coord.row, coord.col)
    }
}

impl From<(usize, usize)> for CellCoord {
    fn from(value: (usize, usize)) -> Self {
        Self::new(value.0, value.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GridErrorKind;

    #[test]
    fn id_roundtrip_row_major() {
        let columns = 7;
        for id in 0..70u32 {
            let coord = CellCoord::from_id(id, columns);
            assert_eq!(coord.row, id as usize / columns);
            assert_eq!(coord.col, id as usize % columns);
            assert_eq!(coord.to_id(columns), id);
        }
    }

    #[test]
    fn check_within_reports_axis() {
        let err = CellCoord::new(3, 0).check_within(3, 4).unwrap_err();
        assert_eq!(err.kind(), GridErrorKind::OutOfRange);
        assert!(err.to_string().contains("row"));

        let err = CellCoord::new(0, 4).check_within(3, 4).unwrap_err();
        assert!(err.to_string().contains("column"));

        assert!(CellCoord::new(2, 3).check_within(3, 4).is_ok());
    }

    #[test]
    #[should_panic(expected = "zero columns")]
    fn from_id_rejects_zero_columns() {
        CellCoord::from_id(0, 0);
    }

    #[test]
    fn display_is_r1c1_style() {
        assert_eq!(CellCoord::new(4, 2).to_string(), "R4C2");
    }
}
