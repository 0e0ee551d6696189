#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identity of a live cell. Dense: the cell at `(row, col)` has id `row * columns + col`.
pub type CellId = u32;

/// Bounded cell payload, always within `[0, MAX_CELL_VALUE]`.
pub type CellValue = u32;

/// Accumulator for row sums. See [`crate::limits`] for the overflow bound.
pub type RowSum = u64;

/// One grid entry.
///
/// The id never changes on a value update. It is rewritten only when a row
/// above the cell is deleted, so that ids keep matching coordinates.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Cell {
    pub id: CellId,
    pub value: CellValue,
}

impl Cell {
    #[inline]
    pub const fn new(id: CellId, value: CellValue) -> Self {
        Self { id, value }
    }
}
