#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    Axis, DEFAULT_CLOSEST, DEFAULT_COLUMNS, DEFAULT_ROWS, GridError, MAX_COLUMNS, MAX_ROWS,
};

/// Grid dimensions plus the neighbor count used by coordinate-based queries.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Settings {
    pub rows: usize,
    pub columns: usize,
    pub closest: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            columns: DEFAULT_COLUMNS,
            closest: DEFAULT_CLOSEST,
        }
    }
}

impl Settings {
    pub const fn new(rows: usize, columns: usize, closest: usize) -> Self {
        Self {
            rows,
            columns,
            closest,
        }
    }

    /// Reject zero or over-limit dimensions. `closest` is not checked here;
    /// callers clamp it with [`Settings::clamp_closest`].
    pub fn validate(&self) -> Result<(), GridError> {
        validate_dimensions(self.rows, self.columns)
    }

    /// Upper bound for `closest`: half the cells, rounded down.
    #[inline]
    pub fn max_closest(&self) -> usize {
        self.rows.saturating_mul(self.columns) / 2
    }

    pub fn clamp_closest(mut self) -> Self {
        self.closest = self.closest.min(self.max_closest());
        self
    }
}

pub fn validate_dimensions(rows: usize, columns: usize) -> Result<(), GridError> {
    if rows == 0 || rows > MAX_ROWS {
        return Err(GridError::InvalidDimension {
            axis: Axis::Row,
            value: rows,
            max: MAX_ROWS,
        });
    }
    if columns == 0 || columns > MAX_COLUMNS {
        return Err(GridError::InvalidDimension {
            axis: Axis::Column,
            value: columns,
            max: MAX_COLUMNS,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GridErrorKind;

    #[test]
    fn defaults_match_initial_grid() {
        let s = Settings::default();
        assert_eq!((s.rows, s.columns, s.closest), (10, 10, 5));
        assert!(s.validate().is_ok());
    }

    #[test]
    fn rejects_zero_and_oversized() {
        assert_eq!(
            Settings::new(0, 5, 0).validate().unwrap_err().kind(),
            GridErrorKind::InvalidDimension
        );
        assert!(Settings::new(5, MAX_COLUMNS + 1, 0).validate().is_err());
        assert!(Settings::new(MAX_ROWS, MAX_COLUMNS, 0).validate().is_ok());
    }

    #[test]
    fn clamp_closest_to_half_the_cells() {
        assert_eq!(Settings::new(3, 3, 100).clamp_closest().closest, 4);
        assert_eq!(Settings::new(2, 2, 1).clamp_closest().closest, 1);
        assert_eq!(Settings::new(1, 1, 3).clamp_closest().closest, 0);
    }
}
