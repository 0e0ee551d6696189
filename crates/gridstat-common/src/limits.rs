//! Fixed bounds every grid respects, plus the defaults a fresh engine starts from.
//!
//! Row sums are stored as `u64`. The largest possible sum of a single row is
//! `MAX_COLUMNS * MAX_CELL_VALUE`, and the whole grid never exceeds
//! `MAX_ROWS * MAX_COLUMNS * MAX_CELL_VALUE`, which is asserted below to fit in
//! `u32` so even a narrower accumulator would not overflow.

use crate::CellValue;

/// Largest value a cell may hold. Writes above it are clamped.
pub const MAX_CELL_VALUE: CellValue = 100;
pub const MAX_ROWS: usize = 100;
pub const MAX_COLUMNS: usize = 100;

/// Percentile reported for every column (`floor(p/100 * (n-1))` order statistic).
pub const DEFAULT_PERCENTILE: u8 = 60;

pub const DEFAULT_ROWS: usize = 10;
pub const DEFAULT_COLUMNS: usize = 10;
pub const DEFAULT_CLOSEST: usize = 5;

const _: () = assert!(
    (MAX_ROWS as u64) * (MAX_COLUMNS as u64) * (MAX_CELL_VALUE as u64) <= u32::MAX as u64,
    "grid total must fit in 32 bits"
);

const _: () = assert!(
    ((MAX_ROWS * MAX_COLUMNS) as u64) <= u32::MAX as u64,
    "cell ids are u32"
);

/// Clamp a caller-supplied value into `[0, MAX_CELL_VALUE]`.
#[inline]
pub fn clamp_value(raw: i64) -> CellValue {
    raw.clamp(0, MAX_CELL_VALUE as i64) as CellValue
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_value_bounds() {
        assert_eq!(clamp_value(-5), 0);
        assert_eq!(clamp_value(0), 0);
        assert_eq!(clamp_value(42), 42);
        assert_eq!(clamp_value(MAX_CELL_VALUE as i64), MAX_CELL_VALUE);
        assert_eq!(clamp_value(i64::MAX), MAX_CELL_VALUE);
    }
}
