//! Aggregate Tracker: per-row `{sum, max}` and per-column percentile.
//!
//! Updates are driven by [`GridChange`] so each command only pays for the rows
//! and columns it touched:
//!
//! | change        | rows                        | column percentiles |
//! |---------------|-----------------------------|--------------------|
//! | regenerate    | all, from scratch           | all                |
//! | append row    | new row only (O(columns))   | all                |
//! | remove row    | drop one entry              | all                |
//! | update cell   | `sum += new - old`, max rule | that column only   |
//!
//! The `max` rule on update depends on [`RowMaxPolicy`]. The default,
//! [`RowMaxPolicy::Monotonic`], only ever raises the stored maximum: lowering
//! the cell that held it leaves `max` stale until the row is rebuilt.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use gridstat_common::{Cell, CellValue, DEFAULT_PERCENTILE, RowSum};

use super::grid::{Grid, GridChange};
use crate::select;

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RowAggregate {
    pub sum: RowSum,
    /// Largest value seen in the row; 0 for an empty row.
    pub max: CellValue,
}

impl RowAggregate {
    pub fn of(cells: &[Cell]) -> Self {
        cells.iter().fold(Self::default(), |acc, cell| Self {
            sum: acc.sum + RowSum::from(cell.value),
            max: acc.max.max(cell.value),
        })
    }
}

/// How `RowAggregate::max` reacts to a single-cell update.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RowMaxPolicy {
    /// `max = max(max, new)`. Never shrinks, so it can go stale when the
    /// previous maximum is lowered.
    #[default]
    Monotonic,
    /// Same as `Monotonic`, plus an O(columns) rescan when the cell that held
    /// the maximum was lowered.
    Exact,
}

/// Work done by one [`Aggregates::apply`] call.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct AggregateWork {
    pub rows_recomputed: usize,
    pub columns_recomputed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Aggregates {
    rows: Vec<RowAggregate>,
    percentiles: Vec<CellValue>,
    percentile: u8,
}

impl Default for Aggregates {
    fn default() -> Self {
        Self::empty(DEFAULT_PERCENTILE)
    }
}

impl Aggregates {
    pub fn empty(percentile: u8) -> Self {
        Self {
            rows: Vec::new(),
            percentiles: Vec::new(),
            percentile: percentile.min(100),
        }
    }

    /// Full recomputation over `grid`.
    pub fn rebuild(grid: &Grid, percentile: u8) -> Self {
        let mut aggregates = Self::empty(percentile);
        aggregates.rows = grid.rows().iter().map(|r| RowAggregate::of(r)).collect();
        aggregates.recompute_all_columns(grid);
        aggregates
    }

    /// Bring the aggregates in line with `grid`, which already reflects `change`.
    pub fn apply(&mut self, change: &GridChange, grid: &Grid, policy: RowMaxPolicy) -> AggregateWork {
        match change {
            GridChange::Regenerated => {
                *self = Self::rebuild(grid, self.percentile);
                AggregateWork {
                    rows_recomputed: grid.row_count(),
                    columns_recomputed: grid.column_count(),
                }
            }
            GridChange::Cleared { .. } => {
                self.rows.clear();
                self.percentiles.clear();
                AggregateWork::default()
            }
            GridChange::RowAppended { row } => {
                let cells = grid.row(*row).unwrap_or_default();
                self.rows.push(RowAggregate::of(cells));
                AggregateWork {
                    rows_recomputed: 1,
                    columns_recomputed: self.recompute_all_columns(grid),
                }
            }
            GridChange::RowRemoved { row, .. } => {
                self.rows.remove(*row);
                AggregateWork {
                    rows_recomputed: 0,
                    columns_recomputed: self.recompute_all_columns(grid),
                }
            }
            GridChange::CellUpdated { coord, old, new, .. } => {
                let mut rows_recomputed = 0;
                let agg = &mut self.rows[coord.row];
                agg.sum = agg.sum - RowSum::from(*old) + RowSum::from(*new);
                let prior_max = agg.max;
                agg.max = prior_max.max(*new);
                if policy == RowMaxPolicy::Exact && *old == prior_max && *new < prior_max {
                    let cells = grid.row(coord.row).unwrap_or_default();
                    agg.max = RowAggregate::of(cells).max;
                    rows_recomputed = 1;
                }
                self.percentiles[coord.col] =
                    select::percentile(&grid.column_values(coord.col), self.percentile);
                AggregateWork {
                    rows_recomputed,
                    columns_recomputed: 1,
                }
            }
        }
    }

    fn recompute_all_columns(&mut self, grid: &Grid) -> usize {
        let columns = if grid.is_empty() { 0 } else { grid.column_count() };
        self.percentiles = (0..columns)
            .map(|c| select::percentile(&grid.column_values(c), self.percentile))
            .collect();
        columns
    }

    #[inline]
    pub fn percentile(&self) -> u8 {
        self.percentile
    }

    pub fn rows(&self) -> &[RowAggregate] {
        &self.rows
    }

    pub fn row(&self, row: usize) -> Option<RowAggregate> {
        self.rows.get(row).copied()
    }

    pub fn percentiles(&self) -> &[CellValue] {
        &self.percentiles
    }

    pub fn column_percentile(&self, col: usize) -> Option<CellValue> {
        self.percentiles.get(col).copied()
    }

    pub fn sums(&self) -> impl Iterator<Item = RowSum> + '_ {
        self.rows.iter().map(|a| a.sum)
    }

    pub fn maxima(&self) -> impl Iterator<Item = CellValue> + '_ {
        self.rows.iter().map(|a| a.max)
    }
}
