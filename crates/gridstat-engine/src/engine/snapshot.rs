//! Committed, read-only engine state.
//!
//! A snapshot bundles the grid with everything derived from it. The engine
//! hands snapshots out as `Arc<Snapshot>` and builds the next one
//! copy-on-write, so a snapshot a reader holds never changes underneath it.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use gridstat_common::{
    Cell, CellCoord, CellId, CellValue, DEFAULT_PERCENTILE, GridError, RowSum, Settings,
};

use super::aggregates::{Aggregates, RowAggregate};
use super::grid::Grid;
use super::neighbors;
use super::sorted_index::{SortedEntry, SortedIndex};
use crate::select;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Snapshot {
    pub(crate) grid: Grid,
    pub(crate) aggregates: Aggregates,
    pub(crate) sorted: SortedIndex,
    pub(crate) settings: Settings,
    pub(crate) version: u64,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::empty(Settings::default(), DEFAULT_PERCENTILE)
    }
}

impl Snapshot {
    /// No cells yet; `settings` are remembered for the first `Generate`.
    pub fn empty(settings: Settings, percentile: u8) -> Self {
        Self {
            grid: Grid::new(settings.columns),
            aggregates: Aggregates::empty(percentile),
            sorted: SortedIndex::new(),
            settings,
            version: 0,
        }
    }

    /// Fully derived snapshot over an existing grid.
    pub fn from_grid(grid: Grid, closest: usize, percentile: u8) -> Self {
        let settings = Settings::new(grid.row_count(), grid.column_count(), closest);
        Self {
            aggregates: Aggregates::rebuild(&grid, percentile),
            sorted: SortedIndex::rebuild(&grid),
            grid,
            settings,
            version: 0,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn aggregates(&self) -> &Aggregates {
        &self.aggregates
    }

    pub fn sorted_index(&self) -> &SortedIndex {
        &self.sorted
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    /// Number of commands committed since the engine started.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn rows(&self) -> usize {
        self.grid.row_count()
    }

    pub fn columns(&self) -> usize {
        self.grid.column_count()
    }

    pub fn closest(&self) -> usize {
        self.settings.closest
    }

    pub fn cell_at(&self, row: usize, col: usize) -> Result<Cell, GridError> {
        let coord = CellCoord::new(row, col).check_within(self.rows(), self.columns())?;
        self.grid
            .cell(coord)
            .copied()
            .ok_or_else(|| GridError::row_out_of_range(row, self.rows()))
    }

    pub fn row_aggregate(&self, row: usize) -> Result<RowAggregate, GridError> {
        self.aggregates
            .row(row)
            .ok_or_else(|| GridError::row_out_of_range(row, self.aggregates.rows().len()))
    }

    pub fn row_sum(&self, row: usize) -> Result<RowSum, GridError> {
        Ok(self.row_aggregate(row)?.sum)
    }

    pub fn row_max(&self, row: usize) -> Result<CellValue, GridError> {
        Ok(self.row_aggregate(row)?.max)
    }

    pub fn column_percentile(&self, col: usize) -> Result<CellValue, GridError> {
        self.aggregates.column_percentile(col).ok_or_else(|| {
            GridError::column_out_of_range(col, self.aggregates.percentiles().len())
        })
    }

    /// The `k` cells closest in value to `cell_id`, nearest first.
    pub fn closest_to(&self, cell_id: CellId, k: usize) -> Result<Vec<SortedEntry>, GridError> {
        neighbors::closest(&self.sorted, cell_id, k)
    }

    /// Neighbors of the cell at `(row, col)`, using the configured `closest` count.
    pub fn closest_at(&self, row: usize, col: usize) -> Result<Vec<SortedEntry>, GridError> {
        let cell = self.cell_at(row, col)?;
        self.closest_to(cell.id, self.settings.closest)
    }

    /// The cell's value as a percentage of its row sum; 0 for an all-zero row.
    pub fn cell_share(&self, row: usize, col: usize) -> Result<f64, GridError> {
        let cell = self.cell_at(row, col)?;
        let sum = self.row_sum(row)?;
        if sum == 0 {
            return Ok(0.0);
        }
        Ok(f64::from(cell.value) * 100.0 / sum as f64)
    }

    /// `value / row_max`, clamped to `[0, 1]`; 0 when the row max is 0.
    pub fn heat_intensity(&self, row: usize, col: usize) -> Result<f64, GridError> {
        let cell = self.cell_at(row, col)?;
        let max = self.row_max(row)?;
        if max == 0 {
            return Ok(0.0);
        }
        Ok((f64::from(cell.value) / f64::from(max)).clamp(0.0, 1.0))
    }

    /// Check every structural invariant against a naive recomputation:
    /// row sums, column percentiles, id density/uniqueness, and the sorted
    /// index being the exact value-ordered image of the grid.
    ///
    /// Row maxima are only checked as an upper bound, since the default max
    /// rule may leave them stale.
    pub fn verify(&self) -> Result<(), GridError> {
        self.sorted.verify()?;

        let rows = self.grid.row_count();
        let columns = self.grid.column_count();
        if self.aggregates.rows().len() != rows {
            return Err(GridError::inconsistent(format!(
                "{} row aggregates for {rows} rows",
                self.aggregates.rows().len()
            )));
        }
        if self.sorted.len() != self.grid.cell_count() {
            return Err(GridError::inconsistent(format!(
                "{} sorted entries for {} cells",
                self.sorted.len(),
                self.grid.cell_count()
            )));
        }

        for (r, row) in self.grid.rows().iter().enumerate() {
            let exact = RowAggregate::of(row);
            let stored = self.aggregates.rows()[r];
            if stored.sum != exact.sum || stored.max < exact.max {
                return Err(GridError::inconsistent(format!(
                    "row {r} aggregate {stored:?}, recomputed {exact:?}"
                )));
            }
        }

        for (coord, cell) in self.grid.iter_cells() {
            if cell.id != coord.to_id(columns) {
                return Err(GridError::inconsistent(format!(
                    "cell at {coord} has id {}",
                    cell.id
                )));
            }
            match self.sorted.entry_for(cell.id) {
                Some(e) if e.value == cell.value && e.coord() == coord => {}
                other => {
                    return Err(GridError::inconsistent(format!(
                        "cell {} at {coord} indexed as {other:?}",
                        cell.id
                    )));
                }
            }
        }

        let expected_columns = if rows == 0 { 0 } else { columns };
        if self.aggregates.percentiles().len() != expected_columns {
            return Err(GridError::inconsistent(format!(
                "{} column percentiles for {expected_columns} columns",
                self.aggregates.percentiles().len()
            )));
        }
        for c in 0..expected_columns {
            let exact = select::percentile(&self.grid.column_values(c), self.aggregates.percentile());
            if self.aggregates.percentiles()[c] != exact {
                return Err(GridError::inconsistent(format!(
                    "column {c} percentile {}, recomputed {exact}",
                    self.aggregates.percentiles()[c]
                )));
            }
        }
        Ok(())
    }
}
