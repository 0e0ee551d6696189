//! Grid Store: the `rows x columns` matrix of cells.
//!
//! Every mutation validates its arguments before touching any cell and then
//! reports a [`GridChange`] describing exactly what moved, carrying the prior
//! values the aggregate and sorted-index updaters need. Downstream code never
//! has to diff a "before" grid.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use gridstat_common::{
    Axis, Cell, CellCoord, CellId, CellValue, GridError, clamp_value,
    validate_dimensions,
};

use crate::rng::ValueSource;

/// What a grid mutation did. Fed verbatim to the derived-state updaters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridChange {
    /// Whole grid replaced; ids restart at zero.
    Regenerated,
    /// Grid emptied (settings changed); `columns` is the new width.
    Cleared { columns: usize },
    /// A row was appended at index `row`.
    RowAppended { row: usize },
    /// The row at `row` was removed. `cells` hold their pre-removal ids;
    /// every later row had its ids shifted down by `columns`.
    RowRemoved {
        row: usize,
        columns: usize,
        cells: Vec<Cell>,
    },
    /// A single value changed. `new` is the stored (clamped) value.
    CellUpdated {
        coord: CellCoord,
        id: CellId,
        old: CellValue,
        new: CellValue,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Grid {
    rows: Vec<Vec<Cell>>,
    columns: usize,
}

impl Grid {
    /// An empty grid that will grow rows `columns` wide.
    pub fn new(columns: usize) -> Self {
        Self {
            rows: Vec::new(),
            columns,
        }
    }

    /// Build a grid from explicit values. Ids are assigned densely row-major.
    pub fn from_values<R: AsRef<[CellValue]>>(values: &[R]) -> Result<Self, GridError> {
        let columns = values.first().map(|r| r.as_ref().len()).unwrap_or(0);
        validate_dimensions(values.len(), columns)?;
        let mut rows = Vec::with_capacity(values.len());
        for (r, row) in values.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != columns {
                return Err(GridError::InvalidDimension {
                    axis: Axis::Column,
                    value: row.len(),
                    max: columns,
                });
            }
            let start = (r * columns) as CellId;
            rows.push(
                row.iter()
                    .enumerate()
                    .map(|(c, &v)| Cell::new(start + c as CellId, clamp_value(v as i64)))
                    .collect(),
            );
        }
        Ok(Self { rows, columns })
    }

    #[inline]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn column_count(&self) -> usize {
        self.columns
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.rows.len() * self.columns
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row(&self, row: usize) -> Option<&[Cell]> {
        self.rows.get(row).map(Vec::as_slice)
    }

    pub fn cell(&self, coord: CellCoord) -> Option<&Cell> {
        self.rows.get(coord.row).and_then(|r| r.get(coord.col))
    }

    /// Values of column `col` in row order.
    ///
    /// Panics if `col` is not below `column_count()`.
    pub fn column_values(&self, col: usize) -> Vec<CellValue> {
        assert!(
            col < self.columns,
            "column {col} out of range for {} columns",
            self.columns
        );
        self.rows.iter().map(|r| r[col].value).collect()
    }

    /// Every cell with its coordinate, row-major.
    pub fn iter_cells(&self) -> impl Iterator<Item = (CellCoord, Cell)> + '_ {
        self.rows.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .map(move |(c, cell)| (CellCoord::new(r, c), *cell))
        })
    }

    pub fn check_row(&self, row: usize) -> Result<(), GridError> {
        if row >= self.rows.len() {
            return Err(GridError::row_out_of_range(row, self.rows.len()));
        }
        Ok(())
    }

    /// Replace the grid with `rows x columns` fresh cells, ids `0..rows*columns`.
    pub fn generate(
        &mut self,
        rows: usize,
        columns: usize,
        source: &mut dyn ValueSource,
    ) -> Result<GridChange, GridError> {
        validate_dimensions(rows, columns)?;
        self.columns = columns;
        self.rows = (0..rows)
            .map(|r| generate_row(columns, (r * columns) as CellId, source))
            .collect();
        Ok(GridChange::Regenerated)
    }

    /// Drop every row and adopt a new width.
    pub fn clear(&mut self, columns: usize) -> GridChange {
        self.rows.clear();
        self.columns = columns;
        GridChange::Cleared { columns }
    }

    /// Append one generated row; its ids continue the existing numbering.
    pub fn append_row(&mut self, source: &mut dyn ValueSource) -> Result<GridChange, GridError> {
        let row = self.rows.len();
        validate_dimensions(row + 1, self.columns)?;
        let start = (row * self.columns) as CellId;
        self.rows.push(generate_row(self.columns, start, source));
        Ok(GridChange::RowAppended { row })
    }

    /// Remove row `row` and renumber every later row so ids stay `row * columns + col`.
    pub fn remove_row(&mut self, row: usize) -> Result<GridChange, GridError> {
        self.check_row(row)?;
        let removed = self.rows.remove(row);
        let shift = self.columns as CellId;
        for later in &mut self.rows[row..] {
            for cell in later.iter_mut() {
                cell.id -= shift;
            }
        }
        Ok(GridChange::RowRemoved {
            row,
            columns: self.columns,
            cells: removed,
        })
    }

    /// Write `value` (clamped to `[0, MAX_CELL_VALUE]`) at `(row, col)`.
    pub fn update_cell(
        &mut self,
        row: usize,
        col: usize,
        value: i64,
    ) -> Result<GridChange, GridError> {
        let coord = CellCoord::new(row, col).check_within(self.rows.len(), self.columns)?;
        let new = clamp_value(value);
        let cell = &mut self.rows[row][col];
        let old = std::mem::replace(&mut cell.value, new);
        Ok(GridChange::CellUpdated {
            coord,
            id: cell.id,
            old,
            new,
        })
    }
}

fn generate_row(columns: usize, start_id: CellId, source: &mut dyn ValueSource) -> Vec<Cell> {
    (0..columns)
        .map(|c| Cell::new(start_id + c as CellId, source.next_value()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedValues;
    use gridstat_common::{GridErrorKind, MAX_CELL_VALUE, MAX_ROWS};

    fn ids(grid: &Grid) -> Vec<Vec<CellId>> {
        grid.rows()
            .iter()
            .map(|r| r.iter().map(|c| c.id).collect())
            .collect()
    }

    #[test]
    fn generate_assigns_dense_ids() {
        let mut grid = Grid::default();
        let mut src = ScriptedValues::new(0..12);
        assert_eq!(grid.generate(3, 4, &mut src).unwrap(), GridChange::Regenerated);
        assert_eq!(
            ids(&grid),
            vec![vec![0, 1, 2, 3], vec![4, 5, 6, 7], vec![8, 9, 10, 11]]
        );
        assert_eq!(grid.column_values(1), vec![1, 5, 9]);
        assert_eq!(src.consumed(), 12);
    }

    #[test]
    fn generate_rejects_bad_dimensions_without_touching() {
        let mut grid = Grid::from_values(&[[1, 2]]).unwrap();
        let before = grid.clone();
        let err = grid.generate(0, 3, &mut ScriptedValues::default()).unwrap_err();
        assert_eq!(err.kind(), GridErrorKind::InvalidDimension);
        assert_eq!(grid, before);
    }

    #[test]
    fn append_continues_numbering() {
        let mut grid = Grid::from_values(&[[1, 2, 3], [4, 5, 6]]).unwrap();
        let change = grid.append_row(&mut ScriptedValues::new([7, 8, 9])).unwrap();
        assert_eq!(change, GridChange::RowAppended { row: 2 });
        assert_eq!(ids(&grid)[2], vec![6, 7, 8]);
        assert_eq!(grid.column_values(2), vec![3, 6, 9]);
    }

    #[test]
    fn remove_row_renumbers_later_rows() {
        let mut grid = Grid::from_values(&[[1, 2], [3, 4], [5, 6], [7, 8]]).unwrap();
        let change = grid.remove_row(1).unwrap();
        assert_eq!(
            change,
            GridChange::RowRemoved {
                row: 1,
                columns: 2,
                cells: vec![Cell::new(2, 3), Cell::new(3, 4)],
            }
        );
        assert_eq!(ids(&grid), vec![vec![0, 1], vec![2, 3], vec![4, 5]]);
        assert_eq!(grid.column_values(0), vec![1, 5, 7]);
    }

    #[test]
    fn remove_row_out_of_range() {
        let mut grid = Grid::from_values(&[[1]]).unwrap();
        let err = grid.remove_row(1).unwrap_err();
        assert_eq!(err, GridError::row_out_of_range(1, 1));
        assert_eq!(grid.row_count(), 1);
    }

    #[test]
    fn update_clamps_and_reports_old() {
        let mut grid = Grid::from_values(&[[10, 20], [30, 5]]).unwrap();
        let change = grid.update_cell(1, 0, 1_000).unwrap();
        assert_eq!(
            change,
            GridChange::CellUpdated {
                coord: CellCoord::new(1, 0),
                id: 2,
                old: 30,
                new: MAX_CELL_VALUE,
            }
        );
        let change = grid.update_cell(0, 1, -4).unwrap();
        assert!(matches!(change, GridChange::CellUpdated { old: 20, new: 0, .. }));
    }

    #[test]
    fn update_out_of_range_axis() {
        let mut grid = Grid::from_values(&[[10, 20]]).unwrap();
        assert_eq!(
            grid.update_cell(0, 2, 1).unwrap_err(),
            GridError::column_out_of_range(2, 2)
        );
        assert_eq!(
            grid.update_cell(1, 0, 1).unwrap_err(),
            GridError::row_out_of_range(1, 1)
        );
    }

    #[test]
    #[should_panic(expected = "column 2 out of range for 2 columns")]
    fn column_values_rejects_out_of_range() {
        let grid = Grid::from_values(&[[1, 2], [3, 4]]).unwrap();
        let _ = grid.column_values(2);
    }

    #[test]
    fn column_values_of_empty_grid() {
        assert!(Grid::new(3).column_values(2).is_empty());
    }

    #[test]
    fn from_values_rejects_ragged() {
        let rows: Vec<Vec<CellValue>> = vec![vec![1, 2], vec![3]];
        assert!(Grid::from_values(&rows).is_err());
    }

    #[test]
    fn append_stops_at_max_rows() {
        let mut grid = Grid::new(1);
        let mut src = ScriptedValues::new([1]);
        for _ in 0..MAX_ROWS {
            grid.append_row(&mut src).unwrap();
        }
        let err = grid.append_row(&mut src).unwrap_err();
        assert_eq!(err.kind(), GridErrorKind::InvalidDimension);
        assert_eq!(grid.row_count(), MAX_ROWS);
    }

    #[test]
    fn append_on_zero_width_grid_is_invalid() {
        let mut grid = Grid::new(0);
        assert!(grid.append_row(&mut ScriptedValues::default()).is_err());
        assert!(grid.is_empty());
    }
}
