//! Sorted Index: every live cell in ascending value order, plus the inverse
//! `CellId -> rank` map.
//!
//! ## Layout
//!
//! `entries` is a plain vector ordered by value; an entry's `rank` is always
//! its position in that vector. `cell_index` maps each live id to its rank.
//! The two are kept exact inverses after every operation:
//!
//! - insert: lower-bound search (O(log n)), splice, re-rank the tail (O(n))
//! - remove: rank lookup (O(1)), splice out, re-rank the tail (O(n))
//! - update: remove + insert; the sort key changed, so never repositioned in place
//!
//! Ties are placed before existing equal values on insert, and keep grid scan
//! order on rebuild. Neither is semantically meaningful.
//!
//! `row`/`col` on an entry are coordinates for lookups, not part of the order.
//! Row deletion rewrites them (and the ids, which encode them) for every entry
//! below the deleted row.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use rustc_hash::FxHashMap;

use gridstat_common::{Cell, CellCoord, CellId, CellValue, GridError};

use super::grid::{Grid, GridChange};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SortedEntry {
    pub cell_id: CellId,
    pub value: CellValue,
    pub row: usize,
    pub col: usize,
    pub rank: usize,
}

impl SortedEntry {
    #[inline]
    pub fn coord(&self) -> CellCoord {
        CellCoord::new(self.row, self.col)
    }

    #[inline]
    pub fn cell(&self) -> Cell {
        Cell::new(self.cell_id, self.value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SortedIndex {
    entries: Vec<SortedEntry>,
    cell_index: FxHashMap<CellId, usize>,
}

impl SortedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sort every cell of `grid` by value and assign ranks `0..n`.
    pub fn rebuild(grid: &Grid) -> Self {
        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!("sorted_index_rebuild", cells = grid.cell_count()).entered();

        let mut entries: Vec<SortedEntry> = grid
            .iter_cells()
            .map(|(coord, cell)| SortedEntry {
                cell_id: cell.id,
                value: cell.value,
                row: coord.row,
                col: coord.col,
                rank: 0,
            })
            .collect();
        // Stable: equal values keep scan order.
        entries.sort_by_key(|e| e.value);

        let mut index = Self {
            entries,
            cell_index: FxHashMap::default(),
        };
        index.cell_index.reserve(index.entries.len());
        index.rerank_from(0);
        index
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cell_index.clear();
    }

    /// Entries in rank order.
    pub fn entries(&self) -> &[SortedEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SortedEntry> {
        self.entries.iter()
    }

    pub fn get(&self, rank: usize) -> Option<&SortedEntry> {
        self.entries.get(rank)
    }

    pub fn rank_of(&self, id: CellId) -> Option<usize> {
        self.cell_index.get(&id).copied()
    }

    /// Entry for a live id.
    ///
    /// Panics with `InconsistentIndex` if the map points at an entry with a
    /// different id; that can only be a bug in this module.
    pub fn entry_for(&self, id: CellId) -> Option<&SortedEntry> {
        let rank = self.rank_of(id)?;
        match self.entries.get(rank) {
            Some(entry) if entry.cell_id == id => Some(entry),
            other => fatal(GridError::inconsistent(format!(
                "cell {id} maps to rank {rank}, which holds {:?}",
                other.map(|e| e.cell_id)
            ))),
        }
    }

    /// First rank whose value is `>= value`.
    #[inline]
    pub fn lower_bound(&self, value: CellValue) -> usize {
        self.entries.partition_point(|e| e.value < value)
    }

    /// Insert `cell` at its lower-bound position and return its rank.
    pub fn insert(&mut self, cell: Cell, row: usize, col: usize) -> usize {
        let rank = self.lower_bound(cell.value);
        self.entries.insert(
            rank,
            SortedEntry {
                cell_id: cell.id,
                value: cell.value,
                row,
                col,
                rank,
            },
        );
        self.rerank_from(rank);
        rank
    }

    /// Remove the entry for `id`, returning it as it was (with its old rank).
    pub fn remove(&mut self, id: CellId) -> Result<SortedEntry, GridError> {
        let Some(rank) = self.cell_index.remove(&id) else {
            return Err(GridError::unknown_cell(id, self.entries.len()));
        };
        if self.entries.get(rank).map(|e| e.cell_id) != Some(id) {
            fatal(GridError::inconsistent(format!(
                "cell {id} maps to rank {rank} of {}",
                self.entries.len()
            )));
        }
        let entry = self.entries.remove(rank);
        self.rerank_from(rank);
        Ok(entry)
    }

    /// Move `id` to the position matching `value`. Returns its new rank.
    pub fn update(&mut self, id: CellId, value: CellValue) -> Result<usize, GridError> {
        let old = self.remove(id)?;
        Ok(self.insert(Cell::new(id, value), old.row, old.col))
    }

    /// After row `removed_row` is gone: move every later entry up one row and
    /// shift its id down by `columns`. Returns how many entries moved.
    pub fn shift_rows_after(&mut self, removed_row: usize, columns: usize) -> usize {
        let shift = columns as CellId;
        // Old and new id ranges overlap, so drop every stale key before
        // inserting any new one.
        for e in self.entries.iter().filter(|e| e.row > removed_row) {
            self.cell_index.remove(&e.cell_id);
        }
        let mut moved = 0;
        for e in self.entries.iter_mut().filter(|e| e.row > removed_row) {
            e.row -= 1;
            e.cell_id -= shift;
            self.cell_index.insert(e.cell_id, e.rank);
            moved += 1;
        }
        moved
    }

    /// Bring the index in line with `grid`, which already reflects `change`.
    /// Returns the number of entries whose rank or coordinates were rewritten.
    pub fn apply(&mut self, change: &GridChange, grid: &Grid) -> usize {
        match change {
            GridChange::Regenerated => {
                *self = Self::rebuild(grid);
                self.len()
            }
            GridChange::Cleared { .. } => {
                self.clear();
                0
            }
            GridChange::RowAppended { row } => {
                let cells = grid.row(*row).unwrap_or_default();
                cells
                    .iter()
                    .enumerate()
                    .map(|(col, cell)| {
                        let rank = self.insert(*cell, *row, col);
                        self.len() - rank
                    })
                    .sum()
            }
            GridChange::RowRemoved {
                row,
                columns,
                cells,
            } => {
                let mut touched = 0;
                for cell in cells {
                    let removed = self.remove(cell.id).unwrap_or_else(|e| fatal(e));
                    touched += self.len() - removed.rank;
                }
                touched + self.shift_rows_after(*row, *columns)
            }
            GridChange::CellUpdated { id, old, new, .. } => {
                let old_rank = self.rank_of(*id).unwrap_or_else(|| {
                    fatal(GridError::inconsistent(format!(
                        "updated cell {id} (value {old}) is not indexed"
                    )))
                });
                let new_rank = self.update(*id, *new).unwrap_or_else(|e| fatal(e));
                old_rank.abs_diff(new_rank) + 1
            }
        }
    }

    /// Ranks are `0..n`, values are non-decreasing, and the id map is
    /// the exact inverse of the rank order.
    pub fn verify(&self) -> Result<(), GridError> {
        if self.cell_index.len() != self.entries.len() {
            return Err(GridError::inconsistent(format!(
                "{} ids mapped for {} entries",
                self.cell_index.len(),
                self.entries.len()
            )));
        }
        for (i, e) in self.entries.iter().enumerate() {
            if e.rank != i {
                return Err(GridError::inconsistent(format!(
                    "entry at position {i} carries rank {}",
                    e.rank
                )));
            }
            if self.cell_index.get(&e.cell_id) != Some(&i) {
                return Err(GridError::inconsistent(format!(
                    "cell {} at rank {i} maps to {:?}",
                    e.cell_id,
                    self.cell_index.get(&e.cell_id)
                )));
            }
            if i > 0 && self.entries[i - 1].value > e.value {
                return Err(GridError::inconsistent(format!(
                    "value {} at rank {i} follows {}",
                    e.value,
                    self.entries[i - 1].value
                )));
            }
        }
        Ok(())
    }

    fn rerank_from(&mut self, start: usize) {
        for (i, e) in self.entries.iter_mut().enumerate().skip(start) {
            e.rank = i;
            self.cell_index.insert(e.cell_id, i);
        }
    }
}

impl<'a> IntoIterator for &'a SortedIndex {
    type Item = &'a SortedEntry;
    type IntoIter = std::slice::Iter<'a, SortedEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cold]
#[track_caller]
pub(crate) fn fatal(err: GridError) -> ! {
    panic!("{err}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedValues;
    use gridstat_common::GridErrorKind;

    fn values(index: &SortedIndex) -> Vec<CellValue> {
        index.iter().map(|e| e.value).collect()
    }

    fn ids(index: &SortedIndex) -> Vec<CellId> {
        index.iter().map(|e| e.cell_id).collect()
    }

    #[test]
    fn rebuild_orders_by_value_then_scan_order() {
        let grid = Grid::from_values(&[[10, 20], [30, 5], [20, 10]]).unwrap();
        let index = SortedIndex::rebuild(&grid);
        assert_eq!(values(&index), vec![5, 10, 10, 20, 20, 30]);
        assert_eq!(ids(&index), vec![3, 0, 5, 1, 4, 2]);
        assert_eq!(index.rank_of(2), Some(5));
        index.verify().unwrap();
    }

    #[test]
    fn insert_goes_before_equal_values() {
        let grid = Grid::from_values(&[[10, 20, 30]]).unwrap();
        let mut index = SortedIndex::rebuild(&grid);
        let rank = index.insert(Cell::new(99, 20), 1, 0);
        assert_eq!(rank, 1);
        assert_eq!(ids(&index), vec![0, 99, 1, 2]);
        assert_eq!(index.rank_of(1), Some(2));
        index.verify().unwrap();
    }

    #[test]
    fn remove_reranks_tail() {
        let grid = Grid::from_values(&[[40, 10, 30, 20]]).unwrap();
        let mut index = SortedIndex::rebuild(&grid);
        let removed = index.remove(3).unwrap();
        assert_eq!((removed.value, removed.rank), (20, 1));
        assert_eq!(values(&index), vec![10, 30, 40]);
        assert_eq!(index.rank_of(3), None);
        assert_eq!(index.rank_of(0), Some(2));
        index.verify().unwrap();
    }

    #[test]
    fn remove_unknown_is_out_of_range() {
        let mut index = SortedIndex::rebuild(&Grid::from_values(&[[1]]).unwrap());
        assert_eq!(index.remove(7).unwrap_err().kind(), GridErrorKind::OutOfRange);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn update_relocates_and_keeps_coordinates() {
        let grid = Grid::from_values(&[[10, 20], [30, 5]]).unwrap();
        let mut index = SortedIndex::rebuild(&grid);
        let rank = index.update(3, 25).unwrap();
        assert_eq!(rank, 2);
        let e = index.entry_for(3).unwrap();
        assert_eq!((e.value, e.row, e.col, e.rank), (25, 1, 1, 2));
        assert_eq!(values(&index), vec![10, 20, 25, 30]);
        index.verify().unwrap();
    }

    #[test]
    fn apply_row_removal_renumbers_ids_and_rows() {
        let mut grid = Grid::from_values(&[[1, 8], [5, 3], [7, 2]]).unwrap();
        let mut index = SortedIndex::rebuild(&grid);
        let change = grid.remove_row(0).unwrap();
        index.apply(&change, &grid);
        index.verify().unwrap();
        assert_eq!(index, SortedIndex::rebuild(&grid));
        let e = index.entry_for(3).unwrap();
        assert_eq!((e.value, e.row, e.col), (2, 1, 1));
        assert!(index.entry_for(4).is_none());
    }

    #[test]
    fn apply_row_append_inserts_each_cell() {
        let mut grid = Grid::from_values(&[[4, 9]]).unwrap();
        let mut index = SortedIndex::rebuild(&grid);
        let change = grid.append_row(&mut ScriptedValues::new([6, 1])).unwrap();
        let touched = index.apply(&change, &grid);
        assert!(touched >= 2);
        assert_eq!(values(&index), vec![1, 4, 6, 9]);
        assert_eq!(index.entry_for(3).map(|e| e.coord()), Some(CellCoord::new(1, 1)));
        index.verify().unwrap();
    }

    #[test]
    fn apply_update_touches_only_the_span_moved() {
        let grid_values: Vec<Vec<CellValue>> = vec![(0..10).map(|v| v * 10).collect()];
        let mut grid = Grid::from_values(&grid_values).unwrap();
        let mut index = SortedIndex::rebuild(&grid);
        let change = grid.update_cell(0, 2, 35).unwrap();
        assert_eq!(index.apply(&change, &grid), 2);
        index.verify().unwrap();
    }

    #[test]
    fn verify_detects_broken_rank() {
        let mut index = SortedIndex::rebuild(&Grid::from_values(&[[1, 2]]).unwrap());
        index.entries[1].rank = 0;
        assert_eq!(
            index.verify().unwrap_err().kind(),
            GridErrorKind::InconsistentIndex
        );
    }

    #[test]
    #[should_panic(expected = "sorted index is inconsistent")]
    fn entry_for_panics_on_mismatch() {
        let mut index = SortedIndex::rebuild(&Grid::from_values(&[[1, 2]]).unwrap());
        index.cell_index.insert(0, 1);
        let _ = index.entry_for(0);
    }
}
