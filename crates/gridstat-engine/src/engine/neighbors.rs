//! Neighbor Query: the `k` cells whose values are closest to a target cell.
//!
//! Walks outward from the target's rank with two cursors instead of scanning
//! the grid. Each step takes whichever side is closer in value; on a tie the
//! left (lower-value) side wins. Cost is O(k) after the O(1) rank lookup.

use gridstat_common::{CellId, CellValue, GridError};

use super::sorted_index::{SortedEntry, SortedIndex};

/// Lazy outward walk from a target entry, nearest values first. Never yields
/// the target itself.
#[derive(Debug, Clone)]
pub struct NeighborWalk<'a> {
    entries: &'a [SortedEntry],
    center: CellValue,
    /// Next candidate on the left is `left - 1`; exhausted at 0.
    left: usize,
    right: usize,
}

impl<'a> NeighborWalk<'a> {
    pub fn new(index: &'a SortedIndex, target: CellId) -> Result<Self, GridError> {
        let entry = index
            .entry_for(target)
            .ok_or_else(|| GridError::unknown_cell(target, index.len()))?;
        Ok(Self {
            entries: index.entries(),
            center: entry.value,
            left: entry.rank,
            right: entry.rank + 1,
        })
    }

    fn distance(&self, rank: usize) -> CellValue {
        self.entries[rank].value.abs_diff(self.center)
    }
}

impl<'a> Iterator for NeighborWalk<'a> {
    type Item = &'a SortedEntry;

    fn next(&mut self) -> Option<Self::Item> {
        let has_left = self.left > 0;
        let has_right = self.right < self.entries.len();
        let take_left = match (has_left, has_right) {
            (false, false) => return None,
            (true, false) => true,
            (false, true) => false,
            (true, true) => self.distance(self.left - 1) <= self.distance(self.right),
        };
        if take_left {
            self.left -= 1;
            Some(&self.entries[self.left])
        } else {
            self.right += 1;
            Some(&self.entries[self.right - 1])
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.left + (self.entries.len() - self.right);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for NeighborWalk<'_> {}

/// Up to `k` entries closest in value to `target`, nearest first.
///
/// `k == 0` yields nothing without looking the target up. Otherwise an
/// unknown id is `OutOfRange`. Fewer than `k` entries come back when the grid
/// has fewer than `k + 1` cells.
pub fn closest(index: &SortedIndex, target: CellId, k: usize) -> Result<Vec<SortedEntry>, GridError> {
    if k == 0 {
        return Ok(Vec::new());
    }
    Ok(NeighborWalk::new(index, target)?.take(k).copied().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::grid::Grid;
    use gridstat_common::GridErrorKind;

    fn index(values: &[CellValue]) -> SortedIndex {
        SortedIndex::rebuild(&Grid::from_values(&[values]).unwrap())
    }

    fn closest_values(index: &SortedIndex, target: CellId, k: usize) -> Vec<CellValue> {
        closest(index, target, k).unwrap().iter().map(|e| e.value).collect()
    }

    #[test]
    fn walks_outward_by_distance() {
        // ids:          0   1   2   3   4   5
        let idx = index(&[50, 48, 53, 40, 70, 51]);
        assert_eq!(closest_values(&idx, 0, 3), vec![51, 48, 53]);
        assert_eq!(closest_values(&idx, 0, 5), vec![51, 48, 53, 40, 70]);
    }

    #[test]
    fn tie_prefers_lower_value() {
        let idx = index(&[10, 8, 12]);
        assert_eq!(closest_values(&idx, 0, 1), vec![8]);
        assert_eq!(closest_values(&idx, 0, 2), vec![8, 12]);
    }

    #[test]
    fn equal_values_are_distance_zero() {
        let idx = index(&[7, 7, 7, 3]);
        let got = closest(&idx, 1, 2).unwrap();
        assert!(got.iter().all(|e| e.value == 7 && e.cell_id != 1));
    }

    #[test]
    fn zero_k_is_empty_even_for_unknown_target() {
        let idx = index(&[1, 2]);
        assert!(closest(&idx, 0, 0).unwrap().is_empty());
        assert!(closest(&idx, 99, 0).unwrap().is_empty());
    }

    #[test]
    fn caps_at_other_cells_and_excludes_target() {
        let idx = index(&[5, 1, 9, 3]);
        let got = closest(&idx, 2, 10).unwrap();
        assert_eq!(got.len(), 3);
        assert!(got.iter().all(|e| e.cell_id != 2));
    }

    #[test]
    fn unknown_target_is_out_of_range() {
        let idx = index(&[5, 1]);
        assert_eq!(
            closest(&idx, 2, 1).unwrap_err().kind(),
            GridErrorKind::OutOfRange
        );
    }

    #[test]
    fn walk_reports_exact_size() {
        let idx = index(&[5, 1, 9, 3]);
        let walk = NeighborWalk::new(&idx, 0).unwrap();
        assert_eq!(walk.len(), 3);
        assert_eq!(walk.count(), 3);
    }

    #[test]
    fn edges_fall_through_to_one_side() {
        let idx = index(&[1, 2, 3, 4]);
        assert_eq!(closest_values(&idx, 0, 3), vec![2, 3, 4]);
        assert_eq!(closest_values(&idx, 3, 3), vec![3, 2, 1]);
    }
}
