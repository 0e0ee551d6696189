//! Order-statistic selection (quickselect) and the column percentile built on it.
//!
//! Partitioning is three-way so long runs of equal values (common with bounded
//! cell values) collapse in one pass instead of degrading to quadratic time.

use gridstat_common::CellValue;

/// Rearranges `values` and returns its `k`-th smallest element (zero-based).
///
/// Expected linear time. Ties are interchangeable: which of several equal
/// elements ends up at `k` is unspecified, the returned value is not.
///
/// Panics if `k >= values.len()`.
pub fn select_nth(values: &mut [CellValue], k: usize) -> CellValue {
    assert!(
        k < values.len(),
        "select_nth: k={k} out of bounds for {} values",
        values.len()
    );

    let mut lo = 0usize;
    let mut hi = values.len();
    loop {
        if hi - lo == 1 {
            return values[lo];
        }
        let pivot = median_of_three(values, lo, hi - 1);
        let (lt, gt) = partition3(&mut values[lo..hi], pivot);
        let (lt, gt) = (lo + lt, lo + gt);
        if k < lt {
            hi = lt;
        } else if k >= gt {
            lo = gt;
        } else {
            return pivot;
        }
    }
}

/// Value at rank `floor(p/100 * (n-1))` of `values`; 0 when empty.
///
/// Works on a scratch copy so the caller's order is untouched.
pub fn percentile(values: &[CellValue], p: u8) -> CellValue {
    let n = values.len();
    if n == 0 {
        return 0;
    }
    let mut scratch = values.to_vec();
    select_nth(&mut scratch, percentile_rank(n, p))
}

/// Rank selected for percentile `p` over `n > 0` values.
#[inline]
pub fn percentile_rank(n: usize, p: u8) -> usize {
    debug_assert!(n > 0);
    (usize::from(p.min(100)) * (n - 1)) / 100
}

fn median_of_three(values: &[CellValue], lo: usize, hi: usize) -> CellValue {
    let mid = lo + (hi - lo) / 2;
    let (a, b, c) = (values[lo], values[mid], values[hi]);
    if (a <= b && b <= c) || (c <= b && b <= a) {
        b
    } else if (b <= a && a <= c) || (c <= a && a <= b) {
        a
    } else {
        c
    }
}

/// Dutch-flag partition. Returns `(lt, gt)` such that `[..lt] < pivot`,
/// `[lt..gt] == pivot` and `[gt..] > pivot`.
fn partition3(values: &mut [CellValue], pivot: CellValue) -> (usize, usize) {
    let mut lt = 0;
    let mut i = 0;
    let mut gt = values.len();
    while i < gt {
        if values[i] < pivot {
            values.swap(lt, i);
            lt += 1;
            i += 1;
        } else if values[i] > pivot {
            gt -= 1;
            values.swap(i, gt);
        } else {
            i += 1;
        }
    }
    (lt, gt)
}
