//! Pluggable sources for freshly generated cell values.
//!
//! Generation (`generate`, `append_row`) is the only nondeterminism in the
//! engine, so it always goes through a [`ValueSource`]. The default is a seeded
//! `SmallRng`; tests script exact values with [`ScriptedValues`].

use gridstat_common::{CellValue, MAX_CELL_VALUE};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

pub trait ValueSource {
    /// Next value, uniformly in `[0, MAX_CELL_VALUE)` for random sources.
    fn next_value(&mut self) -> CellValue;
}

impl<F> ValueSource for F
where
    F: FnMut() -> CellValue,
{
    fn next_value(&mut self) -> CellValue {
        self()
    }
}

/// Seeded pseudorandom values. Same seed, same grid.
#[derive(Debug, Clone)]
pub struct SeededValues {
    rng: SmallRng,
}

impl SeededValues {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl ValueSource for SeededValues {
    fn next_value(&mut self) -> CellValue {
        self.rng.gen_range(0..MAX_CELL_VALUE)
    }
}

/// Replays a fixed sequence, wrapping around when exhausted.
///
/// Values are clamped to `MAX_CELL_VALUE` so a script cannot produce an
/// out-of-range cell. An empty script yields zeros.
#[derive(Debug, Clone, Default)]
pub struct ScriptedValues {
    values: Vec<CellValue>,
    cursor: usize,
}

impl ScriptedValues {
    pub fn new<I: IntoIterator<Item = CellValue>>(values: I) -> Self {
        Self {
            values: values
                .into_iter()
                .map(|v| v.min(MAX_CELL_VALUE))
                .collect(),
            cursor: 0,
        }
    }

    /// How many values have been handed out so far.
    pub fn consumed(&self) -> usize {
        self.cursor
    }
}

impl ValueSource for ScriptedValues {
    fn next_value(&mut self) -> CellValue {
        if self.values.is_empty() {
            return 0;
        }
        let v = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        v
    }
}
