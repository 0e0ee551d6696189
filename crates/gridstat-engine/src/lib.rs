//! Incrementally maintained numeric grid.
//!
//! A [`engine::GridEngine`] owns an `M x N` grid of bounded integers and keeps
//! three derived views consistent under every edit: per-row sum and max,
//! per-column percentile, and a global value order answering "closest `k`
//! cells" queries. Each edit updates those views in time proportional to the
//! change rather than rescanning the grid.

pub mod engine;
pub mod rng;
pub mod select;

pub use engine::{
    Command, EngineConfig, GridEngine, RowAggregate, RowMaxPolicy, Snapshot, SortedEntry,
};
pub use gridstat_common::{
    Cell, CellCoord, CellId, CellValue, DEFAULT_PERCENTILE, GridError, GridErrorKind,
    MAX_CELL_VALUE, MAX_COLUMNS, MAX_ROWS, RowSum, Settings,
};
pub use rng::{ScriptedValues, SeededValues, ValueSource};
