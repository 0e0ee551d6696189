//! Gridstat engine
//!
//! Keeps a grid, its row aggregates, column percentiles and value-ordered
//! index consistent under incremental edits.

pub mod aggregates;
pub mod change_log;
pub mod grid;
pub mod metrics;
pub mod neighbors;
pub mod pipeline;
pub mod runtime;
pub mod snapshot;
pub mod sorted_index;

#[cfg(test)]
mod tests;

pub use aggregates::{AggregateWork, Aggregates, RowAggregate, RowMaxPolicy};
pub use change_log::{ChangeEvent, ChangeLog, LoggedChange};
pub use grid::{Grid, GridChange};
pub use metrics::{EngineMetrics, MetricsSnapshot};
pub use neighbors::{NeighborWalk, closest};
pub use pipeline::{Command, Transition};
pub use runtime::GridEngine;
pub use snapshot::Snapshot;
pub use sorted_index::{SortedEntry, SortedIndex};

use gridstat_common::{DEFAULT_PERCENTILE, Settings};

/// Configuration for the grid engine
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Dimensions and neighbor count before the first `Generate`.
    pub settings: Settings,
    /// Column percentile, 0..=100.
    pub percentile: u8,
    /// Seed for the default value source.
    pub seed: u64,
    pub row_max_policy: RowMaxPolicy,
    /// Re-check every invariant after each dispatch and panic on a violation.
    pub verify_after_dispatch: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            settings: Settings::default(),
            percentile: DEFAULT_PERCENTILE,
            seed: 0x5EED_6121_D57A_7500,
            row_max_policy: RowMaxPolicy::Monotonic,
            verify_after_dispatch: cfg!(debug_assertions),
        }
    }
}

impl EngineConfig {
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_row_max_policy(mut self, policy: RowMaxPolicy) -> Self {
        self.row_max_policy = policy;
        self
    }

    pub fn with_percentile(mut self, percentile: u8) -> Self {
        self.percentile = percentile.min(100);
        self
    }
}
