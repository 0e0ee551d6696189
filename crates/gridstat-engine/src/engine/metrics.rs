//! Lightweight counters for how much work each command did.

use std::sync::atomic::{AtomicU64, Ordering};

use super::pipeline::Transition;

/// Counters collected across dispatches. Shared via `Arc` so a host can read
/// them from another thread while the engine keeps running.
#[derive(Debug, Default)]
pub struct EngineMetrics {
    pub commands_applied: AtomicU64,
    pub commands_rejected: AtomicU64,
    pub full_rebuilds: AtomicU64,
    pub sorted_entries_touched: AtomicU64,
    pub rows_recomputed: AtomicU64,
    pub percentiles_recomputed: AtomicU64,
}

impl EngineMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_transition(&self, t: &Transition, rebuilt: bool) {
        self.commands_applied.fetch_add(1, Ordering::Relaxed);
        if rebuilt {
            self.full_rebuilds.fetch_add(1, Ordering::Relaxed);
        }
        self.sorted_entries_touched
            .fetch_add(t.entries_touched as u64, Ordering::Relaxed);
        self.rows_recomputed
            .fetch_add(t.aggregates.rows_recomputed as u64, Ordering::Relaxed);
        self.percentiles_recomputed
            .fetch_add(t.aggregates.columns_recomputed as u64, Ordering::Relaxed);
    }

    pub fn record_rejection(&self) {
        self.commands_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            commands_applied: self.commands_applied.load(Ordering::Relaxed),
            commands_rejected: self.commands_rejected.load(Ordering::Relaxed),
            full_rebuilds: self.full_rebuilds.load(Ordering::Relaxed),
            sorted_entries_touched: self.sorted_entries_touched.load(Ordering::Relaxed),
            rows_recomputed: self.rows_recomputed.load(Ordering::Relaxed),
            percentiles_recomputed: self.percentiles_recomputed.load(Ordering::Relaxed),
        }
    }

    pub fn reset(&self) {
        self.commands_applied.store(0, Ordering::Relaxed);
        self.commands_rejected.store(0, Ordering::Relaxed);
        self.full_rebuilds.store(0, Ordering::Relaxed);
        self.sorted_entries_touched.store(0, Ordering::Relaxed);
        self.rows_recomputed.store(0, Ordering::Relaxed);
        self.percentiles_recomputed.store(0, Ordering::Relaxed);
    }
}

/// Plain copy of the counters at one point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub commands_applied: u64,
    pub commands_rejected: u64,
    pub full_rebuilds: u64,
    pub sorted_entries_touched: u64,
    pub rows_recomputed: u64,
    pub percentiles_recomputed: u64,
}

impl MetricsSnapshot {
    /// Counter growth between `earlier` and `self`. Counters reset in between
    /// read as zero rather than wrapping.
    pub fn since(&self, earlier: &MetricsSnapshot) -> MetricsSnapshot {
        MetricsSnapshot {
            commands_applied: self.commands_applied.saturating_sub(earlier.commands_applied),
            commands_rejected: self.commands_rejected.saturating_sub(earlier.commands_rejected),
            full_rebuilds: self.full_rebuilds.saturating_sub(earlier.full_rebuilds),
            sorted_entries_touched: self.sorted_entries_touched.saturating_sub(earlier.sorted_entries_touched),
            rows_recomputed: self.rows_recomputed.saturating_sub(earlier.rows_recomputed),
            percentiles_recomputed: self.percentiles_recomputed.saturating_sub(earlier.percentiles_recomputed),
        }
    }
}
