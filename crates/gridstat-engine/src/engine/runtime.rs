use std::sync::Arc;

use gridstat_common::{GridError, Settings};

use super::EngineConfig;
use super::change_log::{ChangeEvent, ChangeLog};
use super::grid::GridChange;
use super::metrics::EngineMetrics;
use super::pipeline::{self, Command};
use super::snapshot::Snapshot;
use super::sorted_index::fatal;
use crate::rng::{SeededValues, ValueSource};

/// Single-writer front end over the mutation pipeline.
///
/// Commands run one at a time and either fully apply or are rejected before
/// anything changes. Readers take an `Arc<Snapshot>` via [`GridEngine::snapshot`];
/// the next dispatch clones the state only while such a reader is still
/// holding the previous one.
///
/// # Example
///
/// ```
/// use gridstat_engine::engine::{EngineConfig, GridEngine};
/// use gridstat_engine::rng::ScriptedValues;
///
/// let mut engine =
///     GridEngine::with_source(EngineConfig::default(), ScriptedValues::new([10, 20, 30, 5]));
/// let snap = engine.generate(2, 2).unwrap();
/// assert_eq!(snap.row_sum(1).unwrap(), 35);
///
/// let near = snap.closest_to(3, 1).unwrap();
/// assert_eq!(near[0].cell_id, 0);
/// ```
pub struct GridEngine {
    current: Arc<Snapshot>,
    source: Box<dyn ValueSource + Send>,
    config: EngineConfig,
    log: ChangeLog,
    metrics: Arc<EngineMetrics>,
}

impl std::fmt::Debug for GridEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridEngine")
            .field("version", &self.current.version())
            .field("settings", &self.current.settings())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for GridEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl GridEngine {
    /// Engine drawing values from a `SmallRng` seeded with `config.seed`.
    pub fn new(config: EngineConfig) -> Self {
        let source = SeededValues::new(config.seed);
        Self::with_source(config, source)
    }

    pub fn with_source<S>(config: EngineConfig, source: S) -> Self
    where
        S: ValueSource + Send + 'static,
    {
        Self {
            current: Arc::new(Snapshot::empty(config.settings, config.percentile)),
            source: Box::new(source),
            config,
            log: ChangeLog::new(),
            metrics: Arc::new(EngineMetrics::new()),
        }
    }

    /// The last committed snapshot.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.current)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn change_log(&self) -> &ChangeLog {
        &self.log
    }

    pub fn change_log_mut(&mut self) -> &mut ChangeLog {
        &mut self.log
    }

    pub fn metrics(&self) -> &Arc<EngineMetrics> {
        &self.metrics
    }

    /// Swap the value source, e.g. to reseed between scenarios.
    pub fn set_source<S>(&mut self, source: S)
    where
        S: ValueSource + Send + 'static,
    {
        self.source = Box::new(source);
    }

    /// Apply one command and return the new snapshot.
    ///
    /// A rejected command is checked against the current snapshot before
    /// anything is cloned, so `snapshot()` keeps returning the same `Arc`.
    pub fn dispatch(&mut self, command: Command) -> Result<Arc<Snapshot>, GridError> {
        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!("dispatch", command = %command).entered();

        let policy = self.config.row_max_policy;
        let applied = pipeline::validate(&self.current, &command).and_then(|()| {
            pipeline::apply(
                Arc::make_mut(&mut self.current),
                &command,
                self.source.as_mut(),
                policy,
            )
        });
        let transition = match applied {
            Ok(t) => t,
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(%err, "command rejected");
                self.metrics.record_rejection();
                return Err(err);
            }
        };

        let next = &*self.current;
        if self.config.verify_after_dispatch {
            if let Err(err) = next.verify() {
                fatal(err);
            }
        }

        let rebuilt = matches!(transition.change, GridChange::Regenerated);
        self.metrics.record_transition(&transition, rebuilt);
        self.log.record(
            next.version(),
            ChangeEvent::from_transition(&transition, next.settings()),
        );

        #[cfg(feature = "tracing")]
        tracing::trace!(
            version = next.version(),
            entries_touched = transition.entries_touched,
            columns_recomputed = transition.aggregates.columns_recomputed,
            "command applied"
        );

        Ok(self.snapshot())
    }

    pub fn generate(&mut self, rows: usize, columns: usize) -> Result<Arc<Snapshot>, GridError> {
        self.dispatch(Command::Generate { rows, columns })
    }

    /// Re-generate at the currently configured size.
    pub fn regenerate(&mut self) -> Result<Arc<Snapshot>, GridError> {
        let Settings { rows, columns, .. } = self.current.settings();
        self.generate(rows, columns)
    }

    pub fn set_settings(&mut self, settings: Settings) -> Result<Arc<Snapshot>, GridError> {
        self.dispatch(Command::SetSettings(settings))
    }

    pub fn add_row(&mut self) -> Result<Arc<Snapshot>, GridError> {
        self.dispatch(Command::AddRow)
    }

    pub fn delete_row(&mut self, row: usize) -> Result<Arc<Snapshot>, GridError> {
        self.dispatch(Command::DeleteRow { row })
    }

    pub fn update_cell(
        &mut self,
        row: usize,
        column: usize,
        value: i64,
    ) -> Result<Arc<Snapshot>, GridError> {
        self.dispatch(Command::UpdateCell { row, column, value })
    }

    /// Bump the cell at `(row, column)` by one (clamped at `MAX_CELL_VALUE`).
    pub fn increment_cell(&mut self, row: usize, column: usize) -> Result<Arc<Snapshot>, GridError> {
        let cell = self.current.cell_at(row, column)?;
        self.update_cell(row, column, i64::from(cell.value) + 1)
    }
}
