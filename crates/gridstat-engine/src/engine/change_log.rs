//! Change log of committed commands
//!
//! This module provides:
//! - ChangeLog: ordered record of every committed command's effect
//! - ChangeEvent: what a single command changed, in terms a renderer can act on

use gridstat_common::{Cell, CellCoord, CellId, CellValue, Settings};

use super::grid::GridChange;
use super::pipeline::Transition;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    Generated {
        rows: usize,
        columns: usize,
    },
    SettingsChanged {
        old: Settings,
        new: Settings,
    },
    RowAppended {
        row: usize,
        first_id: CellId,
    },
    /// `removed` carries the ids the cells had before deletion.
    RowDeleted {
        row: usize,
        removed: Vec<Cell>,
    },
    CellUpdated {
        coord: CellCoord,
        id: CellId,
        old: CellValue,
        new: CellValue,
    },
}

impl ChangeEvent {
    pub fn from_transition(t: &Transition, settings: Settings) -> Self {
        match &t.change {
            GridChange::Regenerated => Self::Generated {
                rows: settings.rows,
                columns: settings.columns,
            },
            GridChange::Cleared { .. } => Self::SettingsChanged {
                old: t.previous_settings,
                new: settings,
            },
            GridChange::RowAppended { row } => Self::RowAppended {
                row: *row,
                first_id: (row * settings.columns) as CellId,
            },
            GridChange::RowRemoved { row, cells, .. } => Self::RowDeleted {
                row: *row,
                removed: cells.clone(),
            },
            GridChange::CellUpdated {
                coord,
                id,
                old,
                new,
            } => Self::CellUpdated {
                coord: *coord,
                id: *id,
                old: *old,
                new: *new,
            },
        }
    }
}

/// An event tagged with the snapshot version it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggedChange {
    pub version: u64,
    pub event: ChangeEvent,
}

#[derive(Debug, Default)]
pub struct ChangeLog {
    events: Vec<LoggedChange>,
    enabled: bool,
}

impl ChangeLog {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            enabled: true,
        }
    }

    pub fn record(&mut self, version: u64, event: ChangeEvent) {
        if self.enabled {
            self.events.push(LoggedChange { version, event });
        }
    }

    pub fn events(&self) -> &[LoggedChange] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Extract events from index to end
    pub fn take_from(&mut self, index: usize) -> Vec<LoggedChange> {
        self.events.split_off(index.min(self.events.len()))
    }

    /// Drain everything recorded since the last drain.
    pub fn drain(&mut self) -> Vec<LoggedChange> {
        std::mem::take(&mut self.events)
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_log_drops_events() {
        let mut log = ChangeLog::new();
        log.record(1, ChangeEvent::Generated { rows: 1, columns: 1 });
        log.set_enabled(false);
        log.record(2, ChangeEvent::Generated { rows: 2, columns: 2 });
        assert_eq!(log.len(), 1);
        assert_eq!(log.events()[0].version, 1);
    }

    #[test]
    fn take_from_splits_tail() {
        let mut log = ChangeLog::new();
        for v in 1..=4 {
            log.record(v, ChangeEvent::Generated { rows: 1, columns: 1 });
        }
        let tail = log.take_from(2);
        assert_eq!(tail.iter().map(|e| e.version).collect::<Vec<_>>(), vec![3, 4]);
        assert_eq!(log.len(), 2);
        assert!(log.take_from(10).is_empty());
        assert_eq!(log.drain().len(), 2);
        assert!(log.is_empty());
    }

    #[test]
    fn default_log_starts_disabled() {
        let log = ChangeLog::default();
        assert!(!log.is_enabled());
        assert!(ChangeLog::new().is_enabled());
    }
}
