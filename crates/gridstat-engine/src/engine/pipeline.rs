//! Mutation Pipeline: one command in, one consistent snapshot out.
//!
//! Order of work for every command:
//!
//! 1. Grid Store mutation. It validates first, so a rejected command returns
//!    before anything is written.
//! 2. Sorted Index and Aggregate Tracker updates, both fed the same
//!    [`GridChange`] and the mutated grid. Neither reads the other's output.
//! 3. Version bump.
//!
//! Steps 2 and 3 cannot fail on valid state; a failure there is an internal
//! inconsistency and panics.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use gridstat_common::{CellCoord, GridError, Settings, validate_dimensions};

use super::aggregates::{AggregateWork, RowMaxPolicy};
use super::grid::GridChange;
use super::snapshot::Snapshot;
use crate::rng::ValueSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Command {
    /// Replace the grid with fresh values at the given size. `closest` is kept.
    Generate { rows: usize, columns: usize },
    /// Change configuration and drop all data; follow with `Generate`.
    /// `closest` is stored as given; clamping is the caller's job.
    SetSettings(Settings),
    AddRow,
    DeleteRow { row: usize },
    /// `value` is clamped to `[0, MAX_CELL_VALUE]` before it is stored.
    UpdateCell { row: usize, column: usize, value: i64 },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Generate { .. } => "Generate",
            Self::SetSettings(_) => "SetSettings",
            Self::AddRow => "AddRow",
            Self::DeleteRow { .. } => "DeleteRow",
            Self::UpdateCell { .. } => "UpdateCell",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Generate { rows, columns } => write!(f, "Generate(rows={rows}, columns={columns})"),
            Self::SetSettings(s) => write!(
                f,
                "SetSettings(rows={}, columns={}, closest={})",
                s.rows, s.columns, s.closest
            ),
            Self::AddRow => f.write_str("AddRow"),
            Self::DeleteRow { row } => write!(f, "DeleteRow(row={row})"),
            Self::UpdateCell { row, column, value } => {
                write!(f, "UpdateCell(row={row}, column={column}, value={value})")
            }
        }
    }
}

/// What one committed command did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub change: GridChange,
    pub previous_settings: Settings,
    /// Sorted entries whose rank or coordinates were rewritten.
    pub entries_touched: usize,
    pub aggregates: AggregateWork,
}

/// Check `command` against `snapshot` without applying it.
///
/// Returns exactly the error [`apply`] would return, so a caller can grey
/// out an action before dispatching it.
pub fn validate(snapshot: &Snapshot, command: &Command) -> Result<(), GridError> {
    let grid = snapshot.grid();
    match *command {
        Command::Generate { rows, columns } => validate_dimensions(rows, columns),
        Command::SetSettings(settings) => settings.validate(),
        Command::AddRow => validate_dimensions(grid.row_count() + 1, grid.column_count()),
        Command::DeleteRow { row } => grid.check_row(row),
        Command::UpdateCell { row, column, .. } => CellCoord::new(row, column)
            .check_within(grid.row_count(), grid.column_count())
            .map(drop),
    }
}

/// Apply `command` to `snapshot` in place.
///
/// On `Err` the snapshot is exactly as it was.
pub fn apply(
    snapshot: &mut Snapshot,
    command: &Command,
    source: &mut dyn ValueSource,
    policy: RowMaxPolicy,
) -> Result<Transition, GridError> {
    let previous_settings = snapshot.settings;

    let change = match *command {
        Command::Generate { rows, columns } => {
            let change = snapshot.grid.generate(rows, columns, source)?;
            snapshot.settings.rows = rows;
            snapshot.settings.columns = columns;
            change
        }
        Command::SetSettings(settings) => {
            settings.validate()?;
            snapshot.settings = settings;
            snapshot.grid.clear(settings.columns)
        }
        Command::AddRow => {
            let change = snapshot.grid.append_row(source)?;
            snapshot.settings.rows = snapshot.grid.row_count();
            change
        }
        Command::DeleteRow { row } => {
            let change = snapshot.grid.remove_row(row)?;
            snapshot.settings.rows = snapshot.grid.row_count();
            change
        }
        Command::UpdateCell { row, column, value } => {
            snapshot.grid.update_cell(row, column, value)?
        }
    };

    let entries_touched = snapshot.sorted.apply(&change, &snapshot.grid);
    let aggregates = snapshot.aggregates.apply(&change, &snapshot.grid, policy);
    snapshot.version += 1;

    Ok(Transition {
        change,
        previous_settings,
        entries_touched,
        aggregates,
    })
}

/// Pure form of [`apply`]: `previous` is left untouched.
pub fn transition(
    previous: &Snapshot,
    command: &Command,
    source: &mut dyn ValueSource,
    policy: RowMaxPolicy,
) -> Result<(Snapshot, Transition), GridError> {
    let mut next = previous.clone();
    let transition = apply(&mut next, command, source, policy)?;
    Ok((next, transition))
}
