//! Meta crate that re-exports the gridstat building blocks. Depend on this
//! crate for the full engine, or switch off default features and pick
//! `common` alone when only the shared types and errors are needed.

#[cfg(feature = "common")]
pub use gridstat_common as common;

#[cfg(feature = "engine")]
pub use gridstat_engine as engine;

#[cfg(feature = "common")]
pub use gridstat_common::{
    Cell, CellCoord, CellId, CellValue, GridError, GridErrorKind, RowSum, Settings,
};

#[cfg(feature = "engine")]
pub use gridstat_engine::{Command, EngineConfig, GridEngine, RowMaxPolicy, Snapshot};
