//! Common test helpers
use crate::engine::{EngineConfig, GridEngine, RowMaxPolicy};
use crate::rng::ScriptedValues;
use gridstat_common::{CellValue, Settings};

pub fn scripted_engine(values: &[CellValue]) -> GridEngine {
    GridEngine::with_source(
        EngineConfig {
            verify_after_dispatch: true,
            ..EngineConfig::default()
        },
        ScriptedValues::new(values.iter().copied()),
    )
}

/// Engine already holding `values`, generated row-major.
pub fn engine_with<const C: usize>(values: &[[CellValue; C]]) -> GridEngine {
    let flat: Vec<CellValue> = values.iter().flatten().copied().collect();
    let mut engine = scripted_engine(&flat);
    engine.generate(values.len(), C).unwrap();
    engine
}

pub fn exact_engine<const C: usize>(values: &[[CellValue; C]]) -> GridEngine {
    let flat: Vec<CellValue> = values.iter().flatten().copied().collect();
    let config = EngineConfig {
        verify_after_dispatch: true,
        ..EngineConfig::default()
    }
    .with_row_max_policy(RowMaxPolicy::Exact)
    .with_settings(Settings::new(values.len(), C, 1));
    let mut engine = GridEngine::with_source(config, ScriptedValues::new(flat));
    engine.regenerate().unwrap();
    engine
}

pub fn sums(engine: &GridEngine) -> Vec<u64> {
    engine.snapshot().aggregates().sums().collect()
}

pub fn maxima(engine: &GridEngine) -> Vec<CellValue> {
    engine.snapshot().aggregates().maxima().collect()
}

pub fn grid_values(engine: &GridEngine) -> Vec<Vec<CellValue>> {
    engine
        .snapshot()
        .grid()
        .rows()
        .iter()
        .map(|r| r.iter().map(|c| c.value).collect())
        .collect()
}
