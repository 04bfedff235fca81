/// DebriSense core: Debris Risk Index computation for river monitoring sites.
///
/// The crate turns one set of environmental readings (rainfall, wind speed,
/// tide level, water flow) into an immutable DRI report: a 0-100 score, a
/// risk band, a debris tonnage estimate, and a predicted debris composition
/// for the site's land-use class.
///
/// Layout:
/// - `model` — shared domain types and the error taxonomy
/// - `config` — normalization scales, weights, bands, baselines, profiles
/// - `engine` — the pure computation pipeline, `assemble` at its head
/// - `history` — snapshot shape, storage contract, and replay
/// - `sites` — the monitored-site registry
/// - `ingest` — external data clients (WeatherAPI)
/// - `logging` — service-wide structured logging

pub mod config;
pub mod engine;
pub mod history;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod sites;

pub use config::EngineConfig;
pub use engine::{assemble, assemble_at};
pub use model::{DriError, DriResult, Factor, LandUse, Reading, RiskLevel};
