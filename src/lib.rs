//! Historical backtesting engine for retirement-withdrawal strategies
//!
//! This library provides:
//! - An inflation-indexed income schedule builder
//! - A rolling-window generator over monthly historical price series
//! - A per-window withdrawal simulation engine (the six-branch strategy)
//! - An orchestrator that runs one simulation per feasible start date
//! - CSV loading and a results-writer trait for the output artefacts

pub mod asset;
pub mod config;
pub mod engine;
pub mod errors;
pub mod income;
pub mod market;
pub mod orchestrator;
pub mod results;
pub mod window;

pub use asset::AssetClass;
pub use config::{Allocation, SimulatorConfig};
pub use engine::{run_window, RunSummary, TimestepRow};
pub use errors::{ConfigurationError, DataError};
pub use market::{HistoricalSeries, PriceRecord};
pub use orchestrator::{OrchestrationResult, Orchestrator};
