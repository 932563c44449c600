//! Simulation Engine: the per-window withdrawal state machine.

mod ledger;
mod state;
mod strategy;

pub use ledger::{run_window, RunSummary, TimestepRow};
pub use state::{EngineState, Portfolio};
pub use strategy::WithdrawalBranch;
