//! Simulator Orchestrator: wires the schedule builder, window generator, and
//! engine together across every feasible rolling start date.

use rayon::prelude::*;

use crate::config::SimulatorConfig;
use crate::engine::{run_window, RunSummary, TimestepRow};
use crate::errors::ConfigurationError;
use crate::income::build_income_schedule;
use crate::market::HistoricalSeries;
use crate::window::generate_windows;

/// Mixing constant for deriving a per-run id from a simulator id and a
/// window's start index. Not cryptographic; chosen only to spread bits.
const RUN_ID_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

/// One simulation run's summary paired with its full per-timestep ledger.
pub type RunOutput = (RunSummary, Vec<TimestepRow>);

/// The full output of one orchestration invocation: every run produced from
/// one configuration against one historical series, tagged with the
/// simulator id that namespaces them.
pub struct OrchestrationResult {
    pub simulator_id: u64,
    pub runs: Vec<RunOutput>,
}

/// Pre-validated driver for running one configuration across many rolling
/// windows. Validation happens once at construction, mirroring the
/// fail-fast configuration contract.
pub struct Orchestrator {
    config: SimulatorConfig,
    simulator_id: u64,
}

impl Orchestrator {
    /// Validate `config` and assign a time-derived simulator id.
    pub fn new(config: SimulatorConfig) -> Result<Self, ConfigurationError> {
        config.validate()?;
        Ok(Self { config, simulator_id: generate_simulator_id() })
    }

    /// Validate `config` and use a caller-supplied simulator id, for
    /// reproducible tests and reruns.
    pub fn with_simulator_id(config: SimulatorConfig, simulator_id: u64) -> Result<Self, ConfigurationError> {
        config.validate()?;
        Ok(Self { config, simulator_id })
    }

    pub fn simulator_id(&self) -> u64 {
        self.simulator_id
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Run one simulation per feasible rolling start date in `historical`,
    /// dispatched across rayon's global pool. Windows are pure functions of
    /// their inputs, so results are collected back into window-start order
    /// rather than completion order.
    pub fn run(&self, historical: &HistoricalSeries) -> OrchestrationResult {
        let schedule = build_income_schedule(
            self.config.desired_annual_income,
            self.config.inflation,
            self.config.min_income_multiplier,
            self.config.simulation_length_years,
        );
        let windows = generate_windows(historical.as_slice(), self.config.simulation_length_years);

        let runs: Vec<RunOutput> = windows
            .par_iter()
            .map(|window| {
                let run_id = derive_run_id(self.simulator_id, window.start_index);
                run_window(
                    run_id,
                    self.config.starting_portfolio_value,
                    self.config.portfolio_allocation,
                    self.config.max_withdrawal_rate,
                    self.config.cash_buffer_years,
                    &schedule,
                    &window.yearly_prices,
                )
            })
            .collect();

        OrchestrationResult { simulator_id: self.simulator_id, runs }
    }
}

fn generate_simulator_id() -> u64 {
    chrono::Utc::now().timestamp_micros() as u64
}

/// Deterministic per-run id: unique within one orchestration since
/// `window_start_index` is unique, and reproducible across reruns of the
/// same configuration against the same data (unlike a random draw).
fn derive_run_id(simulator_id: u64, window_start_index: usize) -> u64 {
    simulator_id ^ (window_start_index as u64).wrapping_mul(RUN_ID_MIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Allocation;
    use crate::market::PriceRecord;

    fn config() -> SimulatorConfig {
        SimulatorConfig {
            starting_portfolio_value: 100_000.0,
            desired_annual_income: 4_000.0,
            inflation: 1.0,
            min_income_multiplier: 0.5,
            max_withdrawal_rate: 0.1,
            simulation_length_years: 2,
            cash_buffer_years: 1,
            portfolio_allocation: Allocation { stocks: 0.6, bonds: 0.3, gold: 0.05, cash: 0.05 },
        }
    }

    fn flat_series(months: usize) -> HistoricalSeries {
        HistoricalSeries::new(
            (0..months)
                .map(|i| PriceRecord {
                    year: 2000 + (i as i32) / 12,
                    month: (i % 12) as u8 + 1,
                    stocks: 100.0,
                    bonds: 100.0,
                    gold: 100.0,
                })
                .collect(),
        )
    }

    #[test]
    fn rejects_invalid_configuration_eagerly() {
        let mut bad = config();
        bad.starting_portfolio_value = -1.0;
        assert!(Orchestrator::new(bad).is_err());
    }

    #[test]
    fn produces_one_run_per_window_in_start_order() {
        let orchestrator = Orchestrator::with_simulator_id(config(), 42).unwrap();
        let series = flat_series(36);
        let result = orchestrator.run(&series);
        assert_eq!(result.runs.len(), 13);
        assert_eq!(result.runs[0].0.start_ref_year, 2000);
        assert_eq!(result.runs[0].0.start_ref_month, 1);
        assert_eq!(result.runs[12].0.start_ref_year, 2001);
    }

    #[test]
    fn run_ids_are_deterministic_and_unique_within_a_run() {
        let orchestrator = Orchestrator::with_simulator_id(config(), 7).unwrap();
        let series = flat_series(36);
        let first = orchestrator.run(&series);
        let second = orchestrator.run(&series);
        let ids_first: Vec<u64> = first.runs.iter().map(|(s, _)| s.run_id).collect();
        let ids_second: Vec<u64> = second.runs.iter().map(|(s, _)| s.run_id).collect();
        assert_eq!(ids_first, ids_second);
        let mut sorted = ids_first.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), ids_first.len());
    }

    #[test]
    fn empty_when_series_too_short() {
        let orchestrator = Orchestrator::with_simulator_id(config(), 1).unwrap();
        let series = flat_series(6);
        let result = orchestrator.run(&series);
        assert!(result.runs.is_empty());
    }
}
