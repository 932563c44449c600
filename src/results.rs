//! Results Writer: turns orchestration output into the four CSV artefacts,
//! behind a sink trait so tests can inspect rows in memory.

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use csv::Writer;
use serde::Serialize;

use crate::config::SimulatorConfig;
use crate::engine::{RunSummary, TimestepRow};
use crate::market::{HistoricalSeries, PriceRecord};
use crate::orchestrator::RunOutput;

#[derive(Debug, Clone, Serialize)]
pub struct RunResultRow {
    pub simulator_id: u64,
    pub run_id: u64,
    pub start_ref_year: i32,
    pub start_ref_month: u8,
    pub end_ref_year: i32,
    pub end_ref_month: u8,
    pub final_value: f64,
    pub survival_duration: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimestepOutputRow {
    pub simulator_id: u64,
    pub run_id: u64,
    pub timestep: u32,
    pub year: i32,
    pub month: u8,
    pub cash_buffer: f64,
    pub bonds_qty: f64,
    pub stocks_qty: f64,
    pub gold_qty: f64,
    pub bonds_value: f64,
    pub stocks_value: f64,
    pub gold_value: f64,
    pub cash_notional: f64,
    pub allowance: f64,
    pub desired_allowance: f64,
    pub failed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoricalOutputRow {
    pub simulator_id: u64,
    pub year: i32,
    pub month: u8,
    pub stocks: f64,
    pub bonds: f64,
    pub gold: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimulationInputsRow {
    pub simulator_id: u64,
    pub starting_portfolio_value: f64,
    pub desired_annual_income: f64,
    pub inflation: f64,
    pub min_income_multiplier: f64,
    pub max_withdrawal_rate: f64,
    pub simulation_length_years: u32,
    pub cash_buffer_years: u32,
    pub stocks_allocation: f64,
    pub bonds_allocation: f64,
    pub gold_allocation: f64,
    pub cash_allocation: f64,
}

fn to_run_result_row(simulator_id: u64, summary: &RunSummary) -> RunResultRow {
    RunResultRow {
        simulator_id,
        run_id: summary.run_id,
        start_ref_year: summary.start_ref_year,
        start_ref_month: summary.start_ref_month,
        end_ref_year: summary.end_ref_year,
        end_ref_month: summary.end_ref_month,
        final_value: summary.final_value,
        survival_duration: summary.survival_duration,
    }
}

fn to_timestep_rows(simulator_id: u64, run_id: u64, ledger: &[TimestepRow]) -> Vec<TimestepOutputRow> {
    ledger
        .iter()
        .map(|row| TimestepOutputRow {
            simulator_id,
            run_id,
            timestep: row.timestep,
            year: row.year,
            month: row.month,
            cash_buffer: row.cash_buffer,
            bonds_qty: row.bonds_qty,
            stocks_qty: row.stocks_qty,
            gold_qty: row.gold_qty,
            bonds_value: row.bonds_value,
            stocks_value: row.stocks_value,
            gold_value: row.gold_value,
            cash_notional: row.cash_notional,
            allowance: row.allowance,
            desired_allowance: row.desired_allowance,
            failed: row.failed,
        })
        .collect()
}

fn to_historical_rows(simulator_id: u64, series: &HistoricalSeries) -> Vec<HistoricalOutputRow> {
    series
        .as_slice()
        .iter()
        .map(|record: &PriceRecord| HistoricalOutputRow {
            simulator_id,
            year: record.year,
            month: record.month,
            stocks: record.stocks,
            bonds: record.bonds,
            gold: record.gold,
        })
        .collect()
}

fn to_inputs_row(simulator_id: u64, config: &SimulatorConfig) -> SimulationInputsRow {
    let allocation = config.portfolio_allocation;
    SimulationInputsRow {
        simulator_id,
        starting_portfolio_value: config.starting_portfolio_value,
        desired_annual_income: config.desired_annual_income,
        inflation: config.inflation,
        min_income_multiplier: config.min_income_multiplier,
        max_withdrawal_rate: config.max_withdrawal_rate,
        simulation_length_years: config.simulation_length_years,
        cash_buffer_years: config.cash_buffer_years,
        stocks_allocation: allocation.stocks,
        bonds_allocation: allocation.bonds,
        gold_allocation: allocation.gold,
        cash_allocation: allocation.cash,
    }
}

/// Destination for the four output artefacts of one orchestration run.
pub trait ResultsSink {
    fn write_run_results(&mut self, simulator_id: u64, runs: &[RunOutput]) -> Result<(), Box<dyn Error>>;
    fn write_timestep_data(&mut self, simulator_id: u64, runs: &[RunOutput]) -> Result<(), Box<dyn Error>>;
    fn write_historical_data(&mut self, simulator_id: u64, series: &HistoricalSeries) -> Result<(), Box<dyn Error>>;
    fn write_simulation_inputs(&mut self, simulator_id: u64, config: &SimulatorConfig) -> Result<(), Box<dyn Error>>;

    /// Write all four artefacts for one orchestration result.
    fn write_all(
        &mut self,
        simulator_id: u64,
        runs: &[RunOutput],
        series: &HistoricalSeries,
        config: &SimulatorConfig,
    ) -> Result<(), Box<dyn Error>> {
        self.write_run_results(simulator_id, runs)?;
        self.write_timestep_data(simulator_id, runs)?;
        self.write_historical_data(simulator_id, series)?;
        self.write_simulation_inputs(simulator_id, config)
    }
}

/// Writes the four artefacts as CSV files under `results_dir/<simulator_id>/`.
pub struct CsvResultsSink {
    results_dir: PathBuf,
}

impl CsvResultsSink {
    pub fn new<P: AsRef<Path>>(results_dir: P) -> Self {
        Self { results_dir: results_dir.as_ref().to_path_buf() }
    }

    fn run_dir(&self, simulator_id: u64) -> PathBuf {
        self.results_dir.join(simulator_id.to_string())
    }

    fn writer_for(&self, simulator_id: u64, file_name: &str) -> Result<Writer<fs::File>, Box<dyn Error>> {
        let dir = self.run_dir(simulator_id);
        fs::create_dir_all(&dir)?;
        Ok(Writer::from_path(dir.join(file_name))?)
    }
}

impl ResultsSink for CsvResultsSink {
    fn write_run_results(&mut self, simulator_id: u64, runs: &[RunOutput]) -> Result<(), Box<dyn Error>> {
        let mut writer = self.writer_for(simulator_id, "run_results.csv")?;
        for (summary, _) in runs {
            writer.serialize(to_run_result_row(simulator_id, summary))?;
        }
        writer.flush()?;
        Ok(())
    }

    fn write_timestep_data(&mut self, simulator_id: u64, runs: &[RunOutput]) -> Result<(), Box<dyn Error>> {
        let mut writer = self.writer_for(simulator_id, "timestep_data.csv")?;
        for (summary, ledger) in runs {
            for row in to_timestep_rows(simulator_id, summary.run_id, ledger) {
                writer.serialize(row)?;
            }
        }
        writer.flush()?;
        Ok(())
    }

    fn write_historical_data(&mut self, simulator_id: u64, series: &HistoricalSeries) -> Result<(), Box<dyn Error>> {
        let mut writer = self.writer_for(simulator_id, "historical_data.csv")?;
        for row in to_historical_rows(simulator_id, series) {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    fn write_simulation_inputs(&mut self, simulator_id: u64, config: &SimulatorConfig) -> Result<(), Box<dyn Error>> {
        let mut writer = self.writer_for(simulator_id, "simulation_inputs.csv")?;
        writer.serialize(to_inputs_row(simulator_id, config))?;
        writer.flush()?;
        Ok(())
    }
}

/// Collects rows in memory instead of writing files, for tests and for the
/// in-process CLI summary.
#[derive(Debug, Default)]
pub struct InMemoryResultsSink {
    pub run_results: Vec<RunResultRow>,
    pub timestep_data: Vec<TimestepOutputRow>,
    pub historical_data: Vec<HistoricalOutputRow>,
    pub simulation_inputs: Vec<SimulationInputsRow>,
}

impl ResultsSink for InMemoryResultsSink {
    fn write_run_results(&mut self, simulator_id: u64, runs: &[RunOutput]) -> Result<(), Box<dyn Error>> {
        self.run_results.extend(runs.iter().map(|(summary, _)| to_run_result_row(simulator_id, summary)));
        Ok(())
    }

    fn write_timestep_data(&mut self, simulator_id: u64, runs: &[RunOutput]) -> Result<(), Box<dyn Error>> {
        for (summary, ledger) in runs {
            self.timestep_data.extend(to_timestep_rows(simulator_id, summary.run_id, ledger));
        }
        Ok(())
    }

    fn write_historical_data(&mut self, simulator_id: u64, series: &HistoricalSeries) -> Result<(), Box<dyn Error>> {
        self.historical_data.extend(to_historical_rows(simulator_id, series));
        Ok(())
    }

    fn write_simulation_inputs(&mut self, simulator_id: u64, config: &SimulatorConfig) -> Result<(), Box<dyn Error>> {
        self.simulation_inputs.push(to_inputs_row(simulator_id, config));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Allocation;
    use crate::engine::run_window;
    use crate::income::build_income_schedule;
    use crate::market::PriceRecord;

    fn sample_run() -> RunOutput {
        let schedule = build_income_schedule(1_000.0, 1.0, 0.5, 2);
        let prices = vec![
            PriceRecord { year: 2000, month: 1, stocks: 1.0, bonds: 1.0, gold: 1.0 },
            PriceRecord { year: 2001, month: 1, stocks: 1.0, bonds: 1.0, gold: 1.0 },
        ];
        run_window(1, 100_000.0, Allocation { stocks: 0.5, bonds: 0.5, gold: 0.0, cash: 0.0 }, 0.1, 1, &schedule, &prices)
    }

    #[test]
    fn in_memory_sink_collects_expected_row_counts() {
        let runs = vec![sample_run()];
        let series = HistoricalSeries::new(vec![PriceRecord { year: 2000, month: 1, stocks: 1.0, bonds: 1.0, gold: 1.0 }]);
        let config = SimulatorConfig {
            starting_portfolio_value: 100_000.0,
            desired_annual_income: 1_000.0,
            inflation: 1.0,
            min_income_multiplier: 0.5,
            max_withdrawal_rate: 0.1,
            simulation_length_years: 2,
            cash_buffer_years: 1,
            portfolio_allocation: Allocation { stocks: 0.5, bonds: 0.5, gold: 0.0, cash: 0.0 },
        };

        let mut sink = InMemoryResultsSink::default();
        sink.write_all(99, &runs, &series, &config).unwrap();

        assert_eq!(sink.run_results.len(), 1);
        assert_eq!(sink.timestep_data.len(), 2);
        assert_eq!(sink.historical_data.len(), 1);
        assert_eq!(sink.simulation_inputs.len(), 1);
        assert_eq!(sink.run_results[0].simulator_id, 99);
    }
}
