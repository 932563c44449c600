//! Run one backtesting configuration against a historical price CSV and
//! write the four result artefacts to disk.
//!
//! Usage: run_backtest --historical-data prices.csv --results-dir results

use std::time::Instant;

use backtest_engine::config::Allocation;
use backtest_engine::market::load_historical_series;
use backtest_engine::results::{CsvResultsSink, ResultsSink};
use backtest_engine::{Orchestrator, SimulatorConfig};
use clap::Parser;
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "run_backtest", about = "Backtest a retirement-withdrawal strategy against historical prices")]
struct Args {
    /// Path to a monthly historical price CSV (year, month, stocks, bonds, gold)
    #[arg(long)]
    historical_data: String,

    /// Starting portfolio value
    #[arg(long)]
    starting_value: f64,

    /// First year's desired annual income
    #[arg(long)]
    desired_income: f64,

    /// Annual inflation factor, e.g. 1.02 for 2%
    #[arg(long, default_value_t = 1.0)]
    inflation: f64,

    /// Minimum income as a fraction of desired income
    #[arg(long, default_value_t = 1.0)]
    min_income_multiplier: f64,

    /// Maximum fraction of portfolio value that may be withdrawn in one year
    #[arg(long)]
    max_withdrawal_rate: f64,

    /// Number of years to simulate per run
    #[arg(long)]
    horizon_years: u32,

    /// Number of years of desired income the cash buffer targets
    #[arg(long, default_value_t = 0)]
    cash_buffer_years: u32,

    #[arg(long, default_value_t = 0.0)]
    stocks: f64,
    #[arg(long, default_value_t = 0.0)]
    bonds: f64,
    #[arg(long, default_value_t = 0.0)]
    gold: f64,
    #[arg(long, default_value_t = 0.0)]
    cash: f64,

    /// Directory under which `<simulator_id>/` will be created
    #[arg(long)]
    results_dir: String,

    /// Print a one-line JSON summary to stdout instead of the prose log
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct RunSummaryReport {
    simulator_id: u64,
    run_count: usize,
    survived_full_term: usize,
    mean_final_value: f64,
    elapsed_ms: u64,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let config = SimulatorConfig {
        starting_portfolio_value: args.starting_value,
        desired_annual_income: args.desired_income,
        inflation: args.inflation,
        min_income_multiplier: args.min_income_multiplier,
        max_withdrawal_rate: args.max_withdrawal_rate,
        simulation_length_years: args.horizon_years,
        cash_buffer_years: args.cash_buffer_years,
        portfolio_allocation: Allocation { stocks: args.stocks, bonds: args.bonds, gold: args.gold, cash: args.cash },
    };

    let orchestrator = match Orchestrator::new(config) {
        Ok(orchestrator) => orchestrator,
        Err(e) => {
            log::error!("invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    log::info!("loading historical data from {}", args.historical_data);
    let load_start = Instant::now();
    let series = load_historical_series(&args.historical_data).expect("failed to load historical data");
    log::info!("loaded {} months in {:?}", series.len(), load_start.elapsed());

    if !args.json {
        println!("Simulator id: {}", orchestrator.simulator_id());
        println!("Running simulations...");
    }
    let run_start = Instant::now();
    let result = orchestrator.run(&series);
    let elapsed = run_start.elapsed();
    if !args.json {
        println!("Completed {} runs in {:?}", result.runs.len(), elapsed);
    }

    let mut sink = CsvResultsSink::new(&args.results_dir);
    sink.write_all(result.simulator_id, &result.runs, &series, orchestrator.config())
        .expect("failed to write results");

    if args.json {
        let run_count = result.runs.len();
        let survived_full_term =
            result.runs.iter().filter(|(s, _)| s.survival_duration == args.horizon_years).count();
        let mean_final_value = if run_count > 0 {
            result.runs.iter().map(|(s, _)| s.final_value).sum::<f64>() / run_count as f64
        } else {
            0.0
        };
        let report = RunSummaryReport {
            simulator_id: result.simulator_id,
            run_count,
            survived_full_term,
            mean_final_value,
            elapsed_ms: elapsed.as_millis() as u64,
        };
        println!("{}", serde_json::to_string(&report).unwrap());
    } else {
        println!("Results written to {}/{}/", args.results_dir, result.simulator_id);
    }
}
