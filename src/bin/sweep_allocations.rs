//! Sweep a small grid of allocation mixes and cash-buffer years against one
//! historical price file and print a side-by-side comparison.
//!
//! Usage: sweep_allocations --historical-data prices.csv

use std::time::Instant;

use backtest_engine::config::Allocation;
use backtest_engine::market::load_historical_series;
use backtest_engine::{Orchestrator, SimulatorConfig};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "sweep_allocations", about = "Compare withdrawal outcomes across a grid of allocations")]
struct Args {
    #[arg(long)]
    historical_data: String,

    #[arg(long)]
    starting_value: f64,

    #[arg(long)]
    desired_income: f64,

    #[arg(long, default_value_t = 1.0)]
    inflation: f64,

    #[arg(long, default_value_t = 1.0)]
    min_income_multiplier: f64,

    #[arg(long)]
    max_withdrawal_rate: f64,

    #[arg(long)]
    horizon_years: u32,
}

struct Scenario {
    label: &'static str,
    allocation: Allocation,
    cash_buffer_years: u32,
}

fn scenario_grid() -> Vec<Scenario> {
    vec![
        Scenario { label: "60/40, no buffer", allocation: Allocation { stocks: 0.6, bonds: 0.4, gold: 0.0, cash: 0.0 }, cash_buffer_years: 0 },
        Scenario { label: "60/40, 2yr buffer", allocation: Allocation { stocks: 0.6, bonds: 0.4, gold: 0.0, cash: 0.0 }, cash_buffer_years: 2 },
        Scenario { label: "80/20, no buffer", allocation: Allocation { stocks: 0.8, bonds: 0.2, gold: 0.0, cash: 0.0 }, cash_buffer_years: 0 },
        Scenario { label: "40/40/20 w/ gold, 1yr buffer", allocation: Allocation { stocks: 0.4, bonds: 0.4, gold: 0.2, cash: 0.0 }, cash_buffer_years: 1 },
    ]
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    println!("Loading historical data from {}...", args.historical_data);
    let series = load_historical_series(&args.historical_data).expect("failed to load historical data");
    println!("Loaded {} months\n", series.len());

    println!("{:<32} {:>10} {:>12} {:>12} {:>10}", "scenario", "runs", "avg_final", "min_final", "avg_years");
    println!("{}", "-".repeat(80));

    for scenario in scenario_grid() {
        let config = SimulatorConfig {
            starting_portfolio_value: args.starting_value,
            desired_annual_income: args.desired_income,
            inflation: args.inflation,
            min_income_multiplier: args.min_income_multiplier,
            max_withdrawal_rate: args.max_withdrawal_rate,
            simulation_length_years: args.horizon_years,
            cash_buffer_years: scenario.cash_buffer_years,
            portfolio_allocation: scenario.allocation,
        };

        let orchestrator = match Orchestrator::new(config) {
            Ok(orchestrator) => orchestrator,
            Err(e) => {
                eprintln!("{}: invalid configuration: {e}", scenario.label);
                continue;
            }
        };

        let start = Instant::now();
        let result = orchestrator.run(&series);
        let elapsed = start.elapsed();

        let run_count = result.runs.len();
        if run_count == 0 {
            println!("{:<32} {:>10}", scenario.label, 0);
            continue;
        }

        let total_final: f64 = result.runs.iter().map(|(s, _)| s.final_value).sum();
        let min_final = result.runs.iter().map(|(s, _)| s.final_value).fold(f64::INFINITY, f64::min);
        let total_years: u32 = result.runs.iter().map(|(s, _)| s.survival_duration).sum();

        println!(
            "{:<32} {:>10} {:>12.0} {:>12.0} {:>10.1}  ({:?})",
            scenario.label,
            run_count,
            total_final / run_count as f64,
            min_final,
            total_years as f64 / run_count as f64,
            elapsed,
        );
    }
}
