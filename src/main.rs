//! Backtesting engine demo
//!
//! Runs one illustrative configuration against a small synthetic price
//! series and prints the per-run summaries to the console.

use backtest_engine::config::Allocation;
use backtest_engine::market::PriceRecord;
use backtest_engine::{HistoricalSeries, Orchestrator, SimulatorConfig};

fn synthetic_series(years: usize) -> HistoricalSeries {
    let mut records = Vec::with_capacity(years * 12);
    let mut stock_price = 100.0_f64;
    let mut bond_price = 100.0_f64;
    let mut gold_price = 100.0_f64;
    for year in 0..years {
        for month in 1..=12u8 {
            stock_price *= 1.006;
            bond_price *= 1.002;
            gold_price *= 1.003;
            records.push(PriceRecord {
                year: 1990 + year as i32,
                month,
                stocks: stock_price,
                bonds: bond_price,
                gold: gold_price,
            });
        }
    }
    HistoricalSeries::new(records)
}

fn main() {
    env_logger::init();

    println!("Retirement Withdrawal Backtester v0.1.0");
    println!("========================================\n");

    let config = SimulatorConfig {
        starting_portfolio_value: 1_000_000.0,
        desired_annual_income: 40_000.0,
        inflation: 1.025,
        min_income_multiplier: 0.6,
        max_withdrawal_rate: 0.06,
        simulation_length_years: 30,
        cash_buffer_years: 2,
        portfolio_allocation: Allocation { stocks: 0.6, bonds: 0.3, gold: 0.05, cash: 0.05 },
    };

    let orchestrator = Orchestrator::new(config).expect("invalid configuration");
    let series = synthetic_series(45);

    println!("Simulator id: {}", orchestrator.simulator_id());
    println!("Loaded {} months of synthetic price history\n", series.len());

    let result = orchestrator.run(&series);
    println!("Produced {} runs\n", result.runs.len());

    println!("{:>6} {:>10} {:>6} {:>16} {:>10}", "run", "start", "end", "final_value", "survived");
    for (summary, _ledger) in result.runs.iter().take(10) {
        println!(
            "{:>6} {:>4}-{:02} {:>4}-{:02} {:>16.2} {:>10}",
            summary.run_id % 1_000_000,
            summary.start_ref_year,
            summary.start_ref_month,
            summary.end_ref_year,
            summary.end_ref_month,
            summary.final_value,
            summary.survival_duration,
        );
    }
    if result.runs.len() > 10 {
        println!("... ({} more runs)", result.runs.len() - 10);
    }

    let survived_full_term = result
        .runs
        .iter()
        .filter(|(summary, _)| summary.survival_duration == 30)
        .count();
    println!(
        "\n{}/{} runs survived the full 30-year horizon",
        survived_full_term,
        result.runs.len()
    );
}
