//! Per-timestep ledger rows, run summaries, and the loop that drives one
//! simulation window from start to finish.

use crate::asset::AssetClass;
use crate::config::Allocation;
use crate::income::IncomeRow;
use crate::market::PriceRecord;

use super::state::EngineState;

/// One row of the dense per-timestep ledger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimestepRow {
    pub timestep: u32,
    pub year: i32,
    pub month: u8,
    pub cash_buffer: f64,
    pub stocks_qty: f64,
    pub bonds_qty: f64,
    pub gold_qty: f64,
    pub stocks_value: f64,
    pub bonds_value: f64,
    pub gold_value: f64,
    pub cash_notional: f64,
    pub allowance: f64,
    pub desired_allowance: f64,
    pub failed: bool,
}

/// Outcome of one run: when it started and ended, how it finished, and how
/// long it survived.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub run_id: u64,
    pub start_ref_year: i32,
    pub start_ref_month: u8,
    pub end_ref_year: i32,
    pub end_ref_month: u8,
    pub final_value: f64,
    pub survival_duration: u32,
}

/// Run the withdrawal strategy across every year of `yearly_prices`,
/// returning the run's summary and its full ledger.
///
/// `run_id` is supplied by the caller (the orchestrator derives it
/// deterministically from the window's position) rather than generated here,
/// keeping this function a pure transformation of its inputs.
pub fn run_window(
    run_id: u64,
    starting_portfolio_value: f64,
    target_allocation: Allocation,
    max_withdrawal_rate: f64,
    cash_buffer_years: u32,
    income_schedule: &[IncomeRow],
    yearly_prices: &[PriceRecord],
) -> (RunSummary, Vec<TimestepRow>) {
    assert_eq!(income_schedule.len(), yearly_prices.len(), "schedule and price window length mismatch");

    let horizon = yearly_prices.len();
    let mut state = EngineState::new(
        starting_portfolio_value,
        target_allocation,
        max_withdrawal_rate,
        cash_buffer_years,
        income_schedule,
        yearly_prices[0],
    );

    let mut survival_duration = horizon as u32;
    let mut first_failure_seen = false;

    for t in 0..horizon {
        state.allowance = 0.0;
        state.current_prices = yearly_prices[t];
        state.execute_strategy(t);
        state.allocate();
        if state.portfolio_value() <= 0.0 {
            state.failed = true;
        }
        if state.failed && !first_failure_seen {
            survival_duration = t as u32;
            first_failure_seen = true;
        }
        state.ledger.push(log_row(&state, t));
    }

    let final_value = state.portfolio_value() + state.cash_buffer;
    let summary = RunSummary {
        run_id,
        start_ref_year: yearly_prices[0].year,
        start_ref_month: yearly_prices[0].month,
        end_ref_year: yearly_prices[horizon - 1].year,
        end_ref_month: yearly_prices[horizon - 1].month,
        final_value,
        survival_duration,
    };
    (summary, state.ledger)
}

fn log_row(state: &EngineState<'_>, t: usize) -> TimestepRow {
    let prices = state.current_prices;
    TimestepRow {
        timestep: t as u32 + 1,
        year: prices.year,
        month: prices.month,
        cash_buffer: state.cash_buffer,
        stocks_qty: state.portfolio.quantity(AssetClass::Stocks),
        bonds_qty: state.portfolio.quantity(AssetClass::Bonds),
        gold_qty: state.portfolio.quantity(AssetClass::Gold),
        stocks_value: state.portfolio.quantity(AssetClass::Stocks) * prices.price(AssetClass::Stocks),
        bonds_value: state.portfolio.quantity(AssetClass::Bonds) * prices.price(AssetClass::Bonds),
        gold_value: state.portfolio.quantity(AssetClass::Gold) * prices.price(AssetClass::Gold),
        cash_notional: state.portfolio.quantity(AssetClass::Cash),
        allowance: state.allowance,
        desired_allowance: state.income_schedule[t].desired_income,
        failed: state.failed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::income::build_income_schedule;
    use approx::assert_relative_eq;

    fn flat_window(years: usize) -> Vec<PriceRecord> {
        (0..years)
            .map(|i| PriceRecord { year: 2000 + i as i32, month: 1, stocks: 1.0, bonds: 1.0, gold: 1.0 })
            .collect()
    }

    fn equal_allocation() -> Allocation {
        Allocation { stocks: 0.25, bonds: 0.25, gold: 0.25, cash: 0.25 }
    }

    #[test]
    fn ledger_has_one_row_per_year() {
        let schedule = build_income_schedule(1.0, 1.0, 1.0, 5);
        let prices = flat_window(5);
        let (_summary, ledger) = run_window(1, 100.0, equal_allocation(), 1.0, 0, &schedule, &prices);
        assert_eq!(ledger.len(), 5);
    }

    #[test]
    fn failure_is_monotonic_and_survival_duration_matches_first_failure() {
        let schedule = build_income_schedule(99.0, 1.0, 1.0, 4);
        let prices = flat_window(4);
        let (summary, ledger) = run_window(1, 100.0, equal_allocation(), 0.01, 0, &schedule, &prices);
        assert_eq!(summary.survival_duration, 1);
        let mut seen_failure = false;
        for row in &ledger {
            if row.failed {
                seen_failure = true;
            }
            if seen_failure {
                assert!(row.failed);
            }
        }
    }

    #[test]
    fn full_survival_when_income_is_free() {
        let schedule = build_income_schedule(1.0, 1.0, 1.0, 6);
        let prices = flat_window(6);
        let (summary, _ledger) = run_window(1, 100.0, equal_allocation(), 1.0, 0, &schedule, &prices);
        assert_eq!(summary.survival_duration, 6);
    }

    #[test]
    fn asset_values_equal_quantity_times_price() {
        let schedule = build_income_schedule(1.0, 1.0, 0.5, 3);
        let prices = flat_window(3);
        let (_summary, ledger) = run_window(1, 100.0, equal_allocation(), 0.05, 1, &schedule, &prices);
        for row in &ledger {
            assert_relative_eq!(row.stocks_value, row.stocks_qty * 1.0, epsilon = 1e-9);
        }
    }
}
