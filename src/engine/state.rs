//! Portfolio and cash-buffer state carried across one run's timesteps.

use crate::asset::AssetClass;
use crate::config::Allocation;
use crate::income::IncomeRow;
use crate::market::PriceRecord;

use super::ledger::TimestepRow;

/// Holdings in the three varying asset classes plus a cash notional.
#[derive(Debug, Clone, Copy, Default)]
pub struct Portfolio {
    pub stocks_qty: f64,
    pub bonds_qty: f64,
    pub gold_qty: f64,
    pub cash: f64,
}

impl Portfolio {
    pub fn quantity(&self, asset: AssetClass) -> f64 {
        match asset {
            AssetClass::Stocks => self.stocks_qty,
            AssetClass::Bonds => self.bonds_qty,
            AssetClass::Gold => self.gold_qty,
            AssetClass::Cash => self.cash,
        }
    }

    fn set_quantity(&mut self, asset: AssetClass, quantity: f64) {
        match asset {
            AssetClass::Stocks => self.stocks_qty = quantity,
            AssetClass::Bonds => self.bonds_qty = quantity,
            AssetClass::Gold => self.gold_qty = quantity,
            AssetClass::Cash => self.cash = quantity,
        }
    }

    pub fn value(&self, prices: &PriceRecord) -> f64 {
        self.stocks_qty * prices.stocks
            + self.bonds_qty * prices.bonds
            + self.gold_qty * prices.gold
            + self.cash
    }
}

/// Mutable state for one simulation run, owned start to finish by the
/// orchestrator that drives [`super::run_window`].
pub struct EngineState<'a> {
    pub(super) portfolio: Portfolio,
    pub(super) cash_buffer: f64,
    pub(super) current_prices: PriceRecord,
    pub(super) target_allocation: Allocation,
    pub(super) max_withdrawal_rate: f64,
    pub(super) cash_buffer_years: u32,
    pub(super) income_schedule: &'a [IncomeRow],
    pub(super) allowance: f64,
    pub(super) failed: bool,
    pub(super) ledger: Vec<TimestepRow>,
}

impl<'a> EngineState<'a> {
    pub fn new(
        starting_portfolio_value: f64,
        target_allocation: Allocation,
        max_withdrawal_rate: f64,
        cash_buffer_years: u32,
        income_schedule: &'a [IncomeRow],
        first_prices: PriceRecord,
    ) -> Self {
        let target_allocation = target_allocation.normalized();
        let mut state = EngineState {
            portfolio: Portfolio::default(),
            cash_buffer: 0.0,
            current_prices: first_prices,
            target_allocation,
            max_withdrawal_rate,
            cash_buffer_years,
            income_schedule,
            allowance: 0.0,
            failed: false,
            ledger: Vec::with_capacity(income_schedule.len()),
        };

        let desired_buffer = state.desired_cash_buffer(0);
        state.cash_buffer = desired_buffer.min(starting_portfolio_value);
        let allocatable = (starting_portfolio_value - state.cash_buffer).max(0.0);
        state.portfolio.cash = allocatable;
        state.allocate();
        state
    }

    /// Sum of desired income from year `from_year_index` (inclusive) for
    /// `cash_buffer_years` years, clipped to the schedule's length.
    pub(super) fn desired_cash_buffer(&self, from_year_index: usize) -> f64 {
        let end = (from_year_index + self.cash_buffer_years as usize).min(self.income_schedule.len());
        if from_year_index >= end {
            return 0.0;
        }
        self.income_schedule[from_year_index..end]
            .iter()
            .map(|row| row.desired_income)
            .sum()
    }

    pub fn portfolio_value(&self) -> f64 {
        self.portfolio.value(&self.current_prices)
    }

    /// Redistribute the portfolio's current total value across the target
    /// weights at current prices. Does not touch the cash buffer.
    pub(super) fn allocate(&mut self) {
        let value_to_allocate = self.portfolio_value();
        let mut rebalanced = Portfolio::default();
        for asset in AssetClass::ALL {
            let weight = self.target_allocation.weight(asset);
            let target_value = value_to_allocate * weight;
            let quantity = if asset == AssetClass::Cash {
                target_value
            } else {
                let price = self.current_prices.price(asset);
                if price > 0.0 { target_value / price } else { 0.0 }
            };
            rebalanced.set_quantity(asset, quantity);
        }
        self.portfolio = rebalanced;
    }

    /// Clamp `amount` to the current portfolio value, move it to the
    /// allowance, and return the amount actually drawn.
    pub(super) fn draw_from_portfolio(&mut self, amount: f64) -> f64 {
        let value = self.portfolio_value().max(0.0);
        let drawn = amount.max(0.0).min(value);
        self.portfolio.cash -= drawn;
        self.allowance += drawn;
        drawn
    }

    /// Clamp `amount` to the cash buffer, move it to the allowance, and
    /// return the amount actually drawn.
    pub(super) fn draw_from_buffer(&mut self, amount: f64) -> f64 {
        let drawn = amount.max(0.0).min(self.cash_buffer.max(0.0));
        self.cash_buffer -= drawn;
        self.allowance += drawn;
        drawn
    }

    /// Clamp `amount` to total portfolio value and move it into the cash
    /// buffer. The portfolio's cash slot is not floored at zero here — it
    /// may go negative after a prior draw; the following `allocate` call
    /// smooths it back out across all asset classes.
    pub(super) fn top_up_buffer(&mut self, amount: f64) -> f64 {
        let cap = self.portfolio_value().max(0.0);
        let moved = amount.max(0.0).min(cap);
        self.portfolio.cash -= moved;
        self.cash_buffer += moved;
        moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_prices() -> PriceRecord {
        PriceRecord { year: 2000, month: 1, stocks: 1.0, bonds: 1.0, gold: 1.0 }
    }

    fn equal_allocation() -> Allocation {
        Allocation { stocks: 0.25, bonds: 0.25, gold: 0.25, cash: 0.25 }
    }

    #[test]
    fn initial_allocation_matches_weights_when_no_buffer() {
        let schedule = [];
        let state = EngineState::new(100.0, equal_allocation(), 0.1, 0, &schedule, flat_prices());
        assert_eq!(state.cash_buffer, 0.0);
        assert!((state.portfolio.stocks_qty - 25.0).abs() < 1e-9);
        assert!((state.portfolio.cash - 25.0).abs() < 1e-9);
    }

    #[test]
    fn buffer_seeded_from_schedule_is_capped_at_starting_value() {
        let schedule = [
            IncomeRow { year: 1, desired_income: 1000.0, min_income: 500.0 },
            IncomeRow { year: 2, desired_income: 1000.0, min_income: 500.0 },
        ];
        let state = EngineState::new(500.0, equal_allocation(), 0.1, 5, &schedule, flat_prices());
        assert_eq!(state.cash_buffer, 500.0);
        assert_eq!(state.portfolio.cash, 0.0);
    }

    #[test]
    fn draw_from_portfolio_clamps_to_total_value() {
        let schedule = [];
        let mut state = EngineState::new(100.0, equal_allocation(), 0.1, 0, &schedule, flat_prices());
        let drawn = state.draw_from_portfolio(10_000.0);
        assert!((drawn - 100.0).abs() < 1e-9);
        assert!((state.allowance - 100.0).abs() < 1e-9);
    }
}
