//! The six-branch withdrawal state machine.

use super::state::EngineState;

/// Which branch of the withdrawal table fired, exposed for tests and the
/// detailed ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WithdrawalBranch {
    FullRefill,
    PartialRefill,
    BufferSufficient,
    BufferPlusPortfolioToDesired,
    BufferPlusPortfolioToRail,
    BufferPlusPortfolioToMinimum,
}

impl<'a> EngineState<'a> {
    /// Execute one timestep's withdrawal strategy against income schedule
    /// row `t`, mutating the portfolio, cash buffer, and allowance.
    pub(super) fn execute_strategy(&mut self, t: usize) -> WithdrawalBranch {
        let desired = self.income_schedule[t].desired_income;
        let min = self.income_schedule[t].min_income;
        let withdrawal_limit = self.max_withdrawal_rate * self.portfolio_value();
        let current_buffer = self.cash_buffer;
        let desired_buffer = self.desired_cash_buffer(t);

        if desired <= withdrawal_limit {
            let top_up_needed = desired_buffer - current_buffer;
            if top_up_needed <= withdrawal_limit - desired {
                self.draw_from_portfolio(desired);
                self.top_up_buffer(top_up_needed);
                WithdrawalBranch::FullRefill
            } else {
                self.draw_from_portfolio(desired);
                self.top_up_buffer(withdrawal_limit - desired);
                WithdrawalBranch::PartialRefill
            }
        } else if current_buffer >= desired {
            self.draw_from_buffer(desired);
            WithdrawalBranch::BufferSufficient
        } else {
            self.draw_from_buffer(current_buffer);
            let allowance_so_far = self.allowance;
            if withdrawal_limit >= desired - allowance_so_far {
                self.draw_from_portfolio(desired - allowance_so_far);
                WithdrawalBranch::BufferPlusPortfolioToDesired
            } else if withdrawal_limit >= min - allowance_so_far {
                self.draw_from_portfolio(withdrawal_limit);
                WithdrawalBranch::BufferPlusPortfolioToRail
            } else {
                self.draw_from_portfolio(min - allowance_so_far);
                WithdrawalBranch::BufferPlusPortfolioToMinimum
            }
        }
    }
}
