//! Window Generator: rolling-start yearly price tapes cut from a monthly series.

use crate::market::PriceRecord;

/// One run's price tape: `horizon_years` yearly records, plus the monthly
/// index in the source series that it started from (used to derive a
/// reproducible run id downstream).
#[derive(Debug, Clone)]
pub struct SimulationWindow {
    pub start_index: usize,
    pub yearly_prices: Vec<PriceRecord>,
}

/// Slice `monthly` into every feasible rolling-start window of `horizon_years`
/// years, decimating each 12*horizon_years-month slice down to one record per
/// year. Yields `len(monthly) - 12*horizon_years + 1` windows, or zero if the
/// series is too short.
pub fn generate_windows(monthly: &[PriceRecord], horizon_years: u32) -> Vec<SimulationWindow> {
    let span = 12 * horizon_years as usize;
    if span == 0 || monthly.len() < span {
        return Vec::new();
    }
    let window_count = monthly.len() - span + 1;
    (0..window_count)
        .map(|start_index| {
            let yearly_prices = monthly[start_index..start_index + span]
                .iter()
                .step_by(12)
                .copied()
                .collect();
            SimulationWindow { start_index, yearly_prices }
        })
        .collect()
}
