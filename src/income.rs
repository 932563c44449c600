//! Income Schedule Builder: inflation-indexed desired and minimum income per year.

/// One year's worth of desired and minimum income targets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IncomeRow {
    pub year: u32,
    pub desired_income: f64,
    pub min_income: f64,
}

/// Build the deterministic, inflation-indexed income schedule for a run.
///
/// `year` is 1-indexed. `desired_income[i] = desired_annual_income *
/// inflation^i`; `min_income[i] = min_income_multiplier * desired_income[i]`.
pub fn build_income_schedule(
    desired_annual_income: f64,
    inflation: f64,
    min_income_multiplier: f64,
    horizon_years: u32,
) -> Vec<IncomeRow> {
    (0..horizon_years)
        .map(|i| {
            let desired_income = desired_annual_income * inflation.powi(i as i32);
            IncomeRow { year: i + 1, desired_income, min_income: min_income_multiplier * desired_income }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn schedule_applies_inflation_and_floor() {
        let schedule = build_income_schedule(100_000.0, 1.01, 0.5, 3);
        assert_eq!(schedule.len(), 3);
        assert_eq!(schedule[0].year, 1);
        assert_relative_eq!(schedule[0].desired_income, 100_000.0, epsilon = 1e-9);
        assert_relative_eq!(schedule[1].desired_income, 101_000.0, epsilon = 1e-6);
        assert_relative_eq!(schedule[2].desired_income, 102_010.0, epsilon = 1e-6);
        assert_relative_eq!(schedule[0].min_income, 50_000.0, epsilon = 1e-9);
        assert_relative_eq!(schedule[2].min_income, 51_005.0, epsilon = 1e-6);
    }

    #[test]
    fn zero_inflation_multiplier_keeps_income_flat() {
        let schedule = build_income_schedule(50_000.0, 1.0, 1.0, 4);
        for row in &schedule {
            assert_relative_eq!(row.desired_income, 50_000.0, epsilon = 1e-9);
            assert_relative_eq!(row.min_income, 50_000.0, epsilon = 1e-9);
        }
    }
}
