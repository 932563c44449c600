//! Simulator configuration and eager validation.

use std::collections::HashMap;

use crate::asset::AssetClass;
use crate::errors::ConfigurationError;

/// Target portfolio weights across the four asset classes.
///
/// Stored as a fixed-layout struct, not a map, since the asset set is closed.
/// Weights need not sum to 1 on construction; [`Allocation::normalized`]
/// produces the normalized copy the engine actually allocates against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Allocation {
    pub stocks: f64,
    pub bonds: f64,
    pub gold: f64,
    pub cash: f64,
}

impl Allocation {
    pub fn weight(&self, asset: AssetClass) -> f64 {
        match asset {
            AssetClass::Stocks => self.stocks,
            AssetClass::Bonds => self.bonds,
            AssetClass::Gold => self.gold,
            AssetClass::Cash => self.cash,
        }
    }

    pub fn sum(&self) -> f64 {
        self.stocks + self.bonds + self.gold + self.cash
    }

    /// Returns a copy scaled so the four weights sum to 1.
    ///
    /// Panics if `sum()` is not positive; callers must validate the
    /// configuration first.
    pub fn normalized(&self) -> Allocation {
        let total = self.sum();
        Allocation {
            stocks: self.stocks / total,
            bonds: self.bonds / total,
            gold: self.gold / total,
            cash: self.cash / total,
        }
    }

    /// Build an allocation from a sparse key/weight map, rejecting unknown keys.
    pub fn from_map(map: &HashMap<String, f64>) -> Result<Allocation, ConfigurationError> {
        let mut allocation = Allocation { stocks: 0.0, bonds: 0.0, gold: 0.0, cash: 0.0 };
        for (key, &weight) in map {
            match AssetClass::parse(key) {
                Some(AssetClass::Stocks) => allocation.stocks = weight,
                Some(AssetClass::Bonds) => allocation.bonds = weight,
                Some(AssetClass::Gold) => allocation.gold = weight,
                Some(AssetClass::Cash) => allocation.cash = weight,
                None => return Err(ConfigurationError::UnknownAllocationKey { key: key.clone() }),
            }
        }
        Ok(allocation)
    }
}

/// Full set of inputs to one backtesting run, validated once before use.
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    pub starting_portfolio_value: f64,
    pub desired_annual_income: f64,
    pub inflation: f64,
    pub min_income_multiplier: f64,
    pub max_withdrawal_rate: f64,
    pub simulation_length_years: u32,
    pub cash_buffer_years: u32,
    pub portfolio_allocation: Allocation,
}

impl SimulatorConfig {
    /// Runs every range/membership check from the external configuration
    /// contract and returns the first violation found, field by field.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.starting_portfolio_value <= 0.0 {
            return Err(ConfigurationError::MustBePositive {
                field: "starting_portfolio_value",
                value: self.starting_portfolio_value,
            });
        }
        if self.desired_annual_income <= 0.0 {
            return Err(ConfigurationError::MustBePositive {
                field: "desired_annual_income",
                value: self.desired_annual_income,
            });
        }
        if self.inflation <= 0.0 {
            return Err(ConfigurationError::MustBePositive {
                field: "inflation",
                value: self.inflation,
            });
        }
        if !(0.0..=1.0).contains(&self.min_income_multiplier) {
            return Err(ConfigurationError::OutOfRange {
                field: "min_income_multiplier",
                low: 0.0,
                high: 1.0,
                value: self.min_income_multiplier,
            });
        }
        if !(self.max_withdrawal_rate > 0.0 && self.max_withdrawal_rate <= 1.0) {
            return Err(ConfigurationError::OutOfRangeExclusiveLow {
                field: "max_withdrawal_rate",
                low: 0.0,
                high: 1.0,
                value: self.max_withdrawal_rate,
            });
        }
        if self.simulation_length_years == 0 {
            return Err(ConfigurationError::MustBePositive {
                field: "simulation_length_years",
                value: self.simulation_length_years as f64,
            });
        }
        let allocation_sum = self.portfolio_allocation.sum();
        if allocation_sum <= 0.0 {
            return Err(ConfigurationError::AllocationSumNotPositive { sum: allocation_sum });
        }
        for asset in AssetClass::ALL {
            let weight = self.portfolio_allocation.weight(asset);
            if weight < 0.0 {
                return Err(ConfigurationError::MustBeNonNegative {
                    field: asset.label(),
                    value: weight,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> SimulatorConfig {
        SimulatorConfig {
            starting_portfolio_value: 100_000.0,
            desired_annual_income: 40_000.0,
            inflation: 1.02,
            min_income_multiplier: 0.5,
            max_withdrawal_rate: 0.04,
            simulation_length_years: 30,
            cash_buffer_years: 2,
            portfolio_allocation: Allocation { stocks: 0.6, bonds: 0.3, gold: 0.05, cash: 0.05 },
        }
    }

    #[test]
    fn accepts_boundary_values() {
        let mut config = valid_config();
        config.max_withdrawal_rate = 1.0;
        config.cash_buffer_years = 0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_zero_starting_value() {
        let mut config = valid_config();
        config.starting_portfolio_value = 0.0;
        assert_eq!(
            config.validate(),
            Err(ConfigurationError::MustBePositive {
                field: "starting_portfolio_value",
                value: 0.0
            })
        );
    }

    #[test]
    fn rejects_max_withdrawal_rate_above_one() {
        let mut config = valid_config();
        config.max_withdrawal_rate = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::OutOfRangeExclusiveLow { field: "max_withdrawal_rate", .. })
        ));
    }

    #[test]
    fn rejects_unknown_allocation_key() {
        let mut map = HashMap::new();
        map.insert("crypto".to_string(), 1.0);
        assert_eq!(
            Allocation::from_map(&map),
            Err(ConfigurationError::UnknownAllocationKey { key: "crypto".to_string() })
        );
    }

    #[test]
    fn normalizes_to_unit_sum() {
        let allocation = Allocation { stocks: 2.0, bonds: 1.0, gold: 0.5, cash: 0.5 };
        let normalized = allocation.normalized();
        assert!((normalized.sum() - 1.0).abs() < 1e-12);
    }
}
