//! The closed set of asset classes the engine understands.

use serde::{Deserialize, Serialize};

/// One of the four asset classes a portfolio can hold.
///
/// Closed by design: the engine never discovers a new asset class at
/// runtime, so this is a fixed-variant enum rather than a string key into a
/// map. `Cash` is tracked by notional value; the other three carry a unit
/// price per timestep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetClass {
    Stocks,
    Bonds,
    Gold,
    Cash,
}

impl AssetClass {
    pub const ALL: [AssetClass; 4] = [
        AssetClass::Stocks,
        AssetClass::Bonds,
        AssetClass::Gold,
        AssetClass::Cash,
    ];

    /// The three asset classes whose value moves with a market price.
    pub const VARYING: [AssetClass; 3] =
        [AssetClass::Stocks, AssetClass::Bonds, AssetClass::Gold];

    pub fn label(&self) -> &'static str {
        match self {
            AssetClass::Stocks => "stocks",
            AssetClass::Bonds => "bonds",
            AssetClass::Gold => "gold",
            AssetClass::Cash => "cash",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "stocks" => Some(AssetClass::Stocks),
            "bonds" => Some(AssetClass::Bonds),
            "gold" => Some(AssetClass::Gold),
            "cash" => Some(AssetClass::Cash),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_label() {
        for asset in AssetClass::ALL {
            assert_eq!(AssetClass::parse(asset.label()), Some(asset));
        }
    }

    #[test]
    fn unknown_label_is_none() {
        assert_eq!(AssetClass::parse("crypto"), None);
    }
}
