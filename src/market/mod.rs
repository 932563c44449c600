//! Historical monthly price data

mod loader;

pub use loader::load_historical_series;

/// One month of unit prices for the three varying asset classes.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PriceRecord {
    pub year: i32,
    pub month: u8,
    pub stocks: f64,
    pub bonds: f64,
    pub gold: f64,
}

impl PriceRecord {
    pub fn price(&self, asset: crate::asset::AssetClass) -> f64 {
        match asset {
            crate::asset::AssetClass::Stocks => self.stocks,
            crate::asset::AssetClass::Bonds => self.bonds,
            crate::asset::AssetClass::Gold => self.gold,
            crate::asset::AssetClass::Cash => 1.0,
        }
    }
}

/// An ordered, contiguous monthly price series.
#[derive(Debug, Clone, Default)]
pub struct HistoricalSeries {
    records: Vec<PriceRecord>,
}

impl HistoricalSeries {
    pub fn new(records: Vec<PriceRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn as_slice(&self) -> &[PriceRecord] {
        &self.records
    }
}
