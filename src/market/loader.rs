//! Load a monthly historical price series from CSV.

use std::collections::HashMap;
use std::path::Path;

use csv::Reader;
use serde::Deserialize;

use crate::errors::DataError;

use super::{HistoricalSeries, PriceRecord};

/// Raw CSV row. Extra numeric columns beyond the required five are captured
/// by `extra` and ignored by the engine, per the historical-data contract.
#[derive(Debug, Deserialize)]
struct RawPriceRow {
    year: i32,
    month: u8,
    stocks: f64,
    bonds: f64,
    gold: f64,
    #[serde(flatten)]
    #[allow(dead_code)]
    extra: HashMap<String, f64>,
}

impl RawPriceRow {
    fn into_record(self) -> PriceRecord {
        PriceRecord { year: self.year, month: self.month, stocks: self.stocks, bonds: self.bonds, gold: self.gold }
    }
}

/// Load a historical price series from a CSV file path.
pub fn load_historical_series<P: AsRef<Path>>(path: P) -> Result<HistoricalSeries, Box<dyn std::error::Error>> {
    let reader = Reader::from_path(path)?;
    load_from_reader(reader)
}

fn load_from_reader<R: std::io::Read>(mut reader: Reader<R>) -> Result<HistoricalSeries, Box<dyn std::error::Error>> {
    let mut records = Vec::new();
    for (row_index, result) in reader.deserialize::<RawPriceRow>().enumerate() {
        let raw = result.map_err(|e| format!("row {}: {}", row_index, e))?;
        records.push(raw.into_record());
    }
    if records.is_empty() {
        return Err(Box::new(DataError::Empty));
    }
    for (index, window) in records.windows(2).enumerate() {
        let (prev, next) = (window[0], window[1]);
        let prev_key = prev.year * 12 + prev.month as i32;
        let next_key = next.year * 12 + next.month as i32;
        if next_key <= prev_key {
            return Err(Box::new(DataError::NotAscending { row: index + 1 }));
        }
    }
    Ok(HistoricalSeries::new(records))
}

/// Load a historical price series from an in-memory reader, e.g. a test fixture.
pub fn load_historical_series_from_reader<R: std::io::Read>(
    reader: R,
) -> Result<HistoricalSeries, Box<dyn std::error::Error>> {
    load_from_reader(Reader::from_reader(reader))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "year,month,stocks,bonds,gold\n\
2000,1,100.0,50.0,300.0\n\
2000,2,101.0,50.1,301.0\n\
2000,3,99.5,50.2,302.0\n";

    #[test]
    fn loads_well_formed_series() {
        let series = load_historical_series_from_reader(CSV.as_bytes()).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.as_slice()[0].stocks, 100.0);
    }

    #[test]
    fn ignores_unknown_extra_columns() {
        let csv = "year,month,stocks,bonds,gold,vix\n2000,1,100.0,50.0,300.0,18.2\n";
        let series = load_historical_series_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn rejects_missing_required_column() {
        let csv = "year,month,stocks,bonds\n2000,1,100.0,50.0\n";
        assert!(load_historical_series_from_reader(csv.as_bytes()).is_err());
    }

    #[test]
    fn rejects_empty_series() {
        let csv = "year,month,stocks,bonds,gold\n";
        assert!(load_historical_series_from_reader(csv.as_bytes()).is_err());
    }
}
