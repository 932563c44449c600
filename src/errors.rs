//! Error taxonomy for configuration and historical data validation

use thiserror::Error;

/// A configuration field failed a range, type, or membership check.
///
/// Raised eagerly by [`crate::config::SimulatorConfig::validate`] before any
/// simulation runs; never produced mid-run.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigurationError {
    #[error("field `{field}` must be greater than zero, got {value}")]
    MustBePositive { field: &'static str, value: f64 },

    #[error("field `{field}` must be non-negative, got {value}")]
    MustBeNonNegative { field: &'static str, value: f64 },

    #[error("field `{field}` must be in [{low}, {high}], got {value}")]
    OutOfRange { field: &'static str, low: f64, high: f64, value: f64 },

    #[error("field `{field}` must be in ({low}, {high}], got {value}")]
    OutOfRangeExclusiveLow { field: &'static str, low: f64, high: f64, value: f64 },

    #[error("unknown allocation key `{key}`")]
    UnknownAllocationKey { key: String },

    #[error("portfolio_allocation weights must sum to a positive number, got {sum}")]
    AllocationSumNotPositive { sum: f64 },
}

/// The historical price series is malformed or cannot support a single window.
#[derive(Debug, Error, PartialEq)]
pub enum DataError {
    #[error("historical data row {row} is missing required column `{column}`")]
    MissingColumn { row: usize, column: &'static str },

    #[error("historical data row {row} has non-numeric value in column `{column}`: {value}")]
    NonNumeric { row: usize, column: &'static str, value: String },

    #[error("historical data is not in ascending chronological order at row {row}")]
    NotAscending { row: usize },

    #[error("historical data is empty")]
    Empty,
}
