//! Error handling for the Schwab TXF converter
//!
//! Two tiers of errors exist. [`ConversionError`] aborts the whole run and
//! nothing usable is written. [`RowError`] only rejects the row it was raised
//! for; the converter logs it and moves on to the next row.

use thiserror::Error;

/// Fatal errors: the conversion stops and no output file is kept
#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("input file {0} not found")]
    InputNotFound(String),

    #[error("No Form 1099-B header found in the CSV file")]
    HeaderNotFound,

    #[error("required column missing from header: {0}")]
    MissingColumn(&'static str),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error")]
    Io(#[from] std::io::Error),
}

/// Recoverable errors scoped to a single transaction row
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    #[error("Invalid monetary value in {field}: '{value}'")]
    InvalidMonetaryValue { field: &'static str, value: String },

    #[error("Invalid {field} format: '{value}'")]
    InvalidDate { field: &'static str, value: String },

    #[error("Missing required value: {field}")]
    MissingValue { field: &'static str },

    #[error("Unreadable record: {0}")]
    Malformed(String),

    #[error("Amount out of range while computing {0}")]
    AmountOutOfRange(&'static str),
}

/// A row the converter rejected, kept for the end-of-run report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// 1-based line number in the input file
    pub line: usize,
    pub raw: String,
    pub reason: RowError,
}

/// Result type alias for conversion operations
pub type Result<T> = anyhow::Result<T>;
