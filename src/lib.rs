//! Schwab TXF - Charles Schwab 1099-B CSV to TXF converter
//!
//! This library locates the 1099-B transaction table in a Schwab CSV export,
//! normalizes and classifies each sale by Form 8949 code, and writes a TXF
//! V042 file for import into tax preparation software.

pub mod cli;
pub mod config;
pub mod converter;
pub mod error;
pub mod importers;
pub mod reports;
pub mod txf;
pub mod utils;
