// Import module - Schwab 1099-B CSV reader and row normalization

pub mod normalize;
pub mod schwab_csv;

pub use normalize::{normalize_row, AcquiredDate, Transaction};
pub use schwab_csv::{decode_input, locate_header, ColumnMapping, RawRow, StatementRows};
