// Reports module - verification totals for the converted statement

pub mod totals;

pub use totals::RunningTotals;
