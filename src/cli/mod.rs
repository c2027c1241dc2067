use clap::Parser;
use std::path::PathBuf;

pub mod formatters;

#[derive(Parser, Debug)]
#[command(name = "schwab-txf")]
#[command(
    version,
    about = "Convert a Charles Schwab 1099-B CSV export into a TXF file"
)]
#[command(
    long_about = "Reads the 1099-B transaction table from a Schwab CSV export, classifies each sale by Form 8949 code and writes a TXF (V042) file that tax software can import. Totals are printed for cross-checking against the 1099-B summary."
)]
pub struct Cli {
    /// Path to the Schwab 1099-B CSV file
    pub input: PathBuf,

    /// Output path (default: input path with a .TXF extension)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Export date written to the TXF header (MM/DD/YYYY, default: today)
    #[arg(long, value_parser = parse_export_date)]
    pub export_date: Option<chrono::NaiveDate>,

    /// Exit with status 2 if any row was skipped
    #[arg(long)]
    pub strict: bool,

    /// Print totals as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Disable colorized/ANSI output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Configuration file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_export_date(s: &str) -> Result<chrono::NaiveDate, String> {
    chrono::NaiveDate::parse_from_str(s, crate::importers::normalize::DATE_FORMAT)
        .map_err(|_| format!("invalid date '{}', expected MM/DD/YYYY", s))
}
