use anyhow::Result;
use clap::Parser;
use schwab_txf::cli::formatters::{format_report_json, format_skipped_row, format_totals_text};
use schwab_txf::cli::Cli;
use schwab_txf::config::Config;
use schwab_txf::converter::{convert_file, ConvertOptions};
use schwab_txf::error::ConversionError;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Exit status when `--strict` is set and rows were skipped
const EXIT_ROWS_SKIPPED: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "error" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if cli.no_color {
        colored::control::set_override(false);
    }

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            match e.downcast_ref::<ConversionError>() {
                Some(ConversionError::InputNotFound(path)) => {
                    eprintln!("Error: Input file {} not found.", path)
                }
                _ => eprintln!("Error: {:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let config = Config::load(cli.config.as_deref())?;
    debug!("Configuration: {:?}", config);

    let mut options = ConvertOptions::from_config(&config);
    if let Some(date) = cli.export_date {
        options.export_date = date;
    }
    options.output = cli.output.clone();

    let report = convert_file(&cli.input, &options)?;

    for row in &report.summary.skipped {
        eprintln!("{}", format_skipped_row(row));
    }

    if cli.json {
        println!("{}", format_report_json(&report));
    } else {
        eprint!("{}", format_totals_text(&report.summary));
        println!(
            "Conversion complete. TXF file saved as {}",
            report.output_path.display()
        );
    }

    if (cli.strict || config.strict) && report.summary.has_skipped_rows() {
        return Ok(ExitCode::from(EXIT_ROWS_SKIPPED));
    }
    Ok(ExitCode::SUCCESS)
}
