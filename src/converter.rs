//! Conversion pipeline: Schwab 1099-B CSV in, TXF out.
//!
//! The header and column layout are validated before the output file is
//! touched. Rows are then normalized and written one at a time; a bad row
//! is recorded in the [`ConversionSummary`] and skipped.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{ConversionError, SkippedRow};
use crate::importers::{decode_input, normalize_row, StatementRows};
use crate::reports::RunningTotals;
use crate::txf::TxfWriter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Source identifier for the TXF `A` line
    pub application: String,
    /// Date written in the TXF header
    pub export_date: NaiveDate,
    pub atomic_output: bool,
    /// Output path; defaults to the input path with a `.TXF` extension
    pub output: Option<PathBuf>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl ConvertOptions {
    pub fn from_config(config: &Config) -> Self {
        ConvertOptions {
            application: config.application.clone(),
            export_date: Local::now().date_naive(),
            atomic_output: config.atomic_output,
            output: None,
        }
    }
}

/// Outcome of converting the rows of one statement
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionSummary {
    pub totals: RunningTotals,
    pub skipped: Vec<SkippedRow>,
    /// Rows written with a blank or unrecognized Form 8949 code
    pub unclassified: usize,
}

impl ConversionSummary {
    pub fn has_skipped_rows(&self) -> bool {
        !self.skipped.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionReport {
    pub output_path: PathBuf,
    pub summary: ConversionSummary,
}

/// `statement.csv` becomes `statement.TXF` next to it
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("TXF")
}

/// Convert a CSV file on disk and write the TXF file.
///
/// Fails without creating any output when the input is missing, the 1099-B
/// header cannot be found, or a required column is absent.
pub fn convert_file(input: &Path, options: &ConvertOptions) -> Result<ConversionReport> {
    if !input.is_file() {
        return Err(ConversionError::InputNotFound(input.display().to_string()).into());
    }

    info!("Converting Schwab 1099-B export: {:?}", input);
    let bytes = fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let content = decode_input(&bytes);
    let rows = StatementRows::from_text(&content)?;

    let output_path = options
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(input));

    let summary = if options.atomic_output {
        write_atomic(&output_path, rows, options)?
    } else {
        let file = File::create(&output_path)
            .with_context(|| format!("Failed to create {}", output_path.display()))?;
        write_statement(rows, BufWriter::new(file), options)?
    };

    info!(
        "Wrote {} transactions to {:?} ({} rows skipped)",
        summary.totals.transactions,
        output_path,
        summary.skipped.len()
    );

    Ok(ConversionReport {
        output_path,
        summary,
    })
}

/// Convert in-memory CSV text, writing TXF to `out`
pub fn convert_str<W: Write>(content: &str, out: W, options: &ConvertOptions) -> Result<ConversionSummary> {
    let rows = StatementRows::from_text(content)?;
    write_statement(rows, out, options)
}

fn write_atomic(output_path: &Path, rows: StatementRows, options: &ConvertOptions) -> Result<ConversionSummary> {
    let dir = match output_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
    let summary = write_statement(rows, BufWriter::new(tmp.as_file_mut()), options)?;

    tmp.persist(output_path)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to save {}", output_path.display()))?;

    Ok(summary)
}

fn write_statement<W: Write>(rows: StatementRows, out: W, options: &ConvertOptions) -> Result<ConversionSummary> {
    let mut writer = TxfWriter::new(out);
    writer
        .write_header(&options.application, options.export_date)
        .context("Failed to write TXF header")?;

    let summary = convert_rows(rows, &mut writer).context("Failed to write TXF record")?;
    writer.finish().context("Failed to flush TXF output")?;
    Ok(summary)
}

/// Normalize each row and write the valid ones, in input order.
///
/// A row reaches the totals and the output only after passing every check.
/// Totals that would overflow reject the row instead.
pub fn convert_rows<I, W>(rows: I, writer: &mut TxfWriter<W>) -> io::Result<ConversionSummary>
where
    I: IntoIterator<Item = Result<crate::importers::RawRow, SkippedRow>>,
    W: Write,
{
    let mut summary = ConversionSummary::default();

    for item in rows {
        let raw = match item {
            Ok(raw) => raw,
            Err(skipped) => {
                warn!("Skipping row {}: {}", skipped.line, skipped.reason);
                summary.skipped.push(skipped);
                continue;
            }
        };

        let tx = match normalize_row(&raw) {
            Ok(tx) => tx,
            Err(reason) => {
                warn!("Skipping row {}: {}", raw.line, reason);
                summary.skipped.push(SkippedRow {
                    line: raw.line,
                    raw: raw.raw,
                    reason,
                });
                continue;
            }
        };

        if let Err(reason) = summary.totals.record(&tx) {
            warn!("Skipping row {}: {}", raw.line, reason);
            summary.skipped.push(SkippedRow {
                line: raw.line,
                raw: raw.raw,
                reason,
            });
            continue;
        }

        if !tx.form_code.is_known() {
            warn!(
                "Row {}: unrecognized Form 8949 code {:?}, filed as {}",
                tx.line,
                raw.form_code.as_deref().unwrap_or(""),
                tx.record_type
            );
            summary.unclassified += 1;
        }

        writer.write_record(&tx)?;
    }

    Ok(summary)
}
