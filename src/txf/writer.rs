use chrono::NaiveDate;
use std::io::{self, Write};

use crate::importers::normalize::{Transaction, DATE_FORMAT};
use crate::utils::format_amount;

/// TXF format version written in the `V` line
pub const TXF_VERSION: &str = "042";

/// Serializes transactions into TXF V042 records
pub struct TxfWriter<W: Write> {
    out: W,
}

impl<W: Write> TxfWriter<W> {
    pub fn new(out: W) -> Self {
        TxfWriter { out }
    }

    /// File header: version, source application, export date, terminator.
    /// Written once, before any record.
    pub fn write_header(&mut self, application: &str, export_date: NaiveDate) -> io::Result<()> {
        writeln!(self.out, "V{}", TXF_VERSION)?;
        writeln!(self.out, "A{}", single_line(application))?;
        writeln!(self.out, "D{}", export_date.format(DATE_FORMAT))?;
        writeln!(self.out, "^")
    }

    /// One detailed (`TD`) capital gains record
    pub fn write_record(&mut self, tx: &Transaction) -> io::Result<()> {
        writeln!(self.out, "TD")?;
        writeln!(self.out, "{}", tx.record_type)?;
        writeln!(self.out, "C1")?;
        writeln!(self.out, "L1")?;
        writeln!(self.out, "P{}", single_line(&tx.description))?;
        writeln!(self.out, "D{}", tx.date_acquired)?;
        writeln!(self.out, "D{}", tx.date_sold.format(DATE_FORMAT))?;
        writeln!(self.out, "${}", format_amount(tx.basis))?;
        writeln!(self.out, "${}", format_amount(tx.proceeds))?;
        if tx.has_wash() {
            writeln!(self.out, "${}", format_amount(tx.wash))?;
        }
        writeln!(self.out, "^")
    }

    /// Flush and hand back the underlying writer
    pub fn finish(mut self) -> io::Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}

// TXF is line oriented; an embedded newline would start a new field
fn single_line(text: &str) -> String {
    text.replace(['\r', '\n'], " ")
}
