use csv::{ReaderBuilder, StringRecord, Trim};
use std::io::Cursor;
use tracing::{debug, info, warn};

use crate::error::{ConversionError, RowError, SkippedRow};

/// Exact column names of the Schwab 1099-B transaction table
pub mod columns {
    pub const DESCRIPTION: &str = "Description of property (Example 100 sh. XYZ Co.)";
    pub const DATE_ACQUIRED: &str = "Date acquired";
    pub const DATE_SOLD: &str = "Date sold or disposed";
    pub const PROCEEDS: &str = "Proceeds";
    pub const BASIS: &str = "Cost or other basis";
    pub const WASH_SALE: &str = "Wash sale loss disallowed";
    pub const FORM_8949_CODE: &str = "Form 8949 Code";
}

/// The header row starts with the quoted description column name
pub const HEADER_MARKER: &str = "\"Description of property (Example 100 sh. XYZ Co.)\"";

/// Decode raw file bytes as text.
///
/// Schwab exports are UTF-8, sometimes with a BOM. Anything that is not valid
/// UTF-8 is read as Windows-1252 instead of failing.
pub fn decode_input(bytes: &[u8]) -> String {
    let (text, had_errors) = encoding_rs::UTF_8.decode_with_bom_removal(bytes);
    if !had_errors {
        return text.into_owned();
    }

    warn!("Input is not valid UTF-8, decoding as Windows-1252");
    let (text, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    text.into_owned()
}

/// Find the 0-based index of the 1099-B header line.
///
/// Brokerage exports carry disclaimer rows before the table, so the first
/// line whose trimmed content starts with [`HEADER_MARKER`] wins.
pub fn locate_header<S: AsRef<str>>(lines: &[S]) -> Result<usize, ConversionError> {
    lines
        .iter()
        .position(|line| line.as_ref().trim().starts_with(HEADER_MARKER))
        .ok_or(ConversionError::HeaderNotFound)
}

/// One data line of the transaction table, keyed by column.
///
/// A field is `None` when the record is too short to reach that column, or
/// when the column is absent from the header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    /// 1-based line number in the input file
    pub line: usize,
    pub description: Option<String>,
    pub date_acquired: Option<String>,
    pub date_sold: Option<String>,
    pub proceeds: Option<String>,
    pub basis: Option<String>,
    pub wash: Option<String>,
    pub form_code: Option<String>,
    /// Record as read, re-joined with commas, for diagnostics
    pub raw: String,
}

/// Header positions of the recognized columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    description: usize,
    date_acquired: Option<usize>,
    date_sold: usize,
    proceeds: usize,
    basis: usize,
    wash: Option<usize>,
    form_code: Option<usize>,
}

impl ColumnMapping {
    /// Resolve column positions by exact name. Extra columns are ignored.
    pub fn from_headers(headers: &StringRecord) -> Result<Self, ConversionError> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let require = |name: &'static str| find(name).ok_or(ConversionError::MissingColumn(name));

        Ok(ColumnMapping {
            description: require(columns::DESCRIPTION)?,
            date_acquired: find(columns::DATE_ACQUIRED),
            date_sold: require(columns::DATE_SOLD)?,
            proceeds: require(columns::PROCEEDS)?,
            basis: require(columns::BASIS)?,
            wash: find(columns::WASH_SALE),
            form_code: find(columns::FORM_8949_CODE),
        })
    }

    fn extract(&self, record: &StringRecord, line: usize) -> RawRow {
        let field = |idx: Option<usize>| idx.and_then(|i| record.get(i)).map(|s| s.trim().to_string());

        RawRow {
            line,
            description: field(Some(self.description)),
            date_acquired: field(self.date_acquired),
            date_sold: field(Some(self.date_sold)),
            proceeds: field(Some(self.proceeds)),
            basis: field(Some(self.basis)),
            wash: field(self.wash),
            form_code: field(self.form_code),
            raw: record.iter().collect::<Vec<_>>().join(","),
        }
    }
}

/// Lazy reader over the transaction table of a Schwab 1099-B export.
///
/// Construction locates the header and resolves the columns, so a missing
/// header or required column is reported before any row is produced.
pub struct StatementRows {
    reader: csv::Reader<Cursor<Vec<u8>>>,
    mapping: ColumnMapping,
    /// Number of input lines preceding the header
    header_index: usize,
    /// Byte offsets of every '\n' in the table text
    newlines: Vec<usize>,
    record: StringRecord,
}

impl StatementRows {
    pub fn from_text(content: &str) -> Result<Self, ConversionError> {
        let lines: Vec<&str> = content.lines().collect();
        let header_index = locate_header(&lines)?;
        info!("Found 1099-B header at line {}", header_index + 1);

        let mut table = String::with_capacity(content.len());
        table.push_str(lines[header_index].trim());
        for line in &lines[header_index + 1..] {
            table.push('\n');
            table.push_str(line);
        }

        let newlines = table
            .bytes()
            .enumerate()
            .filter(|&(_, b)| b == b'\n')
            .map(|(i, _)| i)
            .collect();

        let mut reader = ReaderBuilder::new()
            .flexible(true) // Short and long rows surface as row errors later
            .trim(Trim::All)
            .from_reader(Cursor::new(table.into_bytes()));

        let headers = reader.headers()?.clone();
        debug!("CSV headers: {:?}", headers);

        let mapping = ColumnMapping::from_headers(&headers)?;
        debug!("Column mapping: {:?}", mapping);

        Ok(StatementRows {
            reader,
            mapping,
            header_index,
            newlines,
            record: StringRecord::new(),
        })
    }

    /// 1-based input line of the record starting at `byte` in the table.
    ///
    /// The reader reports where it started scanning, which is before any
    /// blank lines it skipped, so those are stepped over first.
    fn physical_line(&self, byte: u64) -> usize {
        let table = self.reader.get_ref().get_ref();
        let mut start = byte as usize;
        while start < table.len() && matches!(table[start], b'\n' | b'\r') {
            start += 1;
        }

        let table_line = self.newlines.partition_point(|&nl| nl < start) + 1;
        self.header_index + table_line
    }
}

impl Iterator for StatementRows {
    type Item = Result<RawRow, SkippedRow>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.read_record(&mut self.record) {
            Ok(false) => None,
            Ok(true) => {
                let byte = self.record.position().map_or(0, |p| p.byte());
                let line = self.physical_line(byte);
                Some(Ok(self.mapping.extract(&self.record, line)))
            }
            Err(e) => {
                let byte = e.position().map_or(0, |p| p.byte());
                Some(Err(SkippedRow {
                    line: self.physical_line(byte),
                    raw: String::new(),
                    reason: RowError::Malformed(e.to_string()),
                }))
            }
        }
    }
}
