//! Form 8949 code to TXF record type classification

use std::fmt;

/// IRS Form 8949 box code as printed in the Schwab export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Form8949Code {
    /// Short-term, basis reported to the IRS
    A,
    /// Short-term, basis not reported
    B,
    /// Short-term, no 1099-B received
    C,
    /// Long-term, basis reported to the IRS
    D,
    /// Long-term, basis not reported
    E,
    /// Long-term, no 1099-B received
    F,
    /// Holding period unknown
    X,
    /// Blank or unrecognized code
    Unknown,
}

impl Form8949Code {
    /// Parse a raw code cell. Matching is case-insensitive and ignores
    /// surrounding whitespace.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "A" => Form8949Code::A,
            "B" => Form8949Code::B,
            "C" => Form8949Code::C,
            "D" => Form8949Code::D,
            "E" => Form8949Code::E,
            "F" => Form8949Code::F,
            "X" => Form8949Code::X,
            _ => Form8949Code::Unknown,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Form8949Code::Unknown)
    }

    /// TXF record type for this code
    pub fn record_type(&self) -> RecordType {
        match self {
            Form8949Code::A => RecordType::N321,
            Form8949Code::B => RecordType::N711,
            Form8949Code::C => RecordType::N712,
            Form8949Code::D => RecordType::N323,
            Form8949Code::E => RecordType::N713,
            Form8949Code::F => RecordType::N714,
            // Unknown shares N711 with B; callers warn about it
            Form8949Code::X | Form8949Code::Unknown => RecordType::N711,
        }
    }
}

/// TXF reference number identifying the capital gains category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    N321,
    N711,
    N712,
    N323,
    N713,
    N714,
}

impl RecordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::N321 => "N321",
            RecordType::N711 => "N711",
            RecordType::N712 => "N712",
            RecordType::N323 => "N323",
            RecordType::N713 => "N713",
            RecordType::N714 => "N714",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
