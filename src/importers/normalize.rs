//! Transaction normalization
//!
//! Turns a [`RawRow`] into a validated [`Transaction`]. Every check runs
//! before anything is returned, so a rejected row never reaches the totals.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

use super::schwab_csv::{columns, RawRow};
use crate::error::RowError;
use crate::txf::{Form8949Code, RecordType};

/// Date format used by Schwab and by TXF `D` lines
pub const DATE_FORMAT: &str = "%m/%d/%Y";

/// Acquisition date of a lot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquiredDate {
    Date(NaiveDate),
    /// Lot built from several purchases
    Various,
}

impl fmt::Display for AcquiredDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AcquiredDate::Date(date) => write!(f, "{}", date.format(DATE_FORMAT)),
            AcquiredDate::Various => f.write_str("VARIOUS"),
        }
    }
}

/// A validated, classified 1099-B sale
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub line: usize,
    pub description: String,
    pub date_acquired: AcquiredDate,
    pub date_sold: NaiveDate,
    pub proceeds: Decimal,
    pub basis: Decimal,
    /// Disallowed wash sale loss, zero when none
    pub wash: Decimal,
    pub form_code: Form8949Code,
    pub record_type: RecordType,
}

impl Transaction {
    /// `None` when the result does not fit in a `Decimal`
    pub fn gain_loss(&self) -> Option<Decimal> {
        self.proceeds.checked_sub(self.basis)
    }

    pub fn wash_adjusted_gain_loss(&self) -> Option<Decimal> {
        self.basis
            .checked_sub(self.wash)
            .and_then(|adjusted| self.proceeds.checked_sub(adjusted))
    }

    pub fn has_wash(&self) -> bool {
        !self.wash.is_zero()
    }
}

/// Validate and classify one row.
///
/// Checks run in order: monetary fields, date sold, date acquired. The first
/// failure is returned.
pub fn normalize_row(row: &RawRow) -> Result<Transaction, RowError> {
    let proceeds = parse_money(columns::PROCEEDS, required(&row.proceeds, columns::PROCEEDS)?)?;
    let basis = parse_money(columns::BASIS, required(&row.basis, columns::BASIS)?)?;
    let wash = match row.wash.as_deref().map(str::trim) {
        None | Some("") => Decimal::ZERO,
        Some(raw) => parse_money(columns::WASH_SALE, raw)?,
    };

    let date_sold = parse_date(columns::DATE_SOLD, required(&row.date_sold, columns::DATE_SOLD)?)?;
    let date_acquired = resolve_date_acquired(row.date_acquired.as_deref().unwrap_or(""), date_sold)?;

    let form_code = Form8949Code::parse(row.form_code.as_deref().unwrap_or(""));

    Ok(Transaction {
        line: row.line,
        description: row.description.as_deref().unwrap_or("").trim().to_string(),
        date_acquired,
        date_sold,
        proceeds,
        basis,
        wash,
        form_code,
        record_type: form_code.record_type(),
    })
}

fn required<'a>(value: &'a Option<String>, field: &'static str) -> Result<&'a str, RowError> {
    value
        .as_deref()
        .ok_or(RowError::MissingValue { field })
}

/// Parse a monetary cell such as `1,500.00`, `$12.50`, `-$3.00` or `(3.00)`.
pub fn parse_money(field: &'static str, raw: &str) -> Result<Decimal, RowError> {
    let invalid = || RowError::InvalidMonetaryValue {
        field,
        value: raw.to_string(),
    };

    let cleaned = raw.trim().replace(',', "");
    let (negative, body) = if let Some(inner) = cleaned
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
    {
        (true, inner)
    } else if let Some(rest) = cleaned.strip_prefix('-') {
        (true, rest)
    } else {
        (false, cleaned.as_str())
    };

    let body = body.trim();
    let body = body.strip_prefix('$').unwrap_or(body);
    if body.is_empty() || body.starts_with(['-', '+']) {
        return Err(invalid());
    }

    let value = Decimal::from_str(body).map_err(|_| invalid())?;
    Ok(if negative { -value } else { value })
}

/// Parse a strict `MM/DD/YYYY` calendar date.
///
/// chrono's `%Y` takes any digit count and a sign, so the year is checked
/// to be exactly four digits first.
pub fn parse_date(field: &'static str, raw: &str) -> Result<NaiveDate, RowError> {
    let invalid = || RowError::InvalidDate {
        field,
        value: raw.to_string(),
    };

    let trimmed = raw.trim();
    let year = trimmed.rsplit('/').next().unwrap_or("");
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| invalid())
}

/// Empty means same day as the sale; "various" in any case means a
/// multi-lot sale; anything else must be a date.
pub fn resolve_date_acquired(raw: &str, date_sold: NaiveDate) -> Result<AcquiredDate, RowError> {
    let raw = raw.trim();
    if raw.is_empty() {
        Ok(AcquiredDate::Date(date_sold))
    } else if raw.eq_ignore_ascii_case("various") {
        Ok(AcquiredDate::Various)
    } else {
        parse_date(columns::DATE_ACQUIRED, raw).map(AcquiredDate::Date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn row(acquired: &str, sold: &str, proceeds: &str, basis: &str, wash: &str, code: &str) -> RawRow {
        RawRow {
            line: 6,
            description: Some("100 sh. XYZ Co.".to_string()),
            date_acquired: Some(acquired.to_string()),
            date_sold: Some(sold.to_string()),
            proceeds: Some(proceeds.to_string()),
            basis: Some(basis.to_string()),
            wash: Some(wash.to_string()),
            form_code: Some(code.to_string()),
            raw: String::new(),
        }
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_normalize_basic_row() {
        let tx = normalize_row(&row("01/01/2023", "02/01/2024", "1,500.00", "1,000.00", "", "A")).unwrap();
        assert_eq!(tx.description, "100 sh. XYZ Co.");
        assert_eq!(tx.date_acquired, AcquiredDate::Date(ymd(2023, 1, 1)));
        assert_eq!(tx.date_sold, ymd(2024, 2, 1));
        assert_eq!(tx.proceeds, dec!(1500.00));
        assert_eq!(tx.basis, dec!(1000.00));
        assert_eq!(tx.wash, Decimal::ZERO);
        assert!(!tx.has_wash());
        assert_eq!(tx.record_type, RecordType::N321);
        assert_eq!(tx.gain_loss(), Some(dec!(500)));
    }

    #[test]
    fn test_wash_adjusted_gain_loss() {
        let tx = normalize_row(&row("01/01/2023", "02/01/2024", "800", "1,000.00", "$150.00", "B")).unwrap();
        assert_eq!(tx.wash, dec!(150));
        assert_eq!(tx.gain_loss(), Some(dec!(-200)));
        assert_eq!(tx.wash_adjusted_gain_loss(), Some(dec!(-50)));
        assert_eq!(tx.record_type, RecordType::N711);
    }

    #[test]
    fn test_gain_loss_out_of_range() {
        let tx = normalize_row(&row("", "02/01/2024", "79228162514264337593543950335", "-1", "", "A")).unwrap();
        assert_eq!(tx.gain_loss(), None);
        assert_eq!(tx.wash_adjusted_gain_loss(), None);
    }

    #[test]
    fn test_empty_date_acquired_uses_date_sold() {
        let tx = normalize_row(&row("", "02/01/2024", "1", "1", "", "D")).unwrap();
        assert_eq!(tx.date_acquired, AcquiredDate::Date(ymd(2024, 2, 1)));
    }

    #[test]
    fn test_various_date_acquired_any_case() {
        for raw in ["various", "VARIOUS", "Various"] {
            let tx = normalize_row(&row(raw, "02/01/2024", "1", "1", "", "D")).unwrap();
            assert_eq!(tx.date_acquired, AcquiredDate::Various);
            assert_eq!(tx.date_acquired.to_string(), "VARIOUS");
        }
    }

    #[test]
    fn test_invalid_date_sold_rejected() {
        let err = normalize_row(&row("01/01/2023", "13/45/2024", "1", "1", "", "A")).unwrap_err();
        assert_eq!(
            err,
            RowError::InvalidDate {
                field: columns::DATE_SOLD,
                value: "13/45/2024".to_string()
            }
        );
    }

    #[test]
    fn test_invalid_date_acquired_rejected() {
        let err = normalize_row(&row("2023-01-01", "02/01/2024", "1", "1", "", "A")).unwrap_err();
        assert!(matches!(err, RowError::InvalidDate { field, .. } if field == columns::DATE_ACQUIRED));
    }

    #[test]
    fn test_non_numeric_proceeds_rejected() {
        let err = normalize_row(&row("01/01/2023", "02/01/2024", "abc", "1", "", "A")).unwrap_err();
        assert!(matches!(err, RowError::InvalidMonetaryValue { field, .. } if field == columns::PROCEEDS));
    }

    #[test]
    fn test_monetary_errors_reported_before_date_errors() {
        let err = normalize_row(&row("01/01/2023", "bad", "1", "xyz", "", "A")).unwrap_err();
        assert!(matches!(err, RowError::InvalidMonetaryValue { field, .. } if field == columns::BASIS));
    }

    #[test]
    fn test_missing_value_when_row_is_short() {
        let mut short = row("01/01/2023", "02/01/2024", "1", "1", "", "A");
        short.basis = None;
        assert_eq!(
            normalize_row(&short).unwrap_err(),
            RowError::MissingValue { field: columns::BASIS }
        );
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let mut tx_row = row("", "02/01/2024", "10", "5", "", "");
        tx_row.date_acquired = None;
        tx_row.wash = None;
        tx_row.form_code = None;
        let tx = normalize_row(&tx_row).unwrap();
        assert_eq!(tx.form_code, Form8949Code::Unknown);
        assert_eq!(tx.record_type, RecordType::N711);
        assert_eq!(tx.wash, Decimal::ZERO);
    }

    #[test]
    fn test_parse_money_variants() {
        assert_eq!(parse_money("x", "1500").unwrap(), dec!(1500));
        assert_eq!(parse_money("x", " 1,234,567.89 ").unwrap(), dec!(1234567.89));
        assert_eq!(parse_money("x", "$12.50").unwrap(), dec!(12.50));
        assert_eq!(parse_money("x", "-$3.00").unwrap(), dec!(-3.00));
        assert_eq!(parse_money("x", "(3.00)").unwrap(), dec!(-3.00));
        assert_eq!(parse_money("x", "-12.5").unwrap(), dec!(-12.5));
    }

    #[test]
    fn test_parse_money_rejects_garbage() {
        for raw in ["", "abc", "$", "--5", "1.2.3", "12 34"] {
            assert!(parse_money("x", raw).is_err(), "accepted {:?}", raw);
        }
    }

    #[test]
    fn test_parse_date_requires_four_digit_year() {
        for raw in ["02/01/24", "02/01/+2024", "02/01/-2024", "02/01/02024", "02/01/2O24", "02/01"] {
            assert_eq!(
                parse_date(columns::DATE_SOLD, raw),
                Err(RowError::InvalidDate {
                    field: columns::DATE_SOLD,
                    value: raw.to_string()
                }),
                "accepted {:?}",
                raw
            );
        }
    }

    #[test]
    fn test_two_digit_year_row_rejected() {
        let err = normalize_row(&row("01/01/23", "02/01/2024", "1", "1", "", "A")).unwrap_err();
        assert!(matches!(err, RowError::InvalidDate { field, .. } if field == columns::DATE_ACQUIRED));
    }

    #[test]
    fn test_parse_date_normalizes_padding() {
        let date = parse_date("d", "2/1/2024").unwrap();
        assert_eq!(date.format(DATE_FORMAT).to_string(), "02/01/2024");
    }
}
