//! Utility functions for formatting monetary values
//!
//! TXF records need bare two-decimal amounts, while the totals report uses
//! US currency formatting. Both round half away from zero.

use rust_decimal::{Decimal, RoundingStrategy};

/// Round to cents
pub fn round_cents(value: Decimal) -> Decimal {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    // Avoid printing "-0.00"
    if rounded.is_zero() {
        Decimal::ZERO
    } else {
        rounded
    }
}

/// Format with exactly two decimals and no separators: "1500.00"
///
/// This is the form written into TXF `$` lines.
///
/// # Examples
/// ```
/// use schwab_txf::utils::format_amount;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_amount(dec!(1500)), "1500.00");
/// assert_eq!(format_amount(dec!(-12.345)), "-12.35");
/// ```
pub fn format_amount(value: Decimal) -> String {
    format!("{:.2}", round_cents(value))
}

/// Format as US Dollars: "$1,234.56", sign before the symbol: "-$12.00"
///
/// # Examples
/// ```
/// use schwab_txf::utils::format_currency;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_currency(dec!(1234.56)), "$1,234.56");
/// assert_eq!(format_currency(dec!(-500)), "-$500.00");
/// ```
pub fn format_currency(value: Decimal) -> String {
    let rounded = round_cents(value);
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };

    let formatted = format!("{:.2}", rounded.abs());
    let (integer_part, decimal_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    // Add thousands separators (,) to integer part
    let with_separators: String = integer_part
        .chars()
        .rev()
        .enumerate()
        .flat_map(|(i, c)| {
            if i > 0 && i % 3 == 0 {
                vec![',', c]
            } else {
                vec![c]
            }
        })
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();

    format!("{}${}.{}", sign, with_separators, decimal_part)
}
