use rust_decimal::Decimal;

use crate::error::RowError;
use crate::importers::Transaction;

/// Running sums over every transaction written to the TXF file.
///
/// Values are accumulated unrounded; rounding only happens on display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunningTotals {
    pub proceeds: Decimal,
    pub basis: Decimal,
    pub wash: Decimal,
    /// Gain/loss before wash sale adjustments
    pub gain_loss: Decimal,
    pub wash_adjusted_gain_loss: Decimal,
    pub transactions: usize,
}

impl RunningTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one fully validated transaction.
    ///
    /// Either every sum is updated or, when one would overflow, none is.
    pub fn record(&mut self, tx: &Transaction) -> Result<(), RowError> {
        let add = |total: Decimal, value: Option<Decimal>, what: &'static str| {
            value
                .and_then(|v| total.checked_add(v))
                .ok_or(RowError::AmountOutOfRange(what))
        };

        let proceeds = add(self.proceeds, Some(tx.proceeds), "total proceeds")?;
        let basis = add(self.basis, Some(tx.basis), "total basis")?;
        let wash = add(self.wash, Some(tx.wash), "total wash sale adjustments")?;
        let gain_loss = add(self.gain_loss, tx.gain_loss(), "gain/loss")?;
        let wash_adjusted = add(
            self.wash_adjusted_gain_loss,
            tx.wash_adjusted_gain_loss(),
            "wash-adjusted gain/loss",
        )?;

        self.proceeds = proceeds;
        self.basis = basis;
        self.wash = wash;
        self.gain_loss = gain_loss;
        self.wash_adjusted_gain_loss = wash_adjusted;
        self.transactions += 1;
        Ok(())
    }
}
