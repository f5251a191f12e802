//! Canonical transaction record delivered to Notion

use serde::{Deserialize, Serialize};

/// A normalized statement transaction, ready for delivery
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CanonicalRecord {
    /// Operation detail as it appears on the statement
    pub title: String,
    /// Magnitude in the card currency (UAH)
    pub amount_primary: f64,
    /// Magnitude in the operation currency; 0 when there was no conversion
    pub amount_secondary: f64,
    /// Conversion rate; 0 is a sentinel for "no conversion", not a rate
    pub exchange_rate: f64,
    /// ISO-8601 UTC instant of the operation
    pub timestamp: String,
}

impl CanonicalRecord {
    /// Build a record, discarding the debit/credit sign of both amounts.
    ///
    /// A missing rate (`None`) zeroes the secondary amount as well: the
    /// two are either both present or both absent.
    pub fn new(
        title: impl Into<String>,
        amount_primary: f64,
        conversion: Option<(f64, f64)>,
        timestamp: impl Into<String>,
    ) -> Self {
        let (amount_secondary, exchange_rate) = match conversion {
            Some((amount, rate)) => (amount.abs(), rate),
            None => (0.0, 0.0),
        };

        Self {
            title: title.into(),
            amount_primary: amount_primary.abs(),
            amount_secondary,
            exchange_rate,
            timestamp: timestamp.into(),
        }
    }

    /// True when the operation went through a currency conversion
    pub fn has_conversion(&self) -> bool {
        self.exchange_rate != 0.0
    }
}
