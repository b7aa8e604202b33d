//! Decimal money helpers.
//!
//! All monetary values are [`Decimal`]s rounded half-up to two decimal places
//! at the point of computation.  They cross the storage and serde boundaries
//! as decimal strings, never as binary floats.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::errors::{LedgerError, Result};

/// Round to 2 decimal places, midpoint away from zero.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Total commission: 3% of the contract total.
pub fn commission_total(contract_total: Decimal) -> Decimal {
    round2(contract_total * Decimal::new(3, 2))
}

/// One commission half: 1.5% of the contract total.
pub fn half_amount(contract_total: Decimal) -> Decimal {
    round2(contract_total * Decimal::new(15, 3))
}

/// Render an amount with exactly two decimal places for messages and reports.
pub fn fmt2(value: Decimal) -> String {
    format!("{:.2}", round2(value))
}

/// Parse a decimal string coming from storage.
pub fn parse_amount(raw: &str) -> Result<Decimal> {
    Decimal::from_str(raw).map_err(|e| LedgerError::Data(format!("bad amount {raw:?}: {e}")))
}
