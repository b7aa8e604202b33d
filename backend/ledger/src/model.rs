//! Domain types for the commission ledger.
//!
//! Storage rows (`*Row`) keep the raw TEXT/INTEGER column values as SQLite
//! returns them; the domain types carry parsed [`Decimal`] amounts and UTC
//! instants.  Conversion fails with [`LedgerError::Data`] when a stored value
//! is malformed.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{LedgerError, Result};
use crate::money;

/// Selector for one of the two commission halves of a contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Half {
    #[serde(rename = "first_half")]
    First,
    #[serde(rename = "second_half")]
    Second,
}

impl Half {
    /// Parse the wire identifier used by the surrounding API layer.
    pub fn parse(raw: &str) -> Result<Self> {
        match raw {
            "first_half" => Ok(Self::First),
            "second_half" => Ok(Self::Second),
            other => Err(LedgerError::Validation(format!(
                "half must be \"first_half\" or \"second_half\", got {other:?}"
            ))),
        }
    }

    /// Short identifier string, also used in log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::First => "first_half",
            Self::Second => "second_half",
        }
    }
}

/// Per-half ledger sub-record of a contract.
///
/// `unlocked`/`unlocked_at` cache the rule evaluator's verdict; the
/// disbursement fields are authoritative (money actually handed over).
#[derive(Debug, Clone, Serialize)]
pub struct HalfLedger {
    pub unlocked: bool,
    pub unlocked_at: Option<DateTime<Utc>>,
    pub disbursed: Decimal,
    pub fully_disbursed: bool,
    pub disbursed_at: Option<DateTime<Utc>>,
}

/// One signed sale, sold by a vendor, paid off in installments.
#[derive(Debug, Clone, Serialize)]
pub struct Contract {
    pub id: i64,
    pub vendor_id: i64,
    pub total_amount: Decimal,
    /// Instant the contract was created — distinct from the event date.
    pub created_at: DateTime<Utc>,
    pub half1: HalfLedger,
    pub half2: HalfLedger,
}

impl Contract {
    pub fn half(&self, half: Half) -> &HalfLedger {
        match half {
            Half::First => &self.half1,
            Half::Second => &self.half2,
        }
    }
}

/// A completed client payment against a contract.  Immutable once recorded.
#[derive(Debug, Clone, Serialize)]
pub struct Payment {
    pub id: i64,
    pub contract_id: i64,
    pub amount: Decimal,
    pub payment_date: DateTime<Utc>,
}

/// Sales agent.  `active` only affects base-salary entitlement elsewhere;
/// commissions accrue for active and inactive vendors identically.
#[derive(Debug, Clone, Serialize)]
pub struct Vendor {
    pub id: i64,
    pub name: String,
    pub active: bool,
    pub total_commissions: Decimal,
}

/// Evaluator verdict for one half.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HalfUnlock {
    pub unlocked: bool,
    /// Date credited with causing the unlock; present iff `unlocked`.
    pub attribution_date: Option<DateTime<Utc>>,
}

impl HalfUnlock {
    pub fn locked() -> Self {
        Self {
            unlocked: false,
            attribution_date: None,
        }
    }
}

/// Output of the unlock rule evaluator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnlockResult {
    pub half1: HalfUnlock,
    pub half2: HalfUnlock,
    pub commission_total: Decimal,
    pub half1_amount: Decimal,
    pub half2_amount: Decimal,
    pub total_paid: Decimal,
    pub percent_paid: Decimal,
}

impl UnlockResult {
    pub fn half(&self, half: Half) -> &HalfUnlock {
        match half {
            Half::First => &self.half1,
            Half::Second => &self.half2,
        }
    }

    pub fn half_amount(&self, half: Half) -> Decimal {
        match half {
            Half::First => self.half1_amount,
            Half::Second => self.half2_amount,
        }
    }
}

/// Result of recording a manual disbursement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisbursementResult {
    pub fully_disbursed: bool,
    pub disbursed_amount: Decimal,
    pub pending: Decimal,
}

/// One month bucket of unlocked commission, keyed `YYYY-MM`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTotal {
    pub month: String,
    pub total: Decimal,
}

/// Vendor-level commission aggregate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VendorSummary {
    pub vendor_id: i64,
    pub total_commissions: Decimal,
    pub unlocked_commissions: Decimal,
    pub by_month: Vec<MonthlyTotal>,
}

/// Inclusive `[from, to]` filter on contract creation instants.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DateWindow {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

/// Per-half line of a contract commission statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HalfStatement {
    pub half: Half,
    pub amount: Decimal,
    pub unlocked: bool,
    pub attribution_date: Option<DateTime<Utc>>,
    pub disbursed: Decimal,
    pub pending: Decimal,
    pub fully_disbursed: bool,
    pub disbursed_at: Option<DateTime<Utc>>,
}

/// The consistent per-contract view that listing and report rendering
/// consume.  Derived state matches [`UnlockResult`] exactly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContractStatement {
    pub contract_id: i64,
    pub vendor_id: i64,
    pub total_amount: Decimal,
    pub commission_total: Decimal,
    pub halves: [HalfStatement; 2],
}

// ─────────────────────────────────────────────────────────
// Storage rows
// ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VendorRow {
    pub id: i64,
    pub name: String,
    pub active: bool,
    pub total_commissions: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ContractRow {
    pub id: i64,
    pub vendor_id: i64,
    pub total_amount: String,
    pub created_at: i64,
    pub half1_unlocked: bool,
    pub half1_unlocked_at: Option<i64>,
    pub half1_disbursed: String,
    pub half1_fully_disbursed: bool,
    pub half1_disbursed_at: Option<i64>,
    pub half2_unlocked: bool,
    pub half2_unlocked_at: Option<i64>,
    pub half2_disbursed: String,
    pub half2_fully_disbursed: bool,
    pub half2_disbursed_at: Option<i64>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PaymentRow {
    pub id: i64,
    pub contract_id: i64,
    pub amount: String,
    pub payment_date: i64,
}

/// Convert UNIX epoch seconds from storage into a UTC instant.
fn from_epoch(secs: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0).ok_or_else(|| LedgerError::Data(format!("bad timestamp {secs}")))
}

fn from_epoch_opt(secs: Option<i64>) -> Result<Option<DateTime<Utc>>> {
    secs.map(from_epoch).transpose()
}

impl TryFrom<ContractRow> for Contract {
    type Error = LedgerError;

    fn try_from(row: ContractRow) -> Result<Self> {
        Ok(Contract {
            id: row.id,
            vendor_id: row.vendor_id,
            total_amount: money::parse_amount(&row.total_amount)?,
            created_at: from_epoch(row.created_at)?,
            half1: HalfLedger {
                unlocked: row.half1_unlocked,
                unlocked_at: from_epoch_opt(row.half1_unlocked_at)?,
                disbursed: money::parse_amount(&row.half1_disbursed)?,
                fully_disbursed: row.half1_fully_disbursed,
                disbursed_at: from_epoch_opt(row.half1_disbursed_at)?,
            },
            half2: HalfLedger {
                unlocked: row.half2_unlocked,
                unlocked_at: from_epoch_opt(row.half2_unlocked_at)?,
                disbursed: money::parse_amount(&row.half2_disbursed)?,
                fully_disbursed: row.half2_fully_disbursed,
                disbursed_at: from_epoch_opt(row.half2_disbursed_at)?,
            },
        })
    }
}

impl TryFrom<PaymentRow> for Payment {
    type Error = LedgerError;

    fn try_from(row: PaymentRow) -> Result<Self> {
        Ok(Payment {
            id: row.id,
            contract_id: row.contract_id,
            amount: money::parse_amount(&row.amount)?,
            payment_date: from_epoch(row.payment_date)?,
        })
    }
}

impl TryFrom<VendorRow> for Vendor {
    type Error = LedgerError;

    fn try_from(row: VendorRow) -> Result<Self> {
        Ok(Vendor {
            id: row.id,
            name: row.name,
            active: row.active,
            total_commissions: money::parse_amount(&row.total_commissions)?,
        })
    }
}
