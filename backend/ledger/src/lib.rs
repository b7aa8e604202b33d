//! Commission unlock & disbursement ledger.
//!
//! Salespeople ("vendors") close contracts that clients pay off in
//! installments.  Each contract carries a 3% commission split into two 1.5%
//! halves, each with its own unlock rule driven purely by the contract's
//! completed payment history: the first half unlocks on a qualifying
//! reservation payment plus follow-up within ten days, the second once half
//! the contract total has been paid.
//!
//! This crate decides when each half becomes payable, records manual
//! disbursements (and reversals) against unlocked halves, and produces
//! vendor-level aggregates with month-of-unlock attribution.  The HTTP/auth
//! layer lives elsewhere and calls [`CommissionLedger`]'s operations as
//! plain async functions.

pub mod config;
pub mod db;
pub mod errors;
pub mod ledger;
pub mod model;
pub mod money;
pub mod unlock;

pub use config::Config;
pub use errors::{LedgerError, Result};
pub use ledger::CommissionLedger;
pub use model::{
    Contract, ContractStatement, DateWindow, DisbursementResult, Half, HalfLedger,
    HalfStatement, HalfUnlock, MonthlyTotal, Payment, UnlockResult, Vendor, VendorSummary,
};
