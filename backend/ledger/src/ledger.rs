//! The commission ledger — unlock evaluation, persistence, disbursements,
//! and vendor aggregates.
//!
//! [`CommissionLedger`] is the seam the surrounding HTTP layer calls into;
//! it owns a connection pool and nothing else.  Every mutating operation
//! wraps its read-check-write in a single transaction so that concurrent
//! writers against the same contract serialize: two racing recomputes cannot
//! both observe a locked half, and two racing disbursements cannot both pass
//! the balance check against a stale amount.  Reads run straight off the
//! pool and never write anything.

use std::collections::BTreeMap;

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::SqlitePool;
use tracing::info;

use crate::db;
use crate::errors::{LedgerError, Result};
use crate::model::{
    Contract, ContractStatement, DateWindow, DisbursementResult, Half, HalfStatement,
    MonthlyTotal, Payment, UnlockResult, Vendor, VendorSummary,
};
use crate::money;
use crate::unlock;

#[derive(Clone)]
pub struct CommissionLedger {
    pool: SqlitePool,
}

impl CommissionLedger {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Evaluate both unlock rules for a contract without touching stored
    /// state.
    pub async fn evaluate_unlock(&self, contract_id: i64) -> Result<UnlockResult> {
        let (contract, payments) = self.load_timeline(contract_id).await?;
        Ok(unlock::evaluate(
            contract.total_amount,
            contract.created_at,
            &payments,
        ))
    }

    /// Re-evaluate the unlock rules and persist any new unlock transitions.
    ///
    /// A half transitions to unlocked at most once; re-running this against
    /// an already-unlocked half changes nothing, and the flag is never
    /// flipped back.  The contract flag update and the vendor commission
    /// increment commit together or not at all.
    pub async fn recompute_and_persist(&self, contract_id: i64) -> Result<UnlockResult> {
        let mut tx = self.pool.begin().await?;

        let row = db::get_contract(&mut *tx, contract_id)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("contract {contract_id}")))?;
        let contract = Contract::try_from(row)?;
        let payments = load_payments(&mut *tx, contract_id).await?;

        let result = unlock::evaluate(contract.total_amount, contract.created_at, &payments);

        db::refresh_commission_cache(
            &mut tx,
            contract_id,
            result.commission_total,
            result.half1_amount,
            result.half2_amount,
        )
        .await?;

        for half in [Half::First, Half::Second] {
            let verdict = result.half(half);
            if verdict.unlocked && !contract.half(half).unlocked {
                let attribution = verdict.attribution_date.ok_or_else(|| {
                    LedgerError::Data("unlocked half without attribution date".to_string())
                })?;
                db::mark_half_unlocked(&mut tx, contract_id, half, attribution).await?;
                db::add_vendor_commission(&mut tx, contract.vendor_id, result.half_amount(half))
                    .await?;
                info!(
                    contract_id,
                    vendor_id = contract.vendor_id,
                    half = half.as_str(),
                    amount = %result.half_amount(half),
                    "commission half unlocked"
                );
            }
        }

        tx.commit().await?;
        Ok(result)
    }

    /// Record a manual payout (partial or complete) against an unlocked half.
    ///
    /// The unlock check re-runs the rule evaluator on the payment timeline
    /// inside the same transaction as the balance check, so the verdict and
    /// the pending amount come from one consistent snapshot.
    pub async fn record_disbursement(
        &self,
        contract_id: i64,
        half: Half,
        amount: Decimal,
    ) -> Result<DisbursementResult> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::Validation(format!(
                "disbursement amount must be positive, got {}",
                money::fmt2(amount)
            )));
        }

        let mut tx = self.pool.begin().await?;

        let row = db::get_contract(&mut *tx, contract_id)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("contract {contract_id}")))?;
        let contract = Contract::try_from(row)?;
        let payments = load_payments(&mut *tx, contract_id).await?;
        let result = unlock::evaluate(contract.total_amount, contract.created_at, &payments);

        let half_amount = result.half_amount(half);
        if !result.half(half).unlocked || half_amount <= Decimal::ZERO {
            return Err(LedgerError::Validation(format!(
                "{} of contract {contract_id} is not yet unlocked",
                half.as_str()
            )));
        }

        let ledger = contract.half(half);
        let pending = money::round2(half_amount - ledger.disbursed);
        if amount > pending {
            return Err(LedgerError::Validation(format!(
                "requested amount {} exceeds pending balance {}",
                money::fmt2(amount),
                money::fmt2(pending)
            )));
        }

        let new_disbursed = money::round2(ledger.disbursed + amount);
        let fully_disbursed = new_disbursed >= half_amount;
        let disbursed_at = if fully_disbursed {
            Some(Utc::now())
        } else {
            ledger.disbursed_at
        };
        db::set_disbursement(
            &mut tx,
            contract_id,
            half,
            new_disbursed,
            fully_disbursed,
            disbursed_at,
        )
        .await?;

        tx.commit().await?;

        info!(
            contract_id,
            half = half.as_str(),
            amount = %amount,
            fully_disbursed,
            "disbursement recorded"
        );

        Ok(DisbursementResult {
            fully_disbursed,
            disbursed_amount: new_disbursed,
            pending: money::round2(half_amount - new_disbursed),
        })
    }

    /// Reset a half's disbursement to zero.  The unlock flag is untouched:
    /// a reversed half stays unlocked and eligible for re-disbursement.
    pub async fn reverse_disbursement(&self, contract_id: i64, half: Half) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let row = db::get_contract(&mut *tx, contract_id)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("contract {contract_id}")))?;
        let contract = Contract::try_from(row)?;

        if contract.half(half).disbursed <= Decimal::ZERO {
            return Err(LedgerError::Validation(
                "no disbursement to reverse".to_string(),
            ));
        }

        db::set_disbursement(&mut tx, contract_id, half, Decimal::ZERO, false, None).await?;
        tx.commit().await?;

        info!(contract_id, half = half.as_str(), "disbursement reversed");
        Ok(())
    }

    /// Aggregate a vendor's commissions across their contract portfolio,
    /// optionally restricted to contracts created inside `window`.
    ///
    /// Read-only: listing and reporting must never persist unlock state.
    pub async fn vendor_commission_summary(
        &self,
        vendor_id: i64,
        window: Option<DateWindow>,
    ) -> Result<VendorSummary> {
        self.vendor(vendor_id).await?;

        let rows = db::contracts_for_vendor(&self.pool, vendor_id, window.as_ref()).await?;

        let mut total_commissions = Decimal::ZERO;
        let mut unlocked_commissions = Decimal::ZERO;
        let mut by_month: BTreeMap<String, Decimal> = BTreeMap::new();

        for row in rows {
            let contract = Contract::try_from(row)?;
            let payments = load_payments(&self.pool, contract.id).await?;
            let result = unlock::evaluate(contract.total_amount, contract.created_at, &payments);

            total_commissions += result.commission_total;
            for half in [Half::First, Half::Second] {
                let verdict = result.half(half);
                if verdict.unlocked {
                    let amount = result.half_amount(half);
                    unlocked_commissions += amount;
                    if let Some(date) = verdict.attribution_date {
                        *by_month
                            .entry(date.format("%Y-%m").to_string())
                            .or_insert(Decimal::ZERO) += amount;
                    }
                }
            }
        }

        Ok(VendorSummary {
            vendor_id,
            total_commissions: money::round2(total_commissions),
            unlocked_commissions: money::round2(unlocked_commissions),
            by_month: by_month
                .into_iter()
                .map(|(month, total)| MonthlyTotal {
                    month,
                    total: money::round2(total),
                })
                .collect(),
        })
    }

    /// Per-half statement (amount, unlock, disbursed, pending) for one
    /// contract — the consistent view listing and report rendering share.
    pub async fn contract_commission_statement(
        &self,
        contract_id: i64,
    ) -> Result<ContractStatement> {
        let (contract, payments) = self.load_timeline(contract_id).await?;
        let result = unlock::evaluate(contract.total_amount, contract.created_at, &payments);

        let halves = [Half::First, Half::Second].map(|half| {
            let verdict = result.half(half);
            let ledger = contract.half(half);
            let amount = result.half_amount(half);
            HalfStatement {
                half,
                amount,
                unlocked: verdict.unlocked,
                attribution_date: verdict.attribution_date,
                disbursed: ledger.disbursed,
                pending: money::round2(amount - ledger.disbursed),
                fully_disbursed: ledger.fully_disbursed,
                disbursed_at: ledger.disbursed_at,
            }
        });

        Ok(ContractStatement {
            contract_id: contract.id,
            vendor_id: contract.vendor_id,
            total_amount: contract.total_amount,
            commission_total: result.commission_total,
            halves,
        })
    }

    /// Fetch a vendor together with their accrued commission running total.
    pub async fn vendor(&self, vendor_id: i64) -> Result<Vendor> {
        let row = db::get_vendor(&self.pool, vendor_id)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("vendor {vendor_id}")))?;
        Vendor::try_from(row)
    }

    /// Load a contract and its completed payment timeline, oldest payment
    /// first.
    async fn load_timeline(&self, contract_id: i64) -> Result<(Contract, Vec<Payment>)> {
        let row = db::get_contract(&self.pool, contract_id)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("contract {contract_id}")))?;
        let contract = Contract::try_from(row)?;
        let payments = load_payments(&self.pool, contract_id).await?;
        Ok((contract, payments))
    }
}

async fn load_payments<'e, E>(executor: E, contract_id: i64) -> Result<Vec<Payment>>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    db::completed_payments(executor, contract_id)
        .await?
        .into_iter()
        .map(Payment::try_from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{DateTime, Utc};
    use sqlx::sqlite::SqlitePoolOptions;
    use tracing_subscriber::EnvFilter;

    fn dt(raw: &str) -> DateTime<Utc> {
        raw.parse().unwrap()
    }

    fn dec(raw: &str) -> Decimal {
        raw.parse().unwrap()
    }

    async fn setup() -> CommissionLedger {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();

        // A single connection keeps every handle on the same in-memory db.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        CommissionLedger::new(pool)
    }

    async fn seed_vendor(ledger: &CommissionLedger, active: bool) -> i64 {
        db::insert_vendor(&ledger.pool, "Ana Torres", active)
            .await
            .unwrap()
    }

    async fn seed_contract(
        ledger: &CommissionLedger,
        vendor_id: i64,
        total: &str,
        created_at: &str,
    ) -> i64 {
        db::insert_contract(&ledger.pool, vendor_id, dec(total), dt(created_at))
            .await
            .unwrap()
    }

    async fn seed_payment(ledger: &CommissionLedger, contract_id: i64, amount: &str, date: &str) {
        db::insert_payment(&ledger.pool, contract_id, dec(amount), dt(date), "completed")
            .await
            .unwrap();
    }

    async fn stored_contract(ledger: &CommissionLedger, contract_id: i64) -> Contract {
        let row = db::get_contract(&ledger.pool, contract_id)
            .await
            .unwrap()
            .unwrap();
        Contract::try_from(row).unwrap()
    }

    async fn vendor_total(ledger: &CommissionLedger, vendor_id: i64) -> Decimal {
        ledger.vendor(vendor_id).await.unwrap().total_commissions
    }

    /// $1,000 contract with both halves unlockable: $500 reservation on day 0
    /// plus $500 follow-up on day 4 (100% paid).
    async fn seed_fully_qualified_contract(ledger: &CommissionLedger, vendor_id: i64) -> i64 {
        let contract_id =
            seed_contract(ledger, vendor_id, "1000", "2025-01-01T00:00:00Z").await;
        seed_payment(ledger, contract_id, "500", "2025-01-01T08:00:00Z").await;
        seed_payment(ledger, contract_id, "500", "2025-01-05T08:00:00Z").await;
        contract_id
    }

    #[tokio::test]
    async fn test_evaluate_unlock_missing_contract_is_not_found() {
        let ledger = setup().await;
        let err = ledger.evaluate_unlock(999).await.unwrap_err();
        assert!(matches!(err, LedgerError::NotFound(_)));
        assert!(err.to_string().contains("999"));
    }

    #[tokio::test]
    async fn test_recompute_persists_unlock_exactly_once() {
        let ledger = setup().await;
        let vendor_id = seed_vendor(&ledger, true).await;
        let contract_id = seed_fully_qualified_contract(&ledger, vendor_id).await;

        let first = ledger.recompute_and_persist(contract_id).await.unwrap();
        assert!(first.half1.unlocked);
        assert!(first.half2.unlocked);
        assert_eq!(vendor_total(&ledger, vendor_id).await, dec("30.00"));

        // Idempotent: a second run returns the same result and does not
        // increment the vendor total again.
        let second = ledger.recompute_and_persist(contract_id).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(vendor_total(&ledger, vendor_id).await, dec("30.00"));

        let stored = stored_contract(&ledger, contract_id).await;
        assert!(stored.half1.unlocked);
        assert_eq!(stored.half1.unlocked_at, Some(dt("2025-01-05T08:00:00Z")));
        assert!(stored.half2.unlocked);
        // 50% of $1,000 is already reached by the $500 reservation payment.
        assert_eq!(stored.half2.unlocked_at, Some(dt("2025-01-01T08:00:00Z")));
    }

    #[tokio::test]
    async fn test_persisted_unlock_is_monotonic() {
        let ledger = setup().await;
        let vendor_id = seed_vendor(&ledger, true).await;
        let contract_id = seed_fully_qualified_contract(&ledger, vendor_id).await;
        ledger.recompute_and_persist(contract_id).await.unwrap();

        // Inflate the contract total so the evaluator no longer sees 50%
        // paid.  The persisted flag must survive and the vendor total must
        // not move.
        sqlx::query("UPDATE contracts SET total_amount = '100000' WHERE id = ?1")
            .bind(contract_id)
            .execute(&ledger.pool)
            .await
            .unwrap();

        let result = ledger.recompute_and_persist(contract_id).await.unwrap();
        assert!(!result.half2.unlocked);

        let stored = stored_contract(&ledger, contract_id).await;
        assert!(stored.half2.unlocked);
        assert_eq!(vendor_total(&ledger, vendor_id).await, dec("30.00"));
    }

    #[tokio::test]
    async fn test_inactive_vendor_still_accrues_commission() {
        let ledger = setup().await;
        let vendor_id = seed_vendor(&ledger, false).await;
        let contract_id = seed_contract(&ledger, vendor_id, "1000", "2025-01-01T00:00:00Z").await;
        // Single $500 payment: 50% paid, but no follow-up for the first half.
        seed_payment(&ledger, contract_id, "500", "2025-01-02T00:00:00Z").await;

        let result = ledger.recompute_and_persist(contract_id).await.unwrap();
        assert!(!result.half1.unlocked);
        assert!(result.half2.unlocked);
        assert_eq!(vendor_total(&ledger, vendor_id).await, dec("15.00"));
    }

    #[tokio::test]
    async fn test_non_completed_payments_are_ignored() {
        let ledger = setup().await;
        let vendor_id = seed_vendor(&ledger, true).await;
        let contract_id = seed_contract(&ledger, vendor_id, "1000", "2025-01-01T00:00:00Z").await;
        db::insert_payment(
            &ledger.pool,
            contract_id,
            dec("600"),
            dt("2025-01-02T00:00:00Z"),
            "pending",
        )
        .await
        .unwrap();

        let result = ledger.evaluate_unlock(contract_id).await.unwrap();
        assert_eq!(result.total_paid, Decimal::ZERO);
        assert!(!result.half2.unlocked);
    }

    #[tokio::test]
    async fn test_disbursement_flow_partial_then_full() {
        let ledger = setup().await;
        let vendor_id = seed_vendor(&ledger, true).await;
        let contract_id = seed_fully_qualified_contract(&ledger, vendor_id).await;
        ledger.recompute_and_persist(contract_id).await.unwrap();

        let partial = ledger
            .record_disbursement(contract_id, Half::First, dec("10"))
            .await
            .unwrap();
        assert!(!partial.fully_disbursed);
        assert_eq!(partial.disbursed_amount, dec("10.00"));
        assert_eq!(partial.pending, dec("5.00"));

        // $10 more against $5 pending must fail with both amounts spelled out.
        let err = ledger
            .record_disbursement(contract_id, Half::First, dec("10"))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
        let message = err.to_string();
        assert!(message.contains("10.00"));
        assert!(message.contains("5.00"));

        let full = ledger
            .record_disbursement(contract_id, Half::First, dec("5"))
            .await
            .unwrap();
        assert!(full.fully_disbursed);
        assert_eq!(full.disbursed_amount, dec("15.00"));
        assert_eq!(full.pending, Decimal::ZERO);

        let stored = stored_contract(&ledger, contract_id).await;
        assert_eq!(stored.half1.disbursed, dec("15.00"));
        assert!(stored.half1.fully_disbursed);
        assert!(stored.half1.disbursed_at.is_some());
        // The second half is untouched.
        assert_eq!(stored.half2.disbursed, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_disbursement_requires_unlocked_half() {
        let ledger = setup().await;
        let vendor_id = seed_vendor(&ledger, true).await;
        let contract_id = seed_contract(&ledger, vendor_id, "1000", "2025-01-01T00:00:00Z").await;

        let err = ledger
            .record_disbursement(contract_id, Half::First, dec("5"))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
        assert!(err.to_string().contains("not yet unlocked"));
    }

    #[tokio::test]
    async fn test_disbursement_rejects_non_positive_amount() {
        let ledger = setup().await;
        let vendor_id = seed_vendor(&ledger, true).await;
        let contract_id = seed_fully_qualified_contract(&ledger, vendor_id).await;

        let err = ledger
            .record_disbursement(contract_id, Half::First, Decimal::ZERO)
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
    }

    #[tokio::test]
    async fn test_disbursement_unknown_contract_is_not_found() {
        let ledger = setup().await;
        let err = ledger
            .record_disbursement(42, Half::Second, dec("5"))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_reversal_preserves_unlock_and_allows_redisbursement() {
        let ledger = setup().await;
        let vendor_id = seed_vendor(&ledger, true).await;
        let contract_id = seed_fully_qualified_contract(&ledger, vendor_id).await;
        ledger.recompute_and_persist(contract_id).await.unwrap();

        ledger
            .record_disbursement(contract_id, Half::First, dec("15"))
            .await
            .unwrap();
        ledger
            .reverse_disbursement(contract_id, Half::First)
            .await
            .unwrap();

        let stored = stored_contract(&ledger, contract_id).await;
        assert!(stored.half1.unlocked);
        assert_eq!(stored.half1.disbursed, Decimal::ZERO);
        assert!(!stored.half1.fully_disbursed);
        assert!(stored.half1.disbursed_at.is_none());

        // Still eligible for a fresh payout.
        let redo = ledger
            .record_disbursement(contract_id, Half::First, dec("15"))
            .await
            .unwrap();
        assert!(redo.fully_disbursed);
    }

    #[tokio::test]
    async fn test_reversal_with_nothing_disbursed_is_rejected() {
        let ledger = setup().await;
        let vendor_id = seed_vendor(&ledger, true).await;
        let contract_id = seed_fully_qualified_contract(&ledger, vendor_id).await;

        let err = ledger
            .reverse_disbursement(contract_id, Half::First)
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
        assert!(err.to_string().contains("no disbursement to reverse"));
    }

    #[tokio::test]
    async fn test_vendor_summary_buckets_unlocks_by_month() {
        let ledger = setup().await;
        let vendor_id = seed_vendor(&ledger, true).await;
        let contract_id =
            seed_contract(&ledger, vendor_id, "10000", "2025-01-01T00:00:00Z").await;
        seed_payment(&ledger, contract_id, "500", "2025-01-01T10:00:00Z").await;
        seed_payment(&ledger, contract_id, "600", "2025-01-05T10:00:00Z").await;
        seed_payment(&ledger, contract_id, "4400", "2025-02-01T10:00:00Z").await;

        let summary = ledger
            .vendor_commission_summary(vendor_id, None)
            .await
            .unwrap();
        assert_eq!(summary.total_commissions, dec("300.00"));
        assert_eq!(summary.unlocked_commissions, dec("300.00"));
        assert_eq!(
            summary.by_month,
            vec![
                MonthlyTotal {
                    month: "2025-01".to_string(),
                    total: dec("150.00"),
                },
                MonthlyTotal {
                    month: "2025-02".to_string(),
                    total: dec("150.00"),
                },
            ]
        );

        // Reporting never persists unlock state.
        let stored = stored_contract(&ledger, contract_id).await;
        assert!(!stored.half1.unlocked);
        assert!(!stored.half2.unlocked);
        assert_eq!(vendor_total(&ledger, vendor_id).await, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_vendor_summary_window_filters_by_creation_date() {
        let ledger = setup().await;
        let vendor_id = seed_vendor(&ledger, true).await;

        let january = seed_contract(&ledger, vendor_id, "10000", "2025-01-15T00:00:00Z").await;
        seed_payment(&ledger, january, "5000", "2025-01-16T00:00:00Z").await;
        let march = seed_contract(&ledger, vendor_id, "2000", "2025-03-10T00:00:00Z").await;
        seed_payment(&ledger, march, "1000", "2025-03-11T00:00:00Z").await;

        let window = DateWindow {
            from: dt("2025-01-01T00:00:00Z"),
            to: dt("2025-01-31T23:59:59Z"),
        };
        let summary = ledger
            .vendor_commission_summary(vendor_id, Some(window))
            .await
            .unwrap();
        assert_eq!(summary.total_commissions, dec("300.00"));
        assert_eq!(summary.unlocked_commissions, dec("150.00"));
        assert_eq!(summary.by_month.len(), 1);
        assert_eq!(summary.by_month[0].month, "2025-01");

        let unfiltered = ledger
            .vendor_commission_summary(vendor_id, None)
            .await
            .unwrap();
        assert_eq!(unfiltered.total_commissions, dec("360.00"));
        assert_eq!(unfiltered.unlocked_commissions, dec("180.00"));
    }

    #[tokio::test]
    async fn test_vendor_summary_unknown_vendor_is_not_found() {
        let ledger = setup().await;
        let err = ledger
            .vendor_commission_summary(7, None)
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_contract_statement_tracks_pending_balances() {
        let ledger = setup().await;
        let vendor_id = seed_vendor(&ledger, true).await;
        let contract_id = seed_fully_qualified_contract(&ledger, vendor_id).await;
        ledger.recompute_and_persist(contract_id).await.unwrap();
        ledger
            .record_disbursement(contract_id, Half::First, dec("10"))
            .await
            .unwrap();

        let statement = ledger
            .contract_commission_statement(contract_id)
            .await
            .unwrap();
        assert_eq!(statement.commission_total, dec("30.00"));

        let first = &statement.halves[0];
        assert_eq!(first.half, Half::First);
        assert!(first.unlocked);
        assert_eq!(first.amount, dec("15.00"));
        assert_eq!(first.disbursed, dec("10.00"));
        assert_eq!(first.pending, dec("5.00"));
        assert!(!first.fully_disbursed);

        let second = &statement.halves[1];
        assert!(second.unlocked);
        assert_eq!(second.disbursed, Decimal::ZERO);
        assert_eq!(second.pending, dec("15.00"));
    }

    #[tokio::test]
    async fn test_unlock_result_serializes_amounts_as_strings() {
        let ledger = setup().await;
        let vendor_id = seed_vendor(&ledger, true).await;
        let contract_id = seed_fully_qualified_contract(&ledger, vendor_id).await;

        let result = ledger.evaluate_unlock(contract_id).await.unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["commission_total"], "30.00");
        assert_eq!(json["half1_amount"], "15.00");
        assert_eq!(json["half1"]["unlocked"], true);
    }
}
