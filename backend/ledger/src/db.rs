//! Database layer — migrations, queries, and ledger writes.
//!
//! Query functions are generic over the executor so the same reads run
//! against the pool (advisory snapshots) or inside a transaction (the
//! read-check-write paths).  Writes that participate in a transaction take
//! `&mut SqliteConnection`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Executor, Sqlite, SqliteConnection, SqlitePool};
use tracing::info;

use crate::errors::{LedgerError, Result};
use crate::model::{ContractRow, DateWindow, Half, PaymentRow, VendorRow};
use crate::money;

const CONTRACT_COLUMNS: &str = "id, vendor_id, total_amount, created_at, \
     half1_unlocked, half1_unlocked_at, half1_disbursed, half1_fully_disbursed, half1_disbursed_at, \
     half2_unlocked, half2_unlocked_at, half2_disbursed, half2_fully_disbursed, half2_disbursed_at";

/// Establish a SQLite connection pool and run pending migrations.
pub async fn init_pool(database_url: &str, max_connections: u32) -> Result<SqlitePool> {
    // Make sure the URL carries the scheme even when configured as a bare path.
    let url = if database_url.starts_with("sqlite:") {
        database_url.to_string()
    } else {
        format!("sqlite:{database_url}")
    };

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(&url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Database migrations applied successfully");
    Ok(pool)
}

// ─────────────────────────────────────────────────────────
// Record writes (vendors, contracts, payments)
// ─────────────────────────────────────────────────────────

pub async fn insert_vendor(pool: &SqlitePool, name: &str, active: bool) -> Result<i64> {
    let result = sqlx::query("INSERT INTO vendors (name, active) VALUES (?1, ?2)")
        .bind(name)
        .bind(active)
        .execute(pool)
        .await?;
    Ok(result.last_insert_rowid())
}

pub async fn insert_contract(
    pool: &SqlitePool,
    vendor_id: i64,
    total_amount: Decimal,
    created_at: DateTime<Utc>,
) -> Result<i64> {
    let result = sqlx::query(
        "INSERT INTO contracts (vendor_id, total_amount, created_at) VALUES (?1, ?2, ?3)",
    )
    .bind(vendor_id)
    .bind(total_amount.to_string())
    .bind(created_at.timestamp())
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn insert_payment(
    pool: &SqlitePool,
    contract_id: i64,
    amount: Decimal,
    payment_date: DateTime<Utc>,
    status: &str,
) -> Result<i64> {
    let result = sqlx::query(
        "INSERT INTO payments (contract_id, amount, payment_date, status) VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(contract_id)
    .bind(amount.to_string())
    .bind(payment_date.timestamp())
    .bind(status)
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

// ─────────────────────────────────────────────────────────
// Reads
// ─────────────────────────────────────────────────────────

pub async fn get_contract<'e, E>(executor: E, contract_id: i64) -> Result<Option<ContractRow>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!("SELECT {CONTRACT_COLUMNS} FROM contracts WHERE id = ?1");
    let row = sqlx::query_as::<_, ContractRow>(&sql)
        .bind(contract_id)
        .fetch_optional(executor)
        .await?;
    Ok(row)
}

/// Completed payments of a contract, oldest first.  Non-completed payments
/// never reach the unlock evaluator.
pub async fn completed_payments<'e, E>(executor: E, contract_id: i64) -> Result<Vec<PaymentRow>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query_as::<_, PaymentRow>(
        r#"
        SELECT id, contract_id, amount, payment_date
        FROM   payments
        WHERE  contract_id = ?1 AND status = 'completed'
        ORDER  BY payment_date ASC, id ASC
        "#,
    )
    .bind(contract_id)
    .fetch_all(executor)
    .await?;
    Ok(rows)
}

pub async fn get_vendor<'e, E>(executor: E, vendor_id: i64) -> Result<Option<VendorRow>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query_as::<_, VendorRow>(
        "SELECT id, name, active, total_commissions FROM vendors WHERE id = ?1",
    )
    .bind(vendor_id)
    .fetch_optional(executor)
    .await?;
    Ok(row)
}

/// A vendor's contracts, newest first, optionally restricted to an inclusive
/// creation-date window.
pub async fn contracts_for_vendor<'e, E>(
    executor: E,
    vendor_id: i64,
    window: Option<&DateWindow>,
) -> Result<Vec<ContractRow>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = match window {
        Some(w) => {
            let sql = format!(
                "SELECT {CONTRACT_COLUMNS} FROM contracts \
                 WHERE vendor_id = ?1 AND created_at >= ?2 AND created_at <= ?3 \
                 ORDER BY created_at DESC, id DESC"
            );
            sqlx::query_as::<_, ContractRow>(&sql)
                .bind(vendor_id)
                .bind(w.from.timestamp())
                .bind(w.to.timestamp())
                .fetch_all(executor)
                .await?
        }
        None => {
            let sql = format!(
                "SELECT {CONTRACT_COLUMNS} FROM contracts \
                 WHERE vendor_id = ?1 ORDER BY created_at DESC, id DESC"
            );
            sqlx::query_as::<_, ContractRow>(&sql)
                .bind(vendor_id)
                .fetch_all(executor)
                .await?
        }
    };
    Ok(rows)
}

// ─────────────────────────────────────────────────────────
// Ledger writes (transaction-scoped)
// ─────────────────────────────────────────────────────────

/// Refresh the cached derived commission amounts on the contract row.
pub async fn refresh_commission_cache(
    conn: &mut SqliteConnection,
    contract_id: i64,
    commission_total: Decimal,
    half1_amount: Decimal,
    half2_amount: Decimal,
) -> Result<()> {
    sqlx::query(
        "UPDATE contracts SET commission_total = ?1, half1_amount = ?2, half2_amount = ?3 \
         WHERE id = ?4",
    )
    .bind(commission_total.to_string())
    .bind(half1_amount.to_string())
    .bind(half2_amount.to_string())
    .bind(contract_id)
    .execute(conn)
    .await?;
    Ok(())
}

/// Flip a half to unlocked with its attribution instant.  Callers guarantee
/// the half is currently locked; the flag is never flipped back.
pub async fn mark_half_unlocked(
    conn: &mut SqliteConnection,
    contract_id: i64,
    half: Half,
    attribution: DateTime<Utc>,
) -> Result<()> {
    let sql = match half {
        Half::First => "UPDATE contracts SET half1_unlocked = 1, half1_unlocked_at = ?1 WHERE id = ?2",
        Half::Second => "UPDATE contracts SET half2_unlocked = 1, half2_unlocked_at = ?1 WHERE id = ?2",
    };
    sqlx::query(sql)
        .bind(attribution.timestamp())
        .bind(contract_id)
        .execute(conn)
        .await?;
    Ok(())
}

/// Add an unlocked half's amount to the vendor's running commission total.
/// The column is a TEXT decimal, so this is a read-modify-write that must run
/// inside the caller's transaction.
pub async fn add_vendor_commission(
    conn: &mut SqliteConnection,
    vendor_id: i64,
    amount: Decimal,
) -> Result<()> {
    let row: Option<(String,)> =
        sqlx::query_as("SELECT total_commissions FROM vendors WHERE id = ?1")
            .bind(vendor_id)
            .fetch_optional(&mut *conn)
            .await?;
    let current = match row {
        Some((raw,)) => money::parse_amount(&raw)?,
        None => return Err(LedgerError::NotFound(format!("vendor {vendor_id}"))),
    };

    let updated = money::round2(current + amount);
    sqlx::query("UPDATE vendors SET total_commissions = ?1 WHERE id = ?2")
        .bind(updated.to_string())
        .bind(vendor_id)
        .execute(conn)
        .await?;
    Ok(())
}

/// Persist a half's disbursement state in one shot.
pub async fn set_disbursement(
    conn: &mut SqliteConnection,
    contract_id: i64,
    half: Half,
    disbursed: Decimal,
    fully_disbursed: bool,
    disbursed_at: Option<DateTime<Utc>>,
) -> Result<()> {
    let sql = match half {
        Half::First => {
            "UPDATE contracts SET half1_disbursed = ?1, half1_fully_disbursed = ?2, \
             half1_disbursed_at = ?3 WHERE id = ?4"
        }
        Half::Second => {
            "UPDATE contracts SET half2_disbursed = ?1, half2_fully_disbursed = ?2, \
             half2_disbursed_at = ?3 WHERE id = ?4"
        }
    };
    sqlx::query(sql)
        .bind(disbursed.to_string())
        .bind(fully_disbursed)
        .bind(disbursed_at.map(|at| at.timestamp()))
        .bind(contract_id)
        .execute(conn)
        .await?;
    Ok(())
}
