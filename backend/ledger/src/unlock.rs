//! Pure unlock rule evaluation over a contract's payment timeline.
//!
//! Two independent rules govern when each commission half becomes payable:
//!
//! - **First half** ("reservation + follow-up"): the first completed payment
//!   must be at least $500, and the follow-up payments made within 10 days of
//!   contract creation must add at least another $500, for a combined $1,000.
//! - **Second half**: cumulative completed payments reach 50% of the contract
//!   total.
//!
//! Evaluation is a pure function of `(total_amount, created_at, payments)`.
//! Every read path re-runs it and treats the stored unlock flags as a
//! write-behind cache of its verdict, never as independent truth.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use crate::model::{HalfUnlock, Payment, UnlockResult};
use crate::money;

/// Minimum qualifying reservation (first) payment, in whole currency units.
const MIN_RESERVATION: i64 = 500;
/// Minimum follow-up sum inside the window.
const MIN_FOLLOW_UP: i64 = 500;
/// Combined reservation + follow-up threshold.
const COMBINED_MINIMUM: i64 = 1000;
/// Days after contract creation during which follow-up payments count
/// toward the first half.  The deadline itself is inclusive.
const FOLLOW_UP_WINDOW_DAYS: i64 = 10;

/// Evaluate both unlock rules.  `payments` must be the contract's completed
/// payments in ascending payment-date order.
pub fn evaluate(
    total_amount: Decimal,
    created_at: DateTime<Utc>,
    payments: &[Payment],
) -> UnlockResult {
    let total_paid = money::round2(payments.iter().map(|p| p.amount).sum::<Decimal>());
    let percent_paid = if total_amount > Decimal::ZERO {
        money::round2(total_paid / total_amount * Decimal::ONE_HUNDRED)
    } else {
        Decimal::ZERO
    };

    UnlockResult {
        half1: evaluate_half1(created_at, payments),
        half2: evaluate_half2(total_amount, payments),
        commission_total: money::commission_total(total_amount),
        half1_amount: money::half_amount(total_amount),
        half2_amount: money::half_amount(total_amount),
        total_paid,
        percent_paid,
    }
}

/// Reservation + follow-up rule.
///
/// The attribution date is the first follow-up payment inside the window
/// (the second payment chronologically), not necessarily the payment that
/// completed the threshold.
fn evaluate_half1(created_at: DateTime<Utc>, payments: &[Payment]) -> HalfUnlock {
    let Some(first) = payments.first() else {
        return HalfUnlock::locked();
    };
    if first.amount < Decimal::from(MIN_RESERVATION) {
        return HalfUnlock::locked();
    }

    let deadline = created_at + Duration::days(FOLLOW_UP_WINDOW_DAYS);

    let mut follow_up_sum = Decimal::ZERO;
    let mut attribution = None;
    // Everything after the reservation payment by index, then date-checked
    // against the window.
    for payment in &payments[1..] {
        if payment.payment_date > created_at && payment.payment_date <= deadline {
            follow_up_sum += payment.amount;
            if attribution.is_none() {
                attribution = Some(payment.payment_date);
            }
        }
    }

    if follow_up_sum >= Decimal::from(MIN_FOLLOW_UP)
        && first.amount + follow_up_sum >= Decimal::from(COMBINED_MINIMUM)
    {
        HalfUnlock {
            unlocked: true,
            attribution_date: attribution,
        }
    } else {
        HalfUnlock::locked()
    }
}

/// 50%-of-contract rule.  Attributed to the payment at which the running sum
/// first reaches half the contract total.
fn evaluate_half2(total_amount: Decimal, payments: &[Payment]) -> HalfUnlock {
    if total_amount <= Decimal::ZERO {
        return HalfUnlock::locked();
    }

    let mut running = Decimal::ZERO;
    for payment in payments {
        running += payment.amount;
        // running / total_amount >= 50%, without dividing.
        if running * Decimal::TWO >= total_amount {
            return HalfUnlock {
                unlocked: true,
                attribution_date: Some(payment.payment_date),
            };
        }
    }
    HalfUnlock::locked()
}
