//! Payment aggregation helpers shared by the reconciler, payment intake,
//! and the financial reports.

use rust_decimal::Decimal;

use crate::db::models::Payment;

/// Non-negative shortfall between billed and paid amounts. Over-payment
/// clamps to zero rather than going negative.
pub fn compute_due_amount(total: Decimal, paid: Decimal) -> Decimal {
    let due = total - paid;
    if due < Decimal::ZERO {
        Decimal::ZERO
    } else {
        due
    }
}

/// The most recent payment that counts toward plan-expiry decisions, i.e.
/// everything except admission fees. Stable date-descending selection:
/// ties keep the earlier element of the input, so the result is
/// deterministic for identical input ordering.
pub fn latest_plan_payment(payments: &[Payment]) -> Option<&Payment> {
    let mut qualifying: Vec<&Payment> =
        payments.iter().filter(|p| p.counts_toward_plan()).collect();
    qualifying.sort_by(|a, b| b.payment_date.cmp(&a.payment_date));
    qualifying.first().copied()
}
