use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::db::models::{Expense, Payment};

#[derive(Debug, Clone, Default, Serialize)]
pub struct AmountBreakdown {
    pub amount_paid: Decimal,
    pub total_amount: Decimal,
    pub due_amount: Decimal,
}

impl AmountBreakdown {
    fn add(&mut self, p: &Payment) {
        self.amount_paid += p.amount_paid;
        self.total_amount += p.total_amount;
        self.due_amount += p.due_amount;
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FinancialSummary {
    pub total_received: Decimal,
    pub total_billed: Decimal,
    pub total_due: Decimal,
    pub total_expenses: Decimal,
    pub net_profit: Decimal,
    /// `received / billed * 100`, zero when nothing was billed.
    pub collection_rate: Decimal,
    pub by_method: BTreeMap<String, AmountBreakdown>,
    pub by_date: BTreeMap<NaiveDate, AmountBreakdown>,
}

/// Sums payments and expenses over an already-fetched date range.
pub fn financial_summary(payments: &[Payment], expenses: &[Expense]) -> FinancialSummary {
    let mut totals = AmountBreakdown::default();
    let mut by_method: BTreeMap<String, AmountBreakdown> = BTreeMap::new();
    let mut by_date: BTreeMap<NaiveDate, AmountBreakdown> = BTreeMap::new();

    for p in payments {
        totals.add(p);
        by_method.entry(p.payment_method.clone()).or_default().add(p);
        by_date.entry(p.payment_date).or_default().add(p);
    }

    let total_expenses: Decimal = expenses.iter().map(|e| e.amount).sum();

    let collection_rate = if totals.total_amount.is_zero() {
        Decimal::ZERO
    } else {
        totals.amount_paid / totals.total_amount * Decimal::from(100)
    };

    FinancialSummary {
        total_received: totals.amount_paid,
        total_billed: totals.total_amount,
        total_due: totals.due_amount,
        total_expenses,
        net_profit: totals.amount_paid - total_expenses,
        collection_rate,
        by_method,
        by_date,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::billing::compute_due_amount;
    use crate::db::models::PaymentKind;
    use chrono::Utc;
    use uuid::Uuid;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn payment(method: &str, date: NaiveDate, total: i64, paid: i64) -> Payment {
        Payment {
            id: Uuid::new_v4(),
            gym_id: Uuid::new_v4(),
            member_id: Uuid::new_v4(),
            kind: PaymentKind::PlanRenewal,
            amount_paid: Decimal::from(paid),
            total_amount: Decimal::from(total),
            due_amount: compute_due_amount(Decimal::from(total), Decimal::from(paid)),
            payment_date: date,
            payment_method: method.to_string(),
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn expense(amount: i64, date: NaiveDate) -> Expense {
        Expense {
            id: Uuid::new_v4(),
            gym_id: Uuid::new_v4(),
            description: "rent".to_string(),
            category: "fixed".to_string(),
            amount: Decimal::from(amount),
            expense_date: date,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn sums_and_groups_payments() {
        let payments = vec![
            payment("cash", d(2024, 1, 5), 1000, 1000),
            payment("upi", d(2024, 1, 5), 1000, 600),
            payment("cash", d(2024, 1, 10), 500, 500),
        ];
        let summary = financial_summary(&payments, &[]);

        assert_eq!(summary.total_received, Decimal::from(2100));
        assert_eq!(summary.total_billed, Decimal::from(2500));
        assert_eq!(summary.total_due, Decimal::from(400));

        assert_eq!(summary.by_method["cash"].amount_paid, Decimal::from(1500));
        assert_eq!(summary.by_method["upi"].due_amount, Decimal::from(400));
        assert_eq!(summary.by_date[&d(2024, 1, 5)].total_amount, Decimal::from(2000));

        // 2100 / 2500 * 100 = 84
        assert_eq!(summary.collection_rate, Decimal::from(84));
    }

    #[test]
    fn net_profit_subtracts_expenses() {
        let payments = vec![payment("cash", d(2024, 1, 5), 1000, 1000)];
        let expenses = vec![expense(300, d(2024, 1, 8)), expense(200, d(2024, 1, 20))];
        let summary = financial_summary(&payments, &expenses);

        assert_eq!(summary.total_expenses, Decimal::from(500));
        assert_eq!(summary.net_profit, Decimal::from(500));
    }

    #[test]
    fn zero_billed_yields_zero_collection_rate() {
        let summary = financial_summary(&[], &[expense(100, d(2024, 1, 1))]);
        assert_eq!(summary.collection_rate, Decimal::ZERO);
        assert_eq!(summary.net_profit, Decimal::from(-100));
    }
}
