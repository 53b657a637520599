//! Membership status reconciler.
//!
//! Brings every member's `status` and `plan_end_date` into consistency with
//! the payment ledger and the calendar. Runs on a daily schedule and behind
//! an authenticated trigger; safe to re-run at any time, since re-evaluating
//! an already-correct member produces no change.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::billing;
use crate::db::models::member::add_plan_months;
use crate::db::models::{Member, MemberStatus, Payment, Plan};
use crate::db::store::{GymStore, StoreError};

/// Read/write primitives the sweep needs, already scoped to one gym.
/// `GymStore` implements this against Postgres; tests use an in-memory map.
#[async_trait]
pub trait MemberStore: Send + Sync {
    async fn list_members(&self, page: u32, page_size: u32) -> Result<Vec<Member>, StoreError>;
    async fn payments_for(&self, member_id: Uuid) -> Result<Vec<Payment>, StoreError>;
    async fn plan(&self, plan_id: Uuid) -> Result<Option<Plan>, StoreError>;
    async fn apply_member_update(
        &self,
        member_id: Uuid,
        status: MemberStatus,
        plan_end_date: Option<NaiveDate>,
    ) -> Result<(), StoreError>;
}

#[async_trait]
impl MemberStore for GymStore {
    async fn list_members(&self, page: u32, page_size: u32) -> Result<Vec<Member>, StoreError> {
        GymStore::list_members(
            self,
            page_size as i64,
            page as i64 * page_size as i64,
        )
        .await
    }

    async fn payments_for(&self, member_id: Uuid) -> Result<Vec<Payment>, StoreError> {
        self.payments_for_member(member_id).await
    }

    async fn plan(&self, plan_id: Uuid) -> Result<Option<Plan>, StoreError> {
        match self.get_plan(plan_id).await {
            Ok(plan) => Ok(Some(plan)),
            Err(StoreError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn apply_member_update(
        &self,
        member_id: Uuid,
        status: MemberStatus,
        plan_end_date: Option<NaiveDate>,
    ) -> Result<(), StoreError> {
        self.write_member_status(member_id, status, plan_end_date)
            .await
    }
}

/// Why a member was changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReasonCode {
    ExpiredNoPayment,
    ExpiredUnpaidDues,
    PlanExtended,
    Reactivated,
    ReactivatedWithoutExtension,
}

impl std::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            ReasonCode::ExpiredNoPayment => "plan expired with no payment on record",
            ReasonCode::ExpiredUnpaidDues => "plan expired with unpaid dues",
            ReasonCode::PlanExtended => "plan extended after full payment",
            ReasonCode::Reactivated => "dues paid and plan valid, reactivated",
            ReasonCode::ReactivatedWithoutExtension => {
                "dues settled but plan could not be resolved, reactivated without extension"
            }
        };
        write!(f, "{}", msg)
    }
}

impl Serialize for ReasonCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One pending write, produced by `evaluate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberChange {
    pub status: MemberStatus,
    pub new_plan_end_date: Option<NaiveDate>,
    pub reason: ReasonCode,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdatedMember {
    pub id: Uuid,
    pub name: String,
    pub reason: ReasonCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_plan_end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SweepSummary {
    pub total_checked: u64,
    pub total_updated: u64,
    pub updated_members: Vec<UpdatedMember>,
}

/// The status rules, free of I/O. `latest` is the newest qualifying
/// (non-admission) payment; `plan` is the member's plan if it resolved.
/// Returns `None` when the member is already consistent.
pub fn evaluate(
    member: &Member,
    latest: Option<&Payment>,
    plan: Option<&Plan>,
    today: NaiveDate,
) -> Option<MemberChange> {
    if member.plan_end_date < today {
        // Expired plan: settled dues extend it, anything else deactivates.
        match latest {
            Some(payment) if payment.is_settled() => {
                // Extension counts from the current end date, not from
                // today, so lapsed gaps do not compound away.
                let new_end =
                    plan.and_then(|p| add_plan_months(member.plan_end_date, p.duration_in_months));
                match new_end {
                    Some(new_end) => Some(MemberChange {
                        status: MemberStatus::Active,
                        new_plan_end_date: Some(new_end),
                        reason: ReasonCode::PlanExtended,
                    }),
                    // Unresolvable plan: the status outcome of this branch
                    // still applies, the date is left alone.
                    None if member.status != MemberStatus::Active => Some(MemberChange {
                        status: MemberStatus::Active,
                        new_plan_end_date: None,
                        reason: ReasonCode::ReactivatedWithoutExtension,
                    }),
                    None => None,
                }
            }
            _ => {
                if member.status == MemberStatus::Inactive {
                    return None;
                }
                let reason = if latest.is_none() {
                    ReasonCode::ExpiredNoPayment
                } else {
                    ReasonCode::ExpiredUnpaidDues
                };
                Some(MemberChange {
                    status: MemberStatus::Inactive,
                    new_plan_end_date: None,
                    reason,
                })
            }
        }
    } else {
        // Plan still valid: the only correction is reactivating a member
        // whose latest qualifying payment has since settled.
        match latest {
            Some(payment)
                if member.status == MemberStatus::Inactive && payment.is_settled() =>
            {
                Some(MemberChange {
                    status: MemberStatus::Active,
                    new_plan_end_date: None,
                    reason: ReasonCode::Reactivated,
                })
            }
            _ => None,
        }
    }
}

/// Sweeps one gym: paged member fetch, per-member evaluation, best-effort
/// writes. A failure on one member is logged and skipped; a failure listing
/// members aborts the sweep.
pub async fn sweep_gym(
    store: &dyn MemberStore,
    today: NaiveDate,
    page_size: u32,
) -> Result<SweepSummary, StoreError> {
    let mut summary = SweepSummary::default();
    let mut page = 0u32;

    loop {
        let members = store.list_members(page, page_size).await?;
        let page_len = members.len();

        for member in members {
            summary.total_checked += 1;
            if let Some(updated) = reconcile_member(store, &member, today).await {
                summary.total_updated += 1;
                summary.updated_members.push(updated);
            }
        }

        if page_len < page_size as usize {
            break;
        }
        page += 1;
    }

    info!(
        checked = summary.total_checked,
        updated = summary.total_updated,
        "membership sweep complete"
    );
    Ok(summary)
}

async fn reconcile_member(
    store: &dyn MemberStore,
    member: &Member,
    today: NaiveDate,
) -> Option<UpdatedMember> {
    let payments = match store.payments_for(member.id).await {
        Ok(p) => p,
        Err(e) => {
            warn!(member_id = %member.id, error = %e, "skipping member, payment fetch failed");
            return None;
        }
    };
    let latest = billing::latest_plan_payment(&payments);

    // The plan is only needed on the extension path.
    let needs_plan =
        member.plan_end_date < today && latest.map(|p| p.is_settled()).unwrap_or(false);
    let plan = if needs_plan {
        match store.plan(member.plan_id).await {
            Ok(Some(plan)) => Some(plan),
            Ok(None) => {
                warn!(member_id = %member.id, plan_id = %member.plan_id,
                      "plan reference does not resolve, skipping extension");
                None
            }
            Err(e) => {
                warn!(member_id = %member.id, error = %e, "skipping member, plan fetch failed");
                return None;
            }
        }
    } else {
        None
    };

    let change = evaluate(member, latest, plan.as_ref(), today)?;

    match store
        .apply_member_update(member.id, change.status, change.new_plan_end_date)
        .await
    {
        Ok(()) => Some(UpdatedMember {
            id: member.id,
            name: member.name.clone(),
            reason: change.reason,
            new_plan_end_date: change.new_plan_end_date,
        }),
        Err(e) => {
            warn!(member_id = %member.id, error = %e, "skipping member, status write failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::PaymentKind;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn member(
        gym_id: Uuid,
        plan_id: Uuid,
        status: MemberStatus,
        join: NaiveDate,
        end: NaiveDate,
    ) -> Member {
        Member {
            id: Uuid::new_v4(),
            gym_id,
            name: "Test Member".to_string(),
            phone: "5550100".to_string(),
            email: None,
            address: None,
            status,
            plan_id,
            batch_id: None,
            join_date: join,
            plan_end_date: end,
            discount_value: Decimal::ZERO,
            admission_fees: Decimal::ZERO,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn plan(gym_id: Uuid, months: i32) -> Plan {
        Plan {
            id: Uuid::new_v4(),
            gym_id,
            name: format!("{months} month plan"),
            duration_in_months: months,
            price: Decimal::from(1000),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn payment(
        member: &Member,
        kind: PaymentKind,
        date: NaiveDate,
        total: i64,
        paid: i64,
    ) -> Payment {
        Payment {
            id: Uuid::new_v4(),
            gym_id: member.gym_id,
            member_id: member.id,
            kind,
            amount_paid: Decimal::from(paid),
            total_amount: Decimal::from(total),
            due_amount: billing::compute_due_amount(Decimal::from(total), Decimal::from(paid)),
            payment_date: date,
            payment_method: "upi".to_string(),
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    /// In-memory MemberStore with injectable failures.
    #[derive(Default)]
    struct MemStore {
        members: Mutex<Vec<Member>>,
        payments: Mutex<HashMap<Uuid, Vec<Payment>>>,
        plans: Mutex<HashMap<Uuid, Plan>>,
        fail_list: Mutex<bool>,
        fail_update_for: Mutex<HashSet<Uuid>>,
    }

    impl MemStore {
        fn add_member(&self, m: Member) {
            self.members.lock().unwrap().push(m);
        }
        fn add_plan(&self, p: Plan) {
            self.plans.lock().unwrap().insert(p.id, p);
        }
        fn add_payment(&self, p: Payment) {
            self.payments
                .lock()
                .unwrap()
                .entry(p.member_id)
                .or_default()
                .push(p);
        }
        fn member(&self, id: Uuid) -> Member {
            self.members
                .lock()
                .unwrap()
                .iter()
                .find(|m| m.id == id)
                .cloned()
                .unwrap()
        }
    }

    #[async_trait]
    impl MemberStore for MemStore {
        async fn list_members(
            &self,
            page: u32,
            page_size: u32,
        ) -> Result<Vec<Member>, StoreError> {
            if *self.fail_list.lock().unwrap() {
                return Err(StoreError::Sqlx(sqlx::Error::PoolClosed));
            }
            let members = self.members.lock().unwrap();
            let start = (page as usize) * (page_size as usize);
            Ok(members
                .iter()
                .skip(start)
                .take(page_size as usize)
                .cloned()
                .collect())
        }

        async fn payments_for(&self, member_id: Uuid) -> Result<Vec<Payment>, StoreError> {
            Ok(self
                .payments
                .lock()
                .unwrap()
                .get(&member_id)
                .cloned()
                .unwrap_or_default())
        }

        async fn plan(&self, plan_id: Uuid) -> Result<Option<Plan>, StoreError> {
            Ok(self.plans.lock().unwrap().get(&plan_id).cloned())
        }

        async fn apply_member_update(
            &self,
            member_id: Uuid,
            status: MemberStatus,
            plan_end_date: Option<NaiveDate>,
        ) -> Result<(), StoreError> {
            if self.fail_update_for.lock().unwrap().contains(&member_id) {
                return Err(StoreError::Sqlx(sqlx::Error::PoolClosed));
            }
            let mut members = self.members.lock().unwrap();
            let m = members
                .iter_mut()
                .find(|m| m.id == member_id)
                .ok_or(StoreError::NotFound("member"))?;
            m.status = status;
            if let Some(end) = plan_end_date {
                m.plan_end_date = end;
            }
            Ok(())
        }
    }

    const TODAY: fn() -> NaiveDate = || d(2024, 2, 15);

    // -- evaluate(): the decision table --------------------------------

    #[test]
    fn expired_with_no_payment_goes_inactive() {
        let gym = Uuid::new_v4();
        let p = plan(gym, 1);
        let m = member(gym, p.id, MemberStatus::Active, d(2024, 1, 1), d(2024, 2, 1));

        let change = evaluate(&m, None, Some(&p), TODAY()).unwrap();
        assert_eq!(change.status, MemberStatus::Inactive);
        assert_eq!(change.reason, ReasonCode::ExpiredNoPayment);
        assert_eq!(change.new_plan_end_date, None);
    }

    #[test]
    fn expired_with_unpaid_dues_goes_inactive() {
        let gym = Uuid::new_v4();
        let p = plan(gym, 1);
        let m = member(gym, p.id, MemberStatus::Active, d(2024, 1, 1), d(2024, 2, 1));
        let pay = payment(&m, PaymentKind::PlanRenewal, d(2024, 1, 5), 1000, 600);

        let change = evaluate(&m, Some(&pay), Some(&p), TODAY()).unwrap();
        assert_eq!(change.status, MemberStatus::Inactive);
        assert_eq!(change.reason, ReasonCode::ExpiredUnpaidDues);
        // plan_end_date stays at 2024-02-01
        assert_eq!(change.new_plan_end_date, None);
    }

    #[test]
    fn expired_with_settled_payment_extends_by_plan_months() {
        let gym = Uuid::new_v4();
        let p = plan(gym, 1);
        let m = member(gym, p.id, MemberStatus::Active, d(2024, 1, 1), d(2024, 2, 1));
        let pay = payment(&m, PaymentKind::PlanRenewal, d(2024, 1, 5), 1000, 1000);

        let change = evaluate(&m, Some(&pay), Some(&p), TODAY()).unwrap();
        assert_eq!(change.status, MemberStatus::Active);
        assert_eq!(change.reason, ReasonCode::PlanExtended);
        // Counted from the old end date, not from today
        assert_eq!(change.new_plan_end_date, Some(d(2024, 3, 1)));
    }

    #[test]
    fn expired_already_inactive_with_dues_is_not_rewritten() {
        let gym = Uuid::new_v4();
        let p = plan(gym, 1);
        let m = member(gym, p.id, MemberStatus::Inactive, d(2024, 1, 1), d(2024, 2, 1));
        let pay = payment(&m, PaymentKind::PlanRenewal, d(2024, 1, 5), 1000, 600);

        assert!(evaluate(&m, Some(&pay), Some(&p), TODAY()).is_none());
    }

    #[test]
    fn valid_plan_with_settled_renewal_gets_no_spurious_extension() {
        let gym = Uuid::new_v4();
        let p = plan(gym, 3);
        let m = member(gym, p.id, MemberStatus::Active, d(2024, 1, 1), d(2024, 4, 1));
        let pay = payment(&m, PaymentKind::PlanRenewal, d(2024, 2, 10), 1000, 1000);

        assert!(evaluate(&m, Some(&pay), Some(&p), TODAY()).is_none());
    }

    #[test]
    fn valid_plan_inactive_member_with_settled_dues_reactivates() {
        let gym = Uuid::new_v4();
        let p = plan(gym, 3);
        let m = member(gym, p.id, MemberStatus::Inactive, d(2024, 1, 1), d(2024, 4, 1));
        let pay = payment(&m, PaymentKind::PlanRenewal, d(2024, 2, 10), 1000, 1000);

        let change = evaluate(&m, Some(&pay), Some(&p), TODAY()).unwrap();
        assert_eq!(change.status, MemberStatus::Active);
        assert_eq!(change.reason, ReasonCode::Reactivated);
        assert_eq!(change.new_plan_end_date, None);
    }

    #[test]
    fn valid_plan_inactive_member_without_payments_stays_inactive() {
        let gym = Uuid::new_v4();
        let p = plan(gym, 3);
        let m = member(gym, p.id, MemberStatus::Inactive, d(2024, 1, 1), d(2024, 4, 1));

        assert!(evaluate(&m, None, Some(&p), TODAY()).is_none());
    }

    #[test]
    fn unresolvable_plan_skips_extension_but_keeps_status_outcome() {
        let gym = Uuid::new_v4();
        let m = member(
            gym,
            Uuid::new_v4(),
            MemberStatus::Inactive,
            d(2024, 1, 1),
            d(2024, 2, 1),
        );
        let pay = payment(&m, PaymentKind::PlanRenewal, d(2024, 1, 5), 1000, 1000);

        let change = evaluate(&m, Some(&pay), None, TODAY()).unwrap();
        assert_eq!(change.status, MemberStatus::Active);
        assert_eq!(change.new_plan_end_date, None);
        // The reason must not claim the plan is valid
        assert_eq!(change.reason, ReasonCode::ReactivatedWithoutExtension);
        assert!(change.reason.to_string().contains("without extension"));
    }

    // -- sweep_gym(): wiring, isolation, idempotence -------------------

    #[tokio::test]
    async fn sweep_applies_changes_and_reports_counts() {
        let gym = Uuid::new_v4();
        let store = MemStore::default();
        let p = plan(gym, 1);

        // Lapsed and unpaid: goes inactive
        let lapsed = member(gym, p.id, MemberStatus::Active, d(2024, 1, 1), d(2024, 2, 1));
        store.add_payment(payment(&lapsed, PaymentKind::PlanRenewal, d(2024, 1, 5), 1000, 600));
        // Renewed in full: extends
        let renewed = member(gym, p.id, MemberStatus::Active, d(2024, 1, 1), d(2024, 2, 1));
        store.add_payment(payment(&renewed, PaymentKind::PlanRenewal, d(2024, 1, 5), 1000, 1000));
        // Healthy: untouched
        let healthy = member(gym, p.id, MemberStatus::Active, d(2024, 2, 1), d(2024, 3, 1));

        let (lapsed_id, renewed_id) = (lapsed.id, renewed.id);
        store.add_plan(p);
        store.add_member(lapsed);
        store.add_member(renewed);
        store.add_member(healthy);

        let summary = sweep_gym(&store, TODAY(), 100).await.unwrap();
        assert_eq!(summary.total_checked, 3);
        assert_eq!(summary.total_updated, 2);

        assert_eq!(store.member(lapsed_id).status, MemberStatus::Inactive);
        let renewed_after = store.member(renewed_id);
        assert_eq!(renewed_after.status, MemberStatus::Active);
        assert_eq!(renewed_after.plan_end_date, d(2024, 3, 1));
    }

    #[tokio::test]
    async fn sweep_is_idempotent() {
        let gym = Uuid::new_v4();
        let store = MemStore::default();
        let p = plan(gym, 1);

        let lapsed = member(gym, p.id, MemberStatus::Active, d(2024, 1, 1), d(2024, 2, 1));
        let renewed = member(gym, p.id, MemberStatus::Active, d(2024, 1, 1), d(2024, 2, 1));
        store.add_payment(payment(&renewed, PaymentKind::PlanRenewal, d(2024, 1, 5), 1000, 1000));

        store.add_plan(p);
        store.add_member(lapsed);
        store.add_member(renewed);

        let first = sweep_gym(&store, TODAY(), 100).await.unwrap();
        assert_eq!(first.total_updated, 2);

        // No intervening data change: the second run corrects nothing
        let second = sweep_gym(&store, TODAY(), 100).await.unwrap();
        assert_eq!(second.total_checked, 2);
        assert_eq!(second.total_updated, 0);
    }

    #[tokio::test]
    async fn admission_fees_never_drive_decisions() {
        let gym = Uuid::new_v4();
        let store = MemStore::default();
        let p = plan(gym, 1);

        // The only payment is a fully settled admission fee; it must not
        // count as a renewal, so the expired member goes inactive.
        let m = member(gym, p.id, MemberStatus::Active, d(2024, 1, 1), d(2024, 2, 1));
        store.add_payment(payment(&m, PaymentKind::AdmissionFee, d(2024, 1, 1), 500, 500));
        let id = m.id;

        store.add_plan(p);
        store.add_member(m);

        let summary = sweep_gym(&store, TODAY(), 100).await.unwrap();
        assert_eq!(summary.total_updated, 1);
        assert_eq!(summary.updated_members[0].reason, ReasonCode::ExpiredNoPayment);
        assert_eq!(store.member(id).status, MemberStatus::Inactive);
    }

    #[tokio::test]
    async fn one_failing_member_does_not_abort_the_sweep() {
        let gym = Uuid::new_v4();
        let store = MemStore::default();
        let p = plan(gym, 1);

        let failing = member(gym, p.id, MemberStatus::Active, d(2024, 1, 1), d(2024, 2, 1));
        let fine = member(gym, p.id, MemberStatus::Active, d(2024, 1, 1), d(2024, 2, 1));
        let (failing_id, fine_id) = (failing.id, fine.id);

        store.add_plan(p);
        store.add_member(failing);
        store.add_member(fine);
        store.fail_update_for.lock().unwrap().insert(failing_id);

        let summary = sweep_gym(&store, TODAY(), 100).await.unwrap();
        assert_eq!(summary.total_checked, 2);
        assert_eq!(summary.total_updated, 1);
        assert_eq!(summary.updated_members[0].id, fine_id);
        // The failing member was skipped, not corrupted
        assert_eq!(store.member(failing_id).status, MemberStatus::Active);
    }

    #[tokio::test]
    async fn list_failure_aborts_the_sweep() {
        let store = MemStore::default();
        *store.fail_list.lock().unwrap() = true;
        assert!(sweep_gym(&store, TODAY(), 100).await.is_err());
    }

    #[tokio::test]
    async fn sweep_pages_through_large_member_lists() {
        let gym = Uuid::new_v4();
        let store = MemStore::default();
        let p = plan(gym, 1);
        for _ in 0..7 {
            store.add_member(member(
                gym,
                p.id,
                MemberStatus::Active,
                d(2024, 1, 1),
                d(2024, 2, 1),
            ));
        }
        store.add_plan(p);

        let summary = sweep_gym(&store, TODAY(), 3).await.unwrap();
        assert_eq!(summary.total_checked, 7);
        assert_eq!(summary.total_updated, 7);
    }
}
