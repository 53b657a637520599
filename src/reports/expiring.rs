use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::db::models::Member;

/// Urgency bucket for an expiring membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpiryBucket {
    /// 3 days or fewer remaining.
    Critical,
    /// 4 to 7 days remaining.
    Warning,
    /// More than 7 days remaining.
    Upcoming,
}

impl ExpiryBucket {
    fn for_days(days_remaining: i64) -> Self {
        match days_remaining {
            d if d <= 3 => ExpiryBucket::Critical,
            d if d <= 7 => ExpiryBucket::Warning,
            _ => ExpiryBucket::Upcoming,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExpiringMember {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub plan_end_date: NaiveDate,
    pub days_remaining: i64,
    pub bucket: ExpiryBucket,
}

/// Active members whose plans end within `horizon_days` of `today`,
/// soonest first. Already-expired members belong to the reconciler, not
/// this report.
pub fn expiring_memberships(
    members: &[Member],
    today: NaiveDate,
    horizon_days: i64,
) -> Vec<ExpiringMember> {
    let mut out: Vec<ExpiringMember> = members
        .iter()
        .filter(|m| m.is_active())
        .filter_map(|m| {
            let days_remaining = (m.plan_end_date - today).num_days();
            if days_remaining < 0 || days_remaining > horizon_days {
                return None;
            }
            Some(ExpiringMember {
                id: m.id,
                name: m.name.clone(),
                phone: m.phone.clone(),
                plan_end_date: m.plan_end_date,
                days_remaining,
                bucket: ExpiryBucket::for_days(days_remaining),
            })
        })
        .collect();
    out.sort_by_key(|m| m.days_remaining);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::MemberStatus;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn member(status: MemberStatus, end: NaiveDate) -> Member {
        Member {
            id: Uuid::new_v4(),
            gym_id: Uuid::new_v4(),
            name: "M".to_string(),
            phone: "5550100".to_string(),
            email: None,
            address: None,
            status,
            plan_id: Uuid::new_v4(),
            batch_id: None,
            join_date: d(2024, 1, 1),
            plan_end_date: end,
            discount_value: Decimal::ZERO,
            admission_fees: Decimal::ZERO,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn buckets_by_days_remaining() {
        let today = d(2024, 2, 1);
        let members = vec![
            member(MemberStatus::Active, d(2024, 2, 2)),  // 1 day
            member(MemberStatus::Active, d(2024, 2, 6)),  // 5 days
            member(MemberStatus::Active, d(2024, 2, 11)), // 10 days
        ];
        let report = expiring_memberships(&members, today, 15);
        assert_eq!(report.len(), 3);
        assert_eq!(report[0].bucket, ExpiryBucket::Critical);
        assert_eq!(report[1].bucket, ExpiryBucket::Warning);
        assert_eq!(report[2].bucket, ExpiryBucket::Upcoming);
    }

    #[test]
    fn boundary_days_land_in_the_right_bucket() {
        let today = d(2024, 2, 1);
        let report = expiring_memberships(
            &[
                member(MemberStatus::Active, d(2024, 2, 1)), // 0 days
                member(MemberStatus::Active, d(2024, 2, 4)), // 3 days
                member(MemberStatus::Active, d(2024, 2, 5)), // 4 days
                member(MemberStatus::Active, d(2024, 2, 8)), // 7 days
                member(MemberStatus::Active, d(2024, 2, 9)), // 8 days
            ],
            today,
            30,
        );
        let buckets: Vec<ExpiryBucket> = report.iter().map(|m| m.bucket).collect();
        assert_eq!(
            buckets,
            vec![
                ExpiryBucket::Critical,
                ExpiryBucket::Critical,
                ExpiryBucket::Warning,
                ExpiryBucket::Warning,
                ExpiryBucket::Upcoming,
            ]
        );
    }

    #[test]
    fn excludes_inactive_expired_and_out_of_horizon() {
        let today = d(2024, 2, 1);
        let members = vec![
            member(MemberStatus::Inactive, d(2024, 2, 3)), // inactive
            member(MemberStatus::Active, d(2024, 1, 20)),  // already expired
            member(MemberStatus::Active, d(2024, 3, 20)),  // beyond horizon
            member(MemberStatus::Active, d(2024, 2, 10)),
        ];
        let report = expiring_memberships(&members, today, 15);
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].days_remaining, 9);
    }
}
