use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::db::models::{AttendanceRecord, Member};

#[derive(Debug, Clone, Serialize)]
pub struct MemberAttendance {
    pub id: Uuid,
    pub name: String,
    pub present: u32,
    pub absent: u32,
    /// `present / (present + absent) * 100`, zero when no sessions.
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttendanceSummary {
    pub members: Vec<MemberAttendance>,
    pub full_attendance_count: u32,
    pub low_attendance_count: u32,
    pub zero_attendance_count: u32,
}

/// Per-member present/absent counts over an already-fetched range, plus
/// aggregate counts of members at 100%, below 50%, and with no presence.
pub fn attendance_summary(members: &[Member], records: &[AttendanceRecord]) -> AttendanceSummary {
    let mut counts: BTreeMap<Uuid, (u32, u32)> = BTreeMap::new();
    for r in records {
        let entry = counts.entry(r.member_id).or_default();
        if r.present {
            entry.0 += 1;
        } else {
            entry.1 += 1;
        }
    }

    let mut full_attendance_count = 0;
    let mut low_attendance_count = 0;
    let mut zero_attendance_count = 0;

    let members = members
        .iter()
        .map(|m| {
            let (present, absent) = counts.get(&m.id).copied().unwrap_or((0, 0));
            let total = present + absent;
            let percentage = if total == 0 {
                0.0
            } else {
                f64::from(present) / f64::from(total) * 100.0
            };

            if present == 0 {
                zero_attendance_count += 1;
            } else if total > 0 && present == total {
                full_attendance_count += 1;
            }
            if percentage < 50.0 {
                low_attendance_count += 1;
            }

            MemberAttendance {
                id: m.id,
                name: m.name.clone(),
                present,
                absent,
                percentage,
            }
        })
        .collect();

    AttendanceSummary {
        members,
        full_attendance_count,
        low_attendance_count,
        zero_attendance_count,
    }
}
