//! Read-only reporting projections. Pure aggregations over fetched rows;
//! zero denominators yield zeros, never errors.

pub mod attendance;
pub mod expiring;
pub mod financial;

pub use attendance::{attendance_summary, AttendanceSummary, MemberAttendance};
pub use expiring::{expiring_memberships, ExpiryBucket, ExpiringMember};
pub use financial::{financial_summary, FinancialSummary};
