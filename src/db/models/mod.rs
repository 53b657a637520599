pub mod attendance;
pub mod batch;
pub mod enquiry;
pub mod expense;
pub mod member;
pub mod payment;
pub mod plan;
pub mod staff;
pub mod user;

pub use attendance::AttendanceRecord;
pub use batch::Batch;
pub use enquiry::Enquiry;
pub use expense::Expense;
pub use member::{Member, MemberStatus};
pub use payment::{Payment, PaymentKind};
pub use plan::Plan;
pub use staff::Staff;
pub use user::{Role, User};
