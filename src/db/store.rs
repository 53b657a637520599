use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::billing;
use crate::db::models::member::add_plan_months;
use crate::db::models::{
    AttendanceRecord, Batch, Enquiry, Expense, Member, MemberStatus, Payment, PaymentKind, Plan,
    Role, Staff, User,
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Not found: {0}")]
    NotFound(&'static str),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid input: {0}")]
    Invalid(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

fn not_found(entity: &'static str) -> impl FnOnce(sqlx::Error) -> StoreError {
    move |e| match e {
        sqlx::Error::RowNotFound => StoreError::NotFound(entity),
        other => StoreError::Sqlx(other),
    }
}

// ---- Input shapes -------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct NewMember {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub plan_id: Uuid,
    pub batch_id: Option<Uuid>,
    pub join_date: NaiveDate,
    #[serde(default)]
    pub discount_value: Decimal,
    #[serde(default)]
    pub admission_fees: Decimal,
}

/// Partial member edit; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMember {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub status: Option<MemberStatus>,
    pub batch_id: Option<Uuid>,
    pub plan_end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewPlan {
    pub name: String,
    pub duration_in_months: i32,
    pub price: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewPayment {
    pub member_id: Uuid,
    pub kind: PaymentKind,
    pub amount_paid: Decimal,
    pub total_amount: Decimal,
    pub payment_date: NaiveDate,
    pub payment_method: String,
    pub notes: Option<String>,
}

/// Admin correction of a recorded payment. Every money field is restated;
/// the due amount is recomputed, never taken from the client.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentCorrection {
    pub kind: PaymentKind,
    pub amount_paid: Decimal,
    pub total_amount: Decimal,
    pub payment_date: NaiveDate,
    pub payment_method: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewBatch {
    pub name: String,
    pub schedule: String,
    pub capacity: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewStaff {
    pub name: String,
    pub phone: String,
    pub designation: String,
    pub salary: Decimal,
    pub join_date: NaiveDate,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewExpense {
    pub description: String,
    pub category: String,
    pub amount: Decimal,
    pub expense_date: NaiveDate,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewEnquiry {
    pub name: String,
    pub phone: String,
    pub interest: Option<String>,
    pub follow_up_date: Option<NaiveDate>,
}

/// Partial enquiry edit; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEnquiry {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub interest: Option<String>,
    pub follow_up_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MarkAttendance {
    pub member_id: Uuid,
    pub date: NaiveDate,
    pub present: bool,
}

// ---- Tenant-scoped store ------------------------------------------------

/// The only data accessor in the crate. It can only be built from a
/// `gym_id`, and every statement it issues binds that id, so a query that
/// forgets the tenant filter cannot be expressed.
#[derive(Clone)]
pub struct GymStore {
    gym_id: Uuid,
    pool: PgPool,
}

impl GymStore {
    pub fn new(gym_id: Uuid, pool: PgPool) -> Self {
        Self { gym_id, pool }
    }

    pub fn gym_id(&self) -> Uuid {
        self.gym_id
    }

    // -- Members ----------------------------------------------------------

    pub async fn list_members(&self, limit: i64, offset: i64) -> Result<Vec<Member>, StoreError> {
        let rows = sqlx::query_as::<_, Member>(
            "SELECT * FROM members WHERE gym_id = $1 ORDER BY name LIMIT $2 OFFSET $3",
        )
        .bind(self.gym_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Unpaged member list, for the reporting projections.
    pub async fn all_members(&self) -> Result<Vec<Member>, StoreError> {
        let rows =
            sqlx::query_as::<_, Member>("SELECT * FROM members WHERE gym_id = $1 ORDER BY name")
                .bind(self.gym_id)
                .fetch_all(&self.pool)
                .await?;
        Ok(rows)
    }

    pub async fn get_member(&self, id: Uuid) -> Result<Member, StoreError> {
        sqlx::query_as::<_, Member>("SELECT * FROM members WHERE gym_id = $1 AND id = $2")
            .bind(self.gym_id)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(not_found("member"))
    }

    /// Creates a member with status active and a plan end date derived from
    /// the referenced plan's duration.
    pub async fn create_member(&self, input: NewMember) -> Result<Member, StoreError> {
        let plan = self.get_plan(input.plan_id).await?;
        let plan_end_date = add_plan_months(input.join_date, plan.duration_in_months)
            .ok_or_else(|| {
                StoreError::Invalid(format!(
                    "plan {} has a non-positive duration",
                    plan.id
                ))
            })?;

        let row = sqlx::query_as::<_, Member>(
            "INSERT INTO members \
             (id, gym_id, name, phone, email, address, status, plan_id, batch_id, \
              join_date, plan_end_date, discount_value, admission_fees, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, now(), now()) \
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(self.gym_id)
        .bind(&input.name)
        .bind(&input.phone)
        .bind(&input.email)
        .bind(&input.address)
        .bind(MemberStatus::Active)
        .bind(input.plan_id)
        .bind(input.batch_id)
        .bind(input.join_date)
        .bind(plan_end_date)
        .bind(input.discount_value)
        .bind(input.admission_fees)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn update_member(&self, id: Uuid, input: UpdateMember) -> Result<Member, StoreError> {
        sqlx::query_as::<_, Member>(
            "UPDATE members SET \
               name = COALESCE($3, name), \
               phone = COALESCE($4, phone), \
               email = COALESCE($5, email), \
               address = COALESCE($6, address), \
               status = COALESCE($7, status), \
               batch_id = COALESCE($8, batch_id), \
               plan_end_date = COALESCE($9, plan_end_date), \
               updated_at = now() \
             WHERE gym_id = $1 AND id = $2 \
             RETURNING *",
        )
        .bind(self.gym_id)
        .bind(id)
        .bind(&input.name)
        .bind(&input.phone)
        .bind(&input.email)
        .bind(&input.address)
        .bind(input.status)
        .bind(input.batch_id)
        .bind(input.plan_end_date)
        .fetch_one(&self.pool)
        .await
        .map_err(not_found("member"))
    }

    pub async fn delete_member(&self, id: Uuid) -> Result<(), StoreError> {
        let res = sqlx::query("DELETE FROM members WHERE gym_id = $1 AND id = $2")
            .bind(self.gym_id)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(StoreError::NotFound("member"));
        }
        Ok(())
    }

    /// Writes the fields the reconciler owns. `plan_end_date = None` leaves
    /// the date untouched.
    pub async fn write_member_status(
        &self,
        id: Uuid,
        status: MemberStatus,
        plan_end_date: Option<NaiveDate>,
    ) -> Result<(), StoreError> {
        let res = sqlx::query(
            "UPDATE members SET \
               status = $3, \
               plan_end_date = COALESCE($4, plan_end_date), \
               updated_at = now() \
             WHERE gym_id = $1 AND id = $2",
        )
        .bind(self.gym_id)
        .bind(id)
        .bind(status)
        .bind(plan_end_date)
        .execute(&self.pool)
        .await?;
        if res.rows_affected() == 0 {
            return Err(StoreError::NotFound("member"));
        }
        Ok(())
    }

    // -- Plans ------------------------------------------------------------

    pub async fn list_plans(&self) -> Result<Vec<Plan>, StoreError> {
        let rows = sqlx::query_as::<_, Plan>(
            "SELECT * FROM plans WHERE gym_id = $1 ORDER BY duration_in_months",
        )
        .bind(self.gym_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn get_plan(&self, id: Uuid) -> Result<Plan, StoreError> {
        sqlx::query_as::<_, Plan>("SELECT * FROM plans WHERE gym_id = $1 AND id = $2")
            .bind(self.gym_id)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(not_found("plan"))
    }

    pub async fn create_plan(&self, input: NewPlan) -> Result<Plan, StoreError> {
        if input.duration_in_months <= 0 {
            return Err(StoreError::Invalid(
                "duration_in_months must be positive".to_string(),
            ));
        }
        let row = sqlx::query_as::<_, Plan>(
            "INSERT INTO plans (id, gym_id, name, duration_in_months, price, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, now(), now()) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(self.gym_id)
        .bind(&input.name)
        .bind(input.duration_in_months)
        .bind(input.price)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Plan edits apply to future sign-ups only; existing members keep
    /// their derived end dates.
    pub async fn update_plan(&self, id: Uuid, input: NewPlan) -> Result<Plan, StoreError> {
        if input.duration_in_months <= 0 {
            return Err(StoreError::Invalid(
                "duration_in_months must be positive".to_string(),
            ));
        }
        sqlx::query_as::<_, Plan>(
            "UPDATE plans SET name = $3, duration_in_months = $4, price = $5, updated_at = now() \
             WHERE gym_id = $1 AND id = $2 RETURNING *",
        )
        .bind(self.gym_id)
        .bind(id)
        .bind(&input.name)
        .bind(input.duration_in_months)
        .bind(input.price)
        .fetch_one(&self.pool)
        .await
        .map_err(not_found("plan"))
    }

    pub async fn delete_plan(&self, id: Uuid) -> Result<(), StoreError> {
        let in_use: i64 =
            sqlx::query_scalar("SELECT count(*) FROM members WHERE gym_id = $1 AND plan_id = $2")
                .bind(self.gym_id)
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        if in_use > 0 {
            return Err(StoreError::Conflict(format!(
                "plan is referenced by {in_use} member(s)"
            )));
        }
        let res = sqlx::query("DELETE FROM plans WHERE gym_id = $1 AND id = $2")
            .bind(self.gym_id)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(StoreError::NotFound("plan"));
        }
        Ok(())
    }

    // -- Payments ---------------------------------------------------------

    pub async fn payments_for_member(&self, member_id: Uuid) -> Result<Vec<Payment>, StoreError> {
        let rows = sqlx::query_as::<_, Payment>(
            "SELECT * FROM payments WHERE gym_id = $1 AND member_id = $2 \
             ORDER BY payment_date, created_at",
        )
        .bind(self.gym_id)
        .bind(member_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn payments_in_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Payment>, StoreError> {
        let rows = sqlx::query_as::<_, Payment>(
            "SELECT * FROM payments WHERE gym_id = $1 AND payment_date BETWEEN $2 AND $3 \
             ORDER BY payment_date",
        )
        .bind(self.gym_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Records a payment. The due amount is always recomputed server-side;
    /// a client-supplied figure is never trusted.
    pub async fn create_payment(&self, input: NewPayment) -> Result<Payment, StoreError> {
        // The member lookup doubles as the tenant check for member_id.
        let member = self.get_member(input.member_id).await?;
        let due = billing::compute_due_amount(input.total_amount, input.amount_paid);

        let row = sqlx::query_as::<_, Payment>(
            "INSERT INTO payments \
             (id, gym_id, member_id, kind, amount_paid, total_amount, due_amount, \
              payment_date, payment_method, notes, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, now(), now()) \
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(self.gym_id)
        .bind(member.id)
        .bind(input.kind)
        .bind(input.amount_paid)
        .bind(input.total_amount)
        .bind(due)
        .bind(input.payment_date)
        .bind(&input.payment_method)
        .bind(&input.notes)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn get_payment(&self, id: Uuid) -> Result<Payment, StoreError> {
        sqlx::query_as::<_, Payment>("SELECT * FROM payments WHERE gym_id = $1 AND id = $2")
            .bind(self.gym_id)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(not_found("payment"))
    }

    /// Restates a payment in full. Payments are otherwise immutable; this
    /// exists for admin corrections of data-entry mistakes.
    pub async fn update_payment(
        &self,
        id: Uuid,
        input: PaymentCorrection,
    ) -> Result<Payment, StoreError> {
        let due = billing::compute_due_amount(input.total_amount, input.amount_paid);
        sqlx::query_as::<_, Payment>(
            "UPDATE payments SET kind = $3, amount_paid = $4, total_amount = $5, \
             due_amount = $6, payment_date = $7, payment_method = $8, notes = $9, \
             updated_at = now() \
             WHERE gym_id = $1 AND id = $2 RETURNING *",
        )
        .bind(self.gym_id)
        .bind(id)
        .bind(input.kind)
        .bind(input.amount_paid)
        .bind(input.total_amount)
        .bind(due)
        .bind(input.payment_date)
        .bind(&input.payment_method)
        .bind(&input.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(not_found("payment"))
    }

    pub async fn delete_payment(&self, id: Uuid) -> Result<(), StoreError> {
        let res = sqlx::query("DELETE FROM payments WHERE gym_id = $1 AND id = $2")
            .bind(self.gym_id)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(StoreError::NotFound("payment"));
        }
        Ok(())
    }

    // -- Batches ----------------------------------------------------------

    pub async fn get_batch(&self, id: Uuid) -> Result<Batch, StoreError> {
        sqlx::query_as::<_, Batch>("SELECT * FROM batches WHERE gym_id = $1 AND id = $2")
            .bind(self.gym_id)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(not_found("batch"))
    }

    pub async fn list_batches(&self) -> Result<Vec<Batch>, StoreError> {
        let rows =
            sqlx::query_as::<_, Batch>("SELECT * FROM batches WHERE gym_id = $1 ORDER BY name")
                .bind(self.gym_id)
                .fetch_all(&self.pool)
                .await?;
        Ok(rows)
    }

    pub async fn create_batch(&self, input: NewBatch) -> Result<Batch, StoreError> {
        let row = sqlx::query_as::<_, Batch>(
            "INSERT INTO batches (id, gym_id, name, schedule, capacity, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, now(), now()) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(self.gym_id)
        .bind(&input.name)
        .bind(&input.schedule)
        .bind(input.capacity)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn update_batch(&self, id: Uuid, input: NewBatch) -> Result<Batch, StoreError> {
        sqlx::query_as::<_, Batch>(
            "UPDATE batches SET name = $3, schedule = $4, capacity = $5, updated_at = now() \
             WHERE gym_id = $1 AND id = $2 RETURNING *",
        )
        .bind(self.gym_id)
        .bind(id)
        .bind(&input.name)
        .bind(&input.schedule)
        .bind(input.capacity)
        .fetch_one(&self.pool)
        .await
        .map_err(not_found("batch"))
    }

    pub async fn delete_batch(&self, id: Uuid) -> Result<(), StoreError> {
        // Detach members first so the foreign key does not block deletion
        sqlx::query("UPDATE members SET batch_id = NULL WHERE gym_id = $1 AND batch_id = $2")
            .bind(self.gym_id)
            .bind(id)
            .execute(&self.pool)
            .await?;
        let res = sqlx::query("DELETE FROM batches WHERE gym_id = $1 AND id = $2")
            .bind(self.gym_id)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(StoreError::NotFound("batch"));
        }
        Ok(())
    }

    // -- Staff ------------------------------------------------------------

    pub async fn list_staff(&self) -> Result<Vec<Staff>, StoreError> {
        let rows = sqlx::query_as::<_, Staff>("SELECT * FROM staff WHERE gym_id = $1 ORDER BY name")
            .bind(self.gym_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn get_staff(&self, id: Uuid) -> Result<Staff, StoreError> {
        sqlx::query_as::<_, Staff>("SELECT * FROM staff WHERE gym_id = $1 AND id = $2")
            .bind(self.gym_id)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(not_found("staff"))
    }

    pub async fn create_staff(&self, input: NewStaff) -> Result<Staff, StoreError> {
        let row = sqlx::query_as::<_, Staff>(
            "INSERT INTO staff (id, gym_id, name, phone, designation, salary, join_date, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, now(), now()) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(self.gym_id)
        .bind(&input.name)
        .bind(&input.phone)
        .bind(&input.designation)
        .bind(input.salary)
        .bind(input.join_date)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn update_staff(&self, id: Uuid, input: NewStaff) -> Result<Staff, StoreError> {
        sqlx::query_as::<_, Staff>(
            "UPDATE staff SET name = $3, phone = $4, designation = $5, salary = $6, \
             join_date = $7, updated_at = now() \
             WHERE gym_id = $1 AND id = $2 RETURNING *",
        )
        .bind(self.gym_id)
        .bind(id)
        .bind(&input.name)
        .bind(&input.phone)
        .bind(&input.designation)
        .bind(input.salary)
        .bind(input.join_date)
        .fetch_one(&self.pool)
        .await
        .map_err(not_found("staff"))
    }

    pub async fn delete_staff(&self, id: Uuid) -> Result<(), StoreError> {
        let res = sqlx::query("DELETE FROM staff WHERE gym_id = $1 AND id = $2")
            .bind(self.gym_id)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(StoreError::NotFound("staff"));
        }
        Ok(())
    }

    // -- Expenses ---------------------------------------------------------

    pub async fn list_expenses(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Expense>, StoreError> {
        let rows = sqlx::query_as::<_, Expense>(
            "SELECT * FROM expenses WHERE gym_id = $1 AND expense_date BETWEEN $2 AND $3 \
             ORDER BY expense_date",
        )
        .bind(self.gym_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn create_expense(&self, input: NewExpense) -> Result<Expense, StoreError> {
        let row = sqlx::query_as::<_, Expense>(
            "INSERT INTO expenses (id, gym_id, description, category, amount, expense_date, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, now(), now()) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(self.gym_id)
        .bind(&input.description)
        .bind(&input.category)
        .bind(input.amount)
        .bind(input.expense_date)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn get_expense(&self, id: Uuid) -> Result<Expense, StoreError> {
        sqlx::query_as::<_, Expense>("SELECT * FROM expenses WHERE gym_id = $1 AND id = $2")
            .bind(self.gym_id)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(not_found("expense"))
    }

    pub async fn update_expense(&self, id: Uuid, input: NewExpense) -> Result<Expense, StoreError> {
        sqlx::query_as::<_, Expense>(
            "UPDATE expenses SET description = $3, category = $4, amount = $5, \
             expense_date = $6, updated_at = now() \
             WHERE gym_id = $1 AND id = $2 RETURNING *",
        )
        .bind(self.gym_id)
        .bind(id)
        .bind(&input.description)
        .bind(&input.category)
        .bind(input.amount)
        .bind(input.expense_date)
        .fetch_one(&self.pool)
        .await
        .map_err(not_found("expense"))
    }

    pub async fn delete_expense(&self, id: Uuid) -> Result<(), StoreError> {
        let res = sqlx::query("DELETE FROM expenses WHERE gym_id = $1 AND id = $2")
            .bind(self.gym_id)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(StoreError::NotFound("expense"));
        }
        Ok(())
    }

    // -- Enquiries --------------------------------------------------------

    pub async fn list_enquiries(&self) -> Result<Vec<Enquiry>, StoreError> {
        let rows = sqlx::query_as::<_, Enquiry>(
            "SELECT * FROM enquiries WHERE gym_id = $1 ORDER BY created_at DESC",
        )
        .bind(self.gym_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn create_enquiry(&self, input: NewEnquiry) -> Result<Enquiry, StoreError> {
        let row = sqlx::query_as::<_, Enquiry>(
            "INSERT INTO enquiries (id, gym_id, name, phone, interest, follow_up_date, converted, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, false, now(), now()) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(self.gym_id)
        .bind(&input.name)
        .bind(&input.phone)
        .bind(&input.interest)
        .bind(input.follow_up_date)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn get_enquiry(&self, id: Uuid) -> Result<Enquiry, StoreError> {
        sqlx::query_as::<_, Enquiry>("SELECT * FROM enquiries WHERE gym_id = $1 AND id = $2")
            .bind(self.gym_id)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(not_found("enquiry"))
    }

    pub async fn update_enquiry(
        &self,
        id: Uuid,
        input: UpdateEnquiry,
    ) -> Result<Enquiry, StoreError> {
        sqlx::query_as::<_, Enquiry>(
            "UPDATE enquiries SET \
               name = COALESCE($3, name), \
               phone = COALESCE($4, phone), \
               interest = COALESCE($5, interest), \
               follow_up_date = COALESCE($6, follow_up_date), \
               updated_at = now() \
             WHERE gym_id = $1 AND id = $2 RETURNING *",
        )
        .bind(self.gym_id)
        .bind(id)
        .bind(&input.name)
        .bind(&input.phone)
        .bind(&input.interest)
        .bind(input.follow_up_date)
        .fetch_one(&self.pool)
        .await
        .map_err(not_found("enquiry"))
    }

    pub async fn mark_enquiry_converted(&self, id: Uuid) -> Result<Enquiry, StoreError> {
        sqlx::query_as::<_, Enquiry>(
            "UPDATE enquiries SET converted = true, updated_at = now() \
             WHERE gym_id = $1 AND id = $2 RETURNING *",
        )
        .bind(self.gym_id)
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(not_found("enquiry"))
    }

    pub async fn delete_enquiry(&self, id: Uuid) -> Result<(), StoreError> {
        let res = sqlx::query("DELETE FROM enquiries WHERE gym_id = $1 AND id = $2")
            .bind(self.gym_id)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(StoreError::NotFound("enquiry"));
        }
        Ok(())
    }

    // -- Attendance -------------------------------------------------------

    /// Upserts on (member_id, date): marking the same day twice overwrites
    /// the present flag instead of erroring.
    pub async fn mark_attendance(
        &self,
        input: MarkAttendance,
    ) -> Result<AttendanceRecord, StoreError> {
        let member = self.get_member(input.member_id).await?;
        let row = sqlx::query_as::<_, AttendanceRecord>(
            "INSERT INTO attendance (id, gym_id, member_id, date, present, created_at) \
             VALUES ($1, $2, $3, $4, $5, now()) \
             ON CONFLICT (member_id, date) DO UPDATE SET present = EXCLUDED.present \
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(self.gym_id)
        .bind(member.id)
        .bind(input.date)
        .bind(input.present)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn attendance_in_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, StoreError> {
        let rows = sqlx::query_as::<_, AttendanceRecord>(
            "SELECT * FROM attendance WHERE gym_id = $1 AND date BETWEEN $2 AND $3 \
             ORDER BY date",
        )
        .bind(self.gym_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

// ---- Account-level access (not gym-scoped by construction) --------------
//
// Login has to find the user before the gym is known, and the scheduler has
// to enumerate gyms. These are the only two reads that cross tenants.

pub async fn find_user_by_phone(pool: &PgPool, phone: &str) -> Result<Option<User>, StoreError> {
    let row = sqlx::query_as::<_, User>("SELECT * FROM users WHERE phone = $1 AND is_active")
        .bind(phone)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Registers the gym's admin account. The new user's id doubles as the
/// gym_id for every other row in the tenant.
pub async fn create_admin_user(
    pool: &PgPool,
    name: &str,
    phone: &str,
    password_hash: &str,
) -> Result<User, StoreError> {
    if find_user_by_phone(pool, phone).await?.is_some() {
        return Err(StoreError::Conflict("phone already registered".to_string()));
    }
    let id = Uuid::new_v4();
    let row = sqlx::query_as::<_, User>(
        "INSERT INTO users (id, gym_id, name, phone, password_hash, role, is_active, created_at, updated_at) \
         VALUES ($1, $1, $2, $3, $4, $5, true, now(), now()) RETURNING *",
    )
    .bind(id)
    .bind(name)
    .bind(phone)
    .bind(password_hash)
    .bind(Role::Admin)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// All gym ids, for the scheduled sweep.
pub async fn list_gym_ids(pool: &PgPool) -> Result<Vec<Uuid>, StoreError> {
    let ids: Vec<Uuid> =
        sqlx::query_scalar("SELECT id FROM users WHERE role = $1 AND is_active ORDER BY id")
            .bind(Role::Admin)
            .fetch_all(pool)
            .await?;
    Ok(ids)
}
