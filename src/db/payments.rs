use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Payment, PaymentMethod, PaymentRecord, PaymentStatus};

pub struct NewPayment<'a> {
    pub student_id: Uuid,
    pub amount: Decimal,
    pub payment_method: PaymentMethod,
    pub payment_date: Option<NaiveDate>,
    pub due_date: NaiveDate,
    pub month_year: &'a str,
    pub status: PaymentStatus,
    pub notes: Option<&'a str>,
    pub processed_by: Option<Uuid>,
}

const RECORD_SELECT: &str = "SELECT p.id, p.student_id, p.amount, p.payment_method, p.payment_date,
        p.due_date, p.month_year, p.status, p.notes, p.processed_by,
        s.name AS student_name, s.class AS student_class, s.nis AS student_nis,
        s.academic_year AS student_academic_year, p.created_at
     FROM payments p
     LEFT JOIN students s ON s.id = p.student_id";

/// Every payment, newest payment date first.
pub async fn list(pool: &PgPool) -> Result<Vec<PaymentRecord>, sqlx::Error> {
    sqlx::query_as::<_, PaymentRecord>(&format!(
        "{RECORD_SELECT} ORDER BY p.payment_date DESC, p.created_at DESC"
    ))
    .fetch_all(pool)
    .await
}

/// Payments whose payment date falls in `[start, end]`, newest first.
pub async fn list_in_range(
    pool: &PgPool,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<PaymentRecord>, sqlx::Error> {
    sqlx::query_as::<_, PaymentRecord>(&format!(
        "{RECORD_SELECT} WHERE p.payment_date >= $1 AND p.payment_date <= $2
         ORDER BY p.payment_date DESC, p.created_at DESC"
    ))
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Payment>, sqlx::Error> {
    sqlx::query_as::<_, Payment>("SELECT * FROM payments WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn create(pool: &PgPool, payment: &NewPayment<'_>) -> Result<Payment, sqlx::Error> {
    sqlx::query_as::<_, Payment>(
        "INSERT INTO payments (student_id, amount, payment_method, payment_date, due_date,
            month_year, status, notes, processed_by)
         VALUES ($1, $2, $3, COALESCE($4, CURRENT_DATE), $5, $6, $7, $8, $9) RETURNING *",
    )
    .bind(payment.student_id)
    .bind(payment.amount)
    .bind(payment.payment_method)
    .bind(payment.payment_date)
    .bind(payment.due_date)
    .bind(payment.month_year)
    .bind(payment.status)
    .bind(payment.notes)
    .bind(payment.processed_by)
    .fetch_one(pool)
    .await
}

/// Move a payment from `from` to `to`. Returns `None` when the stored
/// status is no longer `from`.
pub async fn update_status(
    pool: &PgPool,
    id: Uuid,
    from: PaymentStatus,
    to: PaymentStatus,
) -> Result<Option<Payment>, sqlx::Error> {
    sqlx::query_as::<_, Payment>(
        "UPDATE payments SET status = $3, updated_at = now()
         WHERE id = $1 AND status = $2 RETURNING *",
    )
    .bind(id)
    .bind(from)
    .bind(to)
    .fetch_optional(pool)
    .await
}
