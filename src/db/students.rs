use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{NotificationTarget, Student, StudentWithGuardian};

pub struct StudentFields<'a> {
    pub name: &'a str,
    pub nis: &'a str,
    pub class: &'a str,
    pub academic_year: &'a str,
    pub monthly_fee: Decimal,
    pub scholarship_discount: Decimal,
    pub parent_id: Option<Uuid>,
}

const WITH_GUARDIAN: &str = "SELECT s.id, s.name, s.nis, s.class, s.academic_year, s.monthly_fee,
        s.scholarship_discount, s.is_active, s.parent_id,
        p.full_name AS guardian_name, p.phone AS guardian_phone,
        s.created_at, s.updated_at
     FROM students s
     LEFT JOIN profiles p ON p.id = s.parent_id";

pub async fn list(pool: &PgPool) -> Result<Vec<StudentWithGuardian>, sqlx::Error> {
    sqlx::query_as::<_, StudentWithGuardian>(&format!("{WITH_GUARDIAN} ORDER BY s.name"))
        .fetch_all(pool)
        .await
}

pub async fn find_by_id(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<StudentWithGuardian>, sqlx::Error> {
    sqlx::query_as::<_, StudentWithGuardian>(&format!("{WITH_GUARDIAN} WHERE s.id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn create(pool: &PgPool, fields: &StudentFields<'_>) -> Result<Student, sqlx::Error> {
    sqlx::query_as::<_, Student>(
        "INSERT INTO students (name, nis, class, academic_year, monthly_fee, scholarship_discount, parent_id)
         VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
    )
    .bind(fields.name)
    .bind(fields.nis)
    .bind(fields.class)
    .bind(fields.academic_year)
    .bind(fields.monthly_fee)
    .bind(fields.scholarship_discount)
    .bind(fields.parent_id)
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    fields: &StudentFields<'_>,
) -> Result<Student, sqlx::Error> {
    sqlx::query_as::<_, Student>(
        "UPDATE students SET name = $2, nis = $3, class = $4, academic_year = $5,
            monthly_fee = $6, scholarship_discount = $7, parent_id = $8, updated_at = now()
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(fields.name)
    .bind(fields.nis)
    .bind(fields.class)
    .bind(fields.academic_year)
    .bind(fields.monthly_fee)
    .bind(fields.scholarship_discount)
    .bind(fields.parent_id)
    .fetch_one(pool)
    .await
}

/// Students are never deleted; they are switched off.
pub async fn deactivate(pool: &PgPool, id: Uuid) -> Result<Student, sqlx::Error> {
    sqlx::query_as::<_, Student>(
        "UPDATE students SET is_active = false, updated_at = now() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .fetch_one(pool)
    .await
}

pub async fn notification_targets(
    pool: &PgPool,
    ids: &[Uuid],
) -> Result<Vec<NotificationTarget>, sqlx::Error> {
    sqlx::query_as::<_, NotificationTarget>(
        "SELECT s.id AS student_id, s.name AS student_name,
            p.full_name AS guardian_name, p.phone AS guardian_phone
         FROM students s
         LEFT JOIN profiles p ON p.id = s.parent_id
         WHERE s.id = ANY($1)
         ORDER BY s.name",
    )
    .bind(ids)
    .fetch_all(pool)
    .await
}
