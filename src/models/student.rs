use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Student {
    pub id: Uuid,
    pub name: String,
    pub nis: String,
    pub class: String,
    pub academic_year: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub monthly_fee: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub scholarship_discount: Decimal,
    pub is_active: bool,
    pub parent_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Student row joined with the guardian profile it points at.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct StudentWithGuardian {
    pub id: Uuid,
    pub name: String,
    pub nis: String,
    pub class: String,
    pub academic_year: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub monthly_fee: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub scholarship_discount: Decimal,
    pub is_active: bool,
    pub parent_id: Option<Uuid>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The slice of a student and guardian needed to address a notification.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct NotificationTarget {
    pub student_id: Uuid,
    pub student_name: String,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
}
