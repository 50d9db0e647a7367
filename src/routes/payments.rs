use axum::extract::{Path, State};
use axum::Json;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::db::payments::NewPayment;
use crate::error::AppError;
use crate::models::{Payment, PaymentMethod, PaymentRecord, PaymentStatus};
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct CreatePayment {
    pub student_id: Uuid,
    /// Accepts a JSON number or a numeric string.
    pub amount: Decimal,
    pub payment_method: PaymentMethod,
    pub payment_date: Option<NaiveDate>,
    pub due_date: NaiveDate,
    pub month_year: String,
    pub status: Option<PaymentStatus>,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateStatus {
    pub status: PaymentStatus,
}

pub async fn list(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<PaymentRecord>>, AppError> {
    auth.require_office()?;
    let payments = state.cache.load_payments(&state.pool).await?;
    Ok(Json(payments.as_ref().clone()))
}

pub async fn create(
    auth: AuthUser,
    State(state): State<SharedState>,
    Json(req): Json<CreatePayment>,
) -> Result<Json<Payment>, AppError> {
    auth.require_office()?;

    if req.amount.is_sign_negative() && !req.amount.is_zero() {
        return Err(AppError::BadRequest("Amount cannot be negative".to_string()));
    }
    let month_year = req.month_year.trim();
    if month_year.is_empty() {
        return Err(AppError::BadRequest("Billing period is required".to_string()));
    }

    let payment = db::payments::create(
        &state.pool,
        &NewPayment {
            student_id: req.student_id,
            amount: req.amount,
            payment_method: req.payment_method,
            payment_date: req.payment_date,
            due_date: req.due_date,
            month_year,
            status: req.status.unwrap_or(PaymentStatus::Pending),
            notes: req.notes.as_deref(),
            processed_by: Some(auth.profile_id),
        },
    )
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
            AppError::BadRequest("Student not found".to_string())
        }
        _ => AppError::Database(e),
    })?;

    state.cache.payments.invalidate().await;
    tracing::info!(
        payment_id = %payment.id,
        student_id = %payment.student_id,
        status = %payment.status,
        "payment recorded"
    );
    Ok(Json(payment))
}

pub async fn update_status(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateStatus>,
) -> Result<Json<Payment>, AppError> {
    auth.require_office()?;

    let current = db::payments::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Payment not found".to_string()))?;

    if !current.status.can_transition_to(req.status) {
        return Err(AppError::BadRequest(format!(
            "Cannot change payment status from {} to {}",
            current.status, req.status
        )));
    }
    if current.status == req.status {
        return Ok(Json(current));
    }

    let payment = db::payments::update_status(&state.pool, id, current.status, req.status)
        .await?
        .ok_or_else(|| {
            AppError::Conflict("Payment status was changed by someone else".to_string())
        })?;

    state.cache.payments.invalidate().await;
    tracing::info!(
        payment_id = %id,
        from = %current.status,
        to = %payment.status,
        "payment status changed"
    );
    Ok(Json(payment))
}
