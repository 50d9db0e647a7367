use axum::extract::{Path, State};
use axum::Json;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::db::students::StudentFields;
use crate::error::AppError;
use crate::models::{Student, StudentWithGuardian};
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct StudentRequest {
    pub name: String,
    pub nis: String,
    pub class: String,
    pub academic_year: String,
    pub monthly_fee: Decimal,
    pub scholarship_discount: Option<Decimal>,
    pub parent_id: Option<Uuid>,
}

impl StudentRequest {
    fn validate(&self) -> Result<StudentFields<'_>, AppError> {
        let fields = StudentFields {
            name: self.name.trim(),
            nis: self.nis.trim(),
            class: self.class.trim(),
            academic_year: self.academic_year.trim(),
            monthly_fee: self.monthly_fee,
            scholarship_discount: self.scholarship_discount.unwrap_or(Decimal::ZERO),
            parent_id: self.parent_id,
        };

        if fields.name.is_empty()
            || fields.nis.is_empty()
            || fields.class.is_empty()
            || fields.academic_year.is_empty()
        {
            return Err(AppError::BadRequest(
                "Name, NIS, class and academic year are required".to_string(),
            ));
        }
        if fields.monthly_fee.is_sign_negative() || fields.scholarship_discount.is_sign_negative() {
            return Err(AppError::BadRequest(
                "Fees and discounts cannot be negative".to_string(),
            ));
        }
        Ok(fields)
    }
}

fn map_write_error(e: sqlx::Error) -> AppError {
    match e {
        sqlx::Error::RowNotFound => AppError::NotFound("Student not found".to_string()),
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            AppError::Conflict("A student with this NIS already exists".to_string())
        }
        sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
            AppError::BadRequest("Guardian not found".to_string())
        }
        _ => AppError::Database(e),
    }
}

pub async fn list(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<StudentWithGuardian>>, AppError> {
    auth.require_office()?;
    let students = state.cache.load_students(&state.pool).await?;
    Ok(Json(students.as_ref().clone()))
}

pub async fn get(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<StudentWithGuardian>, AppError> {
    auth.require_office()?;
    let student = db::students::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Student not found".to_string()))?;
    Ok(Json(student))
}

pub async fn create(
    auth: AuthUser,
    State(state): State<SharedState>,
    Json(req): Json<StudentRequest>,
) -> Result<Json<Student>, AppError> {
    auth.require_office()?;
    let fields = req.validate()?;

    let student = db::students::create(&state.pool, &fields)
        .await
        .map_err(map_write_error)?;

    state.cache.students.invalidate().await;
    tracing::info!(student_id = %student.id, nis = %student.nis, "student created");
    Ok(Json(student))
}

pub async fn update(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(req): Json<StudentRequest>,
) -> Result<Json<Student>, AppError> {
    auth.require_office()?;
    let fields = req.validate()?;

    let student = db::students::update(&state.pool, id, &fields)
        .await
        .map_err(map_write_error)?;

    // Class changes show up in payment rows too
    state.cache.students.invalidate().await;
    state.cache.payments.invalidate().await;
    Ok(Json(student))
}

pub async fn deactivate(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Student>, AppError> {
    auth.require_office()?;

    let student = db::students::deactivate(&state.pool, id)
        .await
        .map_err(map_write_error)?;

    state.cache.students.invalidate().await;
    tracing::info!(student_id = %student.id, "student deactivated");
    Ok(Json(student))
}
