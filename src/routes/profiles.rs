use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::auth::extractor::AuthUser;
use crate::auth::password;
use crate::db;
use crate::db::profiles::NewProfile;
use crate::error::AppError;
use crate::models::{Profile, UserRole};
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct ListParams {
    pub role: Option<UserRole>,
}

#[derive(Deserialize)]
pub struct CreateProfile {
    pub full_name: String,
    pub phone: Option<String>,
    pub role: Option<UserRole>,
    pub email: Option<String>,
    pub password: Option<String>,
}

pub async fn list(
    auth: AuthUser,
    State(state): State<SharedState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Profile>>, AppError> {
    auth.require_office()?;
    let profiles = db::profiles::list(&state.pool, params.role).await?;
    Ok(Json(profiles))
}

/// Guardians are created by the office; only admins hand out office
/// accounts or credentials.
pub async fn create(
    auth: AuthUser,
    State(state): State<SharedState>,
    Json(req): Json<CreateProfile>,
) -> Result<Json<Profile>, AppError> {
    auth.require_office()?;

    let role = req.role.unwrap_or(UserRole::Parent);
    if role.is_office() || req.password.is_some() {
        auth.require_admin()?;
    }

    let full_name = req.full_name.trim();
    if full_name.is_empty() {
        return Err(AppError::BadRequest("Full name is required".to_string()));
    }

    let phone = req.phone.as_deref().map(str::trim).filter(|p| !p.is_empty());
    let email = req.email.as_deref().map(str::trim).filter(|e| !e.is_empty());

    let pw_hash = match req.password.as_deref() {
        Some(pw) => {
            if email.is_none() {
                return Err(AppError::BadRequest(
                    "An email is required to set a password".to_string(),
                ));
            }
            password::check_length(pw).map_err(AppError::BadRequest)?;
            Some(password::hash(pw).map_err(AppError::Internal)?)
        }
        None => None,
    };

    let profile = db::profiles::create(
        &state.pool,
        &NewProfile {
            full_name,
            phone,
            role,
            email,
            password_hash: pw_hash.as_deref(),
        },
    )
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            AppError::Conflict("A profile with this email already exists".to_string())
        }
        _ => AppError::Database(e),
    })?;

    // Guardian names and phones are shown on the student list
    state.cache.students.invalidate().await;

    tracing::info!(profile_id = %profile.id, role = %profile.role, "profile created");
    Ok(Json(profile))
}
