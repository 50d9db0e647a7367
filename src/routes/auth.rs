use axum::extract::State;
use axum::Json;
use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use crate::auth::extractor::ACCESS_COOKIE;
use crate::auth::jwt::{encode_token, Claims, ACCESS_TOKEN_MINUTES};
use crate::auth::password;
use crate::db;
use crate::db::profiles::NewProfile;
use crate::error::AppError;
use crate::models::{Profile, UserRole};
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub phone: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub profile: Profile,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

fn access_cookie(access_token: &str) -> CookieJar {
    let access = Cookie::build((ACCESS_COOKIE, access_token.to_string()))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::minutes(ACCESS_TOKEN_MINUTES))
        .build();

    CookieJar::new().add(access)
}

fn clear_access_cookie() -> CookieJar {
    let access = Cookie::build((ACCESS_COOKIE, ""))
        .path("/")
        .max_age(time::Duration::ZERO)
        .build();
    CookieJar::new().add(access)
}

fn issue(profile: Profile, secret: &str) -> Result<(CookieJar, Json<AuthResponse>), AppError> {
    let claims = Claims::new(profile.id, profile.role);
    let access_token = encode_token(&claims, secret).map_err(AppError::Internal)?;
    let jar = access_cookie(&access_token);
    Ok((jar, Json(AuthResponse { access_token, profile })))
}

/// Create the first administrator. Closed once any profile can sign in.
pub async fn register(
    State(state): State<SharedState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), AppError> {
    if req.email.trim().is_empty() || req.password.is_empty() || req.full_name.trim().is_empty() {
        return Err(AppError::BadRequest("All fields are required".to_string()));
    }
    password::check_length(&req.password).map_err(AppError::BadRequest)?;

    let pw_hash = password::hash(&req.password).map_err(AppError::Internal)?;

    // Advisory lock prevents concurrent bootstrap registrations
    let mut tx = state.pool.begin().await?;
    sqlx::query("SELECT pg_advisory_xact_lock(1)")
        .execute(&mut *tx)
        .await?;

    if db::profiles::count_with_login(&mut *tx).await? > 0 {
        return Err(AppError::Forbidden(
            "Registration is disabled. Ask an administrator for an account.".to_string(),
        ));
    }

    let profile = db::profiles::create(
        &mut *tx,
        &NewProfile {
            full_name: req.full_name.trim(),
            phone: req.phone.as_deref(),
            role: UserRole::Admin,
            email: Some(req.email.trim()),
            password_hash: Some(&pw_hash),
        },
    )
    .await?;

    tx.commit().await?;

    tracing::info!(profile_id = %profile.id, "bootstrap administrator registered");
    issue(profile, &state.config.jwt_secret)
}

pub async fn login(
    State(state): State<SharedState>,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), AppError> {
    let profile = db::profiles::find_by_email(&state.pool, req.email.trim())
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

    let Some(hash) = profile.password_hash.as_deref() else {
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    };

    if !password::verify(&req.password, hash).map_err(AppError::Internal)? {
        tracing::warn!(profile_id = %profile.id, "failed login attempt");
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    tracing::info!(profile_id = %profile.id, role = %profile.role, "login");
    issue(profile, &state.config.jwt_secret)
}

pub async fn logout() -> (CookieJar, Json<MessageResponse>) {
    (
        clear_access_cookie(),
        Json(MessageResponse {
            message: "Logged out successfully".to_string(),
        }),
    )
}
