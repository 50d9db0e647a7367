use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;
use uuid::Uuid;

use crate::auth::jwt;
use crate::error::AppError;
use crate::models::UserRole;
use crate::state::SharedState;

pub const ACCESS_COOKIE: &str = "access_token";

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub profile_id: Uuid,
    pub role: UserRole,
}

impl AuthUser {
    /// Admins and staff only.
    pub fn require_office(&self) -> Result<(), AppError> {
        if self.role.is_office() {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "School office access required".to_string(),
            ))
        }
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.role == UserRole::Admin {
            Ok(())
        } else {
            Err(AppError::Forbidden("Admin access required".to_string()))
        }
    }
}

impl FromRequestParts<SharedState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        // Bearer token first, then the browser cookie
        let token = match parts.headers.get("authorization") {
            Some(auth_header) => {
                let auth_str = auth_header.to_str().map_err(|_| {
                    AppError::Unauthorized("Invalid authorization header".to_string())
                })?;
                auth_str.strip_prefix("Bearer ").map(str::to_string)
            }
            None => None,
        };

        let token = token.or_else(|| {
            CookieJar::from_headers(&parts.headers)
                .get(ACCESS_COOKIE)
                .map(|c| c.value().to_string())
        });

        let Some(token) = token else {
            return Err(AppError::Unauthorized(
                "Missing authentication token".to_string(),
            ));
        };

        let claims = jwt::decode_token(&token, &state.config.jwt_secret)
            .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))?;

        Ok(AuthUser {
            profile_id: claims.sub,
            role: claims.role,
        })
    }
}
