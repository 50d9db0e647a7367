use askama::Template;
use axum::extract::State;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;

use crate::auth::extractor::ACCESS_COOKIE;
use crate::auth::jwt;
use crate::error::AppError;
use crate::state::SharedState;

#[derive(Template)]
#[template(path = "auth/login.html")]
struct LoginTemplate;

pub async fn login_page(State(state): State<SharedState>, jar: CookieJar) -> Response {
    if let Some(cookie) = jar.get(ACCESS_COOKIE) {
        if jwt::decode_token(cookie.value(), &state.config.jwt_secret).is_ok() {
            return Redirect::to("/dashboard").into_response();
        }
    }

    match LoginTemplate.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => AppError::Internal(format!("login template: {e}")).into_response(),
    }
}
