use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};

/// Send browsers without a valid session back to the login page.
pub async fn redirect_unauthorized(req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();
    let response = next.run(req).await;
    if response.status() == StatusCode::UNAUTHORIZED {
        tracing::debug!(%path, "unauthenticated page request, redirecting to login");
        Redirect::to("/auth/login").into_response()
    } else {
        response
    }
}
