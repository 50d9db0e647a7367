pub mod auth;
pub mod dashboard;
pub mod functions;
pub mod payments;
pub mod profiles;
pub mod students;

use axum::http::{header, HeaderValue};
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        // Auth
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/logout", post(auth::logout))
        // Students
        .route("/api/v1/students", get(students::list).post(students::create))
        .route(
            "/api/v1/students/{id}",
            get(students::get).put(students::update),
        )
        .route(
            "/api/v1/students/{id}/deactivate",
            post(students::deactivate),
        )
        // Guardians and staff
        .route("/api/v1/profiles", get(profiles::list).post(profiles::create))
        // Payments
        .route("/api/v1/payments", get(payments::list).post(payments::create))
        .route("/api/v1/payments/{id}/status", put(payments::update_status))
        // Dashboard
        .route("/api/v1/dashboard/stats", get(dashboard::stats))
}

/// Browser-callable functions; every response carries permissive CORS headers.
pub fn function_routes() -> Router<SharedState> {
    Router::new()
        .route(
            "/functions/v1/generate-payment-report",
            post(functions::generate_payment_report).options(functions::preflight),
        )
        .route(
            "/functions/v1/send-whatsapp-notification",
            post(functions::send_whatsapp_notification).options(functions::preflight),
        )
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static(functions::ALLOW_ORIGIN),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(functions::ALLOW_HEADERS),
        ))
}
