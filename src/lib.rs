pub mod auth;
pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod notify;
pub mod report;
pub mod routes;
pub mod state;
pub mod stats;
pub mod views;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::cache::QueryCache;
use crate::config::Config;
use crate::middleware::auth_redirect::redirect_unauthorized;
use crate::notify::whatsapp::SimulatedWhatsApp;
use crate::notify::NotificationTransport;
use crate::state::{AppState, SharedState};

pub fn build_app(pool: PgPool, config: Config) -> Router {
    build_app_with_transport(pool, config, Arc::new(SimulatedWhatsApp::new()))
}

pub fn build_app_with_transport(
    pool: PgPool,
    config: Config,
    transport: Arc<dyn NotificationTransport>,
) -> Router {
    tracing::info!(transport = transport.name(), "notification transport ready");

    let max_body_size = config.max_body_size;
    let state: SharedState = Arc::new(AppState {
        pool,
        cache: QueryCache::new(&config.cache),
        config,
        transport,
    });

    Router::new()
        .merge(routes::api_routes())
        .merge(routes::function_routes())
        .merge(views::view_routes().layer(axum::middleware::from_fn(redirect_unauthorized)))
        .route("/health", axum::routing::get(health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::disable())
                .layer(RequestBodyLimitLayer::new(max_body_size)),
        )
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-frame-options"),
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("referrer-policy"),
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
