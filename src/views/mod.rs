pub mod auth;
pub mod dashboard;

use axum::routing::get;
use axum::Router;

use crate::state::SharedState;

pub fn view_routes() -> Router<SharedState> {
    Router::new()
        .route("/", get(auth::login_page))
        .route("/auth/login", get(auth::login_page))
        .route("/dashboard", get(dashboard::index))
}
