use std::sync::Arc;

use sqlx::PgPool;

use crate::cache::QueryCache;
use crate::config::Config;
use crate::notify::NotificationTransport;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
    pub cache: QueryCache,
    pub transport: Arc<dyn NotificationTransport>,
}
