use axum::extract::State;
use axum::Json;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::auth::extractor::AuthUser;
use crate::error::AppError;
use crate::state::SharedState;
use crate::stats::{self, DashboardStats, RecentPayment};

#[derive(Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: DashboardStats,
    #[serde(with = "rust_decimal::serde::float")]
    pub paid_percentage: Decimal,
    pub paid_percentage_label: String,
    pub recent_payments: Vec<RecentPayment>,
}

pub async fn stats(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<StatsResponse>, AppError> {
    auth.require_office()?;

    let students = state.cache.load_students(&state.pool).await?;
    let payments = state.cache.load_payments(&state.pool).await?;

    let stats = DashboardStats::compute(students.as_slice(), payments.as_slice());
    Ok(Json(StatsResponse {
        paid_percentage: stats.paid_percentage(),
        paid_percentage_label: stats.paid_percentage_label(),
        recent_payments: stats::recent_payments(payments.as_slice()),
        stats,
    }))
}
