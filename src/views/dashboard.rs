use askama::Template;
use axum::extract::State;
use axum::response::{Html, IntoResponse};

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::state::SharedState;
use crate::stats::{self, format_rupiah, DashboardStats};

#[derive(Template)]
#[template(path = "dashboard/index.html")]
#[allow(dead_code)]
struct DashboardTemplate {
    user_name: String,
    total_students: usize,
    paid_count: usize,
    paid_label: String,
    unpaid_count: usize,
    total_collected: String,
    total_overdue: String,
    recent_payments: Vec<RecentRow>,
}

#[allow(dead_code)]
struct RecentRow {
    student_name: String,
    class: String,
    month_year: String,
    amount: String,
    status_label: &'static str,
    is_paid: bool,
}

pub async fn index(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<impl IntoResponse, AppError> {
    auth.require_office()?;

    let students = state.cache.load_students(&state.pool).await?;
    let payments = state.cache.load_payments(&state.pool).await?;
    let stats = DashboardStats::compute(students.as_slice(), payments.as_slice());

    let recent_payments = stats::recent_payments(payments.as_slice())
        .into_iter()
        .map(|p| RecentRow {
            student_name: p.student_name,
            class: p.class,
            month_year: p.month_year,
            amount: format_rupiah(p.amount),
            status_label: p.status_label,
            is_paid: p.is_paid,
        })
        .collect();

    let user_name = db::profiles::find_by_id(&state.pool, auth.profile_id)
        .await?
        .map(|p| p.full_name)
        .unwrap_or_default();

    let template = DashboardTemplate {
        user_name,
        total_students: stats.total_students,
        paid_count: stats.paid_count,
        paid_label: stats.paid_percentage_label(),
        unpaid_count: stats.unpaid_count,
        total_collected: format_rupiah(stats.total_collected),
        total_overdue: format_rupiah(stats.total_overdue),
        recent_payments,
    };
    let html = template
        .render()
        .map_err(|e| AppError::Internal(format!("dashboard template: {e}")))?;
    Ok(Html(html))
}
