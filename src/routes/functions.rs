//! The two callable functions: payment report generation and WhatsApp
//! notification dispatch. Both answer `{"success": true, ...}` with 200 or
//! `{"success": false, "error": ...}` with 400.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{NaiveDate, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::FunctionError;
use crate::notify;
use crate::report::{self, Report, ReportType};
use crate::state::SharedState;

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_HEADERS: &str = "authorization, x-client-info, apikey, content-type";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    pub start_date: String,
    pub end_date: String,
    pub report_type: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRequest {
    pub student_ids: Vec<Uuid>,
    pub message: String,
}

/// CORS preflight: empty 200, headers come from the router layer.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

pub async fn generate_payment_report(
    auth: AuthUser,
    State(state): State<SharedState>,
    body: Bytes,
) -> Response {
    if let Err(e) = auth.require_office() {
        return e.into_response();
    }

    match build_report(&state, &body).await {
        Ok(data) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": data,
                "generatedAt": timestamp(),
            })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Error in generate-payment-report: {e}");
            e.into_response()
        }
    }
}

async fn build_report(state: &SharedState, body: &[u8]) -> Result<Report, FunctionError> {
    let req: ReportRequest = parse_body(body)?;
    let report_type: ReportType = req.report_type.parse().map_err(FunctionError::InvalidInput)?;
    let start = parse_date("startDate", &req.start_date)?;
    let end = parse_date("endDate", &req.end_date)?;

    tracing::info!(%start, %end, report_type = %req.report_type, "generating report");

    let payments = db::payments::list_in_range(&state.pool, start, end).await?;
    tracing::info!(count = payments.len(), "found payments");

    Ok(report::build(report_type, &payments))
}

pub async fn send_whatsapp_notification(
    auth: AuthUser,
    State(state): State<SharedState>,
    body: Bytes,
) -> Response {
    if let Err(e) = auth.require_office() {
        return e.into_response();
    }

    match dispatch_notifications(&state, &body).await {
        Ok(notifications) => {
            let message = format!(
                "Successfully sent {} WhatsApp notifications",
                notifications.len()
            );
            (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "notifications": notifications,
                    "message": message,
                })),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Error in send-whatsapp-notification: {e}");
            e.into_response()
        }
    }
}

async fn dispatch_notifications(
    state: &SharedState,
    body: &[u8],
) -> Result<Vec<notify::Notification>, FunctionError> {
    let req: NotificationRequest = parse_body(body)?;
    tracing::info!(students = req.student_ids.len(), "sending WhatsApp notifications");

    let targets = db::students::notification_targets(&state.pool, &req.student_ids).await?;
    let recipients = notify::recipients(targets);

    Ok(notify::dispatch(state.transport.as_ref(), &recipients, &req.message).await?)
}

fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, FunctionError> {
    serde_json::from_slice(body)
        .map_err(|e| FunctionError::InvalidInput(format!("Invalid request body: {e}")))
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate, FunctionError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| FunctionError::InvalidInput(format!("Invalid {field}: expected YYYY-MM-DD")))
}

/// Same shape as JavaScript's `Date.toISOString()`.
fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
