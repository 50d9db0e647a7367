pub mod whatsapp;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::NotificationTarget;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Sent,
}

/// Outcome of one message to one guardian.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub student_name: String,
    pub parent_name: Option<String>,
    pub phone: String,
    pub message: String,
    pub status: DeliveryStatus,
    pub sent_at: DateTime<Utc>,
}

/// A guardian that can be reached, resolved from a student.
#[derive(Debug, Clone, PartialEq)]
pub struct Recipient {
    pub student_name: String,
    pub parent_name: Option<String>,
    pub phone: String,
}

#[derive(Debug)]
pub struct TransportError {
    pub message: String,
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<String> for TransportError {
    fn from(s: String) -> Self {
        TransportError { message: s }
    }
}

#[async_trait]
pub trait NotificationTransport: Send + Sync {
    fn name(&self) -> &str;
    async fn deliver(
        &self,
        recipient: &Recipient,
        message: &str,
    ) -> Result<Notification, TransportError>;
}

/// Keep students whose guardian has a phone number on file.
pub fn recipients(targets: Vec<NotificationTarget>) -> Vec<Recipient> {
    targets
        .into_iter()
        .filter_map(|t| match t.guardian_phone {
            Some(phone) if !phone.trim().is_empty() => Some(Recipient {
                student_name: t.student_name,
                parent_name: t.guardian_name,
                phone,
            }),
            _ => {
                tracing::debug!(student_id = %t.student_id, "no guardian phone, skipping");
                None
            }
        })
        .collect()
}

/// Deliver `message` to every recipient in order; the first transport
/// failure aborts the whole batch.
pub async fn dispatch(
    transport: &dyn NotificationTransport,
    recipients: &[Recipient],
    message: &str,
) -> Result<Vec<Notification>, TransportError> {
    let mut sent = Vec::with_capacity(recipients.len());
    for recipient in recipients {
        sent.push(transport.deliver(recipient, message).await?);
    }
    tracing::info!(transport = transport.name(), count = sent.len(), "notifications dispatched");
    Ok(sent)
}
