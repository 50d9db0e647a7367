use async_trait::async_trait;
use chrono::Utc;

use super::{DeliveryStatus, Notification, NotificationTransport, Recipient, TransportError};

/// Acknowledges every message without contacting a WhatsApp gateway.
pub struct SimulatedWhatsApp;

impl SimulatedWhatsApp {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SimulatedWhatsApp {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationTransport for SimulatedWhatsApp {
    fn name(&self) -> &str {
        "whatsapp-simulated"
    }

    async fn deliver(
        &self,
        recipient: &Recipient,
        message: &str,
    ) -> Result<Notification, TransportError> {
        tracing::info!(
            phone = %recipient.phone,
            student = %recipient.student_name,
            "simulated WhatsApp send"
        );
        Ok(Notification {
            student_name: recipient.student_name.clone(),
            parent_name: recipient.parent_name.clone(),
            phone: recipient.phone.clone(),
            message: message.to_string(),
            status: DeliveryStatus::Sent,
            sent_at: Utc::now(),
        })
    }
}
