//! Order notifications to the shop owner's WhatsApp.
//!
//! DESIGN
//! ======
//! Delivery sits behind [`OrderNotifier`]. With `WHATSAPP_WEBHOOK_URL` set,
//! messages are POSTed as `{"to", "body"}` JSON to a relay (Twilio function,
//! WhatsApp Cloud API proxy, etc.); otherwise they go to the log.
//!
//! TRADE-OFFS
//! ==========
//! Notification is fire-and-report: a failed send is logged and never rolls
//! back or fails the customer's checkout.

use std::sync::Arc;
use std::time::Duration;

use crate::config::NotifyConfig;
use crate::services::orders::NewOrder;

const WEBHOOK_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("webhook request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("webhook returned {status}: {body}")]
    Status { status: u16, body: String },
}

#[async_trait::async_trait]
pub trait OrderNotifier: Send + Sync {
    async fn send(&self, recipient: &str, message: &str) -> Result<(), NotifyError>;
}

/// Writes messages to the tracing log instead of delivering them.
pub struct LogNotifier;

#[async_trait::async_trait]
impl OrderNotifier for LogNotifier {
    async fn send(&self, recipient: &str, message: &str) -> Result<(), NotifyError> {
        tracing::info!(%recipient, %message, "whatsapp notification (log only)");
        Ok(())
    }
}

pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(url: impl Into<String>) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(WEBHOOK_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client, url: url.into() })
    }
}

#[async_trait::async_trait]
impl OrderNotifier for WebhookNotifier {
    async fn send(&self, recipient: &str, message: &str) -> Result<(), NotifyError> {
        let resp = self
            .client
            .post(&self.url)
            .json(&serde_json::json!({ "to": recipient, "body": message }))
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(NotifyError::Status { status, body });
        }
        Ok(())
    }
}

/// Pick the notifier for this deployment.
#[must_use]
pub fn notifier_from_config(config: &NotifyConfig) -> Arc<dyn OrderNotifier> {
    let Some(url) = &config.webhook_url else {
        return Arc::new(LogNotifier);
    };
    match WebhookNotifier::new(url.clone()) {
        Ok(notifier) => Arc::new(notifier),
        Err(e) => {
            tracing::warn!(error = %e, "webhook notifier unavailable; notifications will be logged");
            Arc::new(LogNotifier)
        }
    }
}

fn or_na(field: Option<&str>) -> &str {
    field.filter(|v| !v.is_empty()).unwrap_or("N/A")
}

/// Render the owner-facing message for a new order (WhatsApp markdown).
#[must_use]
pub fn format_whatsapp_message(order: &NewOrder) -> String {
    format!(
        "🛍️ *New Order Received*\n\
         \n\
         *Customer Details:*\n\
         Name: {name}\n\
         Phone: {phone}\n\
         Email: {email}\n\
         Address: {address}\n\
         \n\
         *Products:*\n\
         {products}\n\
         \n\
         *Total Amount:* ₹{total:.2}\n\
         \n\
         *Notes:* {notes}\n\
         \n\
         ---\n\
         View order details for fulfillment.",
        name = order.customer_name,
        phone = order.customer_phone,
        email = or_na(order.customer_email.as_deref()),
        address = or_na(order.customer_address.as_deref()),
        products = order.products,
        total = order.total_amount,
        notes = or_na(order.notes.as_deref()),
    )
}

/// Tell the shop owner about a placed order. Failures are logged only.
pub async fn notify_new_order(notifier: &dyn OrderNotifier, recipient: Option<&str>, order_id: i32, order: &NewOrder) {
    let Some(recipient) = recipient else {
        tracing::debug!(order_id, "WHATSAPP_NUMBER not set; skipping order notification");
        return;
    };

    let message = format_whatsapp_message(order);
    match notifier.send(recipient, &message).await {
        Ok(()) => tracing::info!(order_id, "order notification sent"),
        Err(e) => tracing::warn!(order_id, error = %e, "order notification failed"),
    }
}

#[cfg(test)]
#[path = "notify_test.rs"]
mod tests;
