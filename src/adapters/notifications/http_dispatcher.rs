//! HTTP notification dispatcher.
//!
//! POSTs each request as JSON to the notification service:
//!
//! ```json
//! { "type": "newSubscription", "recipientId": "creator-1", "actorId": "fan-1" }
//! ```

use async_trait::async_trait;
use std::time::Duration;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::notification::NotificationRequest;
use crate::ports::NotificationDispatcher;

pub struct HttpNotificationDispatcher {
    http_client: reqwest::Client,
    endpoint: String,
}

impl HttpNotificationDispatcher {
    /// Creates a dispatcher posting to `endpoint` with a per-request timeout.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, DomainError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::InternalError,
                    format!("Failed to build notification client: {}", e),
                )
            })?;
        Ok(Self {
            http_client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl NotificationDispatcher for HttpNotificationDispatcher {
    async fn dispatch(&self, request: &NotificationRequest) -> Result<(), DomainError> {
        let response = self
            .http_client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::InternalError,
                    format!("Notification request failed: {}", e),
                )
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(DomainError::new(
                ErrorCode::InternalError,
                format!("Notification service returned {}: {}", status, error_text),
            ));
        }

        Ok(())
    }
}
