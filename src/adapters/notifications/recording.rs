//! Recording and logging notification dispatchers.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::domain::foundation::DomainError;
use crate::domain::notification::NotificationRequest;
use crate::ports::NotificationDispatcher;

/// Keeps every dispatched request in memory for later inspection.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotificationDispatcher {
    sent: Arc<Mutex<Vec<NotificationRequest>>>,
}

impl RecordingNotificationDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests dispatched so far, in order.
    pub fn sent(&self) -> Vec<NotificationRequest> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl NotificationDispatcher for RecordingNotificationDispatcher {
    async fn dispatch(&self, request: &NotificationRequest) -> Result<(), DomainError> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(request.clone());
        }
        Ok(())
    }
}

/// Writes requests to the log instead of delivering them.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotificationDispatcher;

#[async_trait]
impl NotificationDispatcher for LogNotificationDispatcher {
    async fn dispatch(&self, request: &NotificationRequest) -> Result<(), DomainError> {
        tracing::info!(
            notification_type = ?request.notification_type,
            recipient_id = %request.recipient_id,
            actor_id = %request.actor_id,
            "Notification (not delivered, no endpoint configured)"
        );
        Ok(())
    }
}
