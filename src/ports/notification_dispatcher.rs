//! Notification dispatcher port.
//!
//! Delivery is best effort. Callers log failures and carry on; a failed
//! notification never undoes the payment that triggered it.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::notification::NotificationRequest;

#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn dispatch(&self, request: &NotificationRequest) -> Result<(), DomainError>;
}
