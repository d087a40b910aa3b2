//! Notification delivery configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Where post-commit notifications are delivered.
///
/// Without an endpoint, notifications are only logged.
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Upper bound on each delivery, in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl NotificationsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Endpoint, ignoring blank values.
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(endpoint) = self.endpoint() {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err(ValidationError::InvalidNotificationEndpoint);
            }
        }
        if self.timeout_secs == 0 || self.timeout_secs > 60 {
            return Err(ValidationError::InvalidNotificationTimeout);
        }
        Ok(())
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_secs: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    5
}
