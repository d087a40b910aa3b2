//! Creator application configuration

use chrono::Duration;
use serde::Deserialize;

use crate::domain::creator_application::ReapplicationPolicy;

use super::error::ValidationError;

/// Reapplication soft-lock tunables.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatorApplicationsConfig {
    /// Wait after the second rejection, in hours
    #[serde(default = "default_cooldown_hours")]
    pub cooldown_hours: i64,

    /// Rejections after which only support can unlock reapplication
    #[serde(default = "default_support_threshold")]
    pub support_threshold: u32,
}

impl CreatorApplicationsConfig {
    pub fn policy(&self) -> ReapplicationPolicy {
        ReapplicationPolicy {
            cooldown: Duration::hours(self.cooldown_hours),
            support_threshold: self.support_threshold,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.cooldown_hours <= 0 {
            return Err(ValidationError::InvalidCooldown);
        }
        if self.support_threshold <= 2 {
            return Err(ValidationError::InvalidSupportThreshold);
        }
        Ok(())
    }
}

impl Default for CreatorApplicationsConfig {
    fn default() -> Self {
        Self {
            cooldown_hours: default_cooldown_hours(),
            support_threshold: default_support_threshold(),
        }
    }
}

fn default_cooldown_hours() -> i64 {
    24
}

fn default_support_threshold() -> u32 {
    3
}
