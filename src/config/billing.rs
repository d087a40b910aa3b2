//! Billing configuration

use serde::Deserialize;

use crate::domain::subscription::BillingPeriods;

use super::error::ValidationError;

const MAX_PERIOD_DAYS: i64 = 3650;
const MAX_WRITE_ATTEMPTS: u32 = 10;

/// Period lengths and write retry budget for the payment path.
#[derive(Debug, Clone, Deserialize)]
pub struct BillingConfig {
    #[serde(default = "default_period_days")]
    pub content_access_period_days: i64,

    #[serde(default = "default_period_days")]
    pub messaging_access_period_days: i64,

    /// Units of work attempted per payment before reporting a transient failure
    #[serde(default = "default_max_write_attempts")]
    pub max_write_attempts: u32,
}

impl BillingConfig {
    pub fn periods(&self) -> BillingPeriods {
        BillingPeriods::from_days(
            self.content_access_period_days,
            self.messaging_access_period_days,
        )
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(1..=MAX_PERIOD_DAYS).contains(&self.content_access_period_days) {
            return Err(ValidationError::InvalidBillingPeriod("content_access"));
        }
        if !(1..=MAX_PERIOD_DAYS).contains(&self.messaging_access_period_days) {
            return Err(ValidationError::InvalidBillingPeriod("messaging_access"));
        }
        if !(1..=MAX_WRITE_ATTEMPTS).contains(&self.max_write_attempts) {
            return Err(ValidationError::InvalidWriteAttempts);
        }
        Ok(())
    }
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            content_access_period_days: default_period_days(),
            messaging_access_period_days: default_period_days(),
            max_write_attempts: default_max_write_attempts(),
        }
    }
}

fn default_period_days() -> i64 {
    BillingPeriods::DEFAULT_PERIOD_DAYS
}

fn default_max_write_attempts() -> u32 {
    3
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::subscription::SubscriptionKind;
    use chrono::Duration;

    #[test]
    fn defaults_are_thirty_days_and_three_attempts() {
        let config = BillingConfig::default();
        assert_eq!(config.max_write_attempts, 3);
        assert_eq!(
            config.periods().duration_for(SubscriptionKind::ContentAccess),
            Duration::days(30)
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_day_period_is_rejected() {
        let config = BillingConfig {
            messaging_access_period_days: 0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidBillingPeriod("messaging_access"))
        );
    }

    #[test]
    fn zero_attempts_is_rejected() {
        let config = BillingConfig {
            max_write_attempts: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidWriteAttempts));
    }
}
