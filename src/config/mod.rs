//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables use the `CREATOR_SUBS` prefix and
//! `__` between nested keys.
//!
//! # Example
//!
//! ```no_run
//! use creator_subscriptions::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod billing;
mod creator_applications;
mod database;
mod error;
mod notifications;
mod server;

pub use billing::BillingConfig;
pub use creator_applications::CreatorApplicationsConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use notifications::NotificationsConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

use crate::application::handlers::payment::ApplyPaymentSettings;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a development
/// service running on in-memory stores.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    /// PostgreSQL connection (empty URL selects in-memory stores)
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Billing periods and write retry budget
    #[serde(default)]
    pub billing: BillingConfig,

    /// Post-commit notification delivery
    #[serde(default)]
    pub notifications: NotificationsConfig,

    /// Reapplication soft lock
    #[serde(default)]
    pub creator_applications: CreatorApplicationsConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// 1. Loads `.env` if present (development)
    /// 2. Reads variables with the `CREATOR_SUBS` prefix
    /// 3. Splits nested keys on `__`
    ///
    /// - `CREATOR_SUBS__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `CREATOR_SUBS__BILLING__MAX_WRITE_ATTEMPTS=5` -> `billing.max_write_attempts = 5`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into their types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("CREATOR_SUBS")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate(self.is_production())?;
        self.billing.validate()?;
        self.notifications.validate()?;
        self.creator_applications.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }

    /// Settings for the payment command handler.
    pub fn apply_payment_settings(&self) -> ApplyPaymentSettings {
        ApplyPaymentSettings {
            periods: self.billing.periods(),
            max_write_attempts: self.billing.max_write_attempts,
            notification_timeout: self.notifications.timeout(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::subscription::SubscriptionKind;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "CREATOR_SUBS__DATABASE__URL",
        "CREATOR_SUBS__SERVER__PORT",
        "CREATOR_SUBS__SERVER__ENVIRONMENT",
        "CREATOR_SUBS__BILLING__MESSAGING_ACCESS_PERIOD_DAYS",
        "CREATOR_SUBS__BILLING__MAX_WRITE_ATTEMPTS",
        "CREATOR_SUBS__NOTIFICATIONS__ENDPOINT",
        "CREATOR_SUBS__CREATOR_APPLICATIONS__COOLDOWN_HOURS",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    fn load_with(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        clear_env();
        for (key, value) in vars {
            env::set_var(key, value);
        }
        let result = AppConfig::load();
        clear_env();
        result
    }

    #[test]
    fn test_empty_environment_uses_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[]).unwrap();

        assert_eq!(config.server.port, 8080);
        assert!(!config.database.is_configured());
        assert_eq!(config.billing.max_write_attempts, 3);
        assert_eq!(config.creator_applications.support_threshold, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_nested_values_are_read() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[
            ("CREATOR_SUBS__DATABASE__URL", "postgresql://test@localhost/test"),
            ("CREATOR_SUBS__SERVER__PORT", "3000"),
            ("CREATOR_SUBS__BILLING__MESSAGING_ACCESS_PERIOD_DAYS", "7"),
            ("CREATOR_SUBS__BILLING__MAX_WRITE_ATTEMPTS", "5"),
            ("CREATOR_SUBS__NOTIFICATIONS__ENDPOINT", "http://notify.local/api"),
            ("CREATOR_SUBS__CREATOR_APPLICATIONS__COOLDOWN_HOURS", "48"),
        ])
        .unwrap();

        assert_eq!(config.database.url, "postgresql://test@localhost/test");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.notifications.endpoint(), Some("http://notify.local/api"));
        assert_eq!(
            config.creator_applications.policy().cooldown,
            chrono::Duration::hours(48)
        );

        let settings = config.apply_payment_settings();
        assert_eq!(settings.max_write_attempts, 5);
        assert_eq!(
            settings.periods.duration_for(SubscriptionKind::MessagingAccess),
            chrono::Duration::days(7)
        );
    }

    #[test]
    fn test_production_requires_database() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[("CREATOR_SUBS__SERVER__ENVIRONMENT", "production")]).unwrap();

        assert!(config.is_production());
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("DATABASE__URL"))
        );
    }
}
