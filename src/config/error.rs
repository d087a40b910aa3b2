//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid listen address: {0}")]
    InvalidAddress(String),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Pool min_connections exceeds max_connections")]
    InvalidPoolSize,

    #[error("Pool size exceeds maximum allowed (100)")]
    PoolSizeTooLarge,

    #[error("Billing period for {0} must be between 1 and 3650 days")]
    InvalidBillingPeriod(&'static str),

    #[error("max_write_attempts must be between 1 and 10")]
    InvalidWriteAttempts,

    #[error("Notification endpoint must be an http(s) URL")]
    InvalidNotificationEndpoint,

    #[error("Notification timeout must be between 1 and 60 seconds")]
    InvalidNotificationTimeout,

    #[error("support_threshold must be greater than 2")]
    InvalidSupportThreshold,

    #[error("Reapplication cooldown must be positive")]
    InvalidCooldown,
}
