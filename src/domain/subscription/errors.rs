//! Payment application errors.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | InvalidTarget | 422 |
//! | ValidationFailed | 400 |
//! | SubscriptionNotFound / TransactionNotFound | 404 |
//! | InvalidState | 409 |
//! | StoreUnavailable / TransientWriteFailure | 503 |
//! | Internal | 500 |

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, SubscriptionId, UserId, ValidationError};

/// Errors returned by the payment path and its lookups.
///
/// A replayed confirmation is not an error; it is reported through
/// `PaymentOutcome::already_processed`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentError {
    #[error("User {0} is not a creator and cannot receive subscription payments")]
    InvalidTarget(UserId),

    #[error("Validation failed for '{field}': {message}")]
    ValidationFailed { field: String, message: String },

    #[error("Subscription not found: {0}")]
    SubscriptionNotFound(SubscriptionId),

    #[error("No transaction recorded for provider transaction id '{0}'")]
    TransactionNotFound(String),

    #[error("Invalid subscription state: {0}")]
    InvalidState(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Write failed after {attempts} attempt(s): {reason}")]
    TransientWriteFailure { attempts: u32, reason: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PaymentError {
    pub fn invalid_target(creator_id: UserId) -> Self {
        PaymentError::InvalidTarget(creator_id)
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        PaymentError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn store_unavailable(message: impl Into<String>) -> Self {
        PaymentError::StoreUnavailable(message.into())
    }

    pub fn transient(attempts: u32, reason: impl Into<String>) -> Self {
        PaymentError::TransientWriteFailure {
            attempts,
            reason: reason.into(),
        }
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            PaymentError::InvalidTarget(_) => ErrorCode::InvalidTarget,
            PaymentError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            PaymentError::SubscriptionNotFound(_) => ErrorCode::SubscriptionNotFound,
            PaymentError::TransactionNotFound(_) => ErrorCode::TransactionNotFound,
            PaymentError::InvalidState(_) => ErrorCode::InvalidStateTransition,
            PaymentError::StoreUnavailable(_) => ErrorCode::StoreUnavailable,
            PaymentError::TransientWriteFailure { .. } => ErrorCode::TransientWriteFailure,
            PaymentError::Internal(_) => ErrorCode::InternalError,
        }
    }

    /// Returns a user-facing message.
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// True if the caller may safely repeat the whole call.
    ///
    /// Store failures leave no partial state, so blind retries are safe.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PaymentError::StoreUnavailable(_) | PaymentError::TransientWriteFailure { .. }
        )
    }
}

impl From<ValidationError> for PaymentError {
    fn from(err: ValidationError) -> Self {
        PaymentError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<DomainError> for PaymentError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed => PaymentError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            ErrorCode::InvalidStateTransition => PaymentError::InvalidState(err.message),
            ErrorCode::StoreUnavailable | ErrorCode::DatabaseError => {
                PaymentError::StoreUnavailable(err.message)
            }
            _ => PaymentError::Internal(err.to_string()),
        }
    }
}

impl From<PaymentError> for DomainError {
    fn from(err: PaymentError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}
