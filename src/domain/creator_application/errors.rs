//! Creator application errors.

use thiserror::Error;

use crate::domain::foundation::{ApplicationId, DomainError, ErrorCode, Timestamp, UserId};

use super::ApplicationStatus;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreatorApplicationError {
    #[error("Creator application not found: {0}")]
    NotFound(ApplicationId),

    #[error("Reapplication is locked until {}", .allowed_at.to_rfc3339())]
    ReapplicationLocked { allowed_at: Timestamp },

    #[error("Reapplication after {rejection_count} rejections requires support")]
    RequiresSupport { rejection_count: u32 },

    #[error("Application {0} is already awaiting review")]
    AlreadyPending(ApplicationId),

    /// Another reviewer decided the application first.
    #[error("Application {0} has already been reviewed")]
    AlreadyReviewed(ApplicationId),

    #[error("User {0} is already a creator")]
    AlreadyCreator(UserId),

    #[error("Cannot move application from {current} to {attempted}")]
    InvalidState {
        current: ApplicationStatus,
        attempted: ApplicationStatus,
    },

    #[error("Error: {0}")]
    Infrastructure(String),
}

impl CreatorApplicationError {
    pub fn invalid_state(current: ApplicationStatus, attempted: ApplicationStatus) -> Self {
        CreatorApplicationError::InvalidState { current, attempted }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        CreatorApplicationError::Infrastructure(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            CreatorApplicationError::NotFound(_) => ErrorCode::ApplicationNotFound,
            CreatorApplicationError::ReapplicationLocked { .. } => ErrorCode::ReapplicationLocked,
            CreatorApplicationError::RequiresSupport { .. } => ErrorCode::RequiresSupport,
            CreatorApplicationError::AlreadyPending(_) => ErrorCode::ApplicationPending,
            CreatorApplicationError::AlreadyReviewed(_) => ErrorCode::ApplicationAlreadyReviewed,
            CreatorApplicationError::AlreadyCreator(_) => ErrorCode::AlreadyCreator,
            CreatorApplicationError::InvalidState { .. } => ErrorCode::InvalidStateTransition,
            CreatorApplicationError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, CreatorApplicationError::Infrastructure(_))
    }
}

impl From<DomainError> for CreatorApplicationError {
    fn from(err: DomainError) -> Self {
        CreatorApplicationError::Infrastructure(err.to_string())
    }
}

impl From<CreatorApplicationError> for DomainError {
    fn from(err: CreatorApplicationError) -> Self {
        DomainError::new(err.code(), err.to_string())
    }
}
