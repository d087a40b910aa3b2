//! Creator application repository port.
//!
//! Rejected applications are never deleted: the reapplication lock is
//! computed from them on every decision.

use async_trait::async_trait;

use crate::domain::creator_application::CreatorApplication;
use crate::domain::foundation::{ApplicationId, DomainError, Timestamp, UserId};

#[async_trait]
pub trait CreatorApplicationRepository: Send + Sync {
    /// Persists a new application.
    ///
    /// Fails with `ErrorCode::ApplicationPending` when the application is
    /// pending and the user already has one awaiting review.
    async fn save(&self, application: &CreatorApplication) -> Result<(), DomainError>;

    /// Records the review of an application.
    ///
    /// The write only lands while the stored application is still pending;
    /// otherwise it fails with `ErrorCode::ApplicationAlreadyReviewed`.
    /// Fails with `ErrorCode::ApplicationNotFound` for unknown ids.
    async fn update(&self, application: &CreatorApplication) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: ApplicationId)
        -> Result<Option<CreatorApplication>, DomainError>;

    /// The user's application awaiting review, if any.
    async fn find_pending_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<CreatorApplication>, DomainError>;

    /// Review times of every rejected application for the user.
    async fn rejection_history(&self, user_id: &UserId) -> Result<Vec<Timestamp>, DomainError>;
}
