//! Creator application aggregate.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ApplicationId, StateMachine, Timestamp, UserId};

use super::{ApplicationStatus, CreatorApplicationError};

/// A user's request to become a creator.
///
/// Rejected applications are kept; they are the history the reapplication
/// lock is computed from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatorApplication {
    pub id: ApplicationId,
    pub user_id: UserId,
    pub status: ApplicationStatus,
    pub submitted_at: Timestamp,
    pub reviewed_at: Option<Timestamp>,
    pub rejection_reason: Option<String>,
}

impl CreatorApplication {
    /// Creates a pending application.
    pub fn submit(id: ApplicationId, user_id: UserId, now: Timestamp) -> Self {
        Self {
            id,
            user_id,
            status: ApplicationStatus::Pending,
            submitted_at: now,
            reviewed_at: None,
            rejection_reason: None,
        }
    }

    /// Rejects a pending application.
    pub fn reject(
        &mut self,
        reason: Option<String>,
        now: Timestamp,
    ) -> Result<(), CreatorApplicationError> {
        self.review(ApplicationStatus::Rejected, now)?;
        self.rejection_reason = reason;
        Ok(())
    }

    /// Approves a pending application.
    pub fn approve(&mut self, now: Timestamp) -> Result<(), CreatorApplicationError> {
        self.review(ApplicationStatus::Approved, now)
    }

    fn review(
        &mut self,
        target: ApplicationStatus,
        now: Timestamp,
    ) -> Result<(), CreatorApplicationError> {
        self.status = self
            .status
            .transition_to(target)
            .map_err(|_| CreatorApplicationError::invalid_state(self.status, target))?;
        self.reviewed_at = Some(now);
        Ok(())
    }

    pub fn is_pending(&self) -> bool {
        self.status == ApplicationStatus::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending() -> CreatorApplication {
        CreatorApplication::submit(
            ApplicationId::new(),
            UserId::new("artist-1").unwrap(),
            Timestamp::epoch(),
        )
    }

    #[test]
    fn submit_creates_pending_application() {
        let app = pending();
        assert!(app.is_pending());
        assert_eq!(app.reviewed_at, None);
    }

    #[test]
    fn reject_records_reason_and_review_time() {
        let mut app = pending();
        let now = Timestamp::epoch().add_hours(2);
        app.reject(Some("portfolio incomplete".to_string()), now).unwrap();

        assert_eq!(app.status, ApplicationStatus::Rejected);
        assert_eq!(app.reviewed_at, Some(now));
        assert_eq!(app.rejection_reason.as_deref(), Some("portfolio incomplete"));
    }

    #[test]
    fn cannot_approve_rejected_application() {
        let mut app = pending();
        app.reject(None, Timestamp::epoch()).unwrap();

        let err = app.approve(Timestamp::epoch()).unwrap_err();
        assert!(matches!(err, CreatorApplicationError::InvalidState { .. }));
        assert_eq!(app.status, ApplicationStatus::Rejected);
    }
}
