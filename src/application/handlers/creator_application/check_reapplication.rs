//! CheckReapplicationHandler - Query handler for reapplication eligibility.

use std::sync::Arc;

use crate::domain::creator_application::{
    CreatorApplicationError, ReapplicationDecision, ReapplicationPolicy,
};
use crate::domain::foundation::UserId;
use crate::ports::{Clock, CreatorApplicationRepository};

#[derive(Debug, Clone)]
pub struct CheckReapplicationQuery {
    pub user_id: UserId,
}

pub type CheckReapplicationResult = ReapplicationDecision;

/// Computes the lock from stored rejection history, never from
/// caller-supplied counts.
pub struct CheckReapplicationHandler {
    repository: Arc<dyn CreatorApplicationRepository>,
    clock: Arc<dyn Clock>,
    policy: ReapplicationPolicy,
}

impl CheckReapplicationHandler {
    pub fn new(
        repository: Arc<dyn CreatorApplicationRepository>,
        clock: Arc<dyn Clock>,
        policy: ReapplicationPolicy,
    ) -> Self {
        Self {
            repository,
            clock,
            policy,
        }
    }

    pub async fn handle(
        &self,
        query: CheckReapplicationQuery,
    ) -> Result<CheckReapplicationResult, CreatorApplicationError> {
        let history = self.repository.rejection_history(&query.user_id).await?;
        Ok(self.policy.evaluate(&history, self.clock.now()))
    }
}
