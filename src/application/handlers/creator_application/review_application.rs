//! Review handlers - approving or rejecting a pending creator application.

use std::sync::Arc;

use crate::domain::creator_application::{
    ApplicationStatus, CreatorApplication, CreatorApplicationError, ReapplicationDecision,
    ReapplicationPolicy,
};
use crate::domain::foundation::{ApplicationId, ErrorCode};
use crate::ports::{AccountDirectory, Clock, CreatorApplicationRepository};

#[derive(Debug, Clone)]
pub struct RejectCreatorApplicationCommand {
    pub application_id: ApplicationId,
    pub reason: Option<String>,
}

/// The rejected application and the applicant's lock after this rejection.
#[derive(Debug, Clone)]
pub struct RejectCreatorApplicationResult {
    pub application: CreatorApplication,
    pub reapplication: ReapplicationDecision,
}

pub struct RejectCreatorApplicationHandler {
    repository: Arc<dyn CreatorApplicationRepository>,
    clock: Arc<dyn Clock>,
    policy: ReapplicationPolicy,
}

impl RejectCreatorApplicationHandler {
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
        cmd: RejectCreatorApplicationCommand,
    ) -> Result<RejectCreatorApplicationResult, CreatorApplicationError> {
        let mut application = find(self.repository.as_ref(), cmd.application_id).await?;

        let now = self.clock.now();
        application.reject(cmd.reason, now)?;
        record_review(self.repository.as_ref(), &application).await?;

        let history = self
            .repository
            .rejection_history(&application.user_id)
            .await?;
        let reapplication = self.policy.evaluate(&history, now);

        tracing::info!(
            application_id = %application.id,
            user_id = %application.user_id,
            rejection_count = reapplication.rejection_count,
            "Creator application rejected"
        );

        Ok(RejectCreatorApplicationResult {
            application,
            reapplication,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ApproveCreatorApplicationCommand {
    pub application_id: ApplicationId,
}

pub type ApproveCreatorApplicationResult = CreatorApplication;

/// Approves an application and promotes the applicant to creator, which
/// makes them a valid payment target.
///
/// Approving an already approved application repeats the promotion, so a
/// promotion that failed after the review was recorded can be retried.
pub struct ApproveCreatorApplicationHandler {
    repository: Arc<dyn CreatorApplicationRepository>,
    accounts: Arc<dyn AccountDirectory>,
    clock: Arc<dyn Clock>,
}

impl ApproveCreatorApplicationHandler {
    pub fn new(
        repository: Arc<dyn CreatorApplicationRepository>,
        accounts: Arc<dyn AccountDirectory>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            accounts,
            clock,
        }
    }

    pub async fn handle(
        &self,
        cmd: ApproveCreatorApplicationCommand,
    ) -> Result<ApproveCreatorApplicationResult, CreatorApplicationError> {
        let mut application = find(self.repository.as_ref(), cmd.application_id).await?;

        if application.status != ApplicationStatus::Approved {
            application.approve(self.clock.now())?;
            record_review(self.repository.as_ref(), &application).await?;
        }
        self.accounts.promote_to_creator(&application.user_id).await?;

        tracing::info!(
            application_id = %application.id,
            user_id = %application.user_id,
            "Creator application approved"
        );

        Ok(application)
    }
}

/// Writes a review, failing if another reviewer got there first.
async fn record_review(
    repository: &dyn CreatorApplicationRepository,
    application: &CreatorApplication,
) -> Result<(), CreatorApplicationError> {
    repository.update(application).await.map_err(|err| match err.code {
        ErrorCode::ApplicationAlreadyReviewed => {
            CreatorApplicationError::AlreadyReviewed(application.id)
        }
        ErrorCode::ApplicationNotFound => CreatorApplicationError::NotFound(application.id),
        _ => err.into(),
    })
}

async fn find(
    repository: &dyn CreatorApplicationRepository,
    id: ApplicationId,
) -> Result<CreatorApplication, CreatorApplicationError> {
    repository
        .find_by_id(id)
        .await?
        .ok_or(CreatorApplicationError::NotFound(id))
}
