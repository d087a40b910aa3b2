//! SubmitCreatorApplicationHandler - Command handler for applying to become a creator.

use std::sync::Arc;

use crate::domain::creator_application::{
    CreatorApplication, CreatorApplicationError, ReapplicationLock, ReapplicationPolicy,
};
use crate::domain::foundation::{ApplicationId, ErrorCode, UserId};
use crate::ports::{AccountDirectory, Clock, CreatorApplicationRepository};

#[derive(Debug, Clone)]
pub struct SubmitCreatorApplicationCommand {
    pub user_id: UserId,
}

pub type SubmitCreatorApplicationResult = CreatorApplication;

pub struct SubmitCreatorApplicationHandler {
    repository: Arc<dyn CreatorApplicationRepository>,
    accounts: Arc<dyn AccountDirectory>,
    clock: Arc<dyn Clock>,
    policy: ReapplicationPolicy,
}

impl SubmitCreatorApplicationHandler {
    pub fn new(
        repository: Arc<dyn CreatorApplicationRepository>,
        accounts: Arc<dyn AccountDirectory>,
        clock: Arc<dyn Clock>,
        policy: ReapplicationPolicy,
    ) -> Self {
        Self {
            repository,
            accounts,
            clock,
            policy,
        }
    }

    pub async fn handle(
        &self,
        cmd: SubmitCreatorApplicationCommand,
    ) -> Result<SubmitCreatorApplicationResult, CreatorApplicationError> {
        // 1. Already a creator?
        let kind = self.accounts.account_kind(&cmd.user_id).await?;
        if kind.map(|k| k.is_creator()).unwrap_or(false) {
            return Err(CreatorApplicationError::AlreadyCreator(cmd.user_id));
        }

        // 2. One open application at a time
        if let Some(pending) = self.repository.find_pending_for_user(&cmd.user_id).await? {
            return Err(CreatorApplicationError::AlreadyPending(pending.id));
        }

        // 3. Reapplication lock from stored history
        let now = self.clock.now();
        let history = self.repository.rejection_history(&cmd.user_id).await?;
        let decision = self.policy.evaluate(&history, now);
        match decision.lock {
            ReapplicationLock::Eligible => {}
            ReapplicationLock::CoolingDown { allowed_at } => {
                return Err(CreatorApplicationError::ReapplicationLocked { allowed_at });
            }
            ReapplicationLock::RequiresSupport => {
                return Err(CreatorApplicationError::RequiresSupport {
                    rejection_count: decision.rejection_count,
                });
            }
        }

        // 4. Persist; the store rejects a pending application that raced in
        let application = CreatorApplication::submit(ApplicationId::new(), cmd.user_id, now);
        if let Err(err) = self.repository.save(&application).await {
            if err.code == ErrorCode::ApplicationPending {
                if let Some(pending) = self
                    .repository
                    .find_pending_for_user(&application.user_id)
                    .await?
                {
                    return Err(CreatorApplicationError::AlreadyPending(pending.id));
                }
            }
            return Err(err.into());
        }

        tracing::info!(
            application_id = %application.id,
            user_id = %application.user_id,
            prior_rejections = decision.rejection_count,
            "Creator application submitted"
        );

        Ok(application)
    }
}
