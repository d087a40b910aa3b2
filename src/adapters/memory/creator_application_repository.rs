//! In-memory creator application repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::creator_application::{ApplicationStatus, CreatorApplication};
use crate::domain::foundation::{ApplicationId, DomainError, ErrorCode, Timestamp, UserId};
use crate::ports::CreatorApplicationRepository;

#[derive(Debug, Clone, Default)]
pub struct InMemoryCreatorApplicationRepository {
    applications: Arc<RwLock<HashMap<ApplicationId, CreatorApplication>>>,
}

impl InMemoryCreatorApplicationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CreatorApplicationRepository for InMemoryCreatorApplicationRepository {
    async fn save(&self, application: &CreatorApplication) -> Result<(), DomainError> {
        let mut apps = self.applications.write().await;
        if apps.contains_key(&application.id) {
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                format!("Creator application {} already exists", application.id),
            ));
        }
        if application.is_pending() {
            if let Some(pending) = apps
                .values()
                .find(|a| a.user_id == application.user_id && a.is_pending())
            {
                return Err(DomainError::new(
                    ErrorCode::ApplicationPending,
                    "User already has a pending application",
                )
                .with_detail("application_id", pending.id.to_string()));
            }
        }
        apps.insert(application.id, application.clone());
        Ok(())
    }

    async fn update(&self, application: &CreatorApplication) -> Result<(), DomainError> {
        let mut apps = self.applications.write().await;
        match apps.get_mut(&application.id) {
            Some(existing) if !existing.is_pending() => Err(DomainError::new(
                ErrorCode::ApplicationAlreadyReviewed,
                format!("Creator application {} has already been reviewed", application.id),
            )),
            Some(existing) => {
                *existing = application.clone();
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::ApplicationNotFound,
                format!("Creator application not found: {}", application.id),
            )),
        }
    }

    async fn find_by_id(
        &self,
        id: ApplicationId,
    ) -> Result<Option<CreatorApplication>, DomainError> {
        Ok(self.applications.read().await.get(&id).cloned())
    }

    async fn find_pending_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<CreatorApplication>, DomainError> {
        Ok(self
            .applications
            .read()
            .await
            .values()
            .find(|a| &a.user_id == user_id && a.is_pending())
            .cloned())
    }

    async fn rejection_history(&self, user_id: &UserId) -> Result<Vec<Timestamp>, DomainError> {
        let apps = self.applications.read().await;
        let mut history: Vec<Timestamp> = apps
            .values()
            .filter(|a| &a.user_id == user_id && a.status == ApplicationStatus::Rejected)
            .filter_map(|a| a.reviewed_at)
            .collect();
        history.sort();
        Ok(history)
    }
}
