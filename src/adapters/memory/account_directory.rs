//! In-memory account directory.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::account::AccountKind;
use crate::domain::foundation::{DomainError, UserId};
use crate::ports::AccountDirectory;

#[derive(Debug, Clone, Default)]
pub struct InMemoryAccountDirectory {
    accounts: Arc<RwLock<HashMap<UserId, AccountKind>>>,
}

impl InMemoryAccountDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory pre-populated with creator accounts.
    pub fn with_creators<I>(creators: I) -> Self
    where
        I: IntoIterator<Item = UserId>,
    {
        let accounts = creators
            .into_iter()
            .map(|id| (id, AccountKind::Creator))
            .collect();
        Self {
            accounts: Arc::new(RwLock::new(accounts)),
        }
    }

    pub async fn insert(&self, user_id: UserId, kind: AccountKind) {
        self.accounts.write().await.insert(user_id, kind);
    }
}

#[async_trait]
impl AccountDirectory for InMemoryAccountDirectory {
    async fn account_kind(&self, user_id: &UserId) -> Result<Option<AccountKind>, DomainError> {
        Ok(self.accounts.read().await.get(user_id).copied())
    }

    async fn promote_to_creator(&self, user_id: &UserId) -> Result<(), DomainError> {
        self.accounts
            .write()
            .await
            .insert(user_id.clone(), AccountKind::Creator);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unknown_user_has_no_kind() {
        let dir = InMemoryAccountDirectory::new();
        let kind = dir.account_kind(&UserId::new("ghost").unwrap()).await.unwrap();
        assert_eq!(kind, None);
    }

    #[tokio::test]
    async fn promotion_turns_member_into_creator() {
        let user = UserId::new("artist-1").unwrap();
        let dir = InMemoryAccountDirectory::new();
        dir.insert(user.clone(), AccountKind::Member).await;

        dir.promote_to_creator(&user).await.unwrap();

        assert_eq!(dir.account_kind(&user).await.unwrap(), Some(AccountKind::Creator));
    }
}
