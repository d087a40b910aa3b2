//! Subscription reader port (read side).

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, SubscriptionId};
use crate::domain::subscription::{Subscription, SubscriptionKey};

#[async_trait]
pub trait SubscriptionReader: Send + Sync {
    async fn get_by_id(&self, id: SubscriptionId) -> Result<Option<Subscription>, DomainError>;

    async fn find_by_key(&self, key: &SubscriptionKey)
        -> Result<Option<Subscription>, DomainError>;
}
