//! In-memory payment store for tests and local development.
//!
//! A transaction holds the store-wide lock from `begin` until it is
//! committed or dropped, so units of work are fully serialized. Writes go to
//! a staged copy of the state and replace the shared state only on commit.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::foundation::{DomainError, SubscriptionId, UserId};
use crate::domain::ledger::LedgerEntry;
use crate::domain::stats::{CreatorStats, StatsDelta};
use crate::domain::subscription::{Subscription, SubscriptionKey};
use crate::ports::{
    CreatorStatsReader, LedgerReader, PaymentStore, PaymentTransaction, StoreError,
    SubscriptionReader, UniqueConstraint,
};

#[derive(Debug, Clone, Default)]
struct StoreState {
    subscriptions: HashMap<SubscriptionId, Subscription>,
    subscription_keys: HashMap<SubscriptionKey, SubscriptionId>,
    /// Insertion order doubles as the audit order.
    ledger: Vec<LedgerEntry>,
    ledger_by_provider_tx: HashMap<String, usize>,
    subscribers_count: HashMap<UserId, i64>,
}

impl StoreState {
    fn ledger_entry(&self, provider_transaction_id: &str) -> Option<&LedgerEntry> {
        self.ledger_by_provider_tx
            .get(provider_transaction_id)
            .and_then(|idx| self.ledger.get(*idx))
    }

    fn subscription_by_key(&self, key: &SubscriptionKey) -> Option<&Subscription> {
        self.subscription_keys
            .get(key)
            .and_then(|id| self.subscriptions.get(id))
    }
}

/// Fault injection shared between the store and its transactions.
#[derive(Debug, Default)]
struct Faults {
    unavailable: bool,
    commit_failures: VecDeque<StoreError>,
}

/// Serializable in-memory implementation of the payment store and its readers.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPaymentStore {
    state: Arc<Mutex<StoreState>>,
    faults: Arc<StdMutex<Faults>>,
}

impl InMemoryPaymentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes a subscription directly, bypassing the payment path.
    ///
    /// Used to set up pre-existing subscriptions.
    pub async fn seed_subscription(&self, subscription: Subscription) {
        let mut state = self.state.lock().await;
        state
            .subscription_keys
            .insert(subscription.key(), subscription.id);
        state.subscriptions.insert(subscription.id, subscription);
    }

    /// Makes `begin` fail with `Unavailable` until cleared.
    pub fn set_unavailable(&self, unavailable: bool) {
        if let Ok(mut faults) = self.faults.lock() {
            faults.unavailable = unavailable;
        }
    }

    /// Makes the next commit fail with `error`, rolling its writes back.
    pub fn fail_next_commit(&self, error: StoreError) {
        if let Ok(mut faults) = self.faults.lock() {
            faults.commit_failures.push_back(error);
        }
    }

    /// Number of committed ledger entries.
    pub async fn ledger_len(&self) -> usize {
        self.state.lock().await.ledger.len()
    }

    /// Number of committed subscriptions.
    pub async fn subscription_count(&self) -> usize {
        self.state.lock().await.subscriptions.len()
    }

    fn is_unavailable(&self) -> bool {
        self.faults.lock().map(|f| f.unavailable).unwrap_or(false)
    }

    fn take_commit_failure(faults: &StdMutex<Faults>) -> Option<StoreError> {
        faults
            .lock()
            .ok()
            .and_then(|mut f| f.commit_failures.pop_front())
    }
}

#[async_trait]
impl PaymentStore for InMemoryPaymentStore {
    async fn begin(&self) -> Result<Box<dyn PaymentTransaction>, StoreError> {
        if self.is_unavailable() {
            return Err(StoreError::unavailable("in-memory store marked unavailable"));
        }
        let guard = Arc::clone(&self.state).lock_owned().await;
        let staged = guard.clone();
        Ok(Box::new(InMemoryPaymentTransaction {
            guard,
            staged,
            faults: Arc::clone(&self.faults),
        }))
    }
}

/// Open unit of work over the in-memory state.
pub struct InMemoryPaymentTransaction {
    guard: OwnedMutexGuard<StoreState>,
    staged: StoreState,
    faults: Arc<StdMutex<Faults>>,
}

#[async_trait]
impl PaymentTransaction for InMemoryPaymentTransaction {
    async fn find_ledger_entry(
        &mut self,
        provider_transaction_id: &str,
    ) -> Result<Option<LedgerEntry>, StoreError> {
        Ok(self.staged.ledger_entry(provider_transaction_id).cloned())
    }

    async fn find_subscription_for_update(
        &mut self,
        key: &SubscriptionKey,
    ) -> Result<Option<Subscription>, StoreError> {
        Ok(self.staged.subscription_by_key(key).cloned())
    }

    async fn find_subscription(
        &mut self,
        id: SubscriptionId,
    ) -> Result<Option<Subscription>, StoreError> {
        Ok(self.staged.subscriptions.get(&id).cloned())
    }

    async fn insert_subscription(&mut self, subscription: &Subscription) -> Result<(), StoreError> {
        let key = subscription.key();
        if self.staged.subscription_keys.contains_key(&key) {
            return Err(StoreError::ConstraintViolation(UniqueConstraint::SubscriptionKey));
        }
        self.staged.subscription_keys.insert(key, subscription.id);
        self.staged
            .subscriptions
            .insert(subscription.id, subscription.clone());
        Ok(())
    }

    async fn update_subscription(&mut self, subscription: &Subscription) -> Result<(), StoreError> {
        match self.staged.subscriptions.get_mut(&subscription.id) {
            Some(existing) => {
                *existing = subscription.clone();
                Ok(())
            }
            None => Err(StoreError::corrupt(format!(
                "update of unknown subscription {}",
                subscription.id
            ))),
        }
    }

    async fn insert_ledger_entry(&mut self, entry: &LedgerEntry) -> Result<(), StoreError> {
        if self
            .staged
            .ledger_by_provider_tx
            .contains_key(&entry.provider_transaction_id)
        {
            return Err(StoreError::ConstraintViolation(
                UniqueConstraint::LedgerProviderTransaction,
            ));
        }
        let idx = self.staged.ledger.len();
        self.staged.ledger.push(entry.clone());
        self.staged
            .ledger_by_provider_tx
            .insert(entry.provider_transaction_id.clone(), idx);
        Ok(())
    }

    async fn apply_stats_delta(
        &mut self,
        creator_id: &UserId,
        delta: StatsDelta,
    ) -> Result<(), StoreError> {
        *self
            .staged
            .subscribers_count
            .entry(creator_id.clone())
            .or_insert(0) += delta.subscribers_count;
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let InMemoryPaymentTransaction {
            mut guard,
            staged,
            faults,
        } = *self;
        if let Some(err) = InMemoryPaymentStore::take_commit_failure(&faults) {
            return Err(err);
        }
        *guard = staged;
        Ok(())
    }
}

#[async_trait]
impl LedgerReader for InMemoryPaymentStore {
    async fn find_by_provider_transaction_id(
        &self,
        provider_transaction_id: &str,
    ) -> Result<Option<LedgerEntry>, DomainError> {
        let state = self.state.lock().await;
        Ok(state.ledger_entry(provider_transaction_id).cloned())
    }

    async fn list_by_subscription(
        &self,
        subscription_id: SubscriptionId,
    ) -> Result<Vec<LedgerEntry>, DomainError> {
        let state = self.state.lock().await;
        Ok(state
            .ledger
            .iter()
            .filter(|e| e.subscription_id == subscription_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl SubscriptionReader for InMemoryPaymentStore {
    async fn get_by_id(&self, id: SubscriptionId) -> Result<Option<Subscription>, DomainError> {
        Ok(self.state.lock().await.subscriptions.get(&id).cloned())
    }

    async fn find_by_key(
        &self,
        key: &SubscriptionKey,
    ) -> Result<Option<Subscription>, DomainError> {
        Ok(self.state.lock().await.subscription_by_key(key).cloned())
    }
}

#[async_trait]
impl CreatorStatsReader for InMemoryPaymentStore {
    async fn get_stats(&self, creator_id: &UserId) -> Result<CreatorStats, DomainError> {
        let state = self.state.lock().await;
        Ok(CreatorStats {
            creator_id: creator_id.clone(),
            subscribers_count: state
                .subscribers_count
                .get(creator_id)
                .copied()
                .unwrap_or(0),
        })
    }
}
