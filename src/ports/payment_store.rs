//! PaymentStore port - the atomic unit of work behind payment application.
//!
//! Subscription, ledger and creator-stats writes for one payment happen
//! inside a single `PaymentTransaction`. Nothing is visible to other readers
//! until `commit`; dropping the handle without committing rolls everything
//! back.
//!
//! ```ignore
//! let mut tx = store.begin().await?;
//! if tx.find_ledger_entry("pi_123").await?.is_none() {
//!     tx.insert_subscription(&subscription).await?;
//!     tx.insert_ledger_entry(&entry).await?;
//!     tx.apply_stats_delta(&creator_id, delta).await?;
//! }
//! tx.commit().await?;
//! ```

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, SubscriptionId, UserId};
use crate::domain::ledger::LedgerEntry;
use crate::domain::stats::StatsDelta;
use crate::domain::subscription::{PaymentError, Subscription, SubscriptionKey};

/// Uniqueness rules the store enforces itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniqueConstraint {
    /// One ledger entry per provider transaction id.
    LedgerProviderTransaction,
    /// One subscription per (creator, subscriber, kind).
    SubscriptionKey,
}

impl UniqueConstraint {
    /// Name of the backing database constraint.
    pub fn name(&self) -> &'static str {
        match self {
            UniqueConstraint::LedgerProviderTransaction => {
                "ledger_entries_provider_transaction_id_key"
            }
            UniqueConstraint::SubscriptionKey => "subscriptions_creator_subscriber_kind_key",
        }
    }

    /// Resolves a database constraint name.
    pub fn from_name(name: &str) -> Option<Self> {
        [
            UniqueConstraint::LedgerProviderTransaction,
            UniqueConstraint::SubscriptionKey,
        ]
        .into_iter()
        .find(|c| c.name() == name)
    }
}

/// Failures reported by store implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("unique constraint violated: {}", .0.name())]
    ConstraintViolation(UniqueConstraint),

    /// Serialization failure or deadlock; the unit of work may be retried.
    #[error("transaction conflict: {0}")]
    Conflict(String),

    #[error("corrupt record: {0}")]
    Corrupt(String),
}

impl StoreError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        StoreError::Unavailable(message.into())
    }

    pub fn corrupt(message: impl Into<String>) -> Self {
        StoreError::Corrupt(message.into())
    }
}

impl From<StoreError> for PaymentError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(msg) => PaymentError::StoreUnavailable(msg),
            StoreError::ConstraintViolation(_) | StoreError::Conflict(_) => {
                PaymentError::transient(1, err.to_string())
            }
            StoreError::Corrupt(msg) => PaymentError::Internal(msg),
        }
    }
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        let code = match err {
            StoreError::Unavailable(_) => ErrorCode::StoreUnavailable,
            StoreError::ConstraintViolation(_) | StoreError::Conflict(_) => {
                ErrorCode::TransientWriteFailure
            }
            StoreError::Corrupt(_) => ErrorCode::InternalError,
        };
        DomainError::new(code, err.to_string())
    }
}

/// An open unit of work.
///
/// Reads observe this transaction's own writes. Dropping without `commit`
/// discards every write.
#[async_trait]
pub trait PaymentTransaction: Send {
    /// Looks up a ledger entry by its idempotency key.
    async fn find_ledger_entry(
        &mut self,
        provider_transaction_id: &str,
    ) -> Result<Option<LedgerEntry>, StoreError>;

    /// Loads the subscription for a key, locking it until commit.
    async fn find_subscription_for_update(
        &mut self,
        key: &SubscriptionKey,
    ) -> Result<Option<Subscription>, StoreError>;

    /// Loads a subscription by id.
    async fn find_subscription(
        &mut self,
        id: SubscriptionId,
    ) -> Result<Option<Subscription>, StoreError>;

    /// Inserts a new subscription.
    ///
    /// Fails with `ConstraintViolation(SubscriptionKey)` if the key is taken.
    async fn insert_subscription(&mut self, subscription: &Subscription) -> Result<(), StoreError>;

    /// Overwrites an existing subscription.
    async fn update_subscription(&mut self, subscription: &Subscription) -> Result<(), StoreError>;

    /// Inserts a ledger entry.
    ///
    /// Fails with `ConstraintViolation(LedgerProviderTransaction)` if the
    /// provider transaction id was already recorded.
    async fn insert_ledger_entry(&mut self, entry: &LedgerEntry) -> Result<(), StoreError>;

    /// Adds a delta to a creator's counters, creating them at zero if absent.
    async fn apply_stats_delta(
        &mut self,
        creator_id: &UserId,
        delta: StatsDelta,
    ) -> Result<(), StoreError>;

    /// Makes every write visible atomically.
    async fn commit(self: Box<Self>) -> Result<(), StoreError>;
}

/// Factory for units of work.
#[async_trait]
pub trait PaymentStore: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn PaymentTransaction>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn PaymentStore) {}
        fn _accepts_tx(_tx: Box<dyn PaymentTransaction>) {}
    }

    #[test]
    fn constraint_names_round_trip() {
        for c in [
            UniqueConstraint::LedgerProviderTransaction,
            UniqueConstraint::SubscriptionKey,
        ] {
            assert_eq!(UniqueConstraint::from_name(c.name()), Some(c));
        }
        assert_eq!(UniqueConstraint::from_name("accounts_pkey"), None);
    }

    #[test]
    fn store_errors_map_to_retryable_payment_errors() {
        let unavailable: PaymentError = StoreError::unavailable("pool timed out").into();
        assert!(matches!(unavailable, PaymentError::StoreUnavailable(_)));
        assert!(unavailable.is_retryable());

        let conflict: PaymentError = StoreError::Conflict("40001".to_string()).into();
        assert!(conflict.is_retryable());

        let corrupt: PaymentError = StoreError::corrupt("bad kind").into();
        assert!(!corrupt.is_retryable());
    }
}
