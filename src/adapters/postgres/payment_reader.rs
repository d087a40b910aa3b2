//! PostgreSQL read side for subscriptions, the ledger and creator stats.
//!
//! Reads go straight to the pool and only ever see committed state.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, SubscriptionId, UserId};
use crate::domain::ledger::LedgerEntry;
use crate::domain::stats::CreatorStats;
use crate::domain::subscription::{Subscription, SubscriptionKey};
use crate::ports::{CreatorStatsReader, LedgerReader, SubscriptionReader};

use super::errors::database_error;
use super::rows::{LedgerEntryRow, SubscriptionRow, LEDGER_COLUMNS, SUBSCRIPTION_COLUMNS};

/// PostgreSQL implementation of the payment read ports.
#[derive(Clone)]
pub struct PostgresPaymentReader {
    pool: PgPool,
}

impl PostgresPaymentReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LedgerReader for PostgresPaymentReader {
    async fn find_by_provider_transaction_id(
        &self,
        provider_transaction_id: &str,
    ) -> Result<Option<LedgerEntry>, DomainError> {
        let row: Option<LedgerEntryRow> = sqlx::query_as(&format!(
            "SELECT {} FROM ledger_entries WHERE provider_transaction_id = $1",
            LEDGER_COLUMNS
        ))
        .bind(provider_transaction_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| database_error("Failed to fetch ledger entry", e))?;

        row.map(LedgerEntry::try_from).transpose()
    }

    async fn list_by_subscription(
        &self,
        subscription_id: SubscriptionId,
    ) -> Result<Vec<LedgerEntry>, DomainError> {
        let rows: Vec<LedgerEntryRow> = sqlx::query_as(&format!(
            "SELECT {} FROM ledger_entries WHERE subscription_id = $1 ORDER BY created_at ASC",
            LEDGER_COLUMNS
        ))
        .bind(subscription_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| database_error("Failed to list ledger entries", e))?;

        rows.into_iter().map(LedgerEntry::try_from).collect()
    }
}

#[async_trait]
impl SubscriptionReader for PostgresPaymentReader {
    async fn get_by_id(&self, id: SubscriptionId) -> Result<Option<Subscription>, DomainError> {
        let row: Option<SubscriptionRow> = sqlx::query_as(&format!(
            "SELECT {} FROM subscriptions WHERE id = $1",
            SUBSCRIPTION_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| database_error("Failed to fetch subscription", e))?;

        row.map(Subscription::try_from).transpose()
    }

    async fn find_by_key(
        &self,
        key: &SubscriptionKey,
    ) -> Result<Option<Subscription>, DomainError> {
        let row: Option<SubscriptionRow> = sqlx::query_as(&format!(
            r#"
            SELECT {} FROM subscriptions
            WHERE creator_id = $1 AND subscriber_id = $2 AND kind = $3
            "#,
            SUBSCRIPTION_COLUMNS
        ))
        .bind(key.creator_id.as_str())
        .bind(key.subscriber_id.as_str())
        .bind(key.kind.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| database_error("Failed to fetch subscription", e))?;

        row.map(Subscription::try_from).transpose()
    }
}

#[async_trait]
impl CreatorStatsReader for PostgresPaymentReader {
    async fn get_stats(&self, creator_id: &UserId) -> Result<CreatorStats, DomainError> {
        let count: Option<i64> =
            sqlx::query_scalar("SELECT subscribers_count FROM creator_stats WHERE creator_id = $1")
                .bind(creator_id.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| database_error("Failed to fetch creator stats", e))?;

        Ok(CreatorStats {
            creator_id: creator_id.clone(),
            subscribers_count: count.unwrap_or(0),
        })
    }
}
