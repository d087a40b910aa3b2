//! PostgreSQL implementation of the PaymentStore port.
//!
//! Each unit of work is one database transaction. The subscription row is
//! read with `FOR UPDATE` so concurrent payments for the same key serialize
//! on the row lock; first payments race on the unique key instead.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use crate::domain::foundation::{DomainError, SubscriptionId, UserId};
use crate::domain::ledger::LedgerEntry;
use crate::domain::stats::StatsDelta;
use crate::domain::subscription::{Subscription, SubscriptionKey};
use crate::ports::{PaymentStore, PaymentTransaction, StoreError};

use super::errors::store_error;
use super::rows::{
    count_to_db, transition_kind_to_string, LedgerEntryRow, SubscriptionRow, LEDGER_COLUMNS,
    SUBSCRIPTION_COLUMNS,
};

/// PostgreSQL-backed unit-of-work factory.
#[derive(Clone)]
pub struct PostgresPaymentStore {
    pool: PgPool,
}

impl PostgresPaymentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PaymentStore for PostgresPaymentStore {
    async fn begin(&self) -> Result<Box<dyn PaymentTransaction>, StoreError> {
        let tx = self.pool.begin().await.map_err(store_error)?;
        Ok(Box::new(PostgresPaymentTransaction { tx }))
    }
}

/// An open database transaction. Rolled back by sqlx when dropped.
pub struct PostgresPaymentTransaction {
    tx: Transaction<'static, Postgres>,
}

fn corrupt(err: DomainError) -> StoreError {
    StoreError::corrupt(err.message)
}

#[async_trait]
impl PaymentTransaction for PostgresPaymentTransaction {
    async fn find_ledger_entry(
        &mut self,
        provider_transaction_id: &str,
    ) -> Result<Option<LedgerEntry>, StoreError> {
        let row: Option<LedgerEntryRow> = sqlx::query_as(&format!(
            "SELECT {} FROM ledger_entries WHERE provider_transaction_id = $1",
            LEDGER_COLUMNS
        ))
        .bind(provider_transaction_id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(store_error)?;

        row.map(LedgerEntry::try_from).transpose().map_err(corrupt)
    }

    async fn find_subscription_for_update(
        &mut self,
        key: &SubscriptionKey,
    ) -> Result<Option<Subscription>, StoreError> {
        let row: Option<SubscriptionRow> = sqlx::query_as(&format!(
            r#"
            SELECT {} FROM subscriptions
            WHERE creator_id = $1 AND subscriber_id = $2 AND kind = $3
            FOR UPDATE
            "#,
            SUBSCRIPTION_COLUMNS
        ))
        .bind(key.creator_id.as_str())
        .bind(key.subscriber_id.as_str())
        .bind(key.kind.as_str())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(store_error)?;

        row.map(Subscription::try_from).transpose().map_err(corrupt)
    }

    async fn find_subscription(
        &mut self,
        id: SubscriptionId,
    ) -> Result<Option<Subscription>, StoreError> {
        let row: Option<SubscriptionRow> = sqlx::query_as(&format!(
            "SELECT {} FROM subscriptions WHERE id = $1",
            SUBSCRIPTION_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(store_error)?;

        row.map(Subscription::try_from).transpose().map_err(corrupt)
    }

    async fn insert_subscription(&mut self, subscription: &Subscription) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO subscriptions (
                id, creator_id, subscriber_id, kind, status, start_date, end_date,
                amount_paid, currency, renewal_count, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(subscription.id.as_uuid())
        .bind(subscription.creator_id.as_str())
        .bind(subscription.subscriber_id.as_str())
        .bind(subscription.kind.as_str())
        .bind(subscription.status.as_str())
        .bind(subscription.start_date.as_datetime())
        .bind(subscription.end_date.as_datetime())
        .bind(subscription.amount_paid)
        .bind(&subscription.currency)
        .bind(count_to_db(subscription.renewal_count))
        .bind(subscription.created_at.as_datetime())
        .bind(subscription.updated_at.as_datetime())
        .execute(&mut *self.tx)
        .await
        .map_err(store_error)?;

        Ok(())
    }

    async fn update_subscription(&mut self, subscription: &Subscription) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE subscriptions SET
                status = $2,
                start_date = $3,
                end_date = $4,
                amount_paid = $5,
                currency = $6,
                renewal_count = $7,
                updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(subscription.id.as_uuid())
        .bind(subscription.status.as_str())
        .bind(subscription.start_date.as_datetime())
        .bind(subscription.end_date.as_datetime())
        .bind(subscription.amount_paid)
        .bind(&subscription.currency)
        .bind(count_to_db(subscription.renewal_count))
        .bind(subscription.updated_at.as_datetime())
        .execute(&mut *self.tx)
        .await
        .map_err(store_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::corrupt(format!(
                "subscription {} vanished while locked",
                subscription.id
            )));
        }

        Ok(())
    }

    async fn insert_ledger_entry(&mut self, entry: &LedgerEntry) -> Result<(), StoreError> {
        let applied = entry.applied.as_ref();

        sqlx::query(
            r#"
            INSERT INTO ledger_entries (
                id, subscription_id, subscriber_id, creator_id, amount, currency, status,
                provider, provider_transaction_id, payment_method, created_at,
                applied_action, applied_previous_end_date, applied_new_end_date,
                applied_renewal_count
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(entry.id.as_uuid())
        .bind(entry.subscription_id.as_uuid())
        .bind(entry.subscriber_id.as_str())
        .bind(entry.creator_id.as_str())
        .bind(entry.amount)
        .bind(&entry.currency)
        .bind(entry.status.as_str())
        .bind(&entry.provider)
        .bind(&entry.provider_transaction_id)
        .bind(&entry.payment_method)
        .bind(entry.created_at.as_datetime())
        .bind(applied.map(|a| transition_kind_to_string(a.kind)))
        .bind(applied.and_then(|a| a.previous_end_date).map(|t| *t.as_datetime()))
        .bind(applied.map(|a| *a.new_end_date.as_datetime()))
        .bind(applied.map(|a| count_to_db(a.renewal_count)))
        .execute(&mut *self.tx)
        .await
        .map_err(store_error)?;

        Ok(())
    }

    async fn apply_stats_delta(
        &mut self,
        creator_id: &UserId,
        delta: StatsDelta,
    ) -> Result<(), StoreError> {
        if delta.is_zero() {
            return Ok(());
        }

        sqlx::query(
            r#"
            INSERT INTO creator_stats (creator_id, subscribers_count, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (creator_id) DO UPDATE SET
                subscribers_count = creator_stats.subscribers_count + EXCLUDED.subscribers_count,
                updated_at = NOW()
            "#,
        )
        .bind(creator_id.as_str())
        .bind(delta.subscribers_count)
        .execute(&mut *self.tx)
        .await
        .map_err(store_error)?;

        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        self.tx.commit().await.map_err(store_error)
    }
}
