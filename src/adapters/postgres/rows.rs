//! Row types shared by the payment store and the read adapters.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::foundation::{DomainError, SubscriptionId, Timestamp, TransactionId, UserId};
use crate::domain::ledger::{AppliedTransition, LedgerEntry, LedgerStatus};
use crate::domain::subscription::{Subscription, TransitionKind};

use super::errors::invalid_column;

pub(crate) const SUBSCRIPTION_COLUMNS: &str = "id, creator_id, subscriber_id, kind, status, \
     start_date, end_date, amount_paid, currency, renewal_count, created_at, updated_at";

pub(crate) const LEDGER_COLUMNS: &str = "id, subscription_id, subscriber_id, creator_id, amount, \
     currency, status, provider, provider_transaction_id, payment_method, created_at, \
     applied_action, applied_previous_end_date, applied_new_end_date, applied_renewal_count";

/// Database row representation of a subscription.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct SubscriptionRow {
    id: Uuid,
    creator_id: String,
    subscriber_id: String,
    kind: String,
    status: String,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    amount_paid: i64,
    currency: String,
    renewal_count: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<SubscriptionRow> for Subscription {
    type Error = DomainError;

    fn try_from(row: SubscriptionRow) -> Result<Self, Self::Error> {
        Ok(Subscription {
            id: SubscriptionId::from_uuid(row.id),
            creator_id: parse_user_id("creator_id", row.creator_id)?,
            subscriber_id: parse_user_id("subscriber_id", row.subscriber_id)?,
            kind: row.kind.parse().map_err(|_| invalid_column("kind", &row.kind))?,
            status: row
                .status
                .parse()
                .map_err(|_| invalid_column("status", &row.status))?,
            start_date: Timestamp::from_datetime(row.start_date),
            end_date: Timestamp::from_datetime(row.end_date),
            amount_paid: row.amount_paid,
            currency: row.currency,
            renewal_count: parse_count("renewal_count", row.renewal_count)?,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

/// Database row representation of a ledger entry.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct LedgerEntryRow {
    id: Uuid,
    subscription_id: Uuid,
    subscriber_id: String,
    creator_id: String,
    amount: i64,
    currency: String,
    status: String,
    provider: String,
    provider_transaction_id: String,
    payment_method: Option<String>,
    created_at: DateTime<Utc>,
    applied_action: Option<String>,
    applied_previous_end_date: Option<DateTime<Utc>>,
    applied_new_end_date: Option<DateTime<Utc>>,
    applied_renewal_count: Option<i32>,
}

impl TryFrom<LedgerEntryRow> for LedgerEntry {
    type Error = DomainError;

    fn try_from(row: LedgerEntryRow) -> Result<Self, Self::Error> {
        let status: LedgerStatus = row
            .status
            .parse()
            .map_err(|_| invalid_column("status", &row.status))?;

        // Snapshot columns are all-or-nothing
        let applied = match (row.applied_action, row.applied_new_end_date, row.applied_renewal_count) {
            (Some(action), Some(new_end_date), Some(renewal_count)) => Some(AppliedTransition {
                kind: parse_transition_kind(&action)?,
                previous_end_date: row.applied_previous_end_date.map(Timestamp::from_datetime),
                new_end_date: Timestamp::from_datetime(new_end_date),
                renewal_count: parse_count("applied_renewal_count", renewal_count)?,
            }),
            _ => None,
        };

        Ok(LedgerEntry {
            id: TransactionId::from_uuid(row.id),
            subscription_id: SubscriptionId::from_uuid(row.subscription_id),
            subscriber_id: parse_user_id("subscriber_id", row.subscriber_id)?,
            creator_id: parse_user_id("creator_id", row.creator_id)?,
            amount: row.amount,
            currency: row.currency,
            status,
            provider: row.provider,
            provider_transaction_id: row.provider_transaction_id,
            payment_method: row.payment_method,
            created_at: Timestamp::from_datetime(row.created_at),
            applied,
        })
    }
}

pub(crate) fn transition_kind_to_string(kind: TransitionKind) -> &'static str {
    match kind {
        TransitionKind::Create => "create",
        TransitionKind::Renew => "renew",
        TransitionKind::Reactivate => "reactivate",
    }
}

fn parse_transition_kind(s: &str) -> Result<TransitionKind, DomainError> {
    match s {
        "create" => Ok(TransitionKind::Create),
        "renew" => Ok(TransitionKind::Renew),
        "reactivate" => Ok(TransitionKind::Reactivate),
        _ => Err(invalid_column("applied_action", s)),
    }
}

pub(crate) fn parse_user_id(column: &str, value: String) -> Result<UserId, DomainError> {
    UserId::new(value).map_err(|e| invalid_column(column, e))
}

fn parse_count(column: &str, value: i32) -> Result<u32, DomainError> {
    u32::try_from(value).map_err(|_| invalid_column(column, value))
}

/// Renewal counts are stored as INTEGER.
pub(crate) fn count_to_db(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
