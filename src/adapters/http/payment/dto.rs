//! HTTP DTOs for the payment endpoints.

use serde::{Deserialize, Serialize};

use crate::application::handlers::payment::GetSubscriptionResult;
use crate::domain::foundation::{Timestamp, UserId};
use crate::domain::ledger::LedgerEntry;
use crate::domain::payment::{OutcomeAction, PaymentConfirmation, PaymentOutcome};
use crate::domain::stats::CreatorStats;
use crate::domain::subscription::{PaymentError, SubscriptionKind, SubscriptionStatus};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// A confirmed payment, as posted by webhook and return-URL handlers.
///
/// Ids and timestamps arrive as plain strings so that malformed values
/// surface as `VALIDATION_FAILED` rather than a body rejection.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfirmPaymentRequest {
    pub provider: String,
    pub provider_transaction_id: String,
    pub creator_id: String,
    pub subscriber_id: String,
    /// Amount in minor units.
    pub amount: i64,
    pub currency: String,
    #[serde(default)]
    pub payment_method: Option<String>,
    /// Start of the paid period (RFC 3339). Defaults to now.
    #[serde(default)]
    pub started_at: Option<String>,
    /// `content_access` (default) or `messaging_access`.
    #[serde(default)]
    pub kind: Option<String>,
}

impl TryFrom<ConfirmPaymentRequest> for PaymentConfirmation {
    type Error = PaymentError;

    fn try_from(req: ConfirmPaymentRequest) -> Result<Self, Self::Error> {
        let started_at = req
            .started_at
            .as_deref()
            .map(Timestamp::parse_rfc3339)
            .transpose()
            .map_err(|e| PaymentError::validation("started_at", e.to_string()))?;

        let kind = match req.kind.as_deref() {
            Some(kind) => kind.parse::<SubscriptionKind>()?,
            None => SubscriptionKind::default(),
        };

        Ok(PaymentConfirmation {
            provider: req.provider,
            provider_transaction_id: req.provider_transaction_id,
            creator_id: UserId::new(req.creator_id)
                .map_err(|_| PaymentError::validation("creator_id", "creator id is required"))?,
            subscriber_id: UserId::new(req.subscriber_id).map_err(|_| {
                PaymentError::validation("subscriber_id", "subscriber id is required")
            })?,
            amount: req.amount,
            currency: req.currency,
            payment_method: req.payment_method,
            started_at,
            kind,
        })
    }
}

/// Query string for `GET /subscriptions/:id`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubscriptionParams {
    #[serde(default)]
    pub include_payments: bool,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Result of applying (or replaying) a payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentOutcomeResponse {
    pub success: bool,
    pub subscription_id: String,
    pub action: OutcomeAction,
    pub previous_end_date: Option<String>,
    pub new_end_date: String,
    pub renewal_count: u32,
    pub transaction_id: String,
    pub already_processed: bool,
}

impl From<PaymentOutcome> for PaymentOutcomeResponse {
    fn from(outcome: PaymentOutcome) -> Self {
        Self {
            success: outcome.success,
            subscription_id: outcome.subscription_id.to_string(),
            action: outcome.action,
            previous_end_date: outcome.previous_end_date.map(|t| t.to_rfc3339()),
            new_end_date: outcome.new_end_date.to_rfc3339(),
            renewal_count: outcome.renewal_count,
            transaction_id: outcome.transaction_id.to_string(),
            already_processed: outcome.already_processed,
        }
    }
}

/// A recorded payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionResponse {
    pub id: String,
    pub subscription_id: String,
    pub subscriber_id: String,
    pub creator_id: String,
    pub amount: i64,
    pub currency: String,
    pub status: String,
    pub provider: String,
    pub provider_transaction_id: String,
    pub payment_method: Option<String>,
    pub created_at: String,
}

impl From<LedgerEntry> for TransactionResponse {
    fn from(entry: LedgerEntry) -> Self {
        Self {
            id: entry.id.to_string(),
            subscription_id: entry.subscription_id.to_string(),
            subscriber_id: entry.subscriber_id.to_string(),
            creator_id: entry.creator_id.to_string(),
            amount: entry.amount,
            currency: entry.currency,
            status: entry.status.as_str().to_string(),
            provider: entry.provider,
            provider_transaction_id: entry.provider_transaction_id,
            payment_method: entry.payment_method,
            created_at: entry.created_at.to_rfc3339(),
        }
    }
}

/// A subscription and its effective access state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionResponse {
    pub id: String,
    pub creator_id: String,
    pub subscriber_id: String,
    pub kind: SubscriptionKind,
    pub status: SubscriptionStatus,
    /// False once `end_date` has passed, whatever `status` says.
    pub is_current: bool,
    pub start_date: String,
    pub end_date: String,
    pub amount_paid: i64,
    pub currency: String,
    pub renewal_count: u32,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub payments: Vec<TransactionResponse>,
}

impl From<GetSubscriptionResult> for SubscriptionResponse {
    fn from(result: GetSubscriptionResult) -> Self {
        let sub = result.subscription;
        Self {
            id: sub.id.to_string(),
            creator_id: sub.creator_id.to_string(),
            subscriber_id: sub.subscriber_id.to_string(),
            kind: sub.kind,
            status: sub.status,
            is_current: result.is_current,
            start_date: sub.start_date.to_rfc3339(),
            end_date: sub.end_date.to_rfc3339(),
            amount_paid: sub.amount_paid,
            currency: sub.currency,
            renewal_count: sub.renewal_count,
            created_at: sub.created_at.to_rfc3339(),
            updated_at: sub.updated_at.to_rfc3339(),
            payments: result
                .payments
                .into_iter()
                .map(TransactionResponse::from)
                .collect(),
        }
    }
}

/// Aggregate counters for a creator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatorStatsResponse {
    pub creator_id: String,
    pub subscribers_count: i64,
}

impl From<CreatorStats> for CreatorStatsResponse {
    fn from(stats: CreatorStats) -> Self {
        Self {
            creator_id: stats.creator_id.to_string(),
            subscribers_count: stats.subscribers_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ConfirmPaymentRequest {
        ConfirmPaymentRequest {
            provider: "stripe".to_string(),
            provider_transaction_id: "pi_1".to_string(),
            creator_id: "creator-1".to_string(),
            subscriber_id: "fan-1".to_string(),
            amount: 1000,
            currency: "usd".to_string(),
            payment_method: None,
            started_at: None,
            kind: None,
        }
    }

    #[test]
    fn request_defaults_to_content_access() {
        let confirmation = PaymentConfirmation::try_from(request()).unwrap();
        assert_eq!(confirmation.kind, SubscriptionKind::ContentAccess);
        assert!(confirmation.started_at.is_none());
    }

    #[test]
    fn request_parses_start_and_kind() {
        let mut req = request();
        req.started_at = Some("2024-03-01T00:00:00Z".to_string());
        req.kind = Some("messaging_access".to_string());

        let confirmation = PaymentConfirmation::try_from(req).unwrap();
        assert_eq!(confirmation.kind, SubscriptionKind::MessagingAccess);
        assert_eq!(
            confirmation.started_at.unwrap().to_rfc3339(),
            "2024-03-01T00:00:00+00:00"
        );
    }

    #[test]
    fn malformed_start_is_a_validation_failure() {
        let mut req = request();
        req.started_at = Some("last tuesday".to_string());
        match PaymentConfirmation::try_from(req) {
            Err(PaymentError::ValidationFailed { field, .. }) => assert_eq!(field, "started_at"),
            other => panic!("Expected ValidationFailed, got {:?}", other),
        }
    }

    #[test]
    fn blank_creator_is_a_validation_failure() {
        let mut req = request();
        req.creator_id = " ".to_string();
        match PaymentConfirmation::try_from(req) {
            Err(PaymentError::ValidationFailed { field, .. }) => assert_eq!(field, "creator_id"),
            other => panic!("Expected ValidationFailed, got {:?}", other),
        }
    }

    #[test]
    fn request_deserializes_without_optional_fields() {
        let json = r#"{
            "provider": "paypal",
            "provider_transaction_id": "PAY-1",
            "creator_id": "creator-1",
            "subscriber_id": "fan-1",
            "amount": 500,
            "currency": "eur"
        }"#;
        let req: ConfirmPaymentRequest = serde_json::from_str(json).unwrap();
        assert!(req.kind.is_none());
        assert!(req.payment_method.is_none());
    }
}
