//! Provider-neutral payment confirmation.
//!
//! Provider adapters (webhook and return-URL handlers) translate their own
//! payloads into this shape before calling the payment path.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{SubscriptionId, Timestamp, TransactionId, UserId};
use crate::domain::ledger::{AppliedTransition, LedgerEntry, LedgerStatus};
use crate::domain::subscription::{PaymentError, SubscriptionKey, SubscriptionKind, Transition};

/// A payment the provider reports as succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentConfirmation {
    pub provider: String,
    pub provider_transaction_id: String,
    pub creator_id: UserId,
    pub subscriber_id: UserId,

    /// Amount in minor units.
    pub amount: i64,

    /// Opaque currency code, passed through untouched.
    pub currency: String,

    #[serde(default)]
    pub payment_method: Option<String>,

    /// When the paid period starts. Defaults to the time of application.
    #[serde(default)]
    pub started_at: Option<Timestamp>,

    #[serde(default)]
    pub kind: SubscriptionKind,
}

impl PaymentConfirmation {
    /// Checks the fields that do not need the store.
    ///
    /// # Errors
    ///
    /// `ValidationFailed` naming the first offending field.
    pub fn validate(&self) -> Result<(), PaymentError> {
        if self.provider.trim().is_empty() {
            return Err(PaymentError::validation("provider", "provider is required"));
        }
        if self.provider_transaction_id.trim().is_empty() {
            return Err(PaymentError::validation(
                "provider_transaction_id",
                "provider transaction id is required",
            ));
        }
        if self.currency.trim().is_empty() {
            return Err(PaymentError::validation("currency", "currency is required"));
        }
        if self.amount < 0 {
            return Err(PaymentError::validation(
                "amount",
                format!("amount must not be negative, got {}", self.amount),
            ));
        }
        Ok(())
    }

    pub fn subscription_key(&self) -> SubscriptionKey {
        SubscriptionKey::new(self.creator_id.clone(), self.subscriber_id.clone(), self.kind)
    }

    /// Start of the paid period, falling back to `now`.
    pub fn start_or(&self, now: Timestamp) -> Timestamp {
        self.started_at.unwrap_or(now)
    }

    /// Builds the ledger entry recording this payment.
    pub fn to_ledger_entry(
        &self,
        id: TransactionId,
        subscription_id: SubscriptionId,
        transition: &Transition,
        now: Timestamp,
    ) -> LedgerEntry {
        LedgerEntry {
            id,
            subscription_id,
            subscriber_id: self.subscriber_id.clone(),
            creator_id: self.creator_id.clone(),
            amount: self.amount,
            currency: self.currency.clone(),
            status: LedgerStatus::Succeeded,
            provider: self.provider.clone(),
            provider_transaction_id: self.provider_transaction_id.clone(),
            payment_method: self.payment_method.clone(),
            created_at: now,
            applied: Some(AppliedTransition::from(transition)),
        }
    }
}
