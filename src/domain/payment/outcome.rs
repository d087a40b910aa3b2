//! Result of applying a payment confirmation.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{SubscriptionId, Timestamp, TransactionId};
use crate::domain::ledger::LedgerEntry;
use crate::domain::subscription::{PaymentError, Subscription, Transition, TransitionKind};

/// What the payment did to the subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeAction {
    Created,
    Renewed,
    Reactivated,
    /// Replay of an entry with no recorded transition.
    Noop,
}

impl From<TransitionKind> for OutcomeAction {
    fn from(kind: TransitionKind) -> Self {
        match kind {
            TransitionKind::Create => OutcomeAction::Created,
            TransitionKind::Renew => OutcomeAction::Renewed,
            TransitionKind::Reactivate => OutcomeAction::Reactivated,
        }
    }
}

/// Returned by every call to apply a payment, fresh or replayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentOutcome {
    pub success: bool,
    pub subscription_id: SubscriptionId,
    pub action: OutcomeAction,
    pub previous_end_date: Option<Timestamp>,
    pub new_end_date: Timestamp,
    pub renewal_count: u32,
    pub transaction_id: TransactionId,
    pub already_processed: bool,
}

impl PaymentOutcome {
    /// Outcome of a payment applied in this call.
    pub fn applied(
        subscription_id: SubscriptionId,
        transaction_id: TransactionId,
        transition: &Transition,
    ) -> Self {
        Self {
            success: true,
            subscription_id,
            action: transition.kind.into(),
            previous_end_date: transition.previous_end_date,
            new_end_date: transition.end_date,
            renewal_count: transition.renewal_count,
            transaction_id,
            already_processed: false,
        }
    }

    /// Outcome for a confirmation whose ledger entry already exists.
    ///
    /// Uses the entry's snapshot when present, so the caller sees exactly what
    /// the first application returned. Older entries fall back to the linked
    /// subscription's current state.
    ///
    /// # Errors
    ///
    /// `Internal` if the entry has no snapshot and its subscription is missing.
    pub fn replayed(
        entry: &LedgerEntry,
        subscription: Option<&Subscription>,
    ) -> Result<Self, PaymentError> {
        if let Some(applied) = entry.applied {
            return Ok(Self {
                success: true,
                subscription_id: entry.subscription_id,
                action: applied.kind.into(),
                previous_end_date: applied.previous_end_date,
                new_end_date: applied.new_end_date,
                renewal_count: applied.renewal_count,
                transaction_id: entry.id,
                already_processed: true,
            });
        }

        let subscription = subscription.ok_or_else(|| {
            PaymentError::Internal(format!(
                "ledger entry {} references missing subscription {}",
                entry.id, entry.subscription_id
            ))
        })?;

        Ok(Self {
            success: true,
            subscription_id: subscription.id,
            action: OutcomeAction::Noop,
            previous_end_date: None,
            new_end_date: subscription.end_date,
            renewal_count: subscription.renewal_count,
            transaction_id: entry.id,
            already_processed: true,
        })
    }
}
