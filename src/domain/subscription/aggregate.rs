//! Subscription aggregate.
//!
//! One record per (creator, subscriber, kind). The first confirmed payment
//! creates it; every later payment mutates it in place. The engine never
//! deletes subscriptions.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    DomainError, ErrorCode, StateMachine, SubscriptionId, Timestamp, UserId,
};

use super::{SubscriptionKind, SubscriptionStatus, Transition, TransitionKind};

/// Composite natural key of a subscription.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionKey {
    pub creator_id: UserId,
    pub subscriber_id: UserId,
    pub kind: SubscriptionKind,
}

impl SubscriptionKey {
    pub fn new(creator_id: UserId, subscriber_id: UserId, kind: SubscriptionKind) -> Self {
        Self {
            creator_id,
            subscriber_id,
            kind,
        }
    }
}

/// A subscriber's paid access to one creator.
///
/// # Invariants
///
/// - `end_date >= start_date`
/// - `renewal_count` never decreases
/// - `(creator_id, subscriber_id, kind)` is unique across the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub creator_id: UserId,
    pub subscriber_id: UserId,
    pub kind: SubscriptionKind,
    pub status: SubscriptionStatus,
    pub start_date: Timestamp,
    pub end_date: Timestamp,

    /// Amount of the most recent payment, in minor units.
    pub amount_paid: i64,

    /// Opaque currency code of the most recent payment.
    pub currency: String,

    pub renewal_count: u32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Subscription {
    /// Opens a new subscription from a `Create` transition.
    ///
    /// # Errors
    ///
    /// Returns `InvalidStateTransition` for any other transition kind.
    pub fn open(
        id: SubscriptionId,
        key: SubscriptionKey,
        transition: &Transition,
        amount: i64,
        currency: impl Into<String>,
        now: Timestamp,
    ) -> Result<Self, DomainError> {
        if transition.kind != TransitionKind::Create {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Cannot open a subscription with a {:?} transition", transition.kind),
            ));
        }

        Ok(Self {
            id,
            creator_id: key.creator_id,
            subscriber_id: key.subscriber_id,
            kind: key.kind,
            status: SubscriptionStatus::Active,
            start_date: transition.start_date,
            end_date: transition.end_date,
            amount_paid: amount,
            currency: currency.into(),
            renewal_count: transition.renewal_count,
            created_at: now,
            updated_at: now,
        })
    }

    /// Applies a renew or reactivate transition to this record.
    ///
    /// # Errors
    ///
    /// Returns `InvalidStateTransition` for a `Create` transition, a status
    /// that cannot become active, or a renewal count that would go backwards.
    pub fn apply_payment(
        &mut self,
        transition: &Transition,
        amount: i64,
        currency: impl Into<String>,
        now: Timestamp,
    ) -> Result<(), DomainError> {
        if transition.kind == TransitionKind::Create {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "Subscription already exists; create transition not applicable",
            )
            .with_detail("subscription_id", self.id.to_string()));
        }
        if transition.renewal_count < self.renewal_count {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "Renewal count cannot decrease",
            )
            .with_detail("subscription_id", self.id.to_string()));
        }

        self.status = self
            .status
            .transition_to(SubscriptionStatus::Active)
            .map_err(|e| DomainError::new(ErrorCode::InvalidStateTransition, e.to_string()))?;
        self.start_date = transition.start_date;
        self.end_date = transition.end_date;
        self.renewal_count = transition.renewal_count;
        self.amount_paid = amount;
        self.currency = currency.into();
        self.updated_at = now;
        Ok(())
    }

    /// Marks the subscription expired.
    pub fn expire(&mut self, now: Timestamp) -> Result<(), DomainError> {
        self.move_to(SubscriptionStatus::Expired, now)
    }

    /// Marks the subscription canceled.
    pub fn cancel(&mut self, now: Timestamp) -> Result<(), DomainError> {
        self.move_to(SubscriptionStatus::Canceled, now)
    }

    fn move_to(&mut self, target: SubscriptionStatus, now: Timestamp) -> Result<(), DomainError> {
        self.status = self.status.transition_to(target).map_err(|e| {
            DomainError::new(ErrorCode::InvalidStateTransition, e.to_string())
                .with_detail("subscription_id", self.id.to_string())
        })?;
        self.updated_at = now;
        Ok(())
    }

    /// Returns the composite key.
    pub fn key(&self) -> SubscriptionKey {
        SubscriptionKey::new(self.creator_id.clone(), self.subscriber_id.clone(), self.kind)
    }

    /// True if the record grants access at `now`.
    ///
    /// An active record whose window has passed is logically expired even if
    /// nothing has marked it so yet.
    pub fn is_current(&self, now: Timestamp) -> bool {
        self.status == SubscriptionStatus::Active && self.end_date > now
    }
}
