//! ApplyPaymentHandler - Command handler that applies a confirmed payment.
//!
//! This is the only writer of subscriptions and ledger entries on the
//! payment path. Each call runs one unit of work:
//!
//! 1. Look up the ledger entry for the provider transaction id.
//! 2. If found, replay the recorded outcome without writing anything.
//! 3. Otherwise lock the subscription, `decide` the transition, write the
//!    subscription, the ledger entry and the stats delta, then commit.
//!
//! Notifications go out only after commit and never affect the result.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;

use crate::domain::foundation::{SubscriptionId, TransactionId, UserId};
use crate::domain::ledger::LedgerEntry;
use crate::domain::notification::NotificationRequest;
use crate::domain::payment::{PaymentConfirmation, PaymentOutcome};
use crate::domain::stats::StatsDelta;
use crate::domain::subscription::{
    decide, BillingPeriods, PaymentError, Subscription, TransitionKind,
};
use crate::ports::{
    AccountDirectory, Clock, NotificationDispatcher, PaymentStore, PaymentTransaction, StoreError,
    UniqueConstraint,
};

/// Command to apply one payment confirmation.
#[derive(Debug, Clone)]
pub struct ApplyPaymentCommand {
    pub confirmation: PaymentConfirmation,
}

pub type ApplyPaymentResult = PaymentOutcome;

/// Tunables for the payment path.
#[derive(Debug, Clone, Copy)]
pub struct ApplyPaymentSettings {
    pub periods: BillingPeriods,
    /// Upper bound on units of work per call when the store reports conflicts.
    pub max_write_attempts: u32,
    pub notification_timeout: Duration,
}

impl Default for ApplyPaymentSettings {
    fn default() -> Self {
        Self {
            periods: BillingPeriods::default(),
            max_write_attempts: 3,
            notification_timeout: Duration::from_secs(5),
        }
    }
}

/// Result of one unit of work.
enum Attempt {
    Applied {
        outcome: PaymentOutcome,
        kind: TransitionKind,
    },
    Replayed(PaymentOutcome),
}

/// Failure of one unit of work.
enum AttemptError {
    Store(StoreError),
    Rejected(PaymentError),
}

impl From<StoreError> for AttemptError {
    fn from(err: StoreError) -> Self {
        AttemptError::Store(err)
    }
}

impl From<PaymentError> for AttemptError {
    fn from(err: PaymentError) -> Self {
        AttemptError::Rejected(err)
    }
}

/// Handler for applying payment confirmations.
pub struct ApplyPaymentHandler {
    store: Arc<dyn PaymentStore>,
    accounts: Arc<dyn AccountDirectory>,
    notifier: Arc<dyn NotificationDispatcher>,
    clock: Arc<dyn Clock>,
    settings: ApplyPaymentSettings,
}

impl ApplyPaymentHandler {
    pub fn new(
        store: Arc<dyn PaymentStore>,
        accounts: Arc<dyn AccountDirectory>,
        notifier: Arc<dyn NotificationDispatcher>,
        clock: Arc<dyn Clock>,
        settings: ApplyPaymentSettings,
    ) -> Self {
        Self {
            store,
            accounts,
            notifier,
            clock,
            settings,
        }
    }

    pub async fn handle(
        &self,
        cmd: ApplyPaymentCommand,
    ) -> Result<ApplyPaymentResult, PaymentError> {
        let confirmation = cmd.confirmation;

        // 1. Validate before touching the store
        confirmation.validate()?;
        self.ensure_creator(&confirmation.creator_id).await?;

        // 2. Run the unit of work, retrying conflicts
        let max_attempts = self.settings.max_write_attempts.max(1);
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.apply_once(&confirmation).await {
                Ok(Attempt::Replayed(outcome)) => {
                    tracing::debug!(
                        provider_transaction_id = %confirmation.provider_transaction_id,
                        subscription_id = %outcome.subscription_id,
                        "Payment already applied, replaying outcome"
                    );
                    return Ok(outcome);
                }
                Ok(Attempt::Applied { outcome, kind }) => {
                    tracing::info!(
                        provider_transaction_id = %confirmation.provider_transaction_id,
                        subscription_id = %outcome.subscription_id,
                        creator_id = %confirmation.creator_id,
                        action = ?outcome.action,
                        renewal_count = outcome.renewal_count,
                        "Payment applied"
                    );
                    // 3. Side effects after commit
                    self.notify(kind, &confirmation).await;
                    return Ok(outcome);
                }
                Err(AttemptError::Rejected(err)) => return Err(err),
                Err(AttemptError::Store(StoreError::ConstraintViolation(
                    UniqueConstraint::LedgerProviderTransaction,
                ))) => {
                    tracing::debug!(
                        provider_transaction_id = %confirmation.provider_transaction_id,
                        "Lost race on ledger insert, replaying committed outcome"
                    );
                    return self.replay_committed(&confirmation, attempt).await;
                }
                Err(AttemptError::Store(
                    err @ (StoreError::ConstraintViolation(_) | StoreError::Conflict(_)),
                )) => {
                    if attempt >= max_attempts {
                        tracing::warn!(
                            provider_transaction_id = %confirmation.provider_transaction_id,
                            attempts = attempt,
                            error = %err,
                            "Giving up on payment after repeated conflicts"
                        );
                        return Err(PaymentError::transient(attempt, err.to_string()));
                    }
                    tracing::debug!(
                        provider_transaction_id = %confirmation.provider_transaction_id,
                        attempt,
                        error = %err,
                        "Retrying payment unit of work"
                    );
                }
                Err(AttemptError::Store(err)) => {
                    tracing::warn!(
                        provider_transaction_id = %confirmation.provider_transaction_id,
                        error = %err,
                        "Payment store failure"
                    );
                    return Err(err.into());
                }
            }
        }
    }

    async fn ensure_creator(&self, creator_id: &UserId) -> Result<(), PaymentError> {
        let kind = self
            .accounts
            .account_kind(creator_id)
            .await
            .map_err(|e| PaymentError::store_unavailable(e.to_string()))?;
        match kind {
            Some(kind) if kind.is_creator() => Ok(()),
            _ => Err(PaymentError::invalid_target(creator_id.clone())),
        }
    }

    async fn apply_once(
        &self,
        confirmation: &PaymentConfirmation,
    ) -> Result<Attempt, AttemptError> {
        let mut tx = self.store.begin().await?;

        if let Some(entry) = tx
            .find_ledger_entry(&confirmation.provider_transaction_id)
            .await?
        {
            let outcome = replay(tx.as_mut(), &entry).await?;
            return Ok(Attempt::Replayed(outcome));
        }

        let now = self.clock.now();
        let key = confirmation.subscription_key();
        let existing = tx.find_subscription_for_update(&key).await?;
        let transition = decide(
            existing.as_ref(),
            now,
            confirmation.start_or(now),
            self.settings.periods.duration_for(confirmation.kind),
        );

        let subscription = match existing {
            None => {
                let subscription = Subscription::open(
                    SubscriptionId::new(),
                    key,
                    &transition,
                    confirmation.amount,
                    confirmation.currency.clone(),
                    now,
                )
                .map_err(PaymentError::from)?;
                tx.insert_subscription(&subscription).await?;
                subscription
            }
            Some(mut subscription) => {
                subscription
                    .apply_payment(
                        &transition,
                        confirmation.amount,
                        confirmation.currency.clone(),
                        now,
                    )
                    .map_err(PaymentError::from)?;
                tx.update_subscription(&subscription).await?;
                subscription
            }
        };

        let entry =
            confirmation.to_ledger_entry(TransactionId::new(), subscription.id, &transition, now);
        tx.insert_ledger_entry(&entry).await?;

        let delta = StatsDelta::for_transition(transition.kind);
        if !delta.is_zero() {
            tx.apply_stats_delta(&confirmation.creator_id, delta).await?;
        }

        tx.commit().await?;

        Ok(Attempt::Applied {
            outcome: PaymentOutcome::applied(subscription.id, entry.id, &transition),
            kind: transition.kind,
        })
    }

    /// Reads the outcome another writer committed for this confirmation.
    async fn replay_committed(
        &self,
        confirmation: &PaymentConfirmation,
        attempts: u32,
    ) -> Result<PaymentOutcome, PaymentError> {
        let mut tx = self.store.begin().await?;
        let entry = tx
            .find_ledger_entry(&confirmation.provider_transaction_id)
            .await?
            .ok_or_else(|| {
                PaymentError::transient(
                    attempts,
                    "ledger entry rejected as duplicate but not visible",
                )
            })?;
        match replay(tx.as_mut(), &entry).await {
            Ok(outcome) => Ok(outcome),
            Err(AttemptError::Store(err)) => Err(err.into()),
            Err(AttemptError::Rejected(err)) => Err(err),
        }
    }

    async fn notify(&self, kind: TransitionKind, confirmation: &PaymentConfirmation) {
        let requests = NotificationRequest::for_payment(
            kind,
            &confirmation.creator_id,
            &confirmation.subscriber_id,
        );
        let timeout = self.settings.notification_timeout;
        let dispatches = requests.iter().map(|request| async move {
            (
                request,
                tokio::time::timeout(timeout, self.notifier.dispatch(request)).await,
            )
        });

        for (request, sent) in join_all(dispatches).await {
            match sent {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::warn!(
                    provider_transaction_id = %confirmation.provider_transaction_id,
                    recipient_id = %request.recipient_id,
                    notification_type = ?request.notification_type,
                    "Notification dispatch failed: {}",
                    e
                ),
                Err(_) => tracing::warn!(
                    provider_transaction_id = %confirmation.provider_transaction_id,
                    recipient_id = %request.recipient_id,
                    notification_type = ?request.notification_type,
                    "Notification dispatch timed out"
                ),
            }
        }
    }
}

async fn replay(
    tx: &mut dyn PaymentTransaction,
    entry: &LedgerEntry,
) -> Result<PaymentOutcome, AttemptError> {
    let subscription = match entry.applied {
        Some(_) => None,
        None => tx.find_subscription(entry.subscription_id).await?,
    };
    Ok(PaymentOutcome::replayed(entry, subscription.as_ref())?)
}
