//! Integration tests for the payment path.
//!
//! These tests drive `ApplyPaymentHandler` against the in-memory adapters:
//! 1. Create, renew and reactivate produce the documented windows
//! 2. Replays return the original outcome and write nothing
//! 3. Concurrent confirmations apply exactly once
//! 4. Failed units of work leave no partial state

use std::sync::Arc;

use chrono::Duration;
use futures::future::join_all;

use creator_subscriptions::adapters::memory::{InMemoryAccountDirectory, InMemoryPaymentStore};
use creator_subscriptions::adapters::notifications::RecordingNotificationDispatcher;
use creator_subscriptions::application::handlers::payment::{
    ApplyPaymentCommand, ApplyPaymentHandler, ApplyPaymentSettings, GetCreatorStatsHandler,
    GetCreatorStatsQuery, GetSubscriptionHandler, GetSubscriptionQuery, GetTransactionHandler,
    GetTransactionQuery,
};
use creator_subscriptions::domain::foundation::{SubscriptionId, Timestamp, UserId};
use creator_subscriptions::domain::notification::NotificationType;
use creator_subscriptions::domain::payment::{OutcomeAction, PaymentConfirmation, PaymentOutcome};
use creator_subscriptions::domain::subscription::{
    PaymentError, Subscription, SubscriptionKind, SubscriptionStatus,
};
use creator_subscriptions::ports::{CreatorStatsReader, FixedClock, StoreError};

// =============================================================================
// Test Infrastructure
// =============================================================================

fn creator() -> UserId {
    UserId::new("creator-1").unwrap()
}

fn fan() -> UserId {
    UserId::new("fan-1").unwrap()
}

fn day(n: i64) -> Timestamp {
    Timestamp::epoch().add_days(n)
}

struct Harness {
    store: InMemoryPaymentStore,
    notifier: RecordingNotificationDispatcher,
    clock: Arc<FixedClock>,
    handler: Arc<ApplyPaymentHandler>,
}

impl Harness {
    fn new() -> Self {
        let store = InMemoryPaymentStore::new();
        let notifier = RecordingNotificationDispatcher::new();
        let clock = Arc::new(FixedClock::new(day(0)));
        let accounts = InMemoryAccountDirectory::with_creators([creator()]);

        let handler = ApplyPaymentHandler::new(
            Arc::new(store.clone()),
            Arc::new(accounts),
            Arc::new(notifier.clone()),
            clock.clone(),
            ApplyPaymentSettings::default(),
        );

        Self {
            store,
            notifier,
            clock,
            handler: Arc::new(handler),
        }
    }

    async fn pay(&self, provider_transaction_id: &str) -> Result<PaymentOutcome, PaymentError> {
        self.handler
            .handle(ApplyPaymentCommand {
                confirmation: confirmation(provider_transaction_id),
            })
            .await
    }

    async fn subscribers(&self) -> i64 {
        self.store
            .get_stats(&creator())
            .await
            .unwrap()
            .subscribers_count
    }
}

fn confirmation(provider_transaction_id: &str) -> PaymentConfirmation {
    PaymentConfirmation {
        provider: "stripe".to_string(),
        provider_transaction_id: provider_transaction_id.to_string(),
        creator_id: creator(),
        subscriber_id: fan(),
        amount: 1000,
        currency: "usd".to_string(),
        payment_method: Some("card".to_string()),
        started_at: None,
        kind: SubscriptionKind::ContentAccess,
    }
}

fn existing(status: SubscriptionStatus, start: Timestamp, end: Timestamp, renewals: u32) -> Subscription {
    Subscription {
        id: SubscriptionId::new(),
        creator_id: creator(),
        subscriber_id: fan(),
        kind: SubscriptionKind::ContentAccess,
        status,
        start_date: start,
        end_date: end,
        amount_paid: 1000,
        currency: "usd".to_string(),
        renewal_count: renewals,
        created_at: start,
        updated_at: start,
    }
}

// =============================================================================
// Lifecycle scenarios
// =============================================================================

#[tokio::test]
async fn first_payment_creates_thirty_day_subscription() {
    let h = Harness::new();

    let outcome = h.pay("pi_a").await.unwrap();

    assert!(outcome.success);
    assert!(!outcome.already_processed);
    assert_eq!(outcome.action, OutcomeAction::Created);
    assert_eq!(outcome.renewal_count, 0);
    assert_eq!(outcome.previous_end_date, None);
    assert_eq!(outcome.new_end_date, day(30));
    assert_eq!(h.subscribers().await, 1);
    assert_eq!(h.store.ledger_len().await, 1);
}

#[tokio::test]
async fn early_payment_extends_from_current_end() {
    let h = Harness::new();
    h.store
        .seed_subscription(existing(SubscriptionStatus::Active, day(-20), day(10), 2))
        .await;
    h.clock.set(day(5));

    let outcome = h.pay("pi_b").await.unwrap();

    assert_eq!(outcome.action, OutcomeAction::Renewed);
    assert_eq!(outcome.previous_end_date, Some(day(10)));
    assert_eq!(outcome.new_end_date, day(40));
    assert_eq!(outcome.renewal_count, 3);
    assert_eq!(h.subscribers().await, 0);
}

#[tokio::test]
async fn late_payment_reactivates_from_now() {
    let h = Harness::new();
    h.store
        .seed_subscription(existing(SubscriptionStatus::Expired, day(-25), day(5), 1))
        .await;
    h.clock.set(day(20));

    let outcome = h.pay("pi_c").await.unwrap();

    assert_eq!(outcome.action, OutcomeAction::Reactivated);
    assert_eq!(outcome.new_end_date, day(50));
    assert_eq!(outcome.renewal_count, 2);
    assert_eq!(h.subscribers().await, 1);

    let sub = GetSubscriptionHandler::new(
        Arc::new(h.store.clone()),
        Arc::new(h.store.clone()),
        h.clock.clone(),
    )
    .handle(GetSubscriptionQuery {
        subscription_id: outcome.subscription_id,
        include_payments: true,
    })
    .await
    .unwrap();
    assert_eq!(sub.subscription.status, SubscriptionStatus::Active);
    assert_eq!(sub.subscription.start_date, day(20));
    assert!(sub.is_current);
    assert_eq!(sub.payments.len(), 1);
}

#[tokio::test]
async fn active_record_past_its_end_date_is_reactivated() {
    let h = Harness::new();
    h.store
        .seed_subscription(existing(SubscriptionStatus::Active, day(0), day(30), 0))
        .await;
    h.clock.set(day(30));

    let outcome = h.pay("pi_boundary").await.unwrap();

    assert_eq!(outcome.action, OutcomeAction::Reactivated);
    assert_eq!(outcome.new_end_date, day(60));
    assert_eq!(h.subscribers().await, 1);
}

#[tokio::test]
async fn canceled_subscription_is_reactivated() {
    let h = Harness::new();
    h.store
        .seed_subscription(existing(SubscriptionStatus::Canceled, day(0), day(30), 4))
        .await;
    h.clock.set(day(10));

    let outcome = h.pay("pi_cancel").await.unwrap();

    assert_eq!(outcome.action, OutcomeAction::Reactivated);
    assert_eq!(outcome.new_end_date, day(40));
    assert_eq!(outcome.renewal_count, 5);
}

#[tokio::test]
async fn explicit_start_date_anchors_new_window() {
    let h = Harness::new();
    h.clock.set(day(3));
    let mut c = confirmation("pi_start");
    c.started_at = Some(day(1));

    let outcome = h
        .handler
        .handle(ApplyPaymentCommand { confirmation: c })
        .await
        .unwrap();

    assert_eq!(outcome.new_end_date, day(31));
}

// =============================================================================
// Idempotency
// =============================================================================

#[tokio::test]
async fn replay_returns_original_outcome_without_writing() {
    let h = Harness::new();
    let first = h.pay("pi_d").await.unwrap();
    h.clock.advance(Duration::days(3));

    let second = h.pay("pi_d").await.unwrap();

    assert!(second.already_processed);
    assert_eq!(second.subscription_id, first.subscription_id);
    assert_eq!(second.new_end_date, first.new_end_date);
    assert_eq!(second.renewal_count, first.renewal_count);
    assert_eq!(second.transaction_id, first.transaction_id);
    assert_eq!(second.action, first.action);
    assert_eq!(h.store.ledger_len().await, 1);
    assert_eq!(h.subscribers().await, 1);
    // Only the first application notifies
    assert_eq!(h.notifier.sent().len(), 2);
}

#[tokio::test]
async fn concurrent_duplicates_apply_exactly_once() {
    let h = Harness::new();

    let calls = (0..8).map(|_| {
        let handler = h.handler.clone();
        tokio::spawn(async move {
            handler
                .handle(ApplyPaymentCommand {
                    confirmation: confirmation("pi_same"),
                })
                .await
        })
    });
    let outcomes: Vec<_> = join_all(calls)
        .await
        .into_iter()
        .map(|joined| joined.unwrap().unwrap())
        .collect();

    let fresh = outcomes.iter().filter(|o| !o.already_processed).count();
    assert_eq!(fresh, 1);
    for outcome in &outcomes {
        assert_eq!(outcome.subscription_id, outcomes[0].subscription_id);
        assert_eq!(outcome.new_end_date, day(30));
        assert_eq!(outcome.renewal_count, 0);
    }
    assert_eq!(h.store.ledger_len().await, 1);
    assert_eq!(h.store.subscription_count().await, 1);
    assert_eq!(h.subscribers().await, 1);
}

#[tokio::test]
async fn concurrent_distinct_payments_stack_on_one_subscription() {
    let h = Harness::new();

    let calls = (0..5).map(|i| {
        let handler = h.handler.clone();
        tokio::spawn(async move {
            handler
                .handle(ApplyPaymentCommand {
                    confirmation: confirmation(&format!("pi_{}", i)),
                })
                .await
        })
    });
    for joined in join_all(calls).await {
        joined.unwrap().unwrap();
    }

    let entry = GetTransactionHandler::new(Arc::new(h.store.clone()))
        .handle(GetTransactionQuery {
            provider_transaction_id: "pi_0".to_string(),
        })
        .await
        .unwrap();
    let sub = GetSubscriptionHandler::new(
        Arc::new(h.store.clone()),
        Arc::new(h.store.clone()),
        h.clock.clone(),
    )
    .handle(GetSubscriptionQuery {
        subscription_id: entry.subscription_id,
        include_payments: true,
    })
    .await
    .unwrap();

    assert_eq!(h.store.subscription_count().await, 1);
    assert_eq!(sub.subscription.end_date, day(150));
    assert_eq!(sub.subscription.renewal_count, 4);
    assert_eq!(sub.payments.len(), 5);
    assert_eq!(h.subscribers().await, 1);
}

// =============================================================================
// Rejections and failures
// =============================================================================

#[tokio::test]
async fn non_creator_target_is_rejected_without_mutation() {
    let h = Harness::new();
    let mut c = confirmation("pi_bad");
    c.creator_id = UserId::new("fan-2").unwrap();

    let err = h
        .handler
        .handle(ApplyPaymentCommand { confirmation: c })
        .await
        .unwrap_err();

    assert!(matches!(err, PaymentError::InvalidTarget(_)));
    assert!(!err.is_retryable());
    assert_eq!(h.store.ledger_len().await, 0);
    assert_eq!(h.store.subscription_count().await, 0);
    assert!(h.notifier.sent().is_empty());
}

#[tokio::test]
async fn failed_commit_leaves_nothing_and_retry_succeeds() {
    let h = Harness::new();
    h.store.fail_next_commit(StoreError::unavailable("disk full"));

    let err = h.pay("pi_retry").await.unwrap_err();
    assert!(matches!(err, PaymentError::StoreUnavailable(_)));
    assert!(err.is_retryable());
    assert_eq!(h.store.ledger_len().await, 0);
    assert_eq!(h.store.subscription_count().await, 0);
    assert_eq!(h.subscribers().await, 0);
    assert!(h.notifier.sent().is_empty());

    let outcome = h.pay("pi_retry").await.unwrap();
    assert_eq!(outcome.action, OutcomeAction::Created);
    assert!(!outcome.already_processed);
    assert_eq!(h.subscribers().await, 1);
}

#[tokio::test]
async fn conflicts_are_retried_within_budget() {
    let h = Harness::new();
    h.store.fail_next_commit(StoreError::Conflict("40001".to_string()));
    h.store.fail_next_commit(StoreError::Conflict("40001".to_string()));

    let outcome = h.pay("pi_conflict").await.unwrap();

    assert_eq!(outcome.action, OutcomeAction::Created);
    assert_eq!(h.store.ledger_len().await, 1);
}

#[tokio::test]
async fn persistent_conflicts_surface_as_transient_failure() {
    let h = Harness::new();
    for _ in 0..3 {
        h.store.fail_next_commit(StoreError::Conflict("40P01".to_string()));
    }

    let err = h.pay("pi_deadlock").await.unwrap_err();

    assert!(matches!(
        err,
        PaymentError::TransientWriteFailure { attempts: 3, .. }
    ));
    assert_eq!(h.store.ledger_len().await, 0);
}

#[tokio::test]
async fn unavailable_store_is_reported_before_any_write() {
    let h = Harness::new();
    h.store.set_unavailable(true);

    let err = h.pay("pi_down").await.unwrap_err();
    assert!(matches!(err, PaymentError::StoreUnavailable(_)));

    h.store.set_unavailable(false);
    assert!(h.pay("pi_down").await.is_ok());
}

// =============================================================================
// Notifications and reads
// =============================================================================

#[tokio::test]
async fn renewal_notifies_creator_and_subscriber() {
    let h = Harness::new();
    h.pay("pi_1").await.unwrap();
    h.clock.advance(Duration::days(10));
    h.pay("pi_2").await.unwrap();

    let sent = h.notifier.sent();
    let types: Vec<_> = sent.iter().map(|r| r.notification_type).collect();
    assert_eq!(
        types,
        vec![
            NotificationType::NewSubscription,
            NotificationType::SubscriptionConfirmed,
            NotificationType::RenewSubscription,
            NotificationType::SubscriptionConfirmed,
        ]
    );
    assert_eq!(sent[2].recipient_id, creator());
    assert_eq!(sent[2].actor_id, fan());
    assert_eq!(sent[3].recipient_id, fan());
}

#[tokio::test]
async fn creator_stats_query_reads_committed_counter() {
    let h = Harness::new();
    h.pay("pi_stats").await.unwrap();

    let stats = GetCreatorStatsHandler::new(Arc::new(h.store.clone()))
        .handle(GetCreatorStatsQuery {
            creator_id: creator(),
        })
        .await
        .unwrap();

    assert_eq!(stats.subscribers_count, 1);
}

#[tokio::test]
async fn unknown_transaction_is_not_found() {
    let h = Harness::new();

    let err = GetTransactionHandler::new(Arc::new(h.store.clone()))
        .handle(GetTransactionQuery {
            provider_transaction_id: "pi_missing".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, PaymentError::TransactionNotFound(_)));
}
