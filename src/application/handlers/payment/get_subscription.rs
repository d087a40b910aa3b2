//! GetSubscriptionHandler - Query handler for a subscription by id.

use std::sync::Arc;

use crate::domain::foundation::SubscriptionId;
use crate::domain::ledger::LedgerEntry;
use crate::domain::subscription::{PaymentError, Subscription};
use crate::ports::{Clock, LedgerReader, SubscriptionReader};

#[derive(Debug, Clone)]
pub struct GetSubscriptionQuery {
    pub subscription_id: SubscriptionId,
    /// Also return the subscription's payment history.
    pub include_payments: bool,
}

/// A subscription with its effective access state.
#[derive(Debug, Clone)]
pub struct GetSubscriptionResult {
    pub subscription: Subscription,
    /// False once `end_date` passes, even while the status still says active.
    pub is_current: bool,
    pub payments: Vec<LedgerEntry>,
}

pub struct GetSubscriptionHandler {
    subscriptions: Arc<dyn SubscriptionReader>,
    ledger: Arc<dyn LedgerReader>,
    clock: Arc<dyn Clock>,
}

impl GetSubscriptionHandler {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionReader>,
        ledger: Arc<dyn LedgerReader>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            subscriptions,
            ledger,
            clock,
        }
    }

    pub async fn handle(
        &self,
        query: GetSubscriptionQuery,
    ) -> Result<GetSubscriptionResult, PaymentError> {
        let subscription = self
            .subscriptions
            .get_by_id(query.subscription_id)
            .await?
            .ok_or(PaymentError::SubscriptionNotFound(query.subscription_id))?;

        let payments = if query.include_payments {
            self.ledger.list_by_subscription(subscription.id).await?
        } else {
            Vec::new()
        };

        Ok(GetSubscriptionResult {
            is_current: subscription.is_current(self.clock.now()),
            subscription,
            payments,
        })
    }
}
