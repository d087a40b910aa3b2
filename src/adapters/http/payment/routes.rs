//! Axum router configuration for payment endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    confirm_payment, get_creator_stats, get_subscription, get_transaction, PaymentAppState,
};

/// Create the payment API router.
///
/// # Routes
///
/// - `POST /payments/confirmations` - Apply a confirmed payment
/// - `GET /transactions/:provider_transaction_id` - Ledger entry lookup
/// - `GET /subscriptions/:id` - Subscription lookup
/// - `GET /creators/:creator_id/stats` - Creator counters
pub fn payment_router() -> Router<PaymentAppState> {
    Router::new()
        .route("/payments/confirmations", post(confirm_payment))
        .route("/transactions/:provider_transaction_id", get(get_transaction))
        .route("/subscriptions/:id", get(get_subscription))
        .route("/creators/:creator_id/stats", get(get_creator_stats))
}
