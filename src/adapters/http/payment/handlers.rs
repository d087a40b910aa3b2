//! HTTP handlers for payment endpoints.
//!
//! These handlers connect Axum routes to the payment command and query handlers.

use std::sync::Arc;

use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::handlers::payment::{
    ApplyPaymentCommand, ApplyPaymentHandler, ApplyPaymentSettings, GetCreatorStatsHandler,
    GetCreatorStatsQuery, GetSubscriptionHandler, GetSubscriptionQuery, GetTransactionHandler,
    GetTransactionQuery,
};
use crate::domain::foundation::{SubscriptionId, UserId, ValidationError};
use crate::domain::payment::PaymentConfirmation;
use crate::domain::subscription::PaymentError;
use crate::ports::{
    AccountDirectory, Clock, CreatorStatsReader, LedgerReader, NotificationDispatcher,
    PaymentStore, SubscriptionReader,
};

use super::super::error::ErrorResponse;
use super::dto::{
    ConfirmPaymentRequest, CreatorStatsResponse, PaymentOutcomeResponse, SubscriptionParams,
    SubscriptionResponse, TransactionResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for the payment endpoints.
#[derive(Clone)]
pub struct PaymentAppState {
    pub store: Arc<dyn PaymentStore>,
    pub accounts: Arc<dyn AccountDirectory>,
    pub notifier: Arc<dyn NotificationDispatcher>,
    pub clock: Arc<dyn Clock>,
    pub ledger_reader: Arc<dyn LedgerReader>,
    pub subscription_reader: Arc<dyn SubscriptionReader>,
    pub stats_reader: Arc<dyn CreatorStatsReader>,
    pub settings: ApplyPaymentSettings,
}

impl PaymentAppState {
    pub fn apply_payment_handler(&self) -> ApplyPaymentHandler {
        ApplyPaymentHandler::new(
            self.store.clone(),
            self.accounts.clone(),
            self.notifier.clone(),
            self.clock.clone(),
            self.settings,
        )
    }

    pub fn get_transaction_handler(&self) -> GetTransactionHandler {
        GetTransactionHandler::new(self.ledger_reader.clone())
    }

    pub fn get_subscription_handler(&self) -> GetSubscriptionHandler {
        GetSubscriptionHandler::new(
            self.subscription_reader.clone(),
            self.ledger_reader.clone(),
            self.clock.clone(),
        )
    }

    pub fn get_creator_stats_handler(&self) -> GetCreatorStatsHandler {
        GetCreatorStatsHandler::new(self.stats_reader.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers (POST endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/payments/confirmations - Apply a confirmed payment
///
/// Safe to call any number of times for the same provider transaction id.
/// Replays answer `200 OK` with `already_processed: true`.
pub async fn confirm_payment(
    State(state): State<PaymentAppState>,
    Json(request): Json<ConfirmPaymentRequest>,
) -> Result<impl IntoResponse, PaymentApiError> {
    let confirmation = PaymentConfirmation::try_from(request)?;
    let handler = state.apply_payment_handler();

    let outcome = handler
        .handle(ApplyPaymentCommand { confirmation })
        .await?;

    let status = if outcome.already_processed {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };

    Ok((status, Json(PaymentOutcomeResponse::from(outcome))))
}

// ════════════════════════════════════════════════════════════════════════════════
// Query Handlers (GET endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/transactions/:provider_transaction_id
pub async fn get_transaction(
    State(state): State<PaymentAppState>,
    Path(provider_transaction_id): Path<String>,
) -> Result<impl IntoResponse, PaymentApiError> {
    let handler = state.get_transaction_handler();
    let entry = handler
        .handle(GetTransactionQuery {
            provider_transaction_id,
        })
        .await?;

    Ok(Json(TransactionResponse::from(entry)))
}

/// GET /api/subscriptions/:id?include_payments=true
pub async fn get_subscription(
    State(state): State<PaymentAppState>,
    Path(id): Path<String>,
    Query(params): Query<SubscriptionParams>,
) -> Result<impl IntoResponse, PaymentApiError> {
    let subscription_id: SubscriptionId = id
        .parse()
        .map_err(|_| PaymentError::validation("subscription_id", "must be a UUID"))?;

    let handler = state.get_subscription_handler();
    let result = handler
        .handle(GetSubscriptionQuery {
            subscription_id,
            include_payments: params.include_payments,
        })
        .await?;

    Ok(Json(SubscriptionResponse::from(result)))
}

/// GET /api/creators/:creator_id/stats
pub async fn get_creator_stats(
    State(state): State<PaymentAppState>,
    Path(creator_id): Path<String>,
) -> Result<impl IntoResponse, PaymentApiError> {
    let creator_id = UserId::new(creator_id)?;

    let handler = state.get_creator_stats_handler();
    let stats = handler.handle(GetCreatorStatsQuery { creator_id }).await?;

    Ok(Json(CreatorStatsResponse::from(stats)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error wrapper for payment errors.
#[derive(Debug)]
pub struct PaymentApiError(PaymentError);

impl From<PaymentError> for PaymentApiError {
    fn from(err: PaymentError) -> Self {
        Self(err)
    }
}

impl From<ValidationError> for PaymentApiError {
    fn from(err: ValidationError) -> Self {
        Self(err.into())
    }
}

impl PaymentApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            PaymentError::InvalidTarget(_) => StatusCode::UNPROCESSABLE_ENTITY,
            PaymentError::ValidationFailed { .. } => StatusCode::BAD_REQUEST,
            PaymentError::SubscriptionNotFound(_) | PaymentError::TransactionNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            PaymentError::InvalidState(_) => StatusCode::CONFLICT,
            PaymentError::StoreUnavailable(_) | PaymentError::TransientWriteFailure { .. } => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            PaymentError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for PaymentApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(error = %self.0, "Payment request failed");
        }

        let code = self.0.code().to_string();
        let body = match &self.0 {
            PaymentError::ValidationFailed { field, message } => ErrorResponse::with_details(
                code,
                message.clone(),
                serde_json::json!({ "field": field }),
            ),
            PaymentError::TransientWriteFailure { attempts, .. } => ErrorResponse::with_details(
                code,
                self.0.message(),
                serde_json::json!({ "attempts": attempts, "retryable": true }),
            ),
            _ => ErrorResponse::new(code, self.0.message()),
        };

        (status, Json(body)).into_response()
    }
}
