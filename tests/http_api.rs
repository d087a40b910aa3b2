//! HTTP integration tests.
//!
//! Drives the full router over in-memory adapters with `tower::ServiceExt`,
//! checking status codes and response bodies.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use creator_subscriptions::adapters::http::{
    api_router, CreatorApplicationAppState, PaymentAppState,
};
use creator_subscriptions::adapters::memory::{
    InMemoryAccountDirectory, InMemoryCreatorApplicationRepository, InMemoryPaymentStore,
};
use creator_subscriptions::adapters::notifications::RecordingNotificationDispatcher;
use creator_subscriptions::application::handlers::payment::ApplyPaymentSettings;
use creator_subscriptions::domain::creator_application::ReapplicationPolicy;
use creator_subscriptions::domain::foundation::{Timestamp, UserId};
use creator_subscriptions::ports::FixedClock;

// =============================================================================
// Test Infrastructure
// =============================================================================

fn app() -> Router {
    let store = Arc::new(InMemoryPaymentStore::new());
    let accounts = Arc::new(InMemoryAccountDirectory::with_creators([
        UserId::new("creator-1").unwrap()
    ]));
    let clock = Arc::new(FixedClock::new(Timestamp::epoch()));

    let payments = PaymentAppState {
        store: store.clone(),
        accounts: accounts.clone(),
        notifier: Arc::new(RecordingNotificationDispatcher::new()),
        clock: clock.clone(),
        ledger_reader: store.clone(),
        subscription_reader: store.clone(),
        stats_reader: store,
        settings: ApplyPaymentSettings::default(),
    };
    let applications = CreatorApplicationAppState {
        repository: Arc::new(InMemoryCreatorApplicationRepository::new()),
        accounts,
        clock,
        policy: ReapplicationPolicy::default(),
    };

    api_router(payments, applications, Duration::from_secs(5))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    let request = match body {
        Some(body) => request.body(Body::from(body.to_string())).unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

fn confirmation(provider_transaction_id: &str, creator_id: &str) -> Value {
    json!({
        "provider": "stripe",
        "provider_transaction_id": provider_transaction_id,
        "creator_id": creator_id,
        "subscriber_id": "fan-1",
        "amount": 1000,
        "currency": "usd",
        "payment_method": "card"
    })
}

// =============================================================================
// Payments
// =============================================================================

#[tokio::test]
async fn confirm_payment_creates_then_replays() {
    let app = app();

    let (status, first) = send(
        &app,
        "POST",
        "/api/payments/confirmations",
        Some(confirmation("pi_http", "creator-1")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["action"], "created");
    assert_eq!(first["already_processed"], false);
    assert_eq!(first["new_end_date"], "1970-01-31T00:00:00+00:00");

    let (status, second) = send(
        &app,
        "POST",
        "/api/payments/confirmations",
        Some(confirmation("pi_http", "creator-1")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["already_processed"], true);
    assert_eq!(second["subscription_id"], first["subscription_id"]);
    assert_eq!(second["transaction_id"], first["transaction_id"]);

    let (status, stats) = send(&app, "GET", "/api/creators/creator-1/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["subscribers_count"], 1);
}

#[tokio::test]
async fn payment_to_non_creator_is_unprocessable() {
    let app = app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/payments/confirmations",
        Some(confirmation("pi_nobody", "fan-2")),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error_code"], "INVALID_TARGET");
}

#[tokio::test]
async fn malformed_start_date_is_bad_request() {
    let app = app();
    let mut request = confirmation("pi_date", "creator-1");
    request["started_at"] = json!("next tuesday");

    let (status, body) = send(&app, "POST", "/api/payments/confirmations", Some(request)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], "VALIDATION_FAILED");
    assert_eq!(body["details"]["field"], "started_at");
}

#[tokio::test]
async fn transaction_and_subscription_lookups() {
    let app = app();
    let (_, outcome) = send(
        &app,
        "POST",
        "/api/payments/confirmations",
        Some(confirmation("pi_lookup", "creator-1")),
    )
    .await;

    let (status, entry) = send(&app, "GET", "/api/transactions/pi_lookup", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(entry["provider_transaction_id"], "pi_lookup");
    assert_eq!(entry["subscription_id"], outcome["subscription_id"]);

    let uri = format!(
        "/api/subscriptions/{}?include_payments=true",
        outcome["subscription_id"].as_str().unwrap()
    );
    let (status, subscription) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(subscription["status"], "active");
    assert_eq!(subscription["is_current"], true);
    assert_eq!(subscription["payments"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn unknown_resources_are_not_found() {
    let app = app();

    let (status, body) = send(&app, "GET", "/api/transactions/pi_missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_code"], "TRANSACTION_NOT_FOUND");

    let uri = "/api/subscriptions/550e8400-e29b-41d4-a716-446655440000";
    let (status, _) = send(&app, "GET", uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "GET", "/api/subscriptions/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Creator applications
// =============================================================================

#[tokio::test]
async fn application_review_cycle() {
    let app = app();

    let (status, application) = send(
        &app,
        "POST",
        "/api/creator-applications",
        Some(json!({ "user_id": "artist-1" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(application["status"], "pending");
    let id = application["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        "POST",
        "/api/creator-applications",
        Some(json!({ "user_id": "artist-1" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, rejection) = send(
        &app,
        "POST",
        &format!("/api/creator-applications/{}/reject", id),
        Some(json!({ "reason": "needs samples" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rejection["application"]["status"], "rejected");
    assert_eq!(rejection["reapplication"]["rejection_count"], 1);
    assert_eq!(rejection["reapplication"]["eligible"], true);

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/creator-applications/{}/approve", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, eligibility) = send(
        &app,
        "GET",
        "/api/creator-applications/eligibility/artist-1",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(eligibility["eligible"], true);
    assert_eq!(eligibility["requires_support"], false);
}

#[tokio::test]
async fn approval_makes_user_payable() {
    let app = app();
    let (_, application) = send(
        &app,
        "POST",
        "/api/creator-applications",
        Some(json!({ "user_id": "artist-2" })),
    )
    .await;
    let id = application["id"].as_str().unwrap();

    let (status, approved) = send(
        &app,
        "POST",
        &format!("/api/creator-applications/{}/approve", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(approved["status"], "approved");

    let (status, _) = send(
        &app,
        "POST",
        "/api/payments/confirmations",
        Some(confirmation("pi_artist", "artist-2")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn unknown_application_is_not_found() {
    let app = app();
    let uri = "/api/creator-applications/550e8400-e29b-41d4-a716-446655440000/approve";

    let (status, body) = send(&app, "POST", uri, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_code"], "APPLICATION_NOT_FOUND");
}

#[tokio::test]
async fn health_endpoint_responds() {
    let app = app();
    let (status, _) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
}
