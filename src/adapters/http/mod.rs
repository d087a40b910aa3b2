//! HTTP adapters - REST API implementations.
//!
//! Each area has its own router and state; `api_router` mounts them all
//! under `/api` with request tracing and a per-request timeout.

pub mod creator_application;
mod error;
pub mod payment;

use std::time::Duration;

use axum::Router;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub use creator_application::{creator_application_router, CreatorApplicationAppState};
pub use error::ErrorResponse;
pub use payment::{payment_router, PaymentAppState};

/// Builds the complete service router.
pub fn api_router(
    payments: PaymentAppState,
    applications: CreatorApplicationAppState,
    request_timeout: Duration,
) -> Router {
    let api = Router::new()
        .merge(payment_router().with_state(payments))
        .merge(creator_application_router().with_state(applications));

    Router::new()
        .nest("/api", api)
        .route("/health", axum::routing::get(|| async { "ok" }))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
}
