//! Axum router configuration for creator application endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    approve_application, get_eligibility, reject_application, submit_application,
    CreatorApplicationAppState,
};

/// Create the creator application router, mounted at `/creator-applications`.
pub fn creator_application_routes() -> Router<CreatorApplicationAppState> {
    Router::new()
        .route("/", post(submit_application))
        .route("/:id/reject", post(reject_application))
        .route("/:id/approve", post(approve_application))
        .route("/eligibility/:user_id", get(get_eligibility))
}

pub fn creator_application_router() -> Router<CreatorApplicationAppState> {
    Router::new().nest("/creator-applications", creator_application_routes())
}
