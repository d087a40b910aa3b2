//! HTTP adapter for creator application endpoints.
//!
//! - `POST /api/creator-applications` - Apply for a creator account
//! - `POST /api/creator-applications/:id/reject` - Reject a pending application
//! - `POST /api/creator-applications/:id/approve` - Approve and promote to creator
//! - `GET /api/creator-applications/eligibility/:user_id` - Reapplication lock state

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::{CreatorApplicationApiError, CreatorApplicationAppState};
pub use routes::creator_application_router;
