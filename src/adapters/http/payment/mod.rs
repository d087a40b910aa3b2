//! HTTP adapter for payment endpoints.
//!
//! - `POST /api/payments/confirmations` - Apply a confirmed payment
//! - `GET /api/transactions/:provider_transaction_id` - Look up a payment
//! - `GET /api/subscriptions/:id` - Look up a subscription
//! - `GET /api/creators/:creator_id/stats` - Creator statistics

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::{PaymentApiError, PaymentAppState};
pub use routes::payment_router;
