//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `memory` - In-memory stores for tests and database-less runs
//! - `postgres` - PostgreSQL persistence via sqlx
//! - `notifications` - Outbound notification delivery
//! - `http` - Axum REST API

pub mod http;
pub mod memory;
pub mod notifications;
pub mod postgres;
