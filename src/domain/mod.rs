//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, state machine)
//! - `subscription` - Subscription aggregate and the create/renew/reactivate policy
//! - `ledger` - Immutable record of confirmed payments
//! - `payment` - Payment confirmations and outcomes
//! - `stats` - Per-creator counters and their deltas
//! - `notification` - Notification requests emitted after payments
//! - `account` - Account roles
//! - `creator_application` - Creator applications and the reapplication lock

pub mod account;
pub mod creator_application;
pub mod foundation;
pub mod ledger;
pub mod notification;
pub mod payment;
pub mod stats;
pub mod subscription;
