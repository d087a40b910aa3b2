//! Creator Subscriptions - payment application and subscription lifecycle engine
//!
//! Turns provider-confirmed payments into subscription state exactly once per
//! provider transaction id, keeps an append-only payment ledger and per-creator
//! counters, and gates creator-account reapplication behind a soft lock.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
