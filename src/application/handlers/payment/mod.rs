//! Payment handlers.
//!
//! ## Commands
//! - Applying a confirmed payment (create, renew or reactivate a subscription)
//!
//! ## Queries
//! - Ledger entry by provider transaction id
//! - Subscription by id
//! - Creator statistics

mod apply_payment;
mod get_creator_stats;
mod get_subscription;
mod get_transaction;

// Commands
pub use apply_payment::{
    ApplyPaymentCommand, ApplyPaymentHandler, ApplyPaymentResult, ApplyPaymentSettings,
};

// Queries
pub use get_creator_stats::{GetCreatorStatsHandler, GetCreatorStatsQuery, GetCreatorStatsResult};
pub use get_subscription::{GetSubscriptionHandler, GetSubscriptionQuery, GetSubscriptionResult};
pub use get_transaction::{GetTransactionHandler, GetTransactionQuery, GetTransactionResult};
