//! Subscription domain module.
//!
//! # Module Structure
//!
//! - `aggregate` - Subscription aggregate and its composite key
//! - `status` - SubscriptionStatus state machine
//! - `kind` - SubscriptionKind (content vs messaging access)
//! - `period` - BillingPeriods per kind
//! - `transition` - `decide`, the create/renew/reactivate policy
//! - `errors` - PaymentError

mod aggregate;
mod errors;
mod kind;
mod period;
mod status;
mod transition;

pub use aggregate::{Subscription, SubscriptionKey};
pub use errors::PaymentError;
pub use kind::SubscriptionKind;
pub use period::BillingPeriods;
pub use status::SubscriptionStatus;
pub use transition::{decide, Transition, TransitionKind};
