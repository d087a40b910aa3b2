//! Payment confirmations and the outcomes of applying them.
//!
//! # Module Structure
//!
//! - `confirmation` - PaymentConfirmation, the typed provider-neutral input
//! - `outcome` - PaymentOutcome and OutcomeAction

mod confirmation;
mod outcome;

pub use confirmation::PaymentConfirmation;
pub use outcome::{OutcomeAction, PaymentOutcome};
