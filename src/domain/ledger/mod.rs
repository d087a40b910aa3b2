//! Transaction ledger.
//!
//! One immutable entry per confirmed payment, unique on the provider's
//! transaction id. That uniqueness is the idempotency key for the whole
//! payment path and is enforced by the store.

mod entry;

pub use entry::{AppliedTransition, LedgerEntry, LedgerStatus};
