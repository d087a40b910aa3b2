//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Write Ports
//!
//! - `PaymentStore` / `PaymentTransaction` - Atomic unit of work for payments
//! - `CreatorApplicationRepository` - Creator applications and rejection history
//! - `AccountDirectory` - Creator lookup and promotion
//!
//! ## Read Ports
//!
//! - `LedgerReader`, `SubscriptionReader`, `CreatorStatsReader`
//!
//! ## Side Effects
//!
//! - `NotificationDispatcher` - Best-effort notifications
//! - `Clock` - Source of `now`

mod account_directory;
mod clock;
mod creator_application_repository;
mod creator_stats_reader;
mod ledger_reader;
mod notification_dispatcher;
mod payment_store;
mod subscription_reader;

pub use account_directory::AccountDirectory;
pub use clock::{Clock, FixedClock, SystemClock};
pub use creator_application_repository::CreatorApplicationRepository;
pub use creator_stats_reader::CreatorStatsReader;
pub use ledger_reader::LedgerReader;
pub use notification_dispatcher::NotificationDispatcher;
pub use payment_store::{PaymentStore, PaymentTransaction, StoreError, UniqueConstraint};
pub use subscription_reader::SubscriptionReader;
