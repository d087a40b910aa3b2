//! In-memory adapters.
//!
//! Complete implementations of the storage ports, used by tests and by the
//! service when no database is configured.

mod account_directory;
mod creator_application_repository;
mod payment_store;

pub use account_directory::InMemoryAccountDirectory;
pub use creator_application_repository::InMemoryCreatorApplicationRepository;
pub use payment_store::{InMemoryPaymentStore, InMemoryPaymentTransaction};
