//! PostgreSQL adapters.
//!
//! Schema lives in `migrations/` at the crate root.

mod account_directory;
mod creator_application_repository;
mod errors;
mod payment_reader;
mod payment_store;
mod rows;

pub use account_directory::PostgresAccountDirectory;
pub use creator_application_repository::PostgresCreatorApplicationRepository;
pub use payment_reader::PostgresPaymentReader;
pub use payment_store::{PostgresPaymentStore, PostgresPaymentTransaction};
