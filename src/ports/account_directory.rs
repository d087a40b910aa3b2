//! Account directory port.
//!
//! Resolves which users are creators. Owned by the identity side of the
//! platform; the payment path only reads it, and creator approval is the
//! only writer here.

use async_trait::async_trait;

use crate::domain::account::AccountKind;
use crate::domain::foundation::{DomainError, UserId};

#[async_trait]
pub trait AccountDirectory: Send + Sync {
    /// Returns the account's role, or `None` for an unknown user.
    async fn account_kind(&self, user_id: &UserId) -> Result<Option<AccountKind>, DomainError>;

    /// Marks the account as a creator, creating it if unknown.
    async fn promote_to_creator(&self, user_id: &UserId) -> Result<(), DomainError>;
}
