//! Ledger reader port (read side).

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, SubscriptionId};
use crate::domain::ledger::LedgerEntry;

/// Read-only access to committed ledger entries.
#[async_trait]
pub trait LedgerReader: Send + Sync {
    /// Finds the entry recorded for a provider transaction id.
    async fn find_by_provider_transaction_id(
        &self,
        provider_transaction_id: &str,
    ) -> Result<Option<LedgerEntry>, DomainError>;

    /// Lists every payment recorded against a subscription, oldest first.
    async fn list_by_subscription(
        &self,
        subscription_id: SubscriptionId,
    ) -> Result<Vec<LedgerEntry>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ledger_reader_is_object_safe() {
        fn _accepts_dyn(_reader: &dyn LedgerReader) {}
    }
}
