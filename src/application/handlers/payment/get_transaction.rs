//! GetTransactionHandler - Query handler for ledger lookups by provider id.

use std::sync::Arc;

use crate::domain::ledger::LedgerEntry;
use crate::domain::subscription::PaymentError;
use crate::ports::LedgerReader;

/// Query for the ledger entry recorded for a provider transaction id.
#[derive(Debug, Clone)]
pub struct GetTransactionQuery {
    pub provider_transaction_id: String,
}

pub type GetTransactionResult = LedgerEntry;

pub struct GetTransactionHandler {
    reader: Arc<dyn LedgerReader>,
}

impl GetTransactionHandler {
    pub fn new(reader: Arc<dyn LedgerReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(
        &self,
        query: GetTransactionQuery,
    ) -> Result<GetTransactionResult, PaymentError> {
        self.reader
            .find_by_provider_transaction_id(&query.provider_transaction_id)
            .await
            .map_err(PaymentError::from)?
            .ok_or(PaymentError::TransactionNotFound(query.provider_transaction_id))
    }
}
