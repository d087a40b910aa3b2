use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{SubscriptionId, Timestamp, TransactionId, UserId, ValidationError};
use crate::domain::subscription::{Transition, TransitionKind};

/// Ledger entry status. The engine only records confirmed payments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerStatus {
    #[default]
    Succeeded,
}

impl LedgerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LedgerStatus::Succeeded => "succeeded",
        }
    }
}

impl fmt::Display for LedgerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LedgerStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "succeeded" => Ok(LedgerStatus::Succeeded),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown ledger status '{}'", other),
            )),
        }
    }
}

/// Snapshot of the transition a payment caused, kept so that replays return
/// exactly what the first application returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedTransition {
    pub kind: TransitionKind,
    pub previous_end_date: Option<Timestamp>,
    pub new_end_date: Timestamp,
    pub renewal_count: u32,
}

impl From<&Transition> for AppliedTransition {
    fn from(t: &Transition) -> Self {
        Self {
            kind: t.kind,
            previous_end_date: t.previous_end_date,
            new_end_date: t.end_date,
            renewal_count: t.renewal_count,
        }
    }
}

/// A recorded, confirmed payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: TransactionId,
    pub subscription_id: SubscriptionId,
    pub subscriber_id: UserId,
    pub creator_id: UserId,

    /// Amount in minor units.
    pub amount: i64,
    pub currency: String,
    pub status: LedgerStatus,

    /// Name of the originating payment system.
    pub provider: String,

    /// Idempotency key. Unique across the ledger.
    pub provider_transaction_id: String,

    pub payment_method: Option<String>,
    pub created_at: Timestamp,

    /// Missing for entries written before snapshots were recorded.
    pub applied: Option<AppliedTransition>,
}
