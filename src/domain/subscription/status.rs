//! Subscription status state machine.
//!
//! Every successful payment ends in `Active`. Lapsing and cancellation are
//! recorded by collaborators outside the payment path.

use crate::domain::foundation::{StateMachine, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Subscription lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    /// Checkout started but no payment confirmed yet.
    Pending,

    /// Paid and within its window (until `end_date` passes).
    Active,

    /// Window ended without renewal.
    Expired,

    /// Subscriber cancelled.
    Canceled,
}

impl SubscriptionStatus {
    /// Returns the storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Pending => "pending",
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Expired => "expired",
            SubscriptionStatus::Canceled => "canceled",
        }
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SubscriptionStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(SubscriptionStatus::Pending),
            "active" => Ok(SubscriptionStatus::Active),
            "expired" => Ok(SubscriptionStatus::Expired),
            "canceled" => Ok(SubscriptionStatus::Canceled),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown subscription status '{}'", other),
            )),
        }
    }
}

impl StateMachine for SubscriptionStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SubscriptionStatus::*;
        matches!(
            (self, target),
            (Pending, Active)
                | (Pending, Expired)
                | (Active, Active) // Renewal, or reactivation after silent lapse
                | (Active, Expired)
                | (Active, Canceled)
                | (Expired, Active)
                | (Canceled, Active)
                | (Canceled, Expired)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SubscriptionStatus::*;
        match self {
            Pending => vec![Active, Expired],
            Active => vec![Active, Expired, Canceled],
            Expired => vec![Active],
            Canceled => vec![Active, Expired],
        }
    }
}
