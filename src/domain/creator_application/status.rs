//! Creator application status state machine.

use crate::domain::foundation::{StateMachine, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Review status of an application to become a creator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    /// Submitted, awaiting review.
    Pending,
    /// Accepted; the account was promoted to creator.
    Approved,
    /// Declined; counts towards the reapplication lock.
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ApplicationStatus::Pending),
            "approved" => Ok(ApplicationStatus::Approved),
            "rejected" => Ok(ApplicationStatus::Rejected),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown application status '{}'", other),
            )),
        }
    }
}

impl StateMachine for ApplicationStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use ApplicationStatus::*;
        matches!((self, target), (Pending, Approved) | (Pending, Rejected))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use ApplicationStatus::*;
        match self {
            Pending => vec![Approved, Rejected],
            Approved | Rejected => vec![],
        }
    }
}
