//! Account roles as seen by the payment path.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Role of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    #[default]
    Member,
    Creator,
}

impl AccountKind {
    /// Only creators can receive subscription payments.
    pub fn is_creator(&self) -> bool {
        matches!(self, AccountKind::Creator)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::Member => "member",
            AccountKind::Creator => "creator",
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AccountKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "member" => Ok(AccountKind::Member),
            "creator" => Ok(AccountKind::Creator),
            other => Err(ValidationError::invalid_format(
                "account_kind",
                format!("unknown account kind '{}'", other),
            )),
        }
    }
}
