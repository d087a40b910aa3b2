//! Subscription kinds.
//!
//! A subscriber can hold one subscription per kind with the same creator.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// What a subscription grants access to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionKind {
    /// Access to the creator's posts and media.
    #[default]
    ContentAccess,

    /// Direct messaging with the creator.
    MessagingAccess,
}

impl SubscriptionKind {
    /// Returns all kinds.
    pub fn all() -> &'static [SubscriptionKind] {
        &[
            SubscriptionKind::ContentAccess,
            SubscriptionKind::MessagingAccess,
        ]
    }

    /// Returns the storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionKind::ContentAccess => "content_access",
            SubscriptionKind::MessagingAccess => "messaging_access",
        }
    }
}

impl fmt::Display for SubscriptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SubscriptionKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "content_access" => Ok(SubscriptionKind::ContentAccess),
            "messaging_access" => Ok(SubscriptionKind::MessagingAccess),
            other => Err(ValidationError::invalid_format(
                "kind",
                format!("unknown subscription kind '{}'", other),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_content_access() {
        assert_eq!(SubscriptionKind::default(), SubscriptionKind::ContentAccess);
    }

    #[test]
    fn parses_storage_representation() {
        for kind in SubscriptionKind::all() {
            assert_eq!(kind.as_str().parse::<SubscriptionKind>().unwrap(), *kind);
        }
    }

    #[test]
    fn rejects_unknown_kind() {
        assert!("video_calls".parse::<SubscriptionKind>().is_err());
    }

    #[test]
    fn serializes_snake_case() {
        let json = serde_json::to_string(&SubscriptionKind::MessagingAccess).unwrap();
        assert_eq!(json, "\"messaging_access\"");
    }
}
