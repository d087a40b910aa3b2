//! Per-creator aggregate statistics.
//!
//! Counters are only ever moved by explicit deltas; this crate never
//! recomputes them from subscriptions.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::UserId;
use crate::domain::subscription::TransitionKind;

/// Increment to apply to a creator's counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsDelta {
    pub subscribers_count: i64,
}

impl StatsDelta {
    /// Delta caused by a payment transition: +1 subscriber on create and
    /// reactivate, nothing on renew.
    pub fn for_transition(kind: TransitionKind) -> Self {
        Self {
            subscribers_count: kind.subscribers_delta(),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.subscribers_count == 0
    }
}

/// Current counters for one creator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatorStats {
    pub creator_id: UserId,
    pub subscribers_count: i64,
}

impl CreatorStats {
    /// Counters for a creator with no recorded activity.
    pub fn empty(creator_id: UserId) -> Self {
        Self {
            creator_id,
            subscribers_count: 0,
        }
    }

    pub fn apply(&mut self, delta: StatsDelta) {
        self.subscribers_count += delta.subscribers_count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_create_and_reactivate_count_subscribers() {
        assert_eq!(StatsDelta::for_transition(TransitionKind::Create).subscribers_count, 1);
        assert_eq!(StatsDelta::for_transition(TransitionKind::Reactivate).subscribers_count, 1);
        assert!(StatsDelta::for_transition(TransitionKind::Renew).is_zero());
    }

    #[test]
    fn apply_accumulates() {
        let mut stats = CreatorStats::empty(UserId::new("creator-1").unwrap());
        stats.apply(StatsDelta { subscribers_count: 1 });
        stats.apply(StatsDelta { subscribers_count: 1 });
        assert_eq!(stats.subscribers_count, 2);
    }

    #[test]
    fn delta_serializes_camel_case() {
        let json = serde_json::to_value(StatsDelta { subscribers_count: 1 }).unwrap();
        assert_eq!(json, serde_json::json!({ "subscribersCount": 1 }));
    }
}
