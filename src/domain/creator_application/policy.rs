//! Reapplication soft lock.
//!
//! | Rejections | Result |
//! |------------|--------|
//! | 0 or 1 | eligible now |
//! | 2 up to threshold | eligible once the cooldown after the latest rejection passes |
//! | threshold or more | requires support, no timer unlocks it |

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

/// Rejections after which a cooldown applies.
const COOLDOWN_AFTER_REJECTIONS: u32 = 2;

/// Tunables for the reapplication lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReapplicationPolicy {
    pub cooldown: Duration,
    /// Rejection count at which only support can unlock the user.
    pub support_threshold: u32,
}

impl Default for ReapplicationPolicy {
    fn default() -> Self {
        Self {
            cooldown: Duration::hours(24),
            support_threshold: 3,
        }
    }
}

/// Lock state of a user's reapplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ReapplicationLock {
    Eligible,
    CoolingDown { allowed_at: Timestamp },
    RequiresSupport,
}

/// Result of evaluating a user's rejection history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReapplicationDecision {
    pub rejection_count: u32,
    pub reapplication_allowed_at: Option<Timestamp>,
    pub lock: ReapplicationLock,
}

impl ReapplicationDecision {
    pub fn is_eligible(&self) -> bool {
        matches!(self.lock, ReapplicationLock::Eligible)
    }
}

impl ReapplicationPolicy {
    /// Evaluates the lock from the timestamps of every past rejection.
    pub fn evaluate(&self, rejected_at: &[Timestamp], now: Timestamp) -> ReapplicationDecision {
        let rejection_count = u32::try_from(rejected_at.len()).unwrap_or(u32::MAX);
        let latest = rejected_at.iter().max().copied();

        if rejection_count >= self.support_threshold {
            return ReapplicationDecision {
                rejection_count,
                reapplication_allowed_at: None,
                lock: ReapplicationLock::RequiresSupport,
            };
        }

        let allowed_at = match latest {
            Some(latest) if rejection_count >= COOLDOWN_AFTER_REJECTIONS => {
                Some(latest.plus(self.cooldown))
            }
            _ => None,
        };

        let lock = match allowed_at {
            Some(at) if now < at => ReapplicationLock::CoolingDown { allowed_at: at },
            _ => ReapplicationLock::Eligible,
        };

        ReapplicationDecision {
            rejection_count,
            reapplication_allowed_at: allowed_at,
            lock,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn hour(n: i64) -> Timestamp {
        Timestamp::epoch().add_hours(n)
    }

    #[test]
    fn no_rejections_is_eligible() {
        let d = ReapplicationPolicy::default().evaluate(&[], hour(0));
        assert!(d.is_eligible());
        assert_eq!(d.rejection_count, 0);
    }

    #[test]
    fn one_rejection_is_immediately_eligible() {
        let d = ReapplicationPolicy::default().evaluate(&[hour(10)], hour(10));
        assert!(d.is_eligible());
        assert_eq!(d.reapplication_allowed_at, None);
    }

    #[test]
    fn two_rejections_lock_for_a_day_after_the_latest() {
        let policy = ReapplicationPolicy::default();
        let history = [hour(0), hour(5)];

        let locked = policy.evaluate(&history, hour(28));
        assert_eq!(locked.lock, ReapplicationLock::CoolingDown { allowed_at: hour(29) });
        assert!(!locked.is_eligible());

        let unlocked = policy.evaluate(&history, hour(29));
        assert!(unlocked.is_eligible());
        assert_eq!(unlocked.reapplication_allowed_at, Some(hour(29)));
    }

    #[test]
    fn history_order_does_not_matter() {
        let policy = ReapplicationPolicy::default();
        let a = policy.evaluate(&[hour(5), hour(0)], hour(10));
        let b = policy.evaluate(&[hour(0), hour(5)], hour(10));
        assert_eq!(a, b);
    }

    #[test]
    fn three_rejections_require_support_forever() {
        let d = ReapplicationPolicy::default().evaluate(&[hour(0), hour(1), hour(2)], hour(100_000));
        assert_eq!(d.lock, ReapplicationLock::RequiresSupport);
        assert_eq!(d.rejection_count, 3);
    }

    #[test]
    fn lock_serializes_with_state_tag() {
        let json = serde_json::to_value(ReapplicationLock::RequiresSupport).unwrap();
        assert_eq!(json, serde_json::json!({ "state": "requires_support" }));
    }

    proptest! {
        #[test]
        fn more_rejections_never_unlock_earlier(
            offsets in proptest::collection::vec(0i64..1000, 0..6),
            extra in 0i64..1000,
            now in 0i64..2000,
        ) {
            let policy = ReapplicationPolicy::default();
            let history: Vec<Timestamp> = offsets.iter().map(|h| hour(*h)).collect();
            let mut longer = history.clone();
            longer.push(hour(extra));

            let before = policy.evaluate(&history, hour(now));
            let after = policy.evaluate(&longer, hour(now));
            prop_assert!(before.is_eligible() || !after.is_eligible());
        }
    }
}
