//! Payment transition selection.
//!
//! `decide` is the whole of the lifecycle policy: given the subscription on
//! file (if any), the current time and the paid period, it picks create,
//! renew or reactivate and computes the resulting window.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

use super::{Subscription, SubscriptionStatus};

/// Which lifecycle transition a payment triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    /// First payment for this (creator, subscriber, kind).
    Create,
    /// Payment while the current window is still running.
    Renew,
    /// Payment after the window lapsed, or on a non-active record.
    Reactivate,
}

impl TransitionKind {
    /// Change to the creator's subscriber count caused by this transition.
    pub fn subscribers_delta(&self) -> i64 {
        match self {
            TransitionKind::Create | TransitionKind::Reactivate => 1,
            TransitionKind::Renew => 0,
        }
    }
}

/// The computed result of applying one payment to a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub kind: TransitionKind,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    pub renewal_count: u32,
    /// End date before this payment, `None` on create.
    pub previous_end_date: Option<Timestamp>,
}

/// Selects the transition for a payment.
///
/// Renewals extend from the current `end_date`, never from `now`, so paying
/// early is not penalized. Anything that is not an unexpired active record is
/// reactivated with a fresh window starting at `start`.
pub fn decide(
    existing: Option<&Subscription>,
    now: Timestamp,
    start: Timestamp,
    duration: Duration,
) -> Transition {
    match existing {
        None => Transition {
            kind: TransitionKind::Create,
            start_date: start,
            end_date: start.plus(duration),
            renewal_count: 0,
            previous_end_date: None,
        },
        Some(sub) if sub.status == SubscriptionStatus::Active && sub.end_date > now => Transition {
            kind: TransitionKind::Renew,
            start_date: sub.start_date,
            end_date: sub.end_date.plus(duration),
            renewal_count: sub.renewal_count.saturating_add(1),
            previous_end_date: Some(sub.end_date),
        },
        Some(sub) => Transition {
            kind: TransitionKind::Reactivate,
            start_date: start,
            end_date: start.plus(duration),
            renewal_count: sub.renewal_count.saturating_add(1),
            previous_end_date: Some(sub.end_date),
        },
    }
}
