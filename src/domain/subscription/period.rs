//! Billing period lengths per subscription kind.

use chrono::Duration;

use super::SubscriptionKind;

/// Length of one paid period for each subscription kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BillingPeriods {
    pub content_access: Duration,
    pub messaging_access: Duration,
}

impl BillingPeriods {
    pub const DEFAULT_PERIOD_DAYS: i64 = 30;

    /// Builds periods from whole-day lengths.
    pub fn from_days(content_access_days: i64, messaging_access_days: i64) -> Self {
        Self {
            content_access: Duration::days(content_access_days),
            messaging_access: Duration::days(messaging_access_days),
        }
    }

    /// Returns the period length for a kind.
    pub fn duration_for(&self, kind: SubscriptionKind) -> Duration {
        match kind {
            SubscriptionKind::ContentAccess => self.content_access,
            SubscriptionKind::MessagingAccess => self.messaging_access,
        }
    }
}

impl Default for BillingPeriods {
    fn default() -> Self {
        Self::from_days(Self::DEFAULT_PERIOD_DAYS, Self::DEFAULT_PERIOD_DAYS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_thirty_days_for_every_kind() {
        let periods = BillingPeriods::default();
        for kind in SubscriptionKind::all() {
            assert_eq!(periods.duration_for(*kind), Duration::days(30));
        }
    }

    #[test]
    fn kinds_can_differ() {
        let periods = BillingPeriods::from_days(30, 7);
        assert_eq!(
            periods.duration_for(SubscriptionKind::MessagingAccess),
            Duration::days(7)
        );
    }
}
