//! Notification requests emitted after a payment is applied.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::UserId;
use crate::domain::subscription::TransitionKind;

/// Kind of notification to deliver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NotificationType {
    /// Tells a creator they gained (or regained) a subscriber.
    NewSubscription,
    /// Tells a creator an existing subscriber renewed.
    RenewSubscription,
    /// Tells the subscriber their payment went through.
    SubscriptionConfirmed,
}

/// Fire-and-forget request handed to the notification dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRequest {
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub recipient_id: UserId,
    pub actor_id: UserId,
}

impl NotificationRequest {
    /// The creator and subscriber notifications for an applied payment.
    pub fn for_payment(kind: TransitionKind, creator_id: &UserId, subscriber_id: &UserId) -> [Self; 2] {
        let creator_type = match kind {
            TransitionKind::Renew => NotificationType::RenewSubscription,
            TransitionKind::Create | TransitionKind::Reactivate => NotificationType::NewSubscription,
        };
        [
            Self {
                notification_type: creator_type,
                recipient_id: creator_id.clone(),
                actor_id: subscriber_id.clone(),
            },
            Self {
                notification_type: NotificationType::SubscriptionConfirmed,
                recipient_id: subscriber_id.clone(),
                actor_id: creator_id.clone(),
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> (UserId, UserId) {
        (UserId::new("creator-1").unwrap(), UserId::new("fan-1").unwrap())
    }

    #[test]
    fn renewal_notifies_creator_of_renewal() {
        let (creator, fan) = ids();
        let [to_creator, to_fan] = NotificationRequest::for_payment(TransitionKind::Renew, &creator, &fan);

        assert_eq!(to_creator.notification_type, NotificationType::RenewSubscription);
        assert_eq!(to_creator.recipient_id, creator);
        assert_eq!(to_creator.actor_id, fan);
        assert_eq!(to_fan.notification_type, NotificationType::SubscriptionConfirmed);
        assert_eq!(to_fan.recipient_id, fan);
    }

    #[test]
    fn reactivation_counts_as_new_subscription() {
        let (creator, fan) = ids();
        let [to_creator, _] = NotificationRequest::for_payment(TransitionKind::Reactivate, &creator, &fan);
        assert_eq!(to_creator.notification_type, NotificationType::NewSubscription);
    }

    #[test]
    fn serializes_wire_shape() {
        let (creator, fan) = ids();
        let [to_creator, _] = NotificationRequest::for_payment(TransitionKind::Create, &creator, &fan);
        let json = serde_json::to_value(&to_creator).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "newSubscription",
                "recipientId": "creator-1",
                "actorId": "fan-1"
            })
        );
    }
}
