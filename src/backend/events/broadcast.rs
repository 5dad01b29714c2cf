/**
 * Notification Broadcasting
 *
 * Comment notifications leave the process on a `tokio::sync::broadcast`
 * channel. Delivery to end users is the subscribers' job; this side only
 * publishes and never waits.
 */

use tokio::sync::broadcast;

use crate::shared::CommentNotification;

/// Sending half of the notification channel
///
/// Cheap to clone; every clone publishes to the same subscribers.
pub type NotificationBroadcast = broadcast::Sender<CommentNotification>;

/// Create a notification channel holding up to `capacity` undelivered events
pub fn notification_channel(capacity: usize) -> NotificationBroadcast {
    let (tx, _) = broadcast::channel(capacity);
    tx
}

/// Publish a notification to all current subscribers
///
/// # Returns
///
/// Number of subscribers that received it (0 if there were none)
pub fn broadcast_notification(
    broadcast_tx: &NotificationBroadcast,
    notification: CommentNotification,
) -> usize {
    match broadcast_tx.send(notification) {
        Ok(subscriber_count) => {
            tracing::info!("[Notify] Notification sent to {} subscribers", subscriber_count);
            subscriber_count
        }
        Err(e) => {
            tracing::debug!("[Notify] No subscribers for notification: {:?}", e.0);
            0
        }
    }
}
