//! Post-commit events: notification channel and side-effect dispatcher.

pub mod broadcast;
pub mod dispatcher;

pub use broadcast::{broadcast_notification, NotificationBroadcast};
pub use dispatcher::EventDispatcher;
