mod lookahead_window;
mod notification_payload;
mod push_subscription;

pub use lookahead_window::LookaheadWindow;
pub use notification_payload::NotificationPayload;
pub use push_subscription::PushSubscription;
