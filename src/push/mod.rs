mod vapid_push_client;

use crate::domain::{NotificationPayload, PushSubscription};
use async_trait::async_trait;
use std::time::Duration;
pub use vapid_push_client::VapidPushClient;

#[async_trait]
pub trait PushClient: Send + Sync {
    async fn send(
        &self,
        subscription: &PushSubscription,
        payload: &NotificationPayload,
    ) -> Result<(), DeliveryError>;
}

#[derive(thiserror::Error, Debug)]
pub enum DeliveryError {
    #[error("The push endpoint no longer exists (status {0}).")]
    Gone(u16),
    #[error("The push service rejected the notification (status {0}).")]
    Rejected(u16),
    #[error("The push service did not answer within {0:?}.")]
    TimedOut(Duration),
    #[error("The subscription cannot be used for delivery: {0}")]
    InvalidSubscription(String),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl DeliveryError {
    /// Classify a push-service HTTP status; 404 and 410 mean the endpoint is gone.
    pub fn from_status(status: u16) -> Self {
        match status {
            404 | 410 => DeliveryError::Gone(status),
            other => DeliveryError::Rejected(other),
        }
    }

    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            DeliveryError::Gone(_) | DeliveryError::InvalidSubscription(_)
        )
    }
}
