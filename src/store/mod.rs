mod postgres;

use crate::domain::LookaheadWindow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
pub use postgres::{PgEventStore, PgPool};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DueNotification {
    pub event_id: Uuid,
    pub title: String,
    /// Raw `users.push_subscription` value, exactly as stored.
    pub subscription: String,
}

/// The authority "now" is read from.
///
/// It must be the same clock that stamped the stored `start_time`s, otherwise
/// skew between hosts makes events fall out of the lookahead window.
#[async_trait]
pub trait Clock: Send + Sync {
    async fn now(&self) -> Result<DateTime<Utc>, anyhow::Error>;
}

#[async_trait]
pub trait EventStore: Send + Sync {
    async fn due_notifications(
        &self,
        window: &LookaheadWindow,
    ) -> Result<Vec<DueNotification>, anyhow::Error>;

    async fn clear_subscription(&self, subscription: &str) -> Result<usize, anyhow::Error>;
}
