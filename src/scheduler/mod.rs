mod fairing;
mod periodic;

use crate::domain::{LookaheadWindow, NotificationPayload, PushSubscription};
use crate::error::error_chain_fmt;
use crate::push::{DeliveryError, PushClient};
use crate::store::{Clock, DueNotification, EventStore};
use async_trait::async_trait;
pub use fairing::SchedulerFairing;
pub use periodic::{Job, PeriodicTask};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use uuid::Uuid;

const DEFAULT_LOOKAHEAD_MINUTES: i64 = 5;
const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_ICON_URL: &str = "https://i.imgur.com/qAN8mp4.png";

/// Sends a reminder for every event about to start whose owner opted in to
/// push notifications, and drops subscriptions the push service reports gone.
pub struct NotificationScheduler {
    store: Arc<dyn EventStore>,
    clock: Arc<dyn Clock>,
    push_client: Arc<dyn PushClient>,
    lookahead: chrono::Duration,
    send_timeout: Duration,
    icon_url: String,
    // Held for the whole tick.
    in_flight: Mutex<()>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    Completed(TickReport),
    Skipped,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub due: usize,
    pub delivered: usize,
    pub failed: usize,
    pub unsubscribed: usize,
    /// Deliveries not attempted because their subscription was already found gone this tick.
    pub skipped: usize,
}

#[derive(thiserror::Error)]
pub enum TickError {
    #[error("Failed to read the current time.")]
    Clock(#[source] anyhow::Error),
    #[error("Failed to fetch the events due for a reminder.")]
    Fetch(#[source] anyhow::Error),
}

impl std::fmt::Debug for TickError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl NotificationScheduler {
    pub fn new(
        store: Arc<dyn EventStore>,
        clock: Arc<dyn Clock>,
        push_client: Arc<dyn PushClient>,
    ) -> Self {
        Self {
            store,
            clock,
            push_client,
            lookahead: chrono::Duration::minutes(DEFAULT_LOOKAHEAD_MINUTES),
            send_timeout: DEFAULT_SEND_TIMEOUT,
            icon_url: DEFAULT_ICON_URL.into(),
            in_flight: Mutex::new(()),
        }
    }

    pub fn with_lookahead(mut self, lookahead: chrono::Duration) -> Self {
        self.lookahead = lookahead;
        self
    }

    pub fn with_send_timeout(mut self, timeout: Duration) -> Self {
        self.send_timeout = timeout;
        self
    }

    pub fn with_icon_url(mut self, icon_url: impl Into<String>) -> Self {
        self.icon_url = icon_url.into();
        self
    }

    /// Delivery failures never fail the tick, only clock and fetch failures do.
    #[tracing::instrument(
        name = "Notification tick",
        skip(self),
        fields(tick_id = %Uuid::new_v4())
    )]
    pub async fn tick(&self) -> Result<TickOutcome, TickError> {
        let _guard = match self.in_flight.try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                tracing::warn!("The previous notification tick is still running, skipping.");
                return Ok(TickOutcome::Skipped);
            }
        };

        let now = self.clock.now().await.map_err(TickError::Clock)?;
        let window = LookaheadWindow::starting_at(now, self.lookahead);
        let due = self
            .store
            .due_notifications(&window)
            .await
            .map_err(TickError::Fetch)?;

        let mut report = TickReport {
            due: due.len(),
            ..TickReport::default()
        };
        if due.is_empty() {
            tracing::info!("No upcoming events to notify.");
            return Ok(TickOutcome::Completed(report));
        }
        tracing::info!(due = due.len(), "Found upcoming events to notify.");

        let mut gone: HashSet<String> = HashSet::new();
        for notification in due {
            if gone.contains(&notification.subscription) {
                report.skipped += 1;
                continue;
            }
            match self.deliver(&notification).await {
                Ok(()) => {
                    report.delivered += 1;
                    tracing::info!(event_id = %notification.event_id, "Notification delivered.");
                }
                Err(error) if error.is_permanent() => {
                    report.failed += 1;
                    tracing::info!(
                        event_id = %notification.event_id,
                        error = %error,
                        "The subscription is no longer valid, removing it."
                    );
                    report.unsubscribed += self.unsubscribe(&notification).await;
                    gone.insert(notification.subscription);
                }
                Err(error) => {
                    report.failed += 1;
                    tracing::error!(
                        event_id = %notification.event_id,
                        error.cause_chain = ?error,
                        "Failed to deliver the notification."
                    );
                }
            }
        }
        Ok(TickOutcome::Completed(report))
    }

    async fn deliver(&self, notification: &DueNotification) -> Result<(), DeliveryError> {
        let subscription = PushSubscription::parse(&notification.subscription)
            .map_err(DeliveryError::InvalidSubscription)?;
        let payload = NotificationPayload::event_reminder(&notification.title, &self.icon_url);
        tokio::time::timeout(
            self.send_timeout,
            self.push_client.send(&subscription, &payload),
        )
        .await
        .unwrap_or(Err(DeliveryError::TimedOut(self.send_timeout)))
    }

    async fn unsubscribe(&self, notification: &DueNotification) -> usize {
        match self
            .store
            .clear_subscription(&notification.subscription)
            .await
        {
            Ok(rows_affected) => rows_affected,
            Err(error) => {
                tracing::error!(
                    event_id = %notification.event_id,
                    error.cause_chain = ?error,
                    "Failed to clear the invalid subscription."
                );
                0
            }
        }
    }
}

#[async_trait]
impl Job for NotificationScheduler {
    fn name(&self) -> &'static str {
        "notification-scheduler"
    }

    async fn run(&self) {
        match self.tick().await {
            Ok(TickOutcome::Completed(report)) => tracing::info!(
                due = report.due,
                delivered = report.delivered,
                failed = report.failed,
                unsubscribed = report.unsubscribed,
                skipped = report.skipped,
                "Notification tick completed."
            ),
            Ok(TickOutcome::Skipped) => {}
            Err(error) => tracing::error!(
                error.cause_chain = ?error,
                "Notification tick aborted."
            ),
        }
    }
}
