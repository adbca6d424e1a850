use crate::configuration::DatabaseSettings;
use crate::domain::LookaheadWindow;
use crate::store::{Clock, DueNotification, EventStore};
use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_types::Timestamptz;
use std::time::Duration;
use uuid::Uuid;

pub type PgPool = Pool<ConnectionManager<PgConnection>>;

#[derive(Clone)]
pub struct PgEventStore {
    pool: PgPool,
}

#[derive(QueryableByName)]
struct DatabaseNow {
    #[diesel(sql_type = Timestamptz)]
    now: DateTime<Utc>,
}

impl PgEventStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn connect_lazy(settings: &DatabaseSettings) -> Self {
        let manager = ConnectionManager::<PgConnection>::new(settings.connection_string());
        let pool = Pool::builder()
            .max_size(settings.pool_size.max(1))
            .min_idle(Some(0))
            .connection_timeout(Duration::from_secs(5))
            .build_unchecked(manager);
        Self::new(pool)
    }

    async fn run<F, R>(&self, query: F) -> Result<R, anyhow::Error>
    where
        F: FnOnce(&mut PgConnection) -> Result<R, anyhow::Error> + Send + 'static,
        R: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool
                .get()
                .context("Failed to retrieve a connection from the DB pool.")?;
            query(&mut *conn)
        })
        .await
        .context("The blocking database task panicked or was cancelled.")?
    }
}

#[async_trait]
impl Clock for PgEventStore {
    async fn now(&self) -> Result<DateTime<Utc>, anyhow::Error> {
        self.run(|conn| {
            diesel::sql_query("SELECT now() AS now")
                .get_result::<DatabaseNow>(conn)
                .map(|row| row.now)
                .context("Failed to read the current time from the database.")
        })
        .await
    }
}

#[async_trait]
impl EventStore for PgEventStore {
    #[tracing::instrument(name = "Fetch events due for a reminder", skip(self))]
    async fn due_notifications(
        &self,
        window: &LookaheadWindow,
    ) -> Result<Vec<DueNotification>, anyhow::Error> {
        let (start, end) = (window.start(), window.end());
        self.run(move |conn| {
            use crate::schema::{events, users};

            let rows = events::table
                .inner_join(users::table)
                .filter(events::start_time.ge(start))
                .filter(events::start_time.le(end))
                .filter(users::push_subscription.is_not_null())
                .order(events::start_time.asc())
                .select((events::event_id, events::title, users::push_subscription))
                .load::<(Uuid, String, Option<String>)>(conn)
                .context("Failed to query the events due for a reminder.")?;

            Ok(rows
                .into_iter()
                .filter_map(|(event_id, title, subscription)| {
                    subscription.map(|subscription| DueNotification {
                        event_id,
                        title,
                        subscription,
                    })
                })
                .collect())
        })
        .await
    }

    #[tracing::instrument(name = "Clear a push subscription", skip(self, subscription))]
    async fn clear_subscription(&self, subscription: &str) -> Result<usize, anyhow::Error> {
        let subscription = subscription.to_string();
        self.run(move |conn| {
            use crate::schema::users;

            diesel::update(users::table.filter(users::push_subscription.eq(subscription)))
                .set(users::push_subscription.eq(None::<String>))
                .execute(conn)
                .context("Failed to clear the push subscription.")
        })
        .await
    }
}
