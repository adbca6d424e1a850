use crate::catchers::*;
use crate::configuration::Settings;
use crate::push::{PushClient, VapidPushClient};
use crate::routes::*;
use crate::scheduler::{NotificationScheduler, SchedulerFairing};
use crate::store::PgEventStore;
use rocket::figment::Figment;
use rocket::{Build, Rocket};
use rocket_sync_db_pools::database;
use std::sync::Arc;

#[database("calendar")]
pub struct CalendarDbConn(diesel::PgConnection);

/// The VAPID public key browsers need to create a push subscription.
pub struct VapidPublicKey(pub String);

pub struct Application {
    pub server: Rocket<Build>,
}

impl Application {
    pub fn build(configuration: &Settings) -> Result<Application, anyhow::Error> {
        let push_client = VapidPushClient::new(&configuration.push)?;
        Ok(Self::build_with_push_client(
            configuration,
            Arc::new(push_client),
        ))
    }

    pub fn build_with_push_client(
        configuration: &Settings,
        push_client: Arc<dyn PushClient>,
    ) -> Application {
        let mut server = rocket::custom(figment(configuration))
            .attach(CalendarDbConn::fairing())
            .manage(VapidPublicKey(configuration.push.vapid_public_key.clone()))
            .mount("/", routes![health, public_key, subscribe])
            .register(
                "/",
                catchers![
                    unauthorized_request_credentials,
                    unprocessable_entity_to_bad_request
                ],
            );

        if configuration.scheduler.enabled {
            let store = Arc::new(PgEventStore::connect_lazy(&configuration.database));
            let scheduler = NotificationScheduler::new(store.clone(), store, push_client)
                .with_lookahead(configuration.scheduler.lookahead())
                .with_send_timeout(configuration.push.timeout())
                .with_icon_url(&configuration.push.icon_url);
            server = server.attach(SchedulerFairing::new(
                Arc::new(scheduler),
                configuration.scheduler.tick_interval(),
            ));
        } else {
            tracing::info!("The notification scheduler is disabled.");
        }

        Application { server }
    }
}

fn figment(configuration: &Settings) -> Figment {
    let database = &configuration.database;
    rocket::Config::figment()
        .merge(("address", configuration.application.host))
        .merge(("port", configuration.application.port.unwrap_or(0)))
        .merge(("log_level", "off"))
        .merge(("databases.calendar.url", database.connection_string()))
        .merge(("databases.calendar.pool_size", database.pool_size))
}
