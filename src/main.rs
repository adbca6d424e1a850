use anyhow::{anyhow, Context};
use schedule_notifier::configuration::get_configuration;
use schedule_notifier::migrations;
use schedule_notifier::startup::Application;
use schedule_notifier::telemetry::{get_subscriber, init_subscriber};

#[rocket::main]
async fn main() -> Result<(), anyhow::Error> {
    let subscriber = get_subscriber("schedule_notifier".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    let configuration = get_configuration().context("Failed to read configuration.")?;

    let connection_string = configuration.database.connection_string();
    tokio::task::spawn_blocking(move || migrations::migrate(&connection_string))
        .await
        .context("The migration task panicked.")??;

    let application = Application::build(&configuration)?;
    application
        .server
        .launch()
        .await
        .map_err(|e| anyhow!("{}", e))
        .context("The server failed to launch.")?;
    Ok(())
}
