use anyhow::{anyhow, Context};
use diesel::{Connection, PgConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

pub fn run_pending_migrations(conn: &mut PgConnection) -> Result<(), anyhow::Error> {
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| anyhow!(e))
        .context("Failed to run database migrations.")?;
    tracing::info!(applied = applied.len(), "Database migrations are up to date.");
    Ok(())
}

pub fn migrate(connection_string: &str) -> Result<(), anyhow::Error> {
    let mut conn =
        PgConnection::establish(connection_string).context("Failed to connect to Postgres.")?;
    run_pending_migrations(&mut conn)
}
