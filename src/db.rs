use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

#[tracing::instrument(name = "Initialize database pool", skip(database_url))]
pub async fn init_db(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
        .context("Could not connect to the database")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Could not run database migrations")?;

    tracing::info!("Database pool ready");

    Ok(pool)
}
