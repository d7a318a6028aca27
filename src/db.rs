use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::config::AppConfig;

/// Builds the pool without connecting, so the listener can start while the
/// database is still unreachable.
pub fn connect_lazy(config: &AppConfig) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect_lazy(&config.database_url)
        .context("parse DATABASE_URL")?;
    Ok(pool)
}

/// Applies `./migrations`. Failure is logged and startup continues; signups
/// answer 500 until the database comes back.
pub async fn migrate(pool: &PgPool) {
    match sqlx::migrate!("./migrations").run(pool).await {
        Ok(()) => tracing::info!("database migrations applied"),
        Err(e) => {
            tracing::warn!(error = %e, "database unavailable or migration failed; continuing")
        }
    }
}
