use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::config::DbConfig;

pub async fn connect(cfg: &DbConfig) -> anyhow::Result<PgPool> {
    let db = PgPoolOptions::new()
        .max_connections(cfg.max_connections)
        .connect(&cfg.database_url())
        .await
        .with_context(|| format!("connect to database {} at {}", cfg.name, cfg.host))?;
    Ok(db)
}

pub async fn migrate(db: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .run(db)
        .await
        .context("run migrations")?;
    Ok(())
}
