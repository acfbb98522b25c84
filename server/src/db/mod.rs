//! Postgres pool for the shop.
//!
//! Products, orders, and admin sessions share one schema under
//! `db/migrations`; [`init_pool`] applies it before the router is built.

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::config::ShopConfig;

/// Connect with `config.db_max_connections` and run pending migrations.
///
/// # Errors
///
/// Returns an error if Postgres is unreachable or a migration fails.
pub async fn init_pool(config: &ShopConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await?;

    sqlx::migrate!("src/db/migrations").run(&pool).await?;
    tracing::debug!(max_connections = config.db_max_connections, "database ready");

    Ok(pool)
}
