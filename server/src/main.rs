mod config;
mod db;
mod routes;
mod services;
mod state;

use config::ShopConfig;
use services::{catalog, notify, session};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!(error = %e, "no .env file loaded");
    }
    let config = ShopConfig::from_env()?;

    let pool = db::init_pool(&config).await?;

    if config.seed_sample_products {
        let added = catalog::seed_sample_products(&pool).await?;
        if added > 0 {
            tracing::info!(added, "seeded sample products");
        }
    }
    match session::purge_expired(&pool).await {
        Ok(purged) => tracing::debug!(purged, "purged expired admin sessions"),
        Err(e) => tracing::warn!(error = %e, "admin session purge failed"),
    }

    tokio::fs::create_dir_all(&config.upload_dir).await?;
    if config.admin.is_none() {
        tracing::warn!("ADMIN_USERNAME/ADMIN_PASSWORD not set, admin login disabled");
    }
    if config.notify.whatsapp_number.is_none() {
        tracing::warn!("WHATSAPP_NUMBER not set, order notifications disabled");
    }

    let notifier = notify::notifier_from_config(&config.notify);
    let port = config.port;
    let state = state::AppState::new(pool, config, notifier);

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;

    tracing::info!(%port, "storefront listening");
    axum::serve(listener, app).await?;
    Ok(())
}
