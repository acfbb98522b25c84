//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the database pool, the parsed configuration, and the order
//! notifier. Catalog, orders, and admin sessions all live in Postgres, so
//! there is no in-process mutable state to coordinate.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ShopConfig;
use crate::services::notify::OrderNotifier;

/// Shared application state, injected into Axum handlers via State extractor.
/// Cloned per request; every field is cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<ShopConfig>,
    pub notifier: Arc<dyn OrderNotifier>,
}

impl AppState {
    #[must_use]
    pub fn new(pool: PgPool, config: ShopConfig, notifier: Arc<dyn OrderNotifier>) -> Self {
        Self { pool, config: Arc::new(config), notifier }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
