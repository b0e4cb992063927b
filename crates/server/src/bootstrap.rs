use std::sync::Arc;

use axum::Router;
use shopcart_core::config::{AppConfig, ConfigError};
use shopcart_core::identity::IdentityVerifier;
use shopcart_db::repositories::{SqlCartRepository, SqlProductRepository};
use shopcart_db::{connect_with_settings, migrations, DbPool};
use thiserror::Error;
use tracing::info;

use crate::api::{self, ApiState};
use crate::health;
use crate::services::{CartService, CatalogService};

pub struct Application {
    pub config: AppConfig,
    pub db_pool: DbPool,
    pub router: Router,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
}

/// Connects, migrates and wires the router for an already-loaded config.
///
/// The config is re-validated so programmatically built configs fail the same way
/// file and environment sourced ones do.
pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    config.validate()?;
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let db_pool = connect_with_settings(
        &config.database.url,
        config.database.max_connections,
        config.database.timeout_secs,
    )
    .await
    .map_err(BootstrapError::DatabaseConnect)?;
    info!(
        event_name = "system.bootstrap.database_connected",
        correlation_id = "bootstrap",
        max_connections = config.database.max_connections,
        "database connection established"
    );

    migrations::run_pending(&db_pool).await.map_err(BootstrapError::Migration)?;
    info!(
        event_name = "system.bootstrap.migrations_applied",
        correlation_id = "bootstrap",
        "database migrations applied"
    );

    let router = build_router(&config, db_pool.clone());
    Ok(Application { config, db_pool, router })
}

/// API routes backed by SQL repositories, merged with the health probe.
pub fn build_router(config: &AppConfig, db_pool: DbPool) -> Router {
    let state = ApiState {
        catalog: CatalogService::new(Arc::new(SqlProductRepository::new(db_pool.clone()))),
        carts: CartService::new(Arc::new(SqlCartRepository::new(db_pool.clone()))),
        identity: Arc::new(IdentityVerifier::new(&config.auth)),
    };

    api::router(state).merge(health::router(db_pool))
}
