mod api;
mod bootstrap;
mod health;
mod services;

use std::time::Duration;

use anyhow::Result;
use shopcart_core::config::{AppConfig, LoadOptions};
use tokio::sync::oneshot;

fn init_logging(config: &AppConfig) {
    use shopcart_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

pub async fn run() -> Result<()> {
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    let app = bootstrap::bootstrap_with_config(config).await?;
    let address = app.config.listen_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;

    tracing::info!(
        event_name = "system.server.started",
        correlation_id = "bootstrap",
        bind_address = %address,
        "shopcart-server listening"
    );

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let router = app.router.clone();
    let mut server = tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                let _ = stop_rx.await;
            })
            .await
    });

    tokio::select! {
        joined = &mut server => {
            joined??;
            return Ok(());
        }
        signal = tokio::signal::ctrl_c() => signal?,
    }

    tracing::info!(
        event_name = "system.server.stopping",
        correlation_id = "shutdown",
        grace_secs = app.config.server.graceful_shutdown_secs,
        "shopcart-server draining in-flight requests"
    );
    let _ = stop_tx.send(());

    let grace = Duration::from_secs(app.config.server.graceful_shutdown_secs);
    match tokio::time::timeout(grace, server).await {
        Ok(joined) => joined??,
        Err(_) => tracing::warn!(
            event_name = "system.server.drain_timeout",
            correlation_id = "shutdown",
            "graceful shutdown window elapsed; dropping remaining connections"
        ),
    }

    app.db_pool.close().await;
    Ok(())
}
