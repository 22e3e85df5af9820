//! Shard Admin - MongoDB sharding administration service
//!
//! Connects to MongoDB, optionally shards `<SHARD_DATABASE>.users` by
//! `email`, serves health/ready/metrics endpoints and disconnects on
//! SIGINT/SIGTERM.

use anyhow::{Context, Result};
use shard_admin::config::AdminConfig;
use shard_admin::health::{self, AppState};
use shard_admin::metrics::AdminMetrics;
use shard_admin::mongo::MongoHandle;
use shard_admin::ShardAdmin;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first to get log level
    let config = AdminConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("shard_admin={}", config.log_level).parse()?)
                .add_directive("mongodb=warn".parse()?),
        )
        .json()
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        timeout = ?config.timeout,
        shard_database = config.shard_database.as_deref(),
        "Starting shard admin"
    );

    let metrics = Arc::new(AdminMetrics::new()?);
    info!("Prometheus metrics initialized");

    // Setup failure is fatal: anyhow surfaces it and the process exits non-zero
    let mut mongo = match MongoHandle::connect(&config).await {
        Ok(handle) => handle,
        Err(e) => {
            metrics.record_error(e.error_type_label());
            error!(error = %e, "Failed to initialize MongoDB");
            return Err(e).context("Failed to initialize MongoDB");
        }
    };
    metrics.set_mongo_connected(true);

    let outcome = serve(&config, &mongo, Arc::clone(&metrics)).await;

    info!("Shutting down gracefully...");
    if let Err(e) = mongo.disconnect().await {
        metrics.record_error(e.error_type_label());
        error!(error = %e, "Failed to disconnect MongoDB");
    }
    metrics.set_mongo_connected(false);

    outcome?;
    info!("Shard admin shutdown complete");
    Ok(())
}

/// Everything between a successful connect and the final disconnect.
///
/// Errors returned here still go through the disconnect in `main`.
async fn serve(config: &AdminConfig, mongo: &MongoHandle, metrics: Arc<AdminMetrics>) -> Result<()> {
    if let Some(ref database) = config.shard_database {
        let admin = ShardAdmin::new(mongo).with_metrics(Arc::clone(&metrics));
        // Command failures are reported, not fatal; ShardAdmin already counted them
        match admin.shard_users_by_email(database).await {
            Ok(()) => info!(database, "Sharded users collection by email"),
            Err(e) => warn!(database, error = %e, "Sharding users by email failed"),
        }
    }

    let app_state = AppState {
        mongo: mongo.status(),
        metrics: Some(metrics),
    };

    let addr: SocketAddr = ([0, 0, 0, 0], config.http_port).into();
    info!(port = config.http_port, "Starting HTTP server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind HTTP server on {addr}"))?;

    health::serve_until(listener, app_state, async {
        shutdown_signal().await;
        info!("Shutdown signal received");
    })
    .await;

    Ok(())
}

/// Wait for shutdown signal (SIGTERM or SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
