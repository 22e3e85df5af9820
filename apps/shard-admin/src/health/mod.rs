//! Health check endpoints

use crate::metrics::AdminMetrics;
use crate::mongo::ConnectionStatus;
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::future::{Future, IntoFuture};
use std::io;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, warn};

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Readiness check response
#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    pub ready: bool,
    pub mongo_state: &'static str,
}

/// Application state for health endpoints
#[derive(Clone)]
pub struct AppState {
    pub mongo: ConnectionStatus,
    pub metrics: Option<Arc<AdminMetrics>>,
}

/// Create the health check router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

/// Serve the health router until `shutdown` resolves.
pub async fn serve_until<F>(listener: TcpListener, state: AppState, shutdown: F)
where
    F: Future<Output = ()>,
{
    let server = axum::serve(listener, router(state)).into_future();
    run_until_shutdown(server, shutdown).await;
}

/// Drive `server` until `shutdown` resolves.
///
/// A server that stops early does not end the wait; only `shutdown` does.
async fn run_until_shutdown<S, F>(server: S, shutdown: F)
where
    S: Future<Output = io::Result<()>>,
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    tokio::select! {
        result = server => {
            match result {
                Ok(()) => warn!("HTTP server stopped before shutdown signal"),
                Err(e) => error!(error = %e, "HTTP server error"),
            }
            shutdown.await;
        }
        _ = &mut shutdown => {}
    }
}

/// Health endpoint - always returns 200 if process is running
async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Readiness endpoint - returns 200 only while the MongoDB handle is connected
async fn ready_handler(State(state): State<AppState>) -> impl IntoResponse {
    let mongo_state = state.mongo.get();
    let response = ReadyResponse {
        ready: mongo_state.is_connected(),
        mongo_state: mongo_state.as_str(),
    };

    if response.ready {
        (StatusCode::OK, Json(response))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(response))
    }
}

/// Metrics endpoint - returns Prometheus format metrics
async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    let Some(ref metrics) = state.metrics else {
        return (
            StatusCode::NOT_FOUND,
            [(axum::http::header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            String::new(),
        );
    };

    metrics.set_mongo_connected(state.mongo.is_connected());

    (
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        metrics.render(),
    )
}
