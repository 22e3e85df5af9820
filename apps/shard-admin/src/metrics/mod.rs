//! Prometheus metrics module

use crate::error::AdminError;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram, Unit};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::Arc;
use std::time::Duration;

/// Admin service metrics collector
#[derive(Clone)]
pub struct AdminMetrics {
    handle: Arc<PrometheusHandle>,
}

impl AdminMetrics {
    /// Install the global Prometheus recorder and return a handle to it
    pub fn new() -> Result<Self, AdminError> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .map_err(|e| AdminError::Metrics(format!("failed to install Prometheus recorder: {e}")))?;

        Self::register_metrics();

        Ok(Self {
            handle: Arc::new(handle),
        })
    }

    /// Wrap an existing handle without installing a global recorder
    #[cfg(test)]
    pub(crate) fn from_handle(handle: PrometheusHandle) -> Self {
        Self {
            handle: Arc::new(handle),
        }
    }

    /// Register metric descriptions
    fn register_metrics() {
        describe_counter!(
            "admin_commands_total",
            Unit::Count,
            "Admin commands sent, by command and outcome"
        );
        describe_counter!(
            "admin_errors_total",
            Unit::Count,
            "Total admin service errors"
        );

        describe_histogram!(
            "admin_command_duration_seconds",
            Unit::Seconds,
            "Round trip time of successful admin commands"
        );

        describe_gauge!(
            "admin_mongo_connected",
            Unit::Count,
            "MongoDB connection status (1=connected, 0=disconnected)"
        );
    }

    /// Record a successful admin command
    pub fn record_command_success(&self, command: &'static str, duration: Duration) {
        counter!(
            "admin_commands_total",
            "command" => command,
            "outcome" => "success"
        )
        .increment(1);

        histogram!(
            "admin_command_duration_seconds",
            "command" => command
        )
        .record(duration.as_secs_f64());
    }

    /// Record a failed admin command
    pub fn record_command_failure(&self, command: &'static str) {
        counter!(
            "admin_commands_total",
            "command" => command,
            "outcome" => "failure"
        )
        .increment(1);
    }

    /// Record an error by type label
    pub fn record_error(&self, error_type: &'static str) {
        counter!("admin_errors_total", "error_type" => error_type).increment(1);
    }

    /// Set MongoDB connection status
    pub fn set_mongo_connected(&self, connected: bool) {
        gauge!("admin_mongo_connected").set(if connected { 1.0 } else { 0.0 });
    }

    /// Render metrics in Prometheus format
    pub fn render(&self) -> String {
        self.handle.render()
    }
}
