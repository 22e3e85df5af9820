//! Domain error types for the shard admin service
//!
//! main.rs is the ONLY module allowed to use anyhow::Result (process boundary).
//! All library code returns Result<T, AdminError>.

use std::time::Duration;
use thiserror::Error;

/// Boxed error carried as the `source` of driver-facing variants.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shard admin domain errors
///
/// Setup failures (`Connect`, `Ping`, `Timeout`) are fatal at the process
/// boundary. Command failures are returned to the caller with the server's
/// error preserved as the source. Disconnect failures are only logged.
///
/// Example log output:
/// ```text
/// AdminError::ShardCollectionFailed { namespace: "testdb.users", .. }
/// → "failed to shard collection 'testdb.users'"
/// ```
#[derive(Error, Debug)]
pub enum AdminError {
    /// Configuration error (environment variable missing or invalid)
    #[error("configuration error: {0}")]
    Config(String),

    /// Client could not be built from the configured address
    #[error("mongo connect error")]
    Connect(#[source] BoxError),

    /// Client was built but the liveness check failed
    #[error("mongo ping error")]
    Ping(#[source] BoxError),

    /// Connect or ping phase exceeded the configured deadline
    #[error("mongo {phase} timed out after {timeout:?}")]
    Timeout {
        phase: &'static str,
        timeout: Duration,
    },

    /// A required name argument was empty
    #[error("{field} must not be empty")]
    InvalidName { field: &'static str },

    /// Admin command was rejected or failed on the server
    #[error("{command} command failed for '{target}'")]
    Command {
        command: &'static str,
        target: String,
        #[source]
        source: BoxError,
    },

    /// First step of shard-by-key: enabling sharding on the database
    #[error("failed to enable sharding on database '{database}'")]
    EnableShardingFailed {
        database: String,
        #[source]
        source: Box<AdminError>,
    },

    /// Second step of shard-by-key: sharding the collection
    #[error("failed to shard collection '{namespace}'")]
    ShardCollectionFailed {
        namespace: String,
        #[source]
        source: Box<AdminError>,
    },

    /// Command attempted on a handle that is not connected
    #[error("mongo client is not connected")]
    NotConnected,

    /// Final release of the client failed
    #[error("failed to disconnect mongo client")]
    Disconnect(#[source] BoxError),

    /// Prometheus recorder could not be installed
    #[error("metrics error: {0}")]
    Metrics(String),
}

impl AdminError {
    /// Returns a static label string suitable for Prometheus metrics.
    ///
    /// Used as the `error_type` label on `admin_errors_total`.
    pub fn error_type_label(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Connect(_) => "connect",
            Self::Ping(_) => "ping",
            Self::Timeout { .. } => "timeout",
            Self::InvalidName { .. } => "invalid_name",
            Self::Command { .. } => "command",
            Self::EnableShardingFailed { .. } => "enable_sharding",
            Self::ShardCollectionFailed { .. } => "shard_collection",
            Self::NotConnected => "not_connected",
            Self::Disconnect(_) => "disconnect",
            Self::Metrics(_) => "metrics",
        }
    }
}
