//! Sharding admin operations
//!
//! Sends the typed commands from [`crate::command`] through a [`CommandRunner`].
//! Errors are wrapped with the failing step and returned; nothing is retried
//! and nothing is rolled back.

use crate::command::{namespace, AdminCommand, EnableSharding, ShardCollection};
use crate::error::{AdminError, BoxError};
use crate::metrics::AdminMetrics;
use mongodb::bson::Document;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Collection sharded by [`ShardAdmin::shard_users_by_email`]
pub const USERS_COLLECTION: &str = "users";

/// Shard key used by [`ShardAdmin::shard_users_by_email`]
pub const EMAIL_SHARD_KEY: &str = "email";

/// Executes a command document against the admin database.
///
/// Implemented by [`crate::mongo::MongoHandle`]; tests substitute a double
/// that records the documents it receives.
pub trait CommandRunner {
    fn run_admin_command(
        &self,
        command: Document,
    ) -> impl Future<Output = Result<Document, BoxError>> + Send;
}

/// Admin command front end over a runner
pub struct ShardAdmin<'a, R> {
    runner: &'a R,
    metrics: Option<Arc<AdminMetrics>>,
}

impl<'a, R: CommandRunner + Sync> ShardAdmin<'a, R> {
    pub fn new(runner: &'a R) -> Self {
        Self {
            runner,
            metrics: None,
        }
    }

    /// Record command outcomes and latency
    pub fn with_metrics(mut self, metrics: Arc<AdminMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Enable sharding for `database`.
    ///
    /// Whatever the server reports (including "already enabled") is
    /// returned as the source of [`AdminError::Command`].
    pub async fn enable_sharding(&self, database: &str) -> Result<Document, AdminError> {
        let command = EnableSharding::new(database)?;
        self.send(command).await
    }

    /// Shard `database.collection` on `shard_key` in ascending order.
    pub async fn shard_collection(
        &self,
        database: &str,
        collection: &str,
        shard_key: &str,
    ) -> Result<Document, AdminError> {
        let command = ShardCollection::new(database, collection, shard_key)?;
        self.send(command).await
    }

    /// Enable sharding on `database`, then shard its `users` collection by `email`.
    ///
    /// If the second step fails the database is left with sharding enabled.
    pub async fn shard_users_by_email(&self, database: &str) -> Result<(), AdminError> {
        self.enable_sharding(database)
            .await
            .map_err(|e| AdminError::EnableShardingFailed {
                database: database.to_string(),
                source: Box::new(e),
            })?;

        self.shard_collection(database, USERS_COLLECTION, EMAIL_SHARD_KEY)
            .await
            .map_err(|e| AdminError::ShardCollectionFailed {
                namespace: namespace(database, USERS_COLLECTION),
                source: Box::new(e),
            })?;

        info!(
            database,
            collection = USERS_COLLECTION,
            shard_key = EMAIL_SHARD_KEY,
            "Collection sharded"
        );
        Ok(())
    }

    async fn send<C: AdminCommand>(&self, command: C) -> Result<Document, AdminError> {
        let target = command.target();
        let document = command.to_document()?;

        debug!(command = C::NAME, subject = %target, "Sending admin command");
        let start = Instant::now();

        match self.runner.run_admin_command(document).await {
            Ok(reply) => {
                if let Some(ref metrics) = self.metrics {
                    metrics.record_command_success(C::NAME, start.elapsed());
                }
                info!(command = C::NAME, subject = %target, "Admin command succeeded");
                Ok(reply)
            }
            Err(source) => {
                warn!(command = C::NAME, subject = %target, error = %source, "Admin command failed");
                let err = AdminError::Command {
                    command: C::NAME,
                    target,
                    source,
                };
                if let Some(ref metrics) = self.metrics {
                    metrics.record_command_failure(C::NAME);
                    metrics.record_error(err.error_type_label());
                }
                Err(err)
            }
        }
    }
}
