//! MongoDB client handle
//!
//! Owns the driver client for the lifetime of the process and releases it
//! exactly once.

use crate::admin::CommandRunner;
use crate::command::ADMIN_DATABASE;
use crate::config::AdminConfig;
use crate::error::{AdminError, BoxError};
use crate::mongo::state::{ConnectionState, ConnectionStatus};
use mongodb::bson::{doc, Document};
use mongodb::options::ClientOptions;
use mongodb::Client;
use std::future::Future;
use std::time::Duration;
use tokio::time::{timeout, timeout_at, Instant};
use tracing::{debug, info, warn};

/// Live MongoDB connection
#[derive(Debug)]
pub struct MongoHandle {
    client: Option<Client>,
    status: ConnectionStatus,
    timeout: Duration,
}

impl MongoHandle {
    /// Connect to MongoDB and verify the connection with a ping.
    ///
    /// Both phases share one deadline of `config.timeout`. A handle is only
    /// returned when both succeed; on ping failure the partially built
    /// client is shut down first.
    pub async fn connect(config: &AdminConfig) -> Result<Self, AdminError> {
        let status = ConnectionStatus::new();
        status.transition(ConnectionState::Connecting);

        let deadline = Instant::now() + config.timeout;

        let client = match timeout_at(deadline, build_client(config)).await {
            Ok(Ok(client)) => client,
            Ok(Err(e)) => {
                status.transition(ConnectionState::Disconnected);
                return Err(e);
            }
            Err(_) => {
                status.transition(ConnectionState::Disconnected);
                return Err(AdminError::Timeout {
                    phase: "connect",
                    timeout: config.timeout,
                });
            }
        };

        let ping_result = match timeout_at(deadline, ping(&client)).await {
            Ok(result) => result,
            Err(_) => Err(AdminError::Timeout {
                phase: "ping",
                timeout: config.timeout,
            }),
        };

        if let Err(e) = ping_result {
            debug!("Releasing client after failed ping");
            if timeout(config.timeout, client.shutdown()).await.is_err() {
                warn!("Timed out releasing client after failed ping");
            }
            status.transition(ConnectionState::Disconnected);
            return Err(e);
        }

        status.transition(ConnectionState::Connected);
        info!("Connected to MongoDB");

        Ok(Self::from_parts(client, status, config.timeout))
    }

    fn from_parts(client: Client, status: ConnectionStatus, timeout: Duration) -> Self {
        Self {
            client: Some(client),
            status,
            timeout,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> ConnectionState {
        self.status.get()
    }

    /// Shared state view for health checks
    pub fn status(&self) -> ConnectionStatus {
        self.status.clone()
    }

    /// Release the connection.
    ///
    /// The first call shuts the client down; later calls are no-ops.
    pub async fn disconnect(&mut self) -> Result<(), AdminError> {
        let Some(client) = self.client.take() else {
            debug!("MongoDB client already released");
            return Ok(());
        };

        self.status.transition(ConnectionState::Disconnected);
        info!("Closing MongoDB connection");

        timeout(self.timeout, client.shutdown())
            .await
            .map_err(|e| AdminError::Disconnect(Box::new(e)))
    }

    fn connected_client(&self) -> Option<Client> {
        if self.status.is_connected() {
            self.client.clone()
        } else {
            None
        }
    }
}

impl CommandRunner for MongoHandle {
    fn run_admin_command(
        &self,
        command: Document,
    ) -> impl Future<Output = Result<Document, BoxError>> + Send {
        let client = self.connected_client();
        async move {
            let Some(client) = client else {
                return Err(AdminError::NotConnected.into());
            };
            client
                .database(ADMIN_DATABASE)
                .run_command(command)
                .await
                .map_err(Into::into)
        }
    }
}

impl Drop for MongoHandle {
    fn drop(&mut self) {
        if self.client.is_some() {
            self.status.transition(ConnectionState::Disconnected);
            warn!("MongoHandle dropped without disconnect; driver will release on drop");
        }
    }
}

async fn build_client(config: &AdminConfig) -> Result<Client, AdminError> {
    let mut options = ClientOptions::parse(&config.uri)
        .await
        .map_err(|e| AdminError::Connect(Box::new(e)))?;

    info!(
        hosts = %hosts_label(&options),
        timeout = ?config.timeout,
        "Connecting to MongoDB"
    );

    options.connect_timeout = Some(config.timeout);
    options.server_selection_timeout = Some(config.timeout);
    options.app_name = Some(env!("CARGO_PKG_NAME").to_string());

    Client::with_options(options).map_err(|e| AdminError::Connect(Box::new(e)))
}

/// `host:port` list from parsed options; never the full URI, which may carry credentials
fn hosts_label(options: &ClientOptions) -> String {
    options
        .hosts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

async fn ping(client: &Client) -> Result<(), AdminError> {
    client
        .database(ADMIN_DATABASE)
        .run_command(doc! { "ping": 1 })
        .await
        .map(|_| ())
        .map_err(|e| AdminError::Ping(Box::new(e)))
}
