//! Shard admin - MongoDB sharding administration service
//!
//! Connects to a MongoDB cluster (through mongos), verifies the connection,
//! and issues the two sharding admin commands:
//! - `enableSharding` for a database
//! - `shardCollection` for a collection on an ascending key
//!
//! The binary keeps the connection open behind health/metrics endpoints
//! until SIGINT or SIGTERM, then releases it.

pub mod admin;
pub mod command;
pub mod config;
pub mod error;
pub mod health;
pub mod metrics;
pub mod mongo;

pub use admin::{CommandRunner, ShardAdmin};
pub use config::AdminConfig;
pub use error::AdminError;
pub use mongo::{ConnectionState, MongoHandle};
