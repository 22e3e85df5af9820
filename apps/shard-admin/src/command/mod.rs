//! Admin command documents
//!
//! The two sharding commands are fixed-shape records serialized to BSON.
//! Field order matters: MongoDB reads the command name from the first key.

use crate::error::AdminError;
use mongodb::bson::{self, Document};
use serde::Serialize;
use std::collections::BTreeMap;

/// Name of the privileged database admin commands are sent to
pub const ADMIN_DATABASE: &str = "admin";

/// A command document sent to the admin database
pub trait AdminCommand: Serialize {
    /// Command name, i.e. the document's first key
    const NAME: &'static str;

    /// What the command acts on (database or namespace), for errors and logs
    fn target(&self) -> String;

    /// Serialize into the wire document
    fn to_document(&self) -> Result<Document, AdminError> {
        bson::to_document(self).map_err(|e| AdminError::Command {
            command: Self::NAME,
            target: self.target(),
            source: Box::new(e),
        })
    }
}

/// `{enableSharding: <dbName>}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnableSharding {
    #[serde(rename = "enableSharding")]
    pub database: String,
}

impl EnableSharding {
    pub fn new(database: &str) -> Result<Self, AdminError> {
        require_name("database", database)?;
        Ok(Self {
            database: database.to_string(),
        })
    }
}

impl AdminCommand for EnableSharding {
    const NAME: &'static str = "enableSharding";

    fn target(&self) -> String {
        self.database.clone()
    }
}

/// `{shardCollection: "<db>.<coll>", key: {<shardKey>: 1}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShardCollection {
    #[serde(rename = "shardCollection")]
    pub namespace: String,
    pub key: BTreeMap<String, i32>,
}

impl ShardCollection {
    /// Ascending range shard key
    pub const ASCENDING: i32 = 1;

    pub fn new(database: &str, collection: &str, shard_key: &str) -> Result<Self, AdminError> {
        require_name("database", database)?;
        require_name("collection", collection)?;
        require_name("shard key", shard_key)?;

        Ok(Self {
            namespace: namespace(database, collection),
            key: BTreeMap::from([(shard_key.to_string(), Self::ASCENDING)]),
        })
    }
}

impl AdminCommand for ShardCollection {
    const NAME: &'static str = "shardCollection";

    fn target(&self) -> String {
        self.namespace.clone()
    }
}

/// `<db>.<coll>`
pub fn namespace(database: &str, collection: &str) -> String {
    format!("{database}.{collection}")
}

fn require_name(field: &'static str, value: &str) -> Result<(), AdminError> {
    if value.trim().is_empty() {
        return Err(AdminError::InvalidName { field });
    }
    Ok(())
}
