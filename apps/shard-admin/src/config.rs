//! Admin service configuration module
//!
//! Handles loading configuration from environment variables.

use crate::error::AdminError;
use std::env;
use std::time::Duration;

/// Fallback MongoDB address when `MONGODB_URI` is not set
pub const DEFAULT_MONGODB_URI: &str = "mongodb://localhost:27017";

/// Fallback connect/ping deadline in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Admin service configuration
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// MongoDB connection string
    pub uri: String,

    /// Deadline shared by the connect and ping phases
    pub timeout: Duration,

    /// Database to shard `users` by `email` on at startup, if any
    pub shard_database: Option<String>,

    /// Health/metrics HTTP port
    pub http_port: u16,

    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl AdminConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, AdminError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AdminError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let uri = lookup("MONGODB_URI").unwrap_or_else(|| DEFAULT_MONGODB_URI.to_string());
        if uri.trim().is_empty() {
            return Err(AdminError::Config("MONGODB_URI must not be empty".to_string()));
        }

        let timeout_secs: u64 = lookup("MONGODB_TIMEOUT_SECS")
            .unwrap_or_else(|| DEFAULT_TIMEOUT_SECS.to_string())
            .parse()
            .map_err(|e| {
                AdminError::Config(format!("MONGODB_TIMEOUT_SECS must be a valid number: {e}"))
            })?;
        if timeout_secs == 0 {
            return Err(AdminError::Config(
                "MONGODB_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }

        let shard_database = lookup("SHARD_DATABASE").filter(|db| !db.trim().is_empty());

        let http_port = lookup("HTTP_PORT")
            .unwrap_or_else(|| "9090".to_string())
            .parse()
            .map_err(|e| AdminError::Config(format!("HTTP_PORT must be a valid port number: {e}")))?;

        let log_level = lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        Ok(Self {
            uri,
            timeout: Duration::from_secs(timeout_secs),
            shard_database,
            http_port,
            log_level,
        })
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            uri: DEFAULT_MONGODB_URI.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            shard_database: None,
            http_port: 9090,
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_values() {
        let config = AdminConfig::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config.uri, "mongodb://localhost:27017");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.shard_database, None);
        assert_eq!(config.http_port, 9090);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_overrides() {
        let config = AdminConfig::from_lookup(lookup_from(&[
            ("MONGODB_URI", "mongodb://mongos1:27017,mongos2:27017"),
            ("MONGODB_TIMEOUT_SECS", "3"),
            ("SHARD_DATABASE", "testdb"),
            ("HTTP_PORT", "8081"),
        ]))
        .unwrap();

        assert_eq!(config.uri, "mongodb://mongos1:27017,mongos2:27017");
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.shard_database.as_deref(), Some("testdb"));
        assert_eq!(config.http_port, 8081);
    }

    #[test]
    fn test_rejects_empty_uri() {
        let err = AdminConfig::from_lookup(lookup_from(&[("MONGODB_URI", "")])).unwrap_err();
        assert!(matches!(err, AdminError::Config(_)));
    }

    #[test]
    fn test_rejects_zero_or_invalid_timeout() {
        let err =
            AdminConfig::from_lookup(lookup_from(&[("MONGODB_TIMEOUT_SECS", "0")])).unwrap_err();
        assert!(err.to_string().contains("greater than zero"));

        let err =
            AdminConfig::from_lookup(lookup_from(&[("MONGODB_TIMEOUT_SECS", "ten")])).unwrap_err();
        assert!(err.to_string().contains("MONGODB_TIMEOUT_SECS"));
    }

    #[test]
    fn test_blank_shard_database_is_ignored() {
        let config =
            AdminConfig::from_lookup(lookup_from(&[("SHARD_DATABASE", "  ")])).unwrap();
        assert_eq!(config.shard_database, None);
    }

    #[test]
    fn test_missing_uri_falls_back_but_empty_uri_does_not() {
        let config = AdminConfig::from_lookup(lookup_from(&[("SHARD_DATABASE", "testdb")])).unwrap();
        assert_eq!(config.uri, DEFAULT_MONGODB_URI);

        // Set-but-empty is not the same as unset
        let err = AdminConfig::from_lookup(lookup_from(&[
            ("MONGODB_URI", ""),
            ("SHARD_DATABASE", "testdb"),
        ]))
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "configuration error: MONGODB_URI must not be empty"
        );
    }
}
