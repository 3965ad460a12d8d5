//! Configuration builder.
//!
//! This module provides a builder pattern API for creating configurations.

use super::{Result, models::*, validation};
use crate::storage::config::{StoreEngine, SurrealDBAuth, SurrealDBConfig, SurrealDBEngine};
use std::path::{Path, PathBuf};

/// Builder for creating SocialGraphConfig instances.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: SocialGraphConfig,
}

impl ConfigBuilder {
    /// Create a new configuration builder with default values.
    pub fn new() -> Self {
        Self {
            config: SocialGraphConfig::default(),
        }
    }

    /// Continue from an already loaded configuration.
    pub fn from_config(config: SocialGraphConfig) -> Self {
        Self { config }
    }

    /// Set the base data directory.
    pub fn with_data_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.storage.data_dir = path.as_ref().to_path_buf();
        self
    }

    /// Use persistent storage: embedded SurrealDB on RocksDB under `data_dir/graph`.
    pub fn with_default_storage(mut self) -> Self {
        if self.config.storage.data_dir == PathBuf::from("./data") {
            let home_dir = directories::BaseDirs::new()
                .map(|dirs| dirs.home_dir().to_path_buf())
                .unwrap_or_else(|| PathBuf::from("."));
            self.config.storage.data_dir = home_dir.join(".socialgraph").join("data");
        }

        self.config.storage.engine = StoreEngine::SurrealDB;
        self.config.storage.surrealdb = SurrealDBConfig {
            engine: SurrealDBEngine::RocksDB,
            connection: self
                .config
                .storage
                .data_dir
                .join("graph")
                .to_string_lossy()
                .to_string(),
            namespace: "socialgraph".to_string(),
            database: "main".to_string(),
            auth: None,
        };

        self
    }

    /// Use the process-local in-memory store (good for testing)
    pub fn with_memory_storage(mut self) -> Self {
        self.config.storage.engine = StoreEngine::Memory;
        self
    }

    /// Use SurrealDB with its in-memory engine
    pub fn with_surrealdb_memory_storage(mut self) -> Self {
        self.config.storage.engine = StoreEngine::SurrealDB;
        self.config.storage.surrealdb.engine = SurrealDBEngine::Memory;
        self.config.storage.surrealdb.connection.clear();
        self
    }

    /// Set the collection key namespace (`{namespace}:{identity}:{state}`).
    pub fn with_graph_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.config.graph.namespace = namespace.into();
        self
    }

    /// Toggle in-process serialization of operations on the same pair.
    pub fn with_pair_serialization(mut self, enabled: bool) -> Self {
        self.config.graph.serialize_pairs = enabled;
        self
    }

    /// Set the log level.
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.config.logging.level = level;
        self
    }

    /// Set the log format.
    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.config.logging.format = format;
        self
    }

    /// Configure logging to a file.
    pub fn with_log_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.logging.file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Use default logging configuration (console output at Info level)
    pub fn with_default_logging(mut self) -> Self {
        self.config.logging.level = LogLevel::Info;
        self.config.logging.format = LogFormat::Json;
        self.config.logging.file = None;

        self
    }

    /// Create a configuration for development with in-memory storage and debug logs.
    pub fn development() -> Self {
        Self::new()
            .with_memory_storage()
            .with_log_level(LogLevel::Debug)
    }

    /// Create a configuration for automated testing.
    pub fn testing() -> Self {
        Self::development().with_data_dir(PathBuf::from("./test_data"))
    }

    /// Create a production-ready configuration with persistent storage.
    pub fn production() -> Self {
        Self::new().with_default_storage().with_default_logging()
    }

    /// Production configuration, switched to a remote SurrealDB when configured
    pub fn defaults() -> Self {
        Self::production().with_remote_surrealdb_if_configured()
    }

    /// Configure SurrealDB to use remote connection if environment variables are set
    pub fn with_remote_surrealdb_if_configured(mut self) -> Self {
        if let Ok(connection_url) = std::env::var("SURREALDB_URL") {
            tracing::info!(
                "Configuring SurrealDB remote connection to: {}",
                connection_url
            );

            let engine =
                if connection_url.starts_with("ws://") || connection_url.starts_with("wss://") {
                    SurrealDBEngine::WebSocket
                } else {
                    SurrealDBEngine::Http
                };

            let namespace =
                std::env::var("SURREALDB_NAMESPACE").unwrap_or_else(|_| "socialgraph".to_string());
            let database =
                std::env::var("SURREALDB_DATABASE").unwrap_or_else(|_| "main".to_string());

            let auth = match (
                std::env::var("SURREALDB_USERNAME"),
                std::env::var("SURREALDB_PASSWORD"),
            ) {
                (Ok(username), Ok(password)) => Some(SurrealDBAuth { username, password }),
                _ => None,
            };

            self.config.storage.engine = StoreEngine::SurrealDB;
            self.config.storage.surrealdb = SurrealDBConfig {
                engine,
                connection: connection_url,
                namespace,
                database,
                auth,
            };
        }

        self
    }

    /// Build the configuration, validating it in the process.
    pub fn build(self) -> Result<SocialGraphConfig> {
        validation::validate_config(&self.config)?;

        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
