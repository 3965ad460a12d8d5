//! Configuration structures for storage backends

use serde::{Deserialize, Serialize};

/// Which store implementation backs the relationship graph
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreEngine {
    /// Process-local in-memory store (for testing and scripting)
    Memory,
    /// SurrealDB (embedded or remote)
    SurrealDB,
}

/// SurrealDB configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SurrealDBConfig {
    /// SurrealDB engine type
    pub engine: SurrealDBEngine,

    /// Connection string for remote or path for embedded
    pub connection: String,

    /// Namespace
    pub namespace: String,

    /// Database name
    pub database: String,

    /// Authentication information
    pub auth: Option<SurrealDBAuth>,
}

impl Default for SurrealDBConfig {
    fn default() -> Self {
        Self {
            engine: SurrealDBEngine::Memory,
            connection: String::new(),
            namespace: "socialgraph".to_string(),
            database: "main".to_string(),
            auth: None,
        }
    }
}

/// SurrealDB engine types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SurrealDBEngine {
    /// In-memory storage (for testing)
    Memory,
    /// RocksDB on-disk storage (embedded)
    RocksDB,
    /// Remote WebSocket connection
    WebSocket,
    /// Remote HTTP connection
    Http,
}

impl SurrealDBEngine {
    /// Whether the engine needs a non-empty `connection` string
    pub fn needs_connection(&self) -> bool {
        !matches!(self, SurrealDBEngine::Memory)
    }
}

/// SurrealDB root credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurrealDBAuth {
    pub username: String,
    pub password: String,
}
