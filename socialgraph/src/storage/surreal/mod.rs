//! SurrealDB-backed ordered-set store
//!
//! One `membership` row per (collection, member) pair; write batches run as
//! SurrealDB transactions. Supports the in-memory and RocksDB embedded engines,
//! and WebSocket/HTTP connections when built with `surrealdb-remote`.

use std::sync::Arc;
use surrealdb::Surreal;

use crate::storage::config::{SurrealDBAuth, SurrealDBConfig, SurrealDBEngine};
use crate::storage::errors::StorageError;
use crate::storage::traits::OrderedSetStore;

pub mod base;
pub mod ordered_set;
pub mod schema;

pub use base::{SurrealOrderedStore, SurrealStoreConfig};

/// Type alias for an embedded (in-process) SurrealDB store
pub type EmbeddedSurrealStore = SurrealOrderedStore<surrealdb::engine::local::Db>;

/// Create an in-memory SurrealDB store, mostly useful in tests
pub async fn create_memory_surreal_store(
    config: SurrealStoreConfig,
) -> Result<EmbeddedSurrealStore, StorageError> {
    let client = Surreal::new::<surrealdb::engine::local::Mem>(())
        .await
        .map_err(|e| StorageError::Connection(format!("Failed to create memory client: {}", e)))?;

    SurrealOrderedStore::new(client, config).await
}

/// Create a SurrealDB store from configuration
pub async fn create_surreal_store(
    config: &SurrealDBConfig,
) -> Result<Arc<dyn OrderedSetStore>, StorageError> {
    let store_config = SurrealStoreConfig {
        namespace: config.namespace.clone(),
        database: config.database.clone(),
    };

    match config.engine {
        SurrealDBEngine::Memory => {
            tracing::info!("Creating SurrealDB in-memory ordered store");
            let store = create_memory_surreal_store(store_config).await?;
            Ok(Arc::new(store))
        }
        SurrealDBEngine::RocksDB => {
            tracing::info!(
                "Creating SurrealDB RocksDB ordered store at {}",
                config.connection
            );
            let client = Surreal::new::<surrealdb::engine::local::RocksDb>(config.connection.as_str())
                .await
                .map_err(|e| {
                    StorageError::Connection(format!("Failed to create RocksDB client: {}", e))
                })?;

            let store = SurrealOrderedStore::new(client, store_config).await?;
            Ok(Arc::new(store))
        }
        #[cfg(feature = "surrealdb-remote")]
        SurrealDBEngine::WebSocket => {
            tracing::info!(
                "Creating SurrealDB WebSocket connection to {}",
                config.connection
            );
            let client = Surreal::new::<surrealdb::engine::remote::ws::Ws>(config.connection.as_str())
                .await
                .map_err(|e| {
                    StorageError::Connection(format!("Failed to create WebSocket client: {}", e))
                })?;

            if let Some(auth) = &config.auth {
                authenticate_client(&client, auth).await?;
            }

            let store = SurrealOrderedStore::new(client, store_config).await?;
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "surrealdb-remote"))]
        SurrealDBEngine::WebSocket => Err(StorageError::Configuration(
            "WebSocket engine requires 'surrealdb-remote' feature to be enabled".to_string(),
        )),
        #[cfg(feature = "surrealdb-remote")]
        SurrealDBEngine::Http => {
            tracing::info!("Creating SurrealDB HTTP connection to {}", config.connection);
            let client = Surreal::new::<surrealdb::engine::remote::http::Http>(config.connection.as_str())
                .await
                .map_err(|e| {
                    StorageError::Connection(format!("Failed to create HTTP client: {}", e))
                })?;

            if let Some(auth) = &config.auth {
                authenticate_client(&client, auth).await?;
            }

            let store = SurrealOrderedStore::new(client, store_config).await?;
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "surrealdb-remote"))]
        SurrealDBEngine::Http => Err(StorageError::Configuration(
            "HTTP engine requires 'surrealdb-remote' feature to be enabled".to_string(),
        )),
    }
}

/// Sign in as a root user
pub async fn authenticate_client<C>(client: &Surreal<C>, auth: &SurrealDBAuth) -> Result<(), StorageError>
where
    C: surrealdb::Connection,
{
    tracing::debug!("Authenticating as root user");
    let root = surrealdb::opt::auth::Root {
        username: &auth.username,
        password: &auth.password,
    };
    client
        .signin(root)
        .await
        .map_err(|e| StorageError::Authentication(format!("Root auth failed: {}", e)))?;
    Ok(())
}
