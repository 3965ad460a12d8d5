//! Storage abstractions and implementations
//!
//! This module defines the ordered-set store contract the relationship state
//! machine runs against, plus the backends shipped with SocialGraph.
//!
//! ## Storage Implementations
//!
//! - **MemoryOrderedStore**: process-local store guarded by a single lock.
//!   Good for tests and short-lived scripts.
//! - **SurrealOrderedStore**: SurrealDB-backed store (in-memory, RocksDB, or
//!   remote). Write batches run as SurrealDB transactions.

pub mod config;
pub mod errors;
pub mod memory;
pub mod models;
#[cfg(feature = "surrealdb-embedded")]
pub mod surreal;
pub mod traits;

use std::sync::Arc;

pub use errors::{StorageError, StorageResult};
pub use memory::MemoryOrderedStore;
pub use models::{BatchOp, CollectionKey, OrderKey, Precondition, ScoredMember, WriteBatch};
pub use traits::{BaseStore, OrderedSetStore};

use crate::config::SocialGraphConfig;
use config::StoreEngine;

/// Create the store selected by the configuration
pub async fn create_store(
    config: &SocialGraphConfig,
) -> Result<Arc<dyn OrderedSetStore>, StorageError> {
    match config.storage.engine {
        StoreEngine::Memory => {
            tracing::info!("Creating in-memory ordered store");
            Ok(Arc::new(MemoryOrderedStore::new()))
        }
        #[cfg(feature = "surrealdb-embedded")]
        StoreEngine::SurrealDB => surreal::create_surreal_store(&config.storage.surrealdb).await,
        #[cfg(not(feature = "surrealdb-embedded"))]
        StoreEngine::SurrealDB => Err(StorageError::Configuration(
            "SurrealDB engine requires 'surrealdb-embedded' feature to be enabled".to_string(),
        )),
    }
}
