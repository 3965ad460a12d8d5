//! Base SurrealDB store: connection handling and `BaseStore`

use async_trait::async_trait;
use surrealdb::{Connection, RecordId, Surreal};

use super::schema::{self, MEMBERSHIP_TABLE};
use crate::storage::errors::StorageError;
use crate::storage::models::CollectionKey;
use crate::storage::traits::BaseStore;

/// Namespace/database selection for a SurrealDB store
#[derive(Debug, Clone)]
pub struct SurrealStoreConfig {
    pub namespace: String,
    pub database: String,
}

impl Default for SurrealStoreConfig {
    fn default() -> Self {
        Self {
            namespace: "socialgraph".to_string(),
            database: "main".to_string(),
        }
    }
}

/// Ordered-set store backed by a SurrealDB `membership` table
#[derive(Debug)]
pub struct SurrealOrderedStore<C>
where
    C: Connection + Clone + Send + Sync + std::fmt::Debug + 'static,
{
    pub(crate) client: Surreal<C>,
    pub(crate) config: SurrealStoreConfig,
}

impl<C> SurrealOrderedStore<C>
where
    C: Connection + Clone + Send + Sync + std::fmt::Debug + 'static,
{
    /// Select the namespace/database and make sure the schema exists
    pub async fn new(client: Surreal<C>, config: SurrealStoreConfig) -> Result<Self, StorageError> {
        client
            .use_ns(&config.namespace)
            .use_db(&config.database)
            .await
            .map_err(|e| {
                StorageError::Connection(format!("Failed to set namespace/database: {}", e))
            })?;

        schema::initialize_schema(&client).await?;

        Ok(Self { client, config })
    }

    /// Get the underlying client for advanced operations
    pub fn client(&self) -> &Surreal<C> {
        &self.client
    }

    /// Deterministic record id for one (collection, member) row.
    ///
    /// The collection length prefix keeps the mapping injective even when
    /// keys or members contain the separator.
    pub(crate) fn record_id(key: &CollectionKey, member: &str) -> RecordId {
        let id = format!("{}:{}:{}", key.as_str().len(), key.as_str(), member);
        RecordId::from((MEMBERSHIP_TABLE, id.as_str()))
    }
}

#[async_trait]
impl<C> BaseStore for SurrealOrderedStore<C>
where
    C: Connection + Clone + Send + Sync + std::fmt::Debug + 'static,
{
    async fn health_check(&self) -> Result<bool, StorageError> {
        let _result = self
            .client
            .query("INFO FOR DB")
            .await
            .map_err(|e| StorageError::Connection(format!("Health check failed: {}", e)))?;

        Ok(true)
    }

    async fn clear(&self) -> Result<(), StorageError> {
        self.client
            .query("DELETE FROM membership; DELETE FROM membership_fence;")
            .await
            .map_err(|e| StorageError::Query(format!("Failed to clear membership: {}", e)))?
            .check()
            .map_err(|e| StorageError::Query(format!("Failed to clear membership: {}", e)))?;
        Ok(())
    }

    async fn get_metadata(&self) -> Result<serde_json::Value, StorageError> {
        Ok(serde_json::json!({
            "type": "surrealdb_ordered_store",
            "namespace": self.config.namespace,
            "database": self.config.database,
            "table": MEMBERSHIP_TABLE
        }))
    }

    async fn close(&self) -> Result<(), StorageError> {
        // SurrealDB connections are automatically closed when dropped
        Ok(())
    }
}
