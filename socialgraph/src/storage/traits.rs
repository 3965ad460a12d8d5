//! Trait definitions for storage components in SocialGraph

use async_trait::async_trait;
use std::fmt::Debug;

use crate::storage::errors::StorageError;
use crate::storage::models::{CollectionKey, ScoredMember, WriteBatch};

/// Base trait for all storage implementations
#[async_trait]
pub trait BaseStore: Send + Sync + 'static + Debug {
    /// Check if the store is healthy and available
    async fn health_check(&self) -> std::result::Result<bool, StorageError>;

    /// Clear all data in the store
    async fn clear(&self) -> std::result::Result<(), StorageError>;

    /// Get metadata about the store
    async fn get_metadata(&self) -> std::result::Result<serde_json::Value, StorageError>;

    /// Close connections and release resources
    async fn close(&self) -> std::result::Result<(), StorageError>;
}

/// Transactional store of named ordered sets.
///
/// Every collection holds unique members, each carrying an order-key.
/// Implementations must apply a [`WriteBatch`] atomically: either every
/// operation lands or none does, and no other batch interleaves with it.
#[async_trait]
pub trait OrderedSetStore: BaseStore {
    /// Membership test of `member` within `key`.
    async fn contains(
        &self,
        key: &CollectionKey,
        member: &str,
    ) -> std::result::Result<bool, StorageError>;

    /// Several membership tests answered in one round trip.
    ///
    /// The result has one entry per probe, in probe order.
    async fn contains_each(
        &self,
        probes: &[(CollectionKey, String)],
    ) -> std::result::Result<Vec<bool>, StorageError> {
        let mut found = Vec::with_capacity(probes.len());
        for (key, member) in probes {
            found.push(self.contains(key, member).await?);
        }
        Ok(found)
    }

    /// Apply every operation of `batch` atomically, in order.
    async fn apply_batch(&self, batch: WriteBatch) -> std::result::Result<(), StorageError>;

    /// Members of `key` with their order-keys, newest first.
    async fn range_desc_scored(
        &self,
        key: &CollectionKey,
    ) -> std::result::Result<Vec<ScoredMember>, StorageError>;

    /// Members of `key`, newest first.
    async fn range_desc(
        &self,
        key: &CollectionKey,
    ) -> std::result::Result<Vec<String>, StorageError> {
        Ok(self
            .range_desc_scored(key)
            .await?
            .into_iter()
            .map(|scored| scored.member)
            .collect())
    }

    /// Number of members in `key`.
    async fn cardinality(&self, key: &CollectionKey) -> std::result::Result<usize, StorageError>;

    /// Drop the whole collection. Missing collections are not an error.
    async fn delete_collection(&self, key: &CollectionKey)
    -> std::result::Result<(), StorageError>;
}
