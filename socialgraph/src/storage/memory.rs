//! In-memory ordered-set store.
//!
//! Collections live in a single map guarded by one `tokio::sync::RwLock`, so a
//! batch applied under the write guard is atomic with respect to every other
//! reader and writer of the same store.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::storage::errors::StorageError;
use crate::storage::models::{
    BatchOp, CollectionKey, OrderKey, ScoredMember, WriteBatch, sort_newest_first,
};
use crate::storage::traits::{BaseStore, OrderedSetStore};

type Collection = HashMap<String, OrderKey>;

#[derive(Debug, Default)]
pub struct MemoryOrderedStore {
    collections: RwLock<HashMap<CollectionKey, Collection>>,
}

impl MemoryOrderedStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn validate(batch: &WriteBatch) -> Result<(), StorageError> {
        for op in batch.ops() {
            if op.key().as_str().is_empty() {
                return Err(StorageError::Validation(
                    "Collection key cannot be empty".to_string(),
                ));
            }
            if op.member().is_empty() {
                return Err(StorageError::Validation(format!(
                    "Empty member in batch for collection {}",
                    op.key()
                )));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl BaseStore for MemoryOrderedStore {
    async fn health_check(&self) -> Result<bool, StorageError> {
        Ok(true)
    }

    async fn clear(&self) -> Result<(), StorageError> {
        self.collections.write().await.clear();
        Ok(())
    }

    async fn get_metadata(&self) -> Result<serde_json::Value, StorageError> {
        let collections = self.collections.read().await;
        let members: usize = collections.values().map(HashMap::len).sum();
        Ok(serde_json::json!({
            "type": "memory_ordered_store",
            "collection_count": collections.len(),
            "member_count": members
        }))
    }

    async fn close(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

#[async_trait]
impl OrderedSetStore for MemoryOrderedStore {
    async fn contains(&self, key: &CollectionKey, member: &str) -> Result<bool, StorageError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(key)
            .is_some_and(|collection| collection.contains_key(member)))
    }

    async fn contains_each(
        &self,
        probes: &[(CollectionKey, String)],
    ) -> Result<Vec<bool>, StorageError> {
        let collections = self.collections.read().await;
        Ok(probes
            .iter()
            .map(|(key, member)| {
                collections
                    .get(key)
                    .is_some_and(|collection| collection.contains_key(member))
            })
            .collect())
    }

    async fn apply_batch(&self, batch: WriteBatch) -> Result<(), StorageError> {
        // Validate before taking the guard so a rejected batch touches nothing.
        Self::validate(&batch)?;

        let mut collections = self.collections.write().await;

        // The write guard is the transaction: no batch can change a checked
        // membership before this one is applied.
        for precondition in batch.preconditions() {
            let present = collections
                .get(precondition.key())
                .is_some_and(|collection| collection.contains_key(precondition.member()));
            if !precondition.holds(present) {
                return Err(StorageError::Conflict(format!(
                    "Precondition failed for {} in {}",
                    precondition.member(),
                    precondition.key()
                )));
            }
        }

        for op in batch {
            match op {
                BatchOp::Add {
                    key,
                    member,
                    order_key,
                } => {
                    collections.entry(key).or_default().insert(member, order_key);
                }
                BatchOp::Remove { key, member } => {
                    if let Some(collection) = collections.get_mut(&key) {
                        collection.remove(&member);
                        if collection.is_empty() {
                            collections.remove(&key);
                        }
                    }
                }
            }
        }
        Ok(())
    }

    async fn range_desc_scored(&self, key: &CollectionKey) -> Result<Vec<ScoredMember>, StorageError> {
        let collections = self.collections.read().await;
        let mut members: Vec<ScoredMember> = collections
            .get(key)
            .map(|collection| {
                collection
                    .iter()
                    .map(|(member, order_key)| ScoredMember {
                        member: member.clone(),
                        order_key: *order_key,
                    })
                    .collect()
            })
            .unwrap_or_default();
        sort_newest_first(&mut members);
        Ok(members)
    }

    async fn cardinality(&self, key: &CollectionKey) -> Result<usize, StorageError> {
        let collections = self.collections.read().await;
        Ok(collections.get(key).map_or(0, HashMap::len))
    }

    async fn delete_collection(&self, key: &CollectionKey) -> Result<(), StorageError> {
        self.collections.write().await.remove(key);
        Ok(())
    }
}
