//! `OrderedSetStore` implementation on SurrealDB
//!
//! A write batch becomes one `BEGIN TRANSACTION ... COMMIT TRANSACTION` query.
//! SurrealDB cancels the whole transaction when any statement fails, so
//! callers never see a partially applied batch. Preconditions run inside the
//! same transaction and `THROW` when they fail. A fenced batch first bumps its
//! fence record, so two batches on the same pair conflict on commit even when
//! each only reads what the other writes.

use async_trait::async_trait;
use serde::Deserialize;
use std::fmt::Write as _;
use surrealdb::Connection;

use super::base::SurrealOrderedStore;
use super::schema::FENCE_TABLE;
use crate::storage::errors::StorageError;
use crate::storage::models::{BatchOp, CollectionKey, Precondition, ScoredMember, WriteBatch};
use crate::storage::traits::OrderedSetStore;

#[derive(Debug, Deserialize)]
struct MembershipRow {
    member: String,
    order_key: i64,
}

#[derive(Debug, Deserialize)]
struct CountRow {
    total: u64,
}

/// Marker thrown by a failed precondition.
const PRECONDITION_FAILED: &str = "socialgraph batch precondition failed";

/// SurrealDB's wording for a transaction that lost a commit race.
const RETRYABLE_CONFLICT: &str = "can be retried";

/// Map a failed batch to a conflict when another writer got there first.
fn classify_batch_error(message: String) -> StorageError {
    if message.contains(PRECONDITION_FAILED) || message.contains(RETRYABLE_CONFLICT) {
        StorageError::Conflict(message)
    } else {
        StorageError::Transaction(format!("Batch rolled back: {}", message))
    }
}

const PROBE_QUERY: &str = "SELECT VALUE member FROM membership \
     WHERE collection = $collection AND member = $member LIMIT 1";

#[async_trait]
impl<C> OrderedSetStore for SurrealOrderedStore<C>
where
    C: Connection + Clone + Send + Sync + std::fmt::Debug + 'static,
{
    async fn contains(&self, key: &CollectionKey, member: &str) -> Result<bool, StorageError> {
        let mut response = self
            .client
            .query(PROBE_QUERY)
            .bind(("collection", key.as_str().to_string()))
            .bind(("member", member.to_string()))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to probe membership: {}", e)))?;

        let found: Vec<String> = response
            .take(0)
            .map_err(|e| StorageError::Query(format!("Failed to extract probe result: {}", e)))?;
        Ok(!found.is_empty())
    }

    async fn contains_each(
        &self,
        probes: &[(CollectionKey, String)],
    ) -> Result<Vec<bool>, StorageError> {
        if probes.is_empty() {
            return Ok(Vec::new());
        }

        let mut sql = String::new();
        for i in 0..probes.len() {
            let _ = writeln!(
                sql,
                "SELECT VALUE member FROM membership \
                 WHERE collection = $collection{i} AND member = $member{i} LIMIT 1;"
            );
        }

        let mut query = self.client.query(sql);
        for (i, (key, member)) in probes.iter().enumerate() {
            query = query
                .bind((format!("collection{i}"), key.as_str().to_string()))
                .bind((format!("member{i}"), member.clone()));
        }

        let mut response = query
            .await
            .map_err(|e| StorageError::Query(format!("Failed to probe memberships: {}", e)))?;

        let mut found = Vec::with_capacity(probes.len());
        for i in 0..probes.len() {
            let members: Vec<String> = response.take(i).map_err(|e| {
                StorageError::Query(format!("Failed to extract probe result {}: {}", i, e))
            })?;
            found.push(!members.is_empty());
        }
        Ok(found)
    }

    async fn apply_batch(&self, batch: WriteBatch) -> Result<(), StorageError> {
        if batch.is_empty() {
            return Ok(());
        }

        let mut sql = String::from("BEGIN TRANSACTION;\n");
        if batch.fence().is_some() {
            sql.push_str("UPSERT $fence SET version += 1;\n");
        }
        for (i, precondition) in batch.preconditions().iter().enumerate() {
            let comparison = match precondition {
                Precondition::Present { .. } => "=",
                Precondition::Absent { .. } => "!=",
            };
            let _ = writeln!(
                sql,
                "IF (SELECT VALUE id FROM $cond{i}) {comparison} [] {{ THROW \"{PRECONDITION_FAILED}\" }};"
            );
        }
        for (i, op) in batch.ops().iter().enumerate() {
            match op {
                BatchOp::Add { .. } => {
                    let _ = writeln!(
                        sql,
                        "UPSERT $id{i} CONTENT {{ collection: $collection{i}, member: $member{i}, order_key: $order_key{i} }};"
                    );
                }
                BatchOp::Remove { .. } => {
                    let _ = writeln!(sql, "DELETE $id{i};");
                }
            }
        }
        sql.push_str("COMMIT TRANSACTION;");

        let mut query = self.client.query(sql);
        if let Some(fence) = batch.fence() {
            query = query.bind(("fence", surrealdb::RecordId::from((FENCE_TABLE, fence))));
        }
        for (i, precondition) in batch.preconditions().iter().enumerate() {
            query = query.bind((
                format!("cond{i}"),
                Self::record_id(precondition.key(), precondition.member()),
            ));
        }
        for (i, op) in batch.into_ops().into_iter().enumerate() {
            match op {
                BatchOp::Add {
                    key,
                    member,
                    order_key,
                } => {
                    query = query
                        .bind((format!("id{i}"), Self::record_id(&key, &member)))
                        .bind((format!("collection{i}"), key.as_str().to_string()))
                        .bind((format!("member{i}"), member))
                        .bind((format!("order_key{i}"), order_key));
                }
                BatchOp::Remove { key, member } => {
                    query = query.bind((format!("id{i}"), Self::record_id(&key, &member)));
                }
            }
        }

        let mut response = query.await.map_err(|e| {
            let message = e.to_string();
            if message.contains(RETRYABLE_CONFLICT) {
                StorageError::Conflict(message)
            } else {
                StorageError::Connection(format!("Failed to submit batch: {}", message))
            }
        })?;

        // Every statement of a cancelled transaction reports an error; the
        // thrown marker may sit behind "not executed" errors of earlier ones.
        let mut errors: Vec<(usize, String)> = response
            .take_errors()
            .into_iter()
            .map(|(index, e)| (index, e.to_string()))
            .collect();
        if errors.is_empty() {
            return Ok(());
        }
        errors.sort_by_key(|(index, _)| *index);

        let decisive = errors
            .iter()
            .find(|(_, message)| {
                message.contains(PRECONDITION_FAILED) || message.contains(RETRYABLE_CONFLICT)
            })
            .unwrap_or(&errors[0]);
        Err(classify_batch_error(decisive.1.clone()))
    }

    async fn range_desc_scored(&self, key: &CollectionKey) -> Result<Vec<ScoredMember>, StorageError> {
        let query = "SELECT member, order_key FROM membership \
             WHERE collection = $collection ORDER BY order_key DESC, member DESC";

        let rows: Vec<MembershipRow> = self
            .client
            .query(query)
            .bind(("collection", key.as_str().to_string()))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to range collection: {}", e)))?
            .take(0)
            .map_err(|e| StorageError::Query(format!("Failed to extract range result: {}", e)))?;

        Ok(rows
            .into_iter()
            .map(|row| ScoredMember {
                member: row.member,
                order_key: row.order_key,
            })
            .collect())
    }

    async fn cardinality(&self, key: &CollectionKey) -> Result<usize, StorageError> {
        let query =
            "SELECT count() AS total FROM membership WHERE collection = $collection GROUP ALL";

        let counts: Vec<CountRow> = self
            .client
            .query(query)
            .bind(("collection", key.as_str().to_string()))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to count collection: {}", e)))?
            .take(0)
            .map_err(|e| StorageError::Query(format!("Failed to extract count: {}", e)))?;

        Ok(counts.first().map_or(0, |row| row.total as usize))
    }

    async fn delete_collection(&self, key: &CollectionKey) -> Result<(), StorageError> {
        self.client
            .query("DELETE membership WHERE collection = $collection")
            .bind(("collection", key.as_str().to_string()))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to delete collection: {}", e)))?
            .check()
            .map_err(|e| StorageError::Query(format!("Failed to delete collection: {}", e)))?;
        Ok(())
    }
}
