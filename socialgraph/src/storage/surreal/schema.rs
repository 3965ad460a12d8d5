//! Schema initialization for the SurrealDB ordered-set store

use crate::storage::errors::StorageError;
use surrealdb::{Connection, Surreal};

/// Table holding one row per (collection, member) pair
pub const MEMBERSHIP_TABLE: &str = "membership";

/// Table of per-pair fence records bumped by conditional batches
pub const FENCE_TABLE: &str = "membership_fence";

/// Initialize the membership table and its lookup index
pub async fn initialize_schema<C>(client: &Surreal<C>) -> Result<(), StorageError>
where
    C: Connection,
{
    let membership_table_query = r#"
        DEFINE TABLE IF NOT EXISTS membership SCHEMAFULL
            COMMENT "Members of per-identity relationship collections";

        DEFINE FIELD IF NOT EXISTS collection ON TABLE membership TYPE string ASSERT $value != "";
        DEFINE FIELD IF NOT EXISTS member ON TABLE membership TYPE string ASSERT $value != "";
        DEFINE FIELD IF NOT EXISTS order_key ON TABLE membership TYPE int;

        DEFINE INDEX IF NOT EXISTS membership_collection_idx ON TABLE membership COLUMNS collection;
        DEFINE INDEX IF NOT EXISTS membership_pair_idx ON TABLE membership COLUMNS collection, member UNIQUE;

        DEFINE TABLE IF NOT EXISTS membership_fence SCHEMALESS
            COMMENT "Version counters that serialize conditional batches per pair";
    "#;

    client
        .query(membership_table_query)
        .await
        .map_err(|e| StorageError::Query(format!("Failed to initialize schema: {}", e)))?
        .check()
        .map_err(|e| StorageError::Query(format!("Failed to define membership table: {}", e)))?;

    tracing::debug!("Membership schema initialized");
    Ok(())
}
