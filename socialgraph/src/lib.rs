//! # SocialGraph
//!
//! Follow/friend relationship state machine over an atomic ordered-set store.
//!
//! Directed follow intents between identities are tracked per identity in
//! five collections (`pending`, `requested`, `accepted`, `blocked`,
//! `invited`). A follow is either an initial request or the reciprocal half of
//! an earlier one; either way the resulting changes are applied to the store
//! as a single atomic batch, so a pair is never observed half-accepted.
//!
//! ## Quick Start
//!
//! ```rust
//! use socialgraph::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let graph = SocialGraph::new(Arc::new(MemoryOrderedStore::new()));
//!
//!     assert_eq!(graph.follow("alice", "bob").await?, FollowOutcome::Requested);
//!     assert_eq!(graph.follow("bob", "alice").await?, FollowOutcome::Accepted);
//!
//!     assert_eq!(graph.friends("alice").await?, vec![Identity::from("bob")]);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **relationships**: the state machine, key layout, guards and pair audit
//! - **storage**: the ordered-set store contract plus in-memory and SurrealDB
//!   backends
//! - **config** / **logging**: layered configuration and tracing setup

pub mod config;
pub mod logging;
pub mod relationships;
pub mod storage;

/// The prelude re-exports commonly used types for convenience
pub mod prelude {
    // Re-export core initialization functions
    pub use crate::{init, init_with_defaults};

    // Re-export config types
    pub use crate::config::{ConfigBuilder, ConfigLoader, GraphConfig, SocialGraphConfig};

    // Re-export the state machine
    pub use crate::relationships::{
        FollowOutcome, Identity, InvariantViolation, RelationshipState, SocialGraph,
        SocialGraphBuilder,
    };

    // Re-export storage types for custom backends
    pub use crate::storage::{
        BaseStore, CollectionKey, MemoryOrderedStore, OrderedSetStore, StorageError, WriteBatch,
    };

    // Re-export essential result type
    pub use crate::{Result, SocialGraphError};
}

/// Current library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Error type for SocialGraph operations
#[derive(Debug, thiserror::Error)]
pub enum SocialGraphError {
    /// Missing store or invalid configuration; raised at construction only
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Error reported by the store, passed through unchanged
    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    /// Identity that cannot be used in a collection key
    #[error("Invalid identity '{identity}': {reason}")]
    InvalidIdentity { identity: String, reason: String },

    /// Follow, unfollow or block of an identity by itself
    #[error("Identity '{0}' cannot relate to itself")]
    SelfRelationship(String),

    /// Logging error
    #[error("Logging error: {0}")]
    Logging(#[from] logging::LogError),
}

impl SocialGraphError {
    /// Whether retrying the identical call may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            SocialGraphError::Storage(err) => err.is_transient(),
            _ => false,
        }
    }
}

impl From<config::ConfigError> for SocialGraphError {
    fn from(err: config::ConfigError) -> Self {
        SocialGraphError::Configuration(err.to_string())
    }
}

/// Result type for SocialGraph operations
pub type Result<T> = std::result::Result<T, SocialGraphError>;

/// Initialize SocialGraph with default configuration
///
/// Uses the production preset: persistent SurrealDB storage under the home
/// directory, or a remote SurrealDB when `SURREALDB_URL` is set.
pub async fn init_with_defaults() -> Result<relationships::SocialGraph> {
    let config = config::ConfigBuilder::defaults().build()?;
    init(config).await
}

/// Initialize SocialGraph with the provided configuration
///
/// Sets up logging, creates the configured store and binds a
/// [`SocialGraph`](relationships::SocialGraph) to it.
///
/// # Examples
///
/// ```rust
/// use socialgraph::prelude::*;
///
/// async fn example() -> Result<()> {
///     let config = ConfigBuilder::new()
///         .with_memory_storage()
///         .with_graph_namespace("member")
///         .build()?;
///
///     let graph = init(config).await?;
///     graph.invite("alice", "carol@example.com").await?;
///
///     Ok(())
/// }
/// ```
pub async fn init(config: config::SocialGraphConfig) -> Result<relationships::SocialGraph> {
    // Ignore errors if tracing is already initialized
    let _ = logging::init(&config.logging);

    let store = storage::create_store(&config).await?;

    relationships::SocialGraph::builder()
        .store(store)
        .with_config(&config.graph)
        .build()
}
