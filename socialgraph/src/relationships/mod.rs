//! Follow/friend relationship state machine
//!
//! A follow from A to B is either an initial request, recorded as B in A's
//! `requested` collection and A in B's `pending` collection, or the reciprocal
//! half of B's earlier request, which moves both sides to `accepted`. Each
//! transition is planned as one [`WriteBatch`](crate::storage::WriteBatch)
//! and applied atomically by the store.

pub mod clock;
pub mod graph;
pub mod guards;
pub mod invariants;
pub mod keys;
pub mod locks;
pub mod transitions;
pub mod types;

pub use clock::OrderClock;
pub use graph::{SocialGraph, SocialGraphBuilder};
pub use invariants::{InvariantViolation, PairSnapshot};
pub use keys::{KEY_SEPARATOR, KeySpace};
pub use locks::PairLocks;
pub use types::{FollowOutcome, Identity, RelationshipState};
