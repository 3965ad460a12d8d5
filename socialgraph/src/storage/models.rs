//! Data model shared by every ordered-set store backend.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Order-key attached to a member of a collection. Larger is newer.
pub type OrderKey = i64;

/// Opaque name of one ordered collection inside a store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollectionKey(String);

impl CollectionKey {
    /// Wrap an already-derived key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CollectionKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// One mutation inside a [`WriteBatch`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum BatchOp {
    /// Insert `member`, or refresh its order-key if already present.
    Add {
        key: CollectionKey,
        member: String,
        order_key: OrderKey,
    },
    /// Remove `member`; absent members are ignored.
    Remove { key: CollectionKey, member: String },
}

impl BatchOp {
    pub fn key(&self) -> &CollectionKey {
        match self {
            BatchOp::Add { key, .. } | BatchOp::Remove { key, .. } => key,
        }
    }

    pub fn member(&self) -> &str {
        match self {
            BatchOp::Add { member, .. } | BatchOp::Remove { member, .. } => member,
        }
    }
}

/// Membership a store must observe, inside the batch's own transaction,
/// before applying any operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "expect", rename_all = "lowercase")]
pub enum Precondition {
    Present { key: CollectionKey, member: String },
    Absent { key: CollectionKey, member: String },
}

impl Precondition {
    pub fn key(&self) -> &CollectionKey {
        match self {
            Precondition::Present { key, .. } | Precondition::Absent { key, .. } => key,
        }
    }

    pub fn member(&self) -> &str {
        match self {
            Precondition::Present { member, .. } | Precondition::Absent { member, .. } => member,
        }
    }

    /// Whether the observed membership satisfies this precondition.
    pub fn holds(&self, present: bool) -> bool {
        match self {
            Precondition::Present { .. } => present,
            Precondition::Absent { .. } => !present,
        }
    }
}

/// An ordered list of mutations that a store must apply all-or-nothing.
///
/// Operations are applied in insertion order, so a remove followed by an add
/// of the same member leaves the member present.
///
/// A batch may carry preconditions. If any fails, nothing is applied and the
/// store returns [`StorageError::Conflict`](super::StorageError::Conflict).
/// Stores that run batches in separate transactions also write the batch's
/// fence token, so two conditional batches with the same fence never commit
/// concurrently.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteBatch {
    ops: Vec<BatchOp>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    preconditions: Vec<Precondition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fence: Option<String>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an add (or order-key refresh).
    pub fn add(mut self, key: CollectionKey, member: impl Into<String>, order_key: OrderKey) -> Self {
        self.ops.push(BatchOp::Add {
            key,
            member: member.into(),
            order_key,
        });
        self
    }

    /// Queue a removal.
    pub fn remove(mut self, key: CollectionKey, member: impl Into<String>) -> Self {
        self.ops.push(BatchOp::Remove {
            key,
            member: member.into(),
        });
        self
    }

    /// Require `member` to be in `key` when the batch commits.
    pub fn require_present(mut self, key: CollectionKey, member: impl Into<String>) -> Self {
        self.preconditions.push(Precondition::Present {
            key,
            member: member.into(),
        });
        self
    }

    /// Require `member` to be missing from `key` when the batch commits.
    pub fn require_absent(mut self, key: CollectionKey, member: impl Into<String>) -> Self {
        self.preconditions.push(Precondition::Absent {
            key,
            member: member.into(),
        });
        self
    }

    /// Serialize against other batches carrying the same token.
    pub fn fenced(mut self, token: impl Into<String>) -> Self {
        self.fence = Some(token.into());
        self
    }

    pub fn preconditions(&self) -> &[Precondition] {
        &self.preconditions
    }

    pub fn fence(&self) -> Option<&str> {
        self.fence.as_deref()
    }

    pub fn ops(&self) -> &[BatchOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<BatchOp> {
        self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Iterates the operations only; preconditions must be checked first.
impl IntoIterator for WriteBatch {
    type Item = BatchOp;
    type IntoIter = std::vec::IntoIter<BatchOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.into_iter()
    }
}

/// A member together with its order-key, as returned by scored range reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredMember {
    pub member: String,
    pub order_key: OrderKey,
}

/// Sort scored members newest first; ties fall back to the member, descending.
pub fn sort_newest_first(members: &mut [ScoredMember]) {
    members.sort_by(|a, b| {
        b.order_key
            .cmp(&a.order_key)
            .then_with(|| b.member.cmp(&a.member))
    });
}
