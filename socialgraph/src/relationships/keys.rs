//! Collection key construction.
//!
//! Every collection lives under `{namespace}:{identity}:{state}`, e.g.
//! `user:1:requested`. Identities are opaque: a `:` or `%` inside the
//! identity segment is percent-escaped, so `urn:user:7` maps to
//! `user:urn%3Auser%3A7:accepted` and distinct identities never share a key.

use super::types::{Identity, RelationshipState};
use crate::storage::CollectionKey;
use std::borrow::Cow;

/// Separator between key segments.
pub const KEY_SEPARATOR: char = ':';

/// Default namespace of collection keys.
pub const DEFAULT_NAMESPACE: &str = "user";

/// Escape `identity` for use as one key segment.
pub fn encode_segment(identity: &str) -> Cow<'_, str> {
    if !identity.contains([KEY_SEPARATOR, '%']) {
        return Cow::Borrowed(identity);
    }

    let mut encoded = String::with_capacity(identity.len() + 8);
    for c in identity.chars() {
        match c {
            '%' => encoded.push_str("%25"),
            KEY_SEPARATOR => encoded.push_str("%3A"),
            c => encoded.push(c),
        }
    }
    Cow::Owned(encoded)
}

/// Maps (identity, state) pairs to store collection keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySpace {
    namespace: String,
}

impl KeySpace {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Key of `identity`'s collection for `state`.
    pub fn collection_key(&self, identity: &Identity, state: RelationshipState) -> CollectionKey {
        CollectionKey::new(format!(
            "{}{sep}{}{sep}{}",
            self.namespace,
            encode_segment(identity.as_str()),
            state.as_str(),
            sep = KEY_SEPARATOR
        ))
    }

    /// Token shared by both orderings of a pair, used to fence follow batches.
    pub fn pair_fence(&self, a: &Identity, b: &Identity) -> String {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        format!(
            "{}{sep}{}{sep}{}",
            self.namespace,
            encode_segment(low.as_str()),
            encode_segment(high.as_str()),
            sep = KEY_SEPARATOR
        )
    }

    pub fn pending(&self, identity: &Identity) -> CollectionKey {
        self.collection_key(identity, RelationshipState::Pending)
    }

    pub fn requested(&self, identity: &Identity) -> CollectionKey {
        self.collection_key(identity, RelationshipState::Requested)
    }

    pub fn accepted(&self, identity: &Identity) -> CollectionKey {
        self.collection_key(identity, RelationshipState::Accepted)
    }

    pub fn blocked(&self, identity: &Identity) -> CollectionKey {
        self.collection_key(identity, RelationshipState::Blocked)
    }

    pub fn invited(&self, identity: &Identity) -> CollectionKey {
        self.collection_key(identity, RelationshipState::Invited)
    }
}

impl Default for KeySpace {
    fn default() -> Self {
        Self::new(DEFAULT_NAMESPACE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_key_layout() {
        let keys = KeySpace::default();
        let id = Identity::from(1u64);
        assert_eq!(keys.requested(&id).as_str(), "user:1:requested");
        assert_eq!(keys.pending(&id).as_str(), "user:1:pending");
        assert_eq!(keys.accepted(&id).as_str(), "user:1:accepted");
        assert_eq!(keys.blocked(&id).as_str(), "user:1:blocked");
        assert_eq!(keys.invited(&id).as_str(), "user:1:invited");
    }

    #[test]
    fn test_custom_namespace() {
        let keys = KeySpace::new("member");
        let key = keys.collection_key(&Identity::from("alice"), RelationshipState::Accepted);
        assert_eq!(key.as_str(), "member:alice:accepted");
        assert_eq!(keys.namespace(), "member");
    }

    #[test]
    fn test_keys_are_distinct_per_state() {
        let keys = KeySpace::default();
        let id = Identity::from("a");
        let mut all: Vec<_> = RelationshipState::ALL
            .iter()
            .map(|state| keys.collection_key(&id, *state))
            .collect();
        all.dedup();
        assert_eq!(all.len(), RelationshipState::ALL.len());
    }

    #[test]
    fn test_identity_segment_is_escaped() {
        let keys = KeySpace::default();
        assert_eq!(
            keys.accepted(&Identity::from("urn:user:7")).as_str(),
            "user:urn%3Auser%3A7:accepted"
        );
        assert_eq!(
            keys.pending(&Identity::from("Jane Doe")).as_str(),
            "user:Jane Doe:pending"
        );
        assert_eq!(encode_segment("100%"), "100%25");
        assert!(matches!(encode_segment("plain"), Cow::Borrowed("plain")));
    }

    #[test]
    fn test_escaping_keeps_keys_distinct() {
        let keys = KeySpace::default();
        let ids = ["a:b", "a%3Ab", "a%253Ab", "a", "a:b:accepted"];
        let mut all: Vec<_> = ids
            .iter()
            .map(|id| keys.accepted(&Identity::from(*id)))
            .collect();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), ids.len());
    }

    #[test]
    fn test_pair_fence_ignores_direction() {
        let keys = KeySpace::default();
        let (a, b) = (Identity::from("alice"), Identity::from("bob"));
        assert_eq!(keys.pair_fence(&a, &b), keys.pair_fence(&b, &a));
        assert_eq!(keys.pair_fence(&a, &b), "user:alice:bob");
        assert_ne!(
            keys.pair_fence(&Identity::from("a:b"), &Identity::from("c")),
            keys.pair_fence(&Identity::from("a"), &Identity::from("b:c"))
        );
    }
}
