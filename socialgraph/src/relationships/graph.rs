//! The relationship state machine bound to a store.

use super::clock::OrderClock;
use super::guards::{validate_identity, validate_pair};
use super::invariants::{InvariantViolation, PairSnapshot};
use super::keys::{DEFAULT_NAMESPACE, KEY_SEPARATOR, KeySpace};
use super::locks::{PairGuard, PairLocks};
use super::transitions::{FollowProbe, plan_block, plan_follow, plan_invite, plan_unfollow};
use super::types::{FollowOutcome, Identity, RelationshipState};
use crate::config::GraphConfig;
use crate::storage::{OrderedSetStore, StorageError};
use crate::{Result, SocialGraphError};
use std::sync::Arc;
use tracing::{debug, info};

/// Read-and-batch rounds a follow may take when its batch keeps conflicting.
pub const MAX_FOLLOW_ATTEMPTS: usize = 3;

/// Follow/friend state machine over an [`OrderedSetStore`].
///
/// Every mutating call issues at most one probe round trip and at most one
/// atomic batch. A follow batch rejected as stale by a concurrent writer is
/// planned again from a fresh read. Store errors are returned unchanged and
/// leave no partial state behind, so any call may be retried as is.
#[derive(Debug)]
pub struct SocialGraph {
    store: Arc<dyn OrderedSetStore>,
    keys: KeySpace,
    clock: OrderClock,
    locks: Option<PairLocks>,
}

impl SocialGraph {
    /// Start building a graph.
    pub fn builder() -> SocialGraphBuilder {
        SocialGraphBuilder::new()
    }

    /// Graph over `store` with default settings.
    pub fn new(store: Arc<dyn OrderedSetStore>) -> Self {
        Self {
            store,
            keys: KeySpace::default(),
            clock: OrderClock::new(),
            locks: Some(PairLocks::new()),
        }
    }

    pub fn store(&self) -> &Arc<dyn OrderedSetStore> {
        &self.store
    }

    pub fn keys(&self) -> &KeySpace {
        &self.keys
    }

    async fn lock_pair(&self, a: &Identity, b: &Identity) -> Option<PairGuard> {
        match &self.locks {
            Some(locks) => Some(locks.lock(a, b).await),
            None => None,
        }
    }

    /// Follow `to` on behalf of `from`.
    ///
    /// Records an initial request, or completes the pair when `to` already
    /// asked to follow `from`.
    pub async fn follow(
        &self,
        from: impl Into<Identity>,
        to: impl Into<Identity>,
    ) -> Result<FollowOutcome> {
        let (from, to) = (from.into(), to.into());
        validate_pair(&from, &to)?;
        let _guard = self.lock_pair(&from, &to).await;

        let mut attempt = 1;
        loop {
            let answers = self
                .store
                .contains_each(&FollowProbe::queries(&self.keys, &from, &to))
                .await?;
            let probe = FollowProbe::from_answers(&answers);
            let plan = plan_follow(&self.keys, &from, &to, probe, self.clock.next());

            debug!(
                from = %from,
                to = %to,
                counter_request = probe.counter_request,
                outcome = %plan.outcome,
                attempt,
                "Follow decided"
            );

            let Some(batch) = plan.batch else {
                return Ok(plan.outcome);
            };

            match self.store.apply_batch(batch).await {
                Ok(()) => return Ok(plan.outcome),
                // Another writer changed the pair between read and batch.
                Err(StorageError::Conflict(reason)) if attempt < MAX_FOLLOW_ATTEMPTS => {
                    debug!(from = %from, to = %to, %reason, attempt, "Follow plan went stale, reading the pair again");
                    attempt += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Remove the accepted relationship on both sides. Missing entries are ignored.
    pub async fn unfollow(&self, from: impl Into<Identity>, to: impl Into<Identity>) -> Result<()> {
        let (from, to) = (from.into(), to.into());
        validate_pair(&from, &to)?;
        let _guard = self.lock_pair(&from, &to).await;

        debug!(from = %from, to = %to, "Unfollow");
        self.store
            .apply_batch(plan_unfollow(&self.keys, &from, &to))
            .await?;
        Ok(())
    }

    /// Block `to` for `from` and drop any acceptance between them.
    ///
    /// The block is one-sided: `to` does not block `from`, and `to` may still
    /// send follow requests.
    pub async fn block(&self, from: impl Into<Identity>, to: impl Into<Identity>) -> Result<()> {
        let (from, to) = (from.into(), to.into());
        validate_pair(&from, &to)?;
        let _guard = self.lock_pair(&from, &to).await;

        debug!(from = %from, to = %to, "Block");
        self.store
            .apply_batch(plan_block(&self.keys, &from, &to, self.clock.next()))
            .await?;
        Ok(())
    }

    /// Record that `inviter` invited `invited`.
    ///
    /// `invited` may be an external identifier such as an e-mail address.
    pub async fn invite(
        &self,
        inviter: impl Into<Identity>,
        invited: impl Into<Identity>,
    ) -> Result<()> {
        let (inviter, invited) = (inviter.into(), invited.into());
        validate_identity(&inviter)?;
        validate_identity(&invited)?;

        debug!(inviter = %inviter, invited = %invited, "Invite");
        self.store
            .apply_batch(plan_invite(
                &self.keys,
                &inviter,
                &invited,
                self.clock.next(),
            ))
            .await?;
        Ok(())
    }

    /// Drop every invitation recorded for `invited`.
    pub async fn delete_invites(&self, invited: impl Into<Identity>) -> Result<()> {
        let invited = invited.into();
        validate_identity(&invited)?;

        debug!(invited = %invited, "Delete invites");
        self.store
            .delete_collection(&self.keys.invited(&invited))
            .await?;
        Ok(())
    }

    /// Members of `identity`'s `state` collection, newest first.
    pub async fn list(
        &self,
        identity: impl Into<Identity>,
        state: RelationshipState,
    ) -> Result<Vec<Identity>> {
        let identity = identity.into();
        validate_identity(&identity)?;

        let members = self
            .store
            .range_desc(&self.keys.collection_key(&identity, state))
            .await?;
        Ok(members.into_iter().map(Identity::from).collect())
    }

    pub async fn pending(&self, identity: impl Into<Identity>) -> Result<Vec<Identity>> {
        self.list(identity, RelationshipState::Pending).await
    }

    pub async fn requested(&self, identity: impl Into<Identity>) -> Result<Vec<Identity>> {
        self.list(identity, RelationshipState::Requested).await
    }

    pub async fn accepted(&self, identity: impl Into<Identity>) -> Result<Vec<Identity>> {
        self.list(identity, RelationshipState::Accepted).await
    }

    /// Alias of [`SocialGraph::accepted`].
    pub async fn friends(&self, identity: impl Into<Identity>) -> Result<Vec<Identity>> {
        self.accepted(identity).await
    }

    pub async fn blocked(&self, identity: impl Into<Identity>) -> Result<Vec<Identity>> {
        self.list(identity, RelationshipState::Blocked).await
    }

    pub async fn invited(&self, identity: impl Into<Identity>) -> Result<Vec<Identity>> {
        self.list(identity, RelationshipState::Invited).await
    }

    /// Size of `identity`'s `state` collection.
    pub async fn count(
        &self,
        identity: impl Into<Identity>,
        state: RelationshipState,
    ) -> Result<usize> {
        let identity = identity.into();
        validate_identity(&identity)?;

        Ok(self
            .store
            .cardinality(&self.keys.collection_key(&identity, state))
            .await?)
    }

    /// Check the follow invariants of the pair `{a, b}`.
    pub async fn audit_pair(
        &self,
        a: impl Into<Identity>,
        b: impl Into<Identity>,
    ) -> Result<Vec<InvariantViolation>> {
        let (a, b) = (a.into(), b.into());
        validate_pair(&a, &b)?;
        let _guard = self.lock_pair(&a, &b).await;

        let answers = self
            .store
            .contains_each(&PairSnapshot::queries(&self.keys, &a, &b))
            .await?;
        let violations = PairSnapshot::from_answers(a, b, &answers).violations();

        for violation in &violations {
            tracing::warn!(%violation, "Pair invariant violated");
        }
        Ok(violations)
    }

    /// Whether the underlying store is reachable.
    pub async fn health_check(&self) -> Result<bool> {
        Ok(self.store.health_check().await?)
    }
}

/// Builder for [`SocialGraph`].
#[derive(Debug)]
pub struct SocialGraphBuilder {
    store: Option<Arc<dyn OrderedSetStore>>,
    namespace: String,
    serialize_pairs: bool,
}

impl SocialGraphBuilder {
    pub fn new() -> Self {
        Self {
            store: None,
            namespace: DEFAULT_NAMESPACE.to_string(),
            serialize_pairs: true,
        }
    }

    /// Store the graph reads and writes. Required.
    pub fn store(mut self, store: Arc<dyn OrderedSetStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Collection key namespace.
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Serialize operations on the same pair inside this instance.
    pub fn serialize_pairs(mut self, enabled: bool) -> Self {
        self.serialize_pairs = enabled;
        self
    }

    /// Apply the graph section of the configuration.
    pub fn with_config(self, config: &GraphConfig) -> Self {
        self.namespace(config.namespace.clone())
            .serialize_pairs(config.serialize_pairs)
    }

    pub fn build(self) -> Result<SocialGraph> {
        let store = self.store.ok_or_else(|| {
            SocialGraphError::Configuration("A store is required to build a SocialGraph".to_string())
        })?;

        if self.namespace.trim().is_empty() || self.namespace.contains(KEY_SEPARATOR) {
            return Err(SocialGraphError::Configuration(format!(
                "Invalid graph namespace '{}'",
                self.namespace
            )));
        }

        info!(
            namespace = %self.namespace,
            serialize_pairs = self.serialize_pairs,
            "SocialGraph initialized"
        );

        Ok(SocialGraph {
            store,
            keys: KeySpace::new(self.namespace),
            clock: OrderClock::new(),
            locks: self.serialize_pairs.then(PairLocks::new),
        })
    }
}

impl Default for SocialGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
