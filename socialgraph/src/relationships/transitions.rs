//! Pure transition planning.
//!
//! Given an action and what the probe observed, each planner returns the
//! complete batch the store must apply atomically. Nothing here touches the
//! store.

use super::keys::KeySpace;
use super::types::{FollowOutcome, Identity};
use crate::storage::{CollectionKey, OrderKey, WriteBatch};

/// What the single follow probe round trip observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FollowProbe {
    /// `to` is in `from`'s pending collection: `to` already asked to follow `from`
    pub counter_request: bool,
    /// `to` is already in `from`'s accepted collection
    pub already_accepted: bool,
}

impl FollowProbe {
    /// Membership tests for `follow(from, to)`, in the order
    /// [`FollowProbe::from_answers`] expects.
    pub fn queries(keys: &KeySpace, from: &Identity, to: &Identity) -> Vec<(CollectionKey, String)> {
        vec![
            (keys.pending(from), to.to_string()),
            (keys.accepted(from), to.to_string()),
        ]
    }

    /// Build the probe result from the store's answers to [`FollowProbe::queries`].
    pub fn from_answers(answers: &[bool]) -> Self {
        Self {
            counter_request: answers.first().copied().unwrap_or(false),
            already_accepted: answers.get(1).copied().unwrap_or(false),
        }
    }
}

/// A decided follow: its outcome and the batch to apply, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowPlan {
    pub outcome: FollowOutcome,
    pub batch: Option<WriteBatch>,
}

/// Decide the follow branch and its batch.
///
/// The batch restates the observed memberships as preconditions, fenced on the
/// pair, so a store that checks them rejects a plan made stale by a
/// concurrent writer.
pub fn plan_follow(
    keys: &KeySpace,
    from: &Identity,
    to: &Identity,
    probe: FollowProbe,
    order_key: OrderKey,
) -> FollowPlan {
    // A leftover counter-request still completes the pair, so it wins over
    // the already-accepted short circuit.
    if probe.counter_request {
        let batch = WriteBatch::new()
            .require_present(keys.pending(from), to.as_str())
            .fenced(keys.pair_fence(from, to))
            .remove(keys.pending(from), to.as_str())
            .remove(keys.requested(to), from.as_str())
            .add(keys.accepted(from), to.as_str(), order_key)
            .add(keys.accepted(to), from.as_str(), order_key);
        return FollowPlan {
            outcome: FollowOutcome::Accepted,
            batch: Some(batch),
        };
    }

    if probe.already_accepted {
        return FollowPlan {
            outcome: FollowOutcome::AlreadyAccepted,
            batch: None,
        };
    }

    let batch = WriteBatch::new()
        .require_absent(keys.pending(from), to.as_str())
        .require_absent(keys.accepted(from), to.as_str())
        .fenced(keys.pair_fence(from, to))
        .add(keys.requested(from), to.as_str(), order_key)
        .add(keys.pending(to), from.as_str(), order_key);
    FollowPlan {
        outcome: FollowOutcome::Requested,
        batch: Some(batch),
    }
}

/// Remove the accepted entry on both sides.
pub fn plan_unfollow(keys: &KeySpace, from: &Identity, to: &Identity) -> WriteBatch {
    WriteBatch::new()
        .remove(keys.accepted(from), to.as_str())
        .remove(keys.accepted(to), from.as_str())
}

/// Record a one-sided block and clear acceptance on both sides.
pub fn plan_block(
    keys: &KeySpace,
    from: &Identity,
    to: &Identity,
    order_key: OrderKey,
) -> WriteBatch {
    WriteBatch::new()
        .add(keys.blocked(from), to.as_str(), order_key)
        .remove(keys.accepted(from), to.as_str())
        .remove(keys.accepted(to), from.as_str())
}

/// Record `inviter` in `invited`'s invitation collection.
pub fn plan_invite(
    keys: &KeySpace,
    inviter: &Identity,
    invited: &Identity,
    order_key: OrderKey,
) -> WriteBatch {
    WriteBatch::new().add(keys.invited(invited), inviter.as_str(), order_key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{BatchOp, Precondition};

    fn ids() -> (KeySpace, Identity, Identity) {
        (KeySpace::default(), Identity::from(2u64), Identity::from(3u64))
    }

    #[test]
    fn test_probe_queries_detect_counter_request() {
        let (keys, from, to) = ids();
        let queries = FollowProbe::queries(&keys, &from, &to);
        assert_eq!(queries[0].0.as_str(), "user:2:pending");
        assert_eq!(queries[0].1, "3");
        assert_eq!(queries[1].0.as_str(), "user:2:accepted");
        assert_eq!(queries[1].1, "3");

        let probe = FollowProbe::from_answers(&[true, false]);
        assert!(probe.counter_request);
        assert!(!probe.already_accepted);
        assert_eq!(FollowProbe::from_answers(&[]), FollowProbe::default());
    }

    #[test]
    fn test_initial_request_plan() {
        let (keys, from, to) = ids();
        let plan = plan_follow(&keys, &from, &to, FollowProbe::default(), 10);

        assert_eq!(plan.outcome, FollowOutcome::Requested);
        let batch = plan.batch.unwrap();
        assert_eq!(batch.fence(), Some("user:2:3"));
        assert_eq!(
            batch.preconditions(),
            &[
                Precondition::Absent {
                    key: CollectionKey::new("user:2:pending"),
                    member: "3".to_string(),
                },
                Precondition::Absent {
                    key: CollectionKey::new("user:2:accepted"),
                    member: "3".to_string(),
                },
            ]
        );
        let ops = batch.into_ops();
        assert_eq!(
            ops,
            vec![
                BatchOp::Add {
                    key: CollectionKey::new("user:2:requested"),
                    member: "3".to_string(),
                    order_key: 10,
                },
                BatchOp::Add {
                    key: CollectionKey::new("user:3:pending"),
                    member: "2".to_string(),
                    order_key: 10,
                },
            ]
        );
    }

    #[test]
    fn test_reciprocal_plan() {
        let (keys, from, to) = ids();
        let probe = FollowProbe {
            counter_request: true,
            already_accepted: false,
        };
        let plan = plan_follow(&keys, &from, &to, probe, 20);

        assert_eq!(plan.outcome, FollowOutcome::Accepted);
        let batch = plan.batch.unwrap();
        assert_eq!(batch.fence(), Some("user:2:3"));
        assert!(matches!(batch.preconditions(), [Precondition::Present { key, member }]
            if key.as_str() == "user:2:pending" && member == "3"));
        let ops = batch.into_ops();
        assert_eq!(ops.len(), 4);
        assert_eq!(
            ops[0],
            BatchOp::Remove {
                key: CollectionKey::new("user:2:pending"),
                member: "3".to_string(),
            }
        );
        assert_eq!(
            ops[1],
            BatchOp::Remove {
                key: CollectionKey::new("user:3:requested"),
                member: "2".to_string(),
            }
        );
        // Both accepted entries share one order-key.
        assert!(matches!(&ops[2], BatchOp::Add { key, member, order_key: 20 }
            if key.as_str() == "user:2:accepted" && member == "3"));
        assert!(matches!(&ops[3], BatchOp::Add { key, member, order_key: 20 }
            if key.as_str() == "user:3:accepted" && member == "2"));
    }

    #[test]
    fn test_already_accepted_plan_has_no_batch() {
        let (keys, from, to) = ids();
        let probe = FollowProbe {
            counter_request: false,
            already_accepted: true,
        };
        let plan = plan_follow(&keys, &from, &to, probe, 30);
        assert_eq!(plan.outcome, FollowOutcome::AlreadyAccepted);
        assert!(plan.batch.is_none());
    }

    #[test]
    fn test_unfollow_and_block_plans() {
        let (keys, from, to) = ids();

        let unfollow = plan_unfollow(&keys, &from, &to).into_ops();
        assert_eq!(unfollow.len(), 2);
        assert!(unfollow.iter().all(|op| matches!(op, BatchOp::Remove { .. })));

        let block = plan_block(&keys, &from, &to, 40).into_ops();
        assert_eq!(block.len(), 3);
        assert_eq!(block[0].key().as_str(), "user:2:blocked");
        assert_eq!(block[0].member(), "3");
        assert!(
            !block
                .iter()
                .any(|op| op.key().as_str() == "user:3:blocked")
        );
    }

    #[test]
    fn test_invite_plan() {
        let keys = KeySpace::default();
        let batch = plan_invite(
            &keys,
            &Identity::from("alice"),
            &Identity::from("carol@example.com"),
            50,
        );
        let ops = batch.into_ops();
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].key().as_str(), "user:carol@example.com:invited");
        assert_eq!(ops[0].member(), "alice");
    }
}
