//! Consistency audit for one identity pair.
//!
//! At quiescence a pair (A, B) must satisfy:
//! - A ∈ accepted(B) ⇔ B ∈ accepted(A)
//! - B ∈ pending(A) ⇔ A ∈ requested(B)
//! - a counterpart sits in at most one of pending/requested/accepted

use super::keys::KeySpace;
use super::types::{Identity, RelationshipState};
use crate::storage::CollectionKey;
use serde::{Deserialize, Serialize};
use std::fmt;

const FOLLOW_STATES: [RelationshipState; 3] = [
    RelationshipState::Pending,
    RelationshipState::Requested,
    RelationshipState::Accepted,
];

/// A broken pair invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InvariantViolation {
    /// `holder` lists `counterpart` as accepted but not the other way round
    AsymmetricAcceptance {
        holder: Identity,
        counterpart: Identity,
    },
    /// Only one half of `requester`'s request to `target` exists
    DanglingRequest {
        requester: Identity,
        target: Identity,
        in_requested: bool,
        in_pending: bool,
    },
    /// `identity` holds `counterpart` in several follow states at once
    OverlappingStates {
        identity: Identity,
        counterpart: Identity,
        states: Vec<RelationshipState>,
    },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvariantViolation::AsymmetricAcceptance {
                holder,
                counterpart,
            } => write!(
                f,
                "{} has accepted {} but {} has not accepted {}",
                holder, counterpart, counterpart, holder
            ),
            InvariantViolation::DanglingRequest {
                requester,
                target,
                in_requested,
                in_pending,
            } => write!(
                f,
                "request {} -> {} is half-recorded (requested: {}, pending: {})",
                requester, target, in_requested, in_pending
            ),
            InvariantViolation::OverlappingStates {
                identity,
                counterpart,
                states,
            } => {
                let names: Vec<&str> = states.iter().map(|s| s.as_str()).collect();
                write!(
                    f,
                    "{} holds {} in several states: {}",
                    identity,
                    counterpart,
                    names.join(", ")
                )
            }
        }
    }
}

/// Follow-state membership of one side of a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SideMembership {
    pub pending: bool,
    pub requested: bool,
    pub accepted: bool,
}

impl SideMembership {
    fn states(&self) -> Vec<RelationshipState> {
        FOLLOW_STATES
            .into_iter()
            .zip([self.pending, self.requested, self.accepted])
            .filter_map(|(state, present)| present.then_some(state))
            .collect()
    }
}

/// Follow-state membership of both sides of a pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairSnapshot {
    pub a: Identity,
    pub b: Identity,
    /// Where `b` appears among `a`'s collections
    pub a_side: SideMembership,
    /// Where `a` appears among `b`'s collections
    pub b_side: SideMembership,
}

impl PairSnapshot {
    /// Probes answering every membership the audit needs, in the order
    /// [`PairSnapshot::from_answers`] expects.
    pub fn queries(keys: &KeySpace, a: &Identity, b: &Identity) -> Vec<(CollectionKey, String)> {
        let mut probes = Vec::with_capacity(FOLLOW_STATES.len() * 2);
        for (holder, member) in [(a, b), (b, a)] {
            for state in FOLLOW_STATES {
                probes.push((keys.collection_key(holder, state), member.to_string()));
            }
        }
        probes
    }

    pub fn from_answers(a: Identity, b: Identity, answers: &[bool]) -> Self {
        let at = |i: usize| answers.get(i).copied().unwrap_or(false);
        Self {
            a,
            b,
            a_side: SideMembership {
                pending: at(0),
                requested: at(1),
                accepted: at(2),
            },
            b_side: SideMembership {
                pending: at(3),
                requested: at(4),
                accepted: at(5),
            },
        }
    }

    /// Every invariant the snapshot breaks. Empty when consistent.
    pub fn violations(&self) -> Vec<InvariantViolation> {
        let mut violations = Vec::new();
        let sides = [
            (&self.a, &self.b, &self.a_side, &self.b_side),
            (&self.b, &self.a, &self.b_side, &self.a_side),
        ];

        for (holder, counterpart, own, other) in sides {
            if own.accepted && !other.accepted {
                violations.push(InvariantViolation::AsymmetricAcceptance {
                    holder: holder.clone(),
                    counterpart: counterpart.clone(),
                });
            }

            // holder -> counterpart is recorded as holder.requested + counterpart.pending
            if own.requested != other.pending {
                violations.push(InvariantViolation::DanglingRequest {
                    requester: holder.clone(),
                    target: counterpart.clone(),
                    in_requested: own.requested,
                    in_pending: other.pending,
                });
            }

            let states = own.states();
            if states.len() > 1 {
                violations.push(InvariantViolation::OverlappingStates {
                    identity: holder.clone(),
                    counterpart: counterpart.clone(),
                    states,
                });
            }
        }

        violations
    }
}
