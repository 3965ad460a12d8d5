//! Core relationship types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque identifier of a user or invitee.
///
/// Identities compare by equality only; any structure inside the string is
/// irrelevant to the state machine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Create an identity from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Identity {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for Identity {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&String> for Identity {
    fn from(id: &String) -> Self {
        Self(id.clone())
    }
}

impl From<&Identity> for Identity {
    fn from(id: &Identity) -> Self {
        id.clone()
    }
}

impl From<u64> for Identity {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<u32> for Identity {
    fn from(id: u32) -> Self {
        Self(id.to_string())
    }
}

impl PartialEq<str> for Identity {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Identity {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// The closed set of per-identity relationship collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipState {
    /// Identities who asked to follow this identity and await reciprocation
    Pending,
    /// Identities this identity asked to follow
    Requested,
    /// Mutually accepted identities (friends)
    Accepted,
    /// Identities this identity blocked
    Blocked,
    /// Inviters of this identity
    Invited,
}

impl RelationshipState {
    /// Every state, in declaration order.
    pub const ALL: [RelationshipState; 5] = [
        RelationshipState::Pending,
        RelationshipState::Requested,
        RelationshipState::Accepted,
        RelationshipState::Blocked,
        RelationshipState::Invited,
    ];

    /// Collection key suffix for this state.
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipState::Pending => "pending",
            RelationshipState::Requested => "requested",
            RelationshipState::Accepted => "accepted",
            RelationshipState::Blocked => "blocked",
            RelationshipState::Invited => "invited",
        }
    }

    /// States that take part in the follow state machine.
    pub fn is_follow_state(&self) -> bool {
        matches!(
            self,
            RelationshipState::Pending | RelationshipState::Requested | RelationshipState::Accepted
        )
    }
}

impl fmt::Display for RelationshipState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationshipState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(RelationshipState::Pending),
            "requested" => Ok(RelationshipState::Requested),
            "accepted" | "friends" => Ok(RelationshipState::Accepted),
            "blocked" => Ok(RelationshipState::Blocked),
            "invited" => Ok(RelationshipState::Invited),
            _ => Err(format!("Unknown relationship state: {}", s)),
        }
    }
}

/// Which branch a follow took.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowOutcome {
    /// Initial request recorded as requested/pending
    Requested,
    /// Counter-request found; both sides are now accepted
    Accepted,
    /// The pair was already accepted; nothing was written
    AlreadyAccepted,
}

impl FollowOutcome {
    /// Whether the pair is mutually accepted after the call.
    pub fn is_accepted(&self) -> bool {
        matches!(
            self,
            FollowOutcome::Accepted | FollowOutcome::AlreadyAccepted
        )
    }
}

impl fmt::Display for FollowOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FollowOutcome::Requested => write!(f, "requested"),
            FollowOutcome::Accepted => write!(f, "accepted"),
            FollowOutcome::AlreadyAccepted => write!(f, "already accepted"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_conversions() {
        assert_eq!(Identity::from(42u64), Identity::from("42"));
        assert_eq!(Identity::from(String::from("alice")).as_str(), "alice");
        assert_eq!(Identity::from("bob"), "bob");
        assert_eq!(Identity::new("carol").to_string(), "carol");
    }

    #[test]
    fn test_state_table_round_trips() {
        for state in RelationshipState::ALL {
            assert_eq!(state.as_str().parse::<RelationshipState>(), Ok(state));
        }
        assert_eq!(
            "friends".parse::<RelationshipState>(),
            Ok(RelationshipState::Accepted)
        );
        assert!("enemies".parse::<RelationshipState>().is_err());
    }

    #[test]
    fn test_follow_states() {
        assert!(RelationshipState::Pending.is_follow_state());
        assert!(RelationshipState::Accepted.is_follow_state());
        assert!(!RelationshipState::Blocked.is_follow_state());
        assert!(!RelationshipState::Invited.is_follow_state());
    }

    #[test]
    fn test_outcome_serialization() {
        let json = serde_json::to_string(&FollowOutcome::AlreadyAccepted).unwrap();
        assert_eq!(json, "\"already_accepted\"");
        assert!(FollowOutcome::AlreadyAccepted.is_accepted());
        assert!(!FollowOutcome::Requested.is_accepted());
    }
}
