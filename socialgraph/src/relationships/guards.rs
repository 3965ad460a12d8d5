//! Input validation run before any store call.

use super::types::Identity;
use crate::SocialGraphError;

/// Longest accepted identity, in bytes.
pub const MAX_IDENTITY_LEN: usize = 256;

/// Reject empty and oversized identities. Content is otherwise opaque.
pub fn validate_identity(identity: &Identity) -> Result<(), SocialGraphError> {
    let raw = identity.as_str();

    let reason = if raw.is_empty() {
        Some("must not be empty".to_string())
    } else if raw.len() > MAX_IDENTITY_LEN {
        Some(format!("must be at most {} bytes", MAX_IDENTITY_LEN))
    } else {
        None
    };

    match reason {
        Some(reason) => {
            tracing::warn!(identity = %raw, %reason, "Rejected identity");
            Err(SocialGraphError::InvalidIdentity {
                identity: raw.to_string(),
                reason,
            })
        }
        None => Ok(()),
    }
}

/// Validate both ends of a directed pair and reject self-relationships.
pub fn validate_pair(from: &Identity, to: &Identity) -> Result<(), SocialGraphError> {
    validate_identity(from)?;
    validate_identity(to)?;

    if from == to {
        tracing::warn!(identity = %from, "Rejected self-relationship");
        return Err(SocialGraphError::SelfRelationship(from.to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opaque_identities_accepted() {
        for id in [
            "1",
            "alice",
            "bob@example.com",
            "ünïcode",
            "Jane Doe",
            "urn:user:7",
            "+1 555 0100",
            "100%",
            " padded ",
        ] {
            assert!(validate_identity(&Identity::from(id)).is_ok(), "{id}");
        }
    }

    #[test]
    fn test_empty_identity() {
        let err = validate_identity(&Identity::from("")).unwrap_err();
        match err {
            SocialGraphError::InvalidIdentity { identity, reason } => {
                assert!(identity.is_empty());
                assert!(reason.contains("empty"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_length_limit() {
        let at_limit = "x".repeat(MAX_IDENTITY_LEN);
        let over = "x".repeat(MAX_IDENTITY_LEN + 1);
        assert!(validate_identity(&Identity::from(at_limit)).is_ok());
        assert!(validate_identity(&Identity::from(over)).is_err());
    }

    #[test]
    fn test_self_pair_rejected() {
        let a = Identity::from("a");
        let b = Identity::from("b");
        assert!(validate_pair(&a, &b).is_ok());
        assert!(matches!(
            validate_pair(&a, &a),
            Err(SocialGraphError::SelfRelationship(_))
        ));
    }
}
