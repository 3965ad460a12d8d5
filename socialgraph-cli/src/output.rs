use crate::commands::OutputFormat;
use colored::*;
use serde_json::json;
use socialgraph::SocialGraphError;
use socialgraph::relationships::{FollowOutcome, Identity, InvariantViolation, RelationshipState};

pub struct CliColors;

impl CliColors {
    pub fn success() -> Color {
        Color::TrueColor {
            r: 34,
            g: 197,
            b: 94,
        }
    }

    pub fn error() -> Color {
        Color::TrueColor {
            r: 239,
            g: 68,
            b: 68,
        }
    }

    pub fn warning() -> Color {
        Color::TrueColor {
            r: 245,
            g: 158,
            b: 11,
        }
    }

    pub fn info() -> Color {
        Color::TrueColor {
            r: 59,
            g: 130,
            b: 246,
        }
    }

    pub fn muted() -> Color {
        Color::TrueColor {
            r: 148,
            g: 163,
            b: 184,
        }
    }

    pub fn accent() -> Color {
        Color::TrueColor {
            r: 168,
            g: 85,
            b: 247,
        }
    }
}

/// Stable machine-readable code for an error.
pub fn error_code(error: &SocialGraphError) -> &'static str {
    match error {
        SocialGraphError::Configuration(_) => "CONFIGURATION_ERROR",
        SocialGraphError::Storage(_) => "STORAGE_ERROR",
        SocialGraphError::InvalidIdentity { .. } => "INVALID_IDENTITY",
        SocialGraphError::SelfRelationship(_) => "SELF_RELATIONSHIP",
        SocialGraphError::Logging(_) => "LOGGING_ERROR",
    }
}

/// Print an error in the selected format.
pub fn output_error(error: &SocialGraphError, output: OutputFormat) {
    if output.is_json() {
        let error_response = json!({
            "error": true,
            "code": error_code(error),
            "message": error.to_string(),
            "transient": error.is_transient(),
            "timestamp": chrono::Utc::now().to_rfc3339()
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&error_response).unwrap_or_else(|_| "{}".to_string())
        );
    } else {
        eprintln!("{}", format_error(&error.to_string()));
    }
}

/// Print a JSON document, falling back to an empty object.
pub fn print_json(value: &serde_json::Value) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    );
}

pub fn format_success(msg: &str) -> String {
    format!(
        "{} {}",
        "✓".color(CliColors::success()).bold(),
        msg.color(CliColors::success())
    )
}

pub fn format_error(msg: &str) -> String {
    format!(
        "{} {}",
        "✗".color(CliColors::error()).bold(),
        msg.color(CliColors::error())
    )
}

pub fn format_warning(msg: &str) -> String {
    format!(
        "{} {}",
        "⚠".color(CliColors::warning()).bold(),
        msg.color(CliColors::warning())
    )
}

pub fn format_info(msg: &str) -> String {
    format!(
        "{} {}",
        "ℹ".color(CliColors::info()).bold(),
        msg.color(CliColors::info())
    )
}

pub fn format_state(state: RelationshipState) -> ColoredString {
    match state {
        RelationshipState::Accepted => state.as_str().color(CliColors::success()),
        RelationshipState::Pending | RelationshipState::Requested => {
            state.as_str().color(CliColors::warning())
        }
        RelationshipState::Blocked => state.as_str().color(CliColors::error()),
        RelationshipState::Invited => state.as_str().color(CliColors::accent()),
    }
}

/// One-line human summary of a follow.
pub fn describe_follow(from: &str, to: &str, outcome: FollowOutcome) -> String {
    match outcome {
        FollowOutcome::Requested => format!("'{}' asked to follow '{}'", from, to),
        FollowOutcome::Accepted => format!("'{}' and '{}' are now friends", from, to),
        FollowOutcome::AlreadyAccepted => {
            format!("'{}' and '{}' are already friends", from, to)
        }
    }
}

/// JSON document for a listed collection.
pub fn identity_list_json(
    identity: &str,
    state: RelationshipState,
    members: &[Identity],
) -> serde_json::Value {
    json!({
        "identity": identity,
        "state": state,
        "count": members.len(),
        "members": members,
    })
}

pub fn print_identity_list(identity: &str, state: RelationshipState, members: &[Identity]) {
    if members.is_empty() {
        println!(
            "{}",
            format_info(&format!("'{}' has no {} entries.", identity, state))
        );
        return;
    }

    println!(
        "{}",
        format_info(&format!(
            "{} {} entries for '{}' (newest first):",
            members.len(),
            state,
            identity
        ))
    );
    println!();

    println!(
        "{:<6} {:<40} {}",
        "#".color(CliColors::muted()).bold(),
        "Identity".color(CliColors::muted()).bold(),
        "State".color(CliColors::muted()).bold()
    );
    println!("{}", "─".repeat(60).color(CliColors::muted()));

    for (position, member) in members.iter().enumerate() {
        println!(
            "{:<6} {:<40} {}",
            (position + 1).to_string().color(CliColors::muted()),
            member.as_str().color(CliColors::info()),
            format_state(state)
        );
    }
}

pub fn print_violations(a: &str, b: &str, violations: &[InvariantViolation]) {
    if violations.is_empty() {
        println!(
            "{}",
            format_success(&format!("Pair '{}' / '{}' is consistent", a, b))
        );
        return;
    }

    println!(
        "{}",
        format_warning(&format!(
            "Pair '{}' / '{}' breaks {} invariant(s):",
            a,
            b,
            violations.len()
        ))
    );
    for violation in violations {
        println!("  {} {}", "•".color(CliColors::warning()), violation);
    }
}
