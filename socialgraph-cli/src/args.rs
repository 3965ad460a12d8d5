//! Command argument structures
//!
//! This module contains the CLI argument structs, grouped by command.

use clap::Args;
use socialgraph::relationships::RelationshipState;

/// Parse a relationship state name (`friends` is accepted for `accepted`).
pub fn parse_state(value: &str) -> Result<RelationshipState, String> {
    value.parse()
}

// Relationship command arguments
#[derive(Args, Debug)]
pub struct PairArgs {
    /// Acting identity
    pub from: String,

    /// Target identity
    pub to: String,
}

#[derive(Args, Debug)]
pub struct InviteArgs {
    /// Identity sending the invitation
    pub inviter: String,

    /// Invited identity or external identifier (e.g. an e-mail address)
    pub invited: String,
}

#[derive(Args, Debug)]
pub struct IdentityArgs {
    /// Identity to inspect
    pub identity: String,
}

// Read command arguments
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Collection to list (pending, requested, accepted, blocked, invited)
    #[arg(value_parser = parse_state)]
    pub state: RelationshipState,

    /// Identity owning the collection
    pub identity: String,

    /// Only print the number of members
    #[arg(long, short)]
    pub count: bool,
}

#[derive(Args, Debug)]
pub struct AuditArgs {
    /// First identity of the pair
    pub a: String,

    /// Second identity of the pair
    pub b: String,
}

// Maintenance command arguments
#[derive(Args, Debug)]
pub struct ClearArgs {
    /// Skip the confirmation check
    #[arg(long, short)]
    pub yes: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell type
    #[arg(value_enum)]
    pub shell: Shell,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    #[clap(name = "powershell")]
    Power,
    Elvish,
}

impl From<Shell> for clap_complete::Shell {
    fn from(shell: Shell) -> Self {
        match shell {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::Power => clap_complete::Shell::PowerShell,
            Shell::Elvish => clap_complete::Shell::Elvish,
        }
    }
}
