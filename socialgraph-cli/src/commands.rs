//! Command enum definitions
//!
//! This module contains the top-level parser and the command enum.

use crate::args::*;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "socialgraph")]
#[command(about = "Follow/friend relationship graph CLI", long_about = None)]
#[command(version = socialgraph::VERSION)]
pub struct Cli {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Custom data directory for persistent storage
    #[arg(long, short, global = true)]
    pub data_dir: Option<String>,

    /// Use a throwaway in-memory store
    #[arg(long, global = true, conflicts_with = "data_dir")]
    pub memory: bool,

    /// Output format - use json for tool integration
    #[arg(long, short, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub output: OutputFormat,

    /// Verbose output (debug level logging)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Quiet mode (suppress all logging output)
    #[arg(long, short, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    pub fn is_json(&self) -> bool {
        matches!(self, OutputFormat::Json)
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Display version information
    Version,

    /// Check that the store is reachable
    Health,

    /// Send a follow request, or accept the target's pending request
    Follow(PairArgs),

    /// Remove an accepted relationship on both sides
    Unfollow(PairArgs),

    /// Block an identity and drop any accepted relationship with it
    Block(PairArgs),

    /// Record an invitation
    Invite(InviteArgs),

    /// Delete every invitation recorded for an identity
    DeleteInvites(IdentityArgs),

    /// List one relationship collection, newest first
    #[command(alias = "ls")]
    List(ListArgs),

    /// List accepted relationships (alias of `list accepted`)
    Friends(IdentityArgs),

    /// Check the relationship invariants of a pair
    Audit(AuditArgs),

    /// Generate shell completion scripts
    Completions(CompletionsArgs),

    /// Clear all data from storage
    Clear(ClearArgs),
}

impl Commands {
    /// Whether the command runs without opening a store.
    pub fn is_offline(&self) -> bool {
        matches!(self, Commands::Version | Commands::Completions(_))
    }
}
