//! Mutating relationship command handlers

use crate::commands::{Commands, OutputFormat};
use crate::context::SocialGraphCliContext;
use crate::output::*;
use serde_json::json;
use socialgraph::SocialGraphError;

pub async fn handle_relationship_command(
    cmd: Commands,
    ctx: &SocialGraphCliContext,
    output: OutputFormat,
) -> socialgraph::Result<()> {
    match cmd {
        Commands::Follow(args) => {
            let outcome = ctx.graph.follow(args.from.as_str(), args.to.as_str()).await?;
            if output.is_json() {
                print_json(&json!({
                    "action": "follow",
                    "from": args.from,
                    "to": args.to,
                    "outcome": outcome,
                }));
            } else {
                println!(
                    "{}",
                    format_success(&describe_follow(&args.from, &args.to, outcome))
                );
            }
        }

        Commands::Unfollow(args) => {
            ctx.graph
                .unfollow(args.from.as_str(), args.to.as_str())
                .await?;
            if output.is_json() {
                print_json(&json!({ "action": "unfollow", "from": args.from, "to": args.to }));
            } else {
                println!(
                    "{}",
                    format_success(&format!("'{}' unfollowed '{}'", args.from, args.to))
                );
            }
        }

        Commands::Block(args) => {
            ctx.graph.block(args.from.as_str(), args.to.as_str()).await?;
            if output.is_json() {
                print_json(&json!({ "action": "block", "from": args.from, "to": args.to }));
            } else {
                println!(
                    "{}",
                    format_success(&format!("'{}' blocked '{}'", args.from, args.to))
                );
            }
        }

        Commands::Invite(args) => {
            ctx.graph
                .invite(args.inviter.as_str(), args.invited.as_str())
                .await?;
            if output.is_json() {
                print_json(&json!({
                    "action": "invite",
                    "inviter": args.inviter,
                    "invited": args.invited,
                }));
            } else {
                println!(
                    "{}",
                    format_success(&format!("'{}' invited '{}'", args.inviter, args.invited))
                );
            }
        }

        Commands::DeleteInvites(args) => {
            ctx.graph.delete_invites(args.identity.as_str()).await?;
            if output.is_json() {
                print_json(&json!({ "action": "delete_invites", "identity": args.identity }));
            } else {
                println!(
                    "{}",
                    format_success(&format!("Deleted invitations for '{}'", args.identity))
                );
            }
        }

        other => {
            return Err(SocialGraphError::Configuration(format!(
                "Not a relationship command: {:?}",
                other
            )));
        }
    }

    Ok(())
}
