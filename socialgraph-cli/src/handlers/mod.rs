//! Command handlers for the SocialGraph CLI

pub mod list;
pub mod relationship;

pub use list::{handle_audit_command, handle_friends_command, handle_list_command};
pub use relationship::handle_relationship_command;

use crate::commands::{Commands, OutputFormat};
use crate::context::SocialGraphCliContext;
use crate::output::*;
use socialgraph::storage::BaseStore;

/// Route a store-backed command to its handler.
pub async fn dispatch_command(
    command: Commands,
    ctx: &SocialGraphCliContext,
    output: OutputFormat,
) -> socialgraph::Result<()> {
    match command {
        Commands::Health => {
            let healthy = ctx.graph.health_check().await?;
            let metadata = ctx.graph.store().get_metadata().await?;
            if output.is_json() {
                print_json(&serde_json::json!({
                    "healthy": healthy,
                    "namespace": ctx.graph.keys().namespace(),
                    "store": metadata,
                }));
            } else if healthy {
                println!("{}", format_success("Storage: Healthy"));
                println!("Storage metadata: {}", metadata);
            } else {
                println!("{}", format_error("Storage: Unhealthy"));
            }
        }

        Commands::List(args) => handle_list_command(args, ctx, output).await?,

        Commands::Friends(args) => handle_friends_command(args, ctx, output).await?,

        Commands::Audit(args) => handle_audit_command(args, ctx, output).await?,

        Commands::Clear(args) => {
            if !args.yes {
                println!(
                    "{}",
                    format_warning("This deletes every relationship. Re-run with --yes to confirm.")
                );
                return Ok(());
            }
            ctx.graph.store().clear().await?;
            if output.is_json() {
                print_json(&serde_json::json!({ "action": "clear", "cleared": true }));
            } else {
                println!("{}", format_success("All relationship data cleared"));
            }
        }

        command @ (Commands::Follow(_)
        | Commands::Unfollow(_)
        | Commands::Block(_)
        | Commands::Invite(_)
        | Commands::DeleteInvites(_)) => handle_relationship_command(command, ctx, output).await?,

        // Offline commands never reach a store.
        Commands::Version | Commands::Completions(_) => {}
    }

    Ok(())
}
