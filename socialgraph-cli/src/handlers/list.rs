//! Read-side command handlers

use crate::args::{AuditArgs, IdentityArgs, ListArgs};
use crate::commands::OutputFormat;
use crate::context::SocialGraphCliContext;
use crate::output::*;
use serde_json::json;
use socialgraph::relationships::RelationshipState;

pub async fn handle_list_command(
    args: ListArgs,
    ctx: &SocialGraphCliContext,
    output: OutputFormat,
) -> socialgraph::Result<()> {
    if args.count {
        let count = ctx.graph.count(args.identity.as_str(), args.state).await?;
        if output.is_json() {
            print_json(&json!({
                "identity": args.identity,
                "state": args.state,
                "count": count,
            }));
        } else {
            println!("{}", count);
        }
        return Ok(());
    }

    let members = ctx.graph.list(args.identity.as_str(), args.state).await?;
    if output.is_json() {
        print_json(&identity_list_json(&args.identity, args.state, &members));
    } else {
        print_identity_list(&args.identity, args.state, &members);
    }
    Ok(())
}

pub async fn handle_friends_command(
    args: IdentityArgs,
    ctx: &SocialGraphCliContext,
    output: OutputFormat,
) -> socialgraph::Result<()> {
    handle_list_command(
        ListArgs {
            state: RelationshipState::Accepted,
            identity: args.identity,
            count: false,
        },
        ctx,
        output,
    )
    .await
}

pub async fn handle_audit_command(
    args: AuditArgs,
    ctx: &SocialGraphCliContext,
    output: OutputFormat,
) -> socialgraph::Result<()> {
    let violations = ctx.graph.audit_pair(args.a.as_str(), args.b.as_str()).await?;
    if output.is_json() {
        print_json(&json!({
            "a": args.a,
            "b": args.b,
            "consistent": violations.is_empty(),
            "violations": violations,
        }));
    } else {
        print_violations(&args.a, &args.b, &violations);
    }
    Ok(())
}
