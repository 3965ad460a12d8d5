//! Integration tests for the SocialGraph CLI
//!
//! These tests verify argument parsing for every command, the global flags,
//! and the handlers running against an in-memory graph.

use async_trait::async_trait;
use clap::{CommandFactory, Parser};
use socialgraph::relationships::{Identity, RelationshipState, SocialGraph};
use socialgraph::storage::{
    BaseStore, CollectionKey, MemoryOrderedStore, OrderedSetStore, ScoredMember, StorageError,
    WriteBatch,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use socialgraph_cli::args::Shell;
use socialgraph_cli::commands::{Cli, Commands, OutputFormat};
use socialgraph_cli::context::SocialGraphCliContext;
use socialgraph_cli::handlers::{
    handle_audit_command, handle_friends_command, handle_list_command,
    handle_relationship_command,
};

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("socialgraph").chain(args.iter().copied()))
        .expect("arguments should parse")
}

async fn memory_context() -> SocialGraphCliContext {
    SocialGraphCliContext::new(None, None, true)
        .await
        .expect("Failed to create in-memory context")
}

#[test]
fn test_cli_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn test_parse_follow_with_global_flags() {
    let cli = parse(&["--memory", "--output", "json", "follow", "2", "3"]);
    assert!(cli.memory);
    assert_eq!(cli.output, OutputFormat::Json);
    match cli.command {
        Commands::Follow(args) => {
            assert_eq!(args.from, "2");
            assert_eq!(args.to, "3");
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = parse(&["friends", "alice", "--data-dir", "/tmp/graph", "-v"]);
    assert_eq!(cli.data_dir.as_deref(), Some("/tmp/graph"));
    assert!(cli.verbose);
    assert_eq!(cli.output, OutputFormat::Table);
}

#[test]
fn test_parse_list_states() {
    let cli = parse(&["list", "pending", "bob"]);
    match cli.command {
        Commands::List(args) => {
            assert_eq!(args.state, RelationshipState::Pending);
            assert_eq!(args.identity, "bob");
            assert!(!args.count);
        }
        other => panic!("unexpected command: {other:?}"),
    }

    let cli = parse(&["ls", "friends", "bob", "--count"]);
    match cli.command {
        Commands::List(args) => {
            assert_eq!(args.state, RelationshipState::Accepted);
            assert!(args.count);
        }
        other => panic!("unexpected command: {other:?}"),
    }

    assert!(Cli::try_parse_from(["socialgraph", "list", "enemies", "bob"]).is_err());
}

#[test]
fn test_parse_remaining_commands() {
    assert!(matches!(parse(&["unfollow", "a", "b"]).command, Commands::Unfollow(_)));
    assert!(matches!(parse(&["block", "a", "b"]).command, Commands::Block(_)));
    assert!(matches!(
        parse(&["invite", "alice", "carol@example.com"]).command,
        Commands::Invite(_)
    ));
    assert!(matches!(
        parse(&["delete-invites", "carol@example.com"]).command,
        Commands::DeleteInvites(_)
    ));
    assert!(matches!(parse(&["audit", "a", "b"]).command, Commands::Audit(_)));
    assert!(matches!(parse(&["health"]).command, Commands::Health));
    assert!(matches!(parse(&["version"]).command, Commands::Version));

    match parse(&["clear", "--yes"]).command {
        Commands::Clear(args) => assert!(args.yes),
        other => panic!("unexpected command: {other:?}"),
    }
    match parse(&["completions", "powershell"]).command {
        Commands::Completions(args) => assert_eq!(args.shell, Shell::Power),
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_conflicting_flags_are_rejected() {
    assert!(
        Cli::try_parse_from(["socialgraph", "--memory", "--data-dir", "/tmp/x", "health"]).is_err()
    );
    assert!(Cli::try_parse_from(["socialgraph", "-q", "-v", "health"]).is_err());
    assert!(Cli::try_parse_from(["socialgraph", "follow", "only-one"]).is_err());
}

#[test]
fn test_offline_commands() {
    assert!(parse(&["version"]).command.is_offline());
    assert!(parse(&["completions", "bash"]).command.is_offline());
    assert!(!parse(&["health"]).command.is_offline());
}

#[test]
fn test_context_config_selection() {
    let memory = SocialGraphCliContext::config(None, None, true).unwrap();
    assert_eq!(
        memory.storage.engine,
        socialgraph::storage::config::StoreEngine::Memory
    );
    assert!(!memory.logging.stdout);

    let dir = tempfile::tempdir().unwrap();
    let persistent =
        SocialGraphCliContext::config(None, Some(dir.path().to_string_lossy().to_string()), false)
            .unwrap();
    assert_eq!(
        persistent.storage.engine,
        socialgraph::storage::config::StoreEngine::SurrealDB
    );
    assert_eq!(persistent.storage.data_dir, dir.path());
}

#[test]
fn test_context_reads_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("socialgraph.toml");
    std::fs::write(
        &path,
        "[graph]\nnamespace = \"member\"\n\n[storage]\nengine = \"memory\"\n",
    )
    .unwrap();
    let path = path.to_string_lossy().to_string();

    let cli = parse(&["--config", &path, "health"]);
    assert_eq!(cli.config.as_deref(), Some(path.as_str()));

    let config = SocialGraphCliContext::config(Some(path.clone()), None, false).unwrap();
    assert_eq!(config.graph.namespace, "member");
    assert_eq!(
        config.storage.engine,
        socialgraph::storage::config::StoreEngine::Memory
    );

    let missing = SocialGraphCliContext::config(Some(format!("{path}.missing")), None, false);
    assert!(matches!(
        missing,
        Err(socialgraph::SocialGraphError::Configuration(_))
    ));
}

#[tokio::test]
async fn test_handlers_drive_the_graph() {
    let ctx = memory_context().await;
    let output = OutputFormat::Json;

    handle_relationship_command(parse(&["follow", "2", "3"]).command, &ctx, output)
        .await
        .unwrap();
    handle_relationship_command(parse(&["follow", "3", "2"]).command, &ctx, output)
        .await
        .unwrap();

    assert_eq!(
        ctx.graph.friends("2").await.unwrap(),
        vec![Identity::from("3")]
    );

    let Commands::Friends(args) = parse(&["friends", "2"]).command else {
        panic!("expected friends command");
    };
    handle_friends_command(args, &ctx, output).await.unwrap();

    let Commands::Audit(args) = parse(&["audit", "2", "3"]).command else {
        panic!("expected audit command");
    };
    handle_audit_command(args, &ctx, output).await.unwrap();

    handle_relationship_command(parse(&["block", "2", "3"]).command, &ctx, output)
        .await
        .unwrap();
    assert!(ctx.graph.friends("3").await.unwrap().is_empty());

    let Commands::List(args) = parse(&["list", "blocked", "2", "--count"]).command else {
        panic!("expected list command");
    };
    handle_list_command(args, &ctx, output).await.unwrap();
}

#[tokio::test]
async fn test_handler_errors_surface() {
    let ctx = memory_context().await;
    let err = handle_relationship_command(parse(&["follow", "a", "a"]).command, &ctx, OutputFormat::Table)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        socialgraph::SocialGraphError::SelfRelationship(_)
    ));
}

#[tokio::test]
async fn test_relationship_handler_rejects_other_commands() {
    let ctx = memory_context().await;
    let err = handle_relationship_command(parse(&["health"]).command, &ctx, OutputFormat::Json)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        socialgraph::SocialGraphError::Configuration(_)
    ));
}

/// Memory store that counts `close` calls.
#[derive(Debug, Default)]
struct CountingStore {
    inner: MemoryOrderedStore,
    closes: AtomicUsize,
}

#[async_trait]
impl BaseStore for CountingStore {
    async fn health_check(&self) -> Result<bool, StorageError> {
        self.inner.health_check().await
    }

    async fn clear(&self) -> Result<(), StorageError> {
        self.inner.clear().await
    }

    async fn get_metadata(&self) -> Result<serde_json::Value, StorageError> {
        self.inner.get_metadata().await
    }

    async fn close(&self) -> Result<(), StorageError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl OrderedSetStore for CountingStore {
    async fn contains(&self, key: &CollectionKey, member: &str) -> Result<bool, StorageError> {
        self.inner.contains(key, member).await
    }

    async fn apply_batch(&self, batch: WriteBatch) -> Result<(), StorageError> {
        self.inner.apply_batch(batch).await
    }

    async fn range_desc_scored(
        &self,
        key: &CollectionKey,
    ) -> Result<Vec<ScoredMember>, StorageError> {
        self.inner.range_desc_scored(key).await
    }

    async fn cardinality(&self, key: &CollectionKey) -> Result<usize, StorageError> {
        self.inner.cardinality(key).await
    }

    async fn delete_collection(&self, key: &CollectionKey) -> Result<(), StorageError> {
        self.inner.delete_collection(key).await
    }
}

#[tokio::test]
async fn test_execute_closes_store_on_every_path() {
    let store = Arc::new(CountingStore::default());
    let ctx = SocialGraphCliContext::from_graph(SocialGraph::new(store.clone()));

    // Unconfirmed clear returns early.
    ctx.execute(parse(&["clear"]).command, OutputFormat::Json)
        .await
        .unwrap();
    assert_eq!(store.closes.load(Ordering::SeqCst), 1);

    // A failing command still closes.
    assert!(
        ctx.execute(parse(&["follow", "a", "a"]).command, OutputFormat::Json)
            .await
            .is_err()
    );
    assert_eq!(store.closes.load(Ordering::SeqCst), 2);

    ctx.execute(parse(&["follow", "a", "b"]).command, OutputFormat::Json)
        .await
        .unwrap();
    assert_eq!(store.closes.load(Ordering::SeqCst), 3);
    assert_eq!(
        store.inner.range_desc(&ctx.graph.keys().requested(&Identity::from("a"))).await.unwrap(),
        vec!["b".to_string()]
    );
}
