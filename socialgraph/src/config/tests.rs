use crate::config::{
    ConfigBuilder, ConfigError, ConfigLoader, LogFormat, LogLevel, SocialGraphConfig, validation,
};
use crate::storage::config::{StoreEngine, SurrealDBEngine};
use std::io::Write;
use std::path::PathBuf;

#[test]
fn test_default_config() {
    let config = SocialGraphConfig::default();
    assert_eq!(config.storage.engine, StoreEngine::Memory);
    assert_eq!(config.graph.namespace, "user");
    assert!(config.graph.serialize_pairs);
    assert_eq!(config.logging.level, LogLevel::Info);
    assert!(validation::validate_config(&config).is_ok());
}

#[test]
fn test_builder_with_default_storage_uses_rocksdb_under_data_dir() {
    let config = ConfigBuilder::new()
        .with_data_dir("/tmp/socialgraph_test")
        .with_default_storage()
        .build()
        .unwrap();

    assert_eq!(config.storage.engine, StoreEngine::SurrealDB);
    assert_eq!(config.storage.surrealdb.engine, SurrealDBEngine::RocksDB);
    assert_eq!(
        PathBuf::from(&config.storage.surrealdb.connection),
        PathBuf::from("/tmp/socialgraph_test").join("graph")
    );
}

#[test]
fn test_predefined_configs() {
    let dev = ConfigBuilder::development().build().unwrap();
    let test = ConfigBuilder::testing().build().unwrap();
    let prod = ConfigBuilder::production().build().unwrap();

    assert_eq!(dev.storage.engine, StoreEngine::Memory);
    assert_eq!(dev.logging.level, LogLevel::Debug);
    assert_eq!(test.storage.data_dir, PathBuf::from("./test_data"));
    assert_eq!(prod.storage.engine, StoreEngine::SurrealDB);
    assert_eq!(prod.logging.format, LogFormat::Json);
}

#[test]
fn test_namespace_with_separator_is_rejected() {
    let result = ConfigBuilder::new().with_graph_namespace("app:user").build();
    assert!(matches!(result, Err(ConfigError::ValidationError(_))));

    let result = ConfigBuilder::new().with_graph_namespace("  ").build();
    assert!(matches!(result, Err(ConfigError::ValidationError(_))));
}

#[test]
fn test_persistent_engine_requires_connection() {
    let mut config = ConfigBuilder::new()
        .with_data_dir("/tmp/socialgraph_test")
        .with_default_storage()
        .build()
        .unwrap();
    config.storage.surrealdb.connection = String::new();

    assert!(validation::validate_config(&config).is_err());

    let memory = ConfigBuilder::new()
        .with_surrealdb_memory_storage()
        .build()
        .unwrap();
    assert_eq!(memory.storage.surrealdb.engine, SurrealDBEngine::Memory);
}

#[test]
fn test_loader_reads_toml_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("socialgraph.toml");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(
        file,
        r#"
[graph]
namespace = "member"
serialize_pairs = false

[logging]
level = "warn"
"#
    )
    .unwrap();

    let config = ConfigLoader::new().load_file(&path).unwrap().extract().unwrap();
    assert_eq!(config.graph.namespace, "member");
    assert!(!config.graph.serialize_pairs);
    assert_eq!(config.logging.level, LogLevel::Warn);
    assert_eq!(config.storage.engine, StoreEngine::Memory);
}

#[test]
fn test_loader_shortcut_records_sources() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("graph.json");
    std::fs::write(&path, r#"{"graph": {"namespace": "account"}}"#).unwrap();

    let config = ConfigLoader::load(Some(&path)).unwrap();
    assert_eq!(config.graph.namespace, "account");
    assert!(config.graph.serialize_pairs);

    let mut loader = ConfigLoader::new();
    loader.load_file(&path).unwrap();
    assert_eq!(loader.sources(), &[path.clone()]);
}

#[test]
fn test_loader_rejects_missing_and_unknown_files() {
    let mut loader = ConfigLoader::new();
    assert!(matches!(
        loader.load_file("/definitely/not/here.toml"),
        Err(ConfigError::FileLoadError(_))
    ));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.ini");
    std::fs::write(&path, "namespace=user").unwrap();
    assert!(matches!(
        loader.load_file(&path),
        Err(ConfigError::FileLoadError(_))
    ));
}

#[test]
fn test_config_serialization() {
    let config = ConfigBuilder::new()
        .with_graph_namespace("member")
        .with_pair_serialization(false)
        .build()
        .unwrap();

    let json = serde_json::to_string(&config).unwrap();
    let deserialized: SocialGraphConfig = serde_json::from_str(&json).unwrap();

    assert_eq!(deserialized.graph.namespace, "member");
    assert!(!deserialized.graph.serialize_pairs);
    assert_eq!(deserialized.storage.engine, config.storage.engine);
}
