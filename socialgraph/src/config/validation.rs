//! Configuration validation utilities.
//!
//! This module provides validation functions for configuration values.

use super::ConfigError;
use super::models::*;
use crate::relationships::keys::KEY_SEPARATOR;
use crate::storage::config::StoreEngine;

/// Validate the entire configuration.
pub fn validate_config(config: &SocialGraphConfig) -> Result<(), ConfigError> {
    validate_storage_config(&config.storage)?;
    validate_graph_config(&config.graph)?;

    Ok(())
}

/// Validate storage configuration.
fn validate_storage_config(config: &StorageConfig) -> Result<(), ConfigError> {
    if config.data_dir.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "Data directory cannot be empty".to_string(),
        ));
    }

    match config.engine {
        StoreEngine::Memory => {
            // No additional validation needed for memory storage
        }
        StoreEngine::SurrealDB => {
            let surreal = &config.surrealdb;
            if surreal.namespace.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "SurrealDB namespace cannot be empty".to_string(),
                ));
            }
            if surreal.database.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "SurrealDB database cannot be empty".to_string(),
                ));
            }
            if surreal.engine.needs_connection() && surreal.connection.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "SurrealDB engine {:?} requires a connection string",
                    surreal.engine
                )));
            }
        }
    }

    Ok(())
}

/// Validate graph configuration.
fn validate_graph_config(config: &GraphConfig) -> Result<(), ConfigError> {
    if config.namespace.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "Graph namespace cannot be empty".to_string(),
        ));
    }
    if config.namespace.contains(KEY_SEPARATOR) {
        return Err(ConfigError::ValidationError(format!(
            "Graph namespace must not contain '{}'",
            KEY_SEPARATOR
        )));
    }

    Ok(())
}
