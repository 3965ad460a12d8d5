//! Layered configuration loading.
//!
//! Sources merge in order (defaults, then files, then `SOCIALGRAPH_*`
//! environment variables); later sources win key by key.

use super::{ConfigError, DEFAULT_CONFIG_FILES, ENV_PREFIX, Result, models::*, validation};
use figment::{
    Figment,
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
};
use std::path::{Path, PathBuf};

/// File formats understood by the loader, keyed by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Toml,
    Yaml,
    Json,
}

impl FileFormat {
    fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "toml" => Some(FileFormat::Toml),
            "yaml" | "yml" => Some(FileFormat::Yaml),
            "json" => Some(FileFormat::Json),
            _ => None,
        }
    }
}

/// Builds a [`SocialGraphConfig`] from several sources.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    figment: Figment,
    sources: Vec<PathBuf>,
}

impl ConfigLoader {
    /// Start from the built-in defaults.
    pub fn new() -> Self {
        Self {
            figment: Figment::from(Serialized::defaults(SocialGraphConfig::default())),
            sources: Vec::new(),
        }
    }

    /// Load one shortcut: defaults, then `path` (if any) or the default
    /// locations, then the environment.
    pub fn load(path: Option<&Path>) -> Result<SocialGraphConfig> {
        let mut loader = Self::new();
        match path {
            Some(path) => {
                loader.load_file(path)?;
            }
            None => {
                loader.load_default_files();
            }
        }
        loader.load_env().extract()
    }

    /// Merge a TOML, YAML or JSON file.
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<&mut Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileLoadError(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let format = FileFormat::from_path(path).ok_or_else(|| {
            ConfigError::FileLoadError(format!("Unsupported file format: {}", path.display()))
        })?;

        let figment = std::mem::take(&mut self.figment);
        self.figment = match format {
            FileFormat::Toml => figment.merge(Toml::file(path)),
            FileFormat::Yaml => figment.merge(Yaml::file(path)),
            FileFormat::Json => figment.merge(Json::file(path)),
        };
        self.sources.push(path.to_path_buf());
        tracing::debug!(path = %path.display(), "Merged configuration file");

        Ok(self)
    }

    /// Merge the first configuration file found in the working directory,
    /// then the first one found in the user's config directory.
    pub fn load_default_files(&mut self) -> &mut Self {
        let local = DEFAULT_CONFIG_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists());
        if let Some(path) = local {
            let _ = self.load_file(&path);
        }

        if let Some(dirs) = directories::ProjectDirs::from("org", "socialgraph", "socialgraph") {
            let user = ["toml", "yaml", "yml", "json"]
                .iter()
                .map(|ext| dirs.config_dir().join(format!("config.{}", ext)))
                .find(|path| path.exists());
            if let Some(path) = user {
                let _ = self.load_file(&path);
            }
        }

        self
    }

    /// Merge `SOCIALGRAPH_*` variables; nested keys use a double underscore,
    /// e.g. `SOCIALGRAPH_GRAPH__NAMESPACE`.
    pub fn load_env(&mut self) -> &mut Self {
        let figment =
            std::mem::take(&mut self.figment).merge(Env::prefixed(ENV_PREFIX).split("__"));
        self.figment = figment;
        self
    }

    /// Merge any other figment provider.
    pub fn merge<T: figment::Provider>(&mut self, provider: T) -> &mut Self {
        let figment = std::mem::take(&mut self.figment).merge(provider);
        self.figment = figment;
        self
    }

    /// Files merged so far, in order.
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    /// Extract and validate the merged configuration.
    pub fn extract(&self) -> Result<SocialGraphConfig> {
        let config: SocialGraphConfig = self
            .figment
            .extract()
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        validation::validate_config(&config)?;

        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
