use crate::commands::{Commands, OutputFormat};
use crate::handlers::dispatch_command;
use socialgraph::config::{ConfigBuilder, ConfigLoader, SocialGraphConfig};
use socialgraph::prelude::*;
use std::path::Path;

pub struct SocialGraphCliContext {
    pub graph: SocialGraph,
}

impl SocialGraphCliContext {
    /// Open the graph selected by the global flags.
    pub async fn new(
        config_file: Option<String>,
        data_dir: Option<String>,
        memory: bool,
    ) -> socialgraph::Result<Self> {
        let config = Self::config(config_file, data_dir, memory)?;
        let graph = socialgraph::init(config).await?;
        Ok(Self { graph })
    }

    /// Wrap an already opened graph.
    pub fn from_graph(graph: SocialGraph) -> Self {
        Self { graph }
    }

    /// Run `command` and close the store, whatever the command's result.
    pub async fn execute(&self, command: Commands, output: OutputFormat) -> socialgraph::Result<()> {
        let result = dispatch_command(command, self, output).await;
        let closed = self.graph.store().close().await;
        result?;
        closed?;
        Ok(())
    }

    /// Resolve the configuration for this invocation.
    ///
    /// A `--config` file (plus `SOCIALGRAPH_*` variables) replaces the
    /// persistent defaults. `--memory` and `--data-dir` override either.
    pub fn config(
        config_file: Option<String>,
        data_dir: Option<String>,
        memory: bool,
    ) -> socialgraph::Result<SocialGraphConfig> {
        let builder = match config_file {
            Some(path) => ConfigBuilder::from_config(ConfigLoader::load(Some(Path::new(&path)))?),
            None if memory || data_dir.is_some() => ConfigBuilder::new(),
            None => ConfigBuilder::defaults(),
        };

        let builder = if memory {
            builder.with_memory_storage()
        } else if let Some(dir) = data_dir {
            builder.with_data_dir(dir).with_default_storage()
        } else {
            builder
        };

        let mut config = builder.build()?;

        // The CLI installs its own subscriber.
        config.logging.stdout = false;
        config.logging.file = None;

        Ok(config)
    }
}
