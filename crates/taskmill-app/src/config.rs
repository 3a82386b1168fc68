//! Project configuration loaded from `.taskmill/config.toml`.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

const CONFIG_DIR: &str = ".taskmill";
const CONFIG_FILE: &str = "config.toml";

/// Top-level configuration loaded from `.taskmill/config.toml`.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct ProjectConfig {
    /// Defaults for the query layer.
    #[serde(default)]
    pub query: QueryConfig,
    /// Defaults for the pipeline engine.
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl ProjectConfig {
    /// Load configuration from `<root>/.taskmill/config.toml`, falling back to defaults when absent.
    ///
    /// # Errors
    /// Fails when the file exists but cannot be read, parsed or validated.
    pub fn load(root: impl AsRef<Path>) -> Result<Self> {
        let config_path = config_path(root.as_ref());
        if !config_path.exists() {
            return Ok(Self::default());
        }
        Self::from_path(&config_path)
    }

    /// Load configuration from an explicit file.
    ///
    /// # Errors
    /// Fails when the file cannot be read, parsed or validated.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Parse and validate TOML text.
    ///
    /// # Errors
    /// Fails on malformed TOML or out-of-range values.
    pub fn parse(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.query.default_top_limit == 0 {
            bail!("query.default_top_limit must be positive");
        }
        if self.pipeline.default_batch_size == 0 {
            bail!("pipeline.default_batch_size must be positive");
        }
        Ok(())
    }
}

fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_DIR).join(CONFIG_FILE)
}

/// Query layer defaults.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct QueryConfig {
    /// Limit used by [`crate::TaskAnalyzer::top_priority_default`].
    pub default_top_limit: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_top_limit: 5,
        }
    }
}

/// Pipeline engine defaults.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PipelineConfig {
    /// Batch size used by [`crate::TaskProcessingEngine::batch_process_default`].
    pub default_batch_size: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            default_batch_size: 10,
        }
    }
}
