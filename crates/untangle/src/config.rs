//! Configuration management for untangle.
//!
//! Configuration lives in a small YAML file (`untangle.yaml` by default).
//! A missing default file is not an error; built-in defaults apply.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Name of the default configuration file
pub const CONFIG_FILE_NAME: &str = "untangle.yaml";

/// Default number of tasks the line extractor emits
pub const DEFAULT_MAX_TASKS: usize = 5;

/// Default maximum description length, in characters
pub const DEFAULT_MAX_DESCRIPTION: usize = 200;

/// Configuration file structure for untangle
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", default)]
pub struct UntangleConfig {
    /// Fail on malformed or duplicate records instead of skipping them
    pub strict: bool,

    /// Collapse cycles that are rotations of each other
    pub dedup_cycles: bool,

    /// Extractor settings
    pub extractor: ExtractorConfig,
}

/// Extractor configuration section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", default)]
pub struct ExtractorConfig {
    /// Maximum number of tasks to extract from one source text
    pub max_tasks: usize,

    /// Maximum description length, in characters
    pub max_description: usize,

    /// Append a reference to a nonexistent task to the first extracted task
    pub hallucinate_dependency: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_tasks: DEFAULT_MAX_TASKS,
            max_description: DEFAULT_MAX_DESCRIPTION,
            hallucinate_dependency: true,
        }
    }
}

impl Default for UntangleConfig {
    fn default() -> Self {
        Self {
            strict: false,
            dedup_cycles: false,
            extractor: ExtractorConfig::default(),
        }
    }
}

impl UntangleConfig {
    /// Load configuration from a file
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await?;
        let config: Self =
            serde_yaml::from_str(&content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration for a run.
    ///
    /// An explicit path must exist. Without one, `untangle.yaml` in
    /// `working_dir` is used if present, otherwise the defaults.
    pub async fn resolve(explicit: Option<&Path>, working_dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            tracing::debug!(path = %path.display(), "Loading configuration");
            return Self::load(path).await;
        }

        let default_path = working_dir.join(CONFIG_FILE_NAME);
        if fs::try_exists(&default_path).await? {
            tracing::debug!(path = %default_path.display(), "Loading configuration");
            Self::load(&default_path).await
        } else {
            tracing::debug!("No configuration file found, using defaults");
            Ok(Self::default())
        }
    }

    /// Save configuration to a file
    pub async fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_yaml::to_string(self).map_err(|e| Error::Config(format!("YAML error: {}", e)))?;
        fs::write(path, content).await?;
        Ok(())
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.extractor.max_tasks == 0 {
            return Err(Error::Config(
                "extractor.max-tasks must be at least 1".to_string(),
            ));
        }
        if self.extractor.max_description == 0 {
            return Err(Error::Config(
                "extractor.max-description must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Write a default configuration file into `base_dir`.
///
/// # Errors
///
/// Returns an error if the file already exists and `force` is false, or if
/// the file cannot be written.
pub async fn init(base_dir: &Path, force: bool) -> Result<PathBuf> {
    let path = base_dir.join(CONFIG_FILE_NAME);

    if !force && fs::try_exists(&path).await? {
        return Err(Error::Config(format!(
            "'{}' already exists. Use --force to overwrite it",
            path.display()
        )));
    }

    UntangleConfig::default().save(&path).await?;
    tracing::debug!(path = %path.display(), "Wrote default configuration");
    Ok(path)
}
