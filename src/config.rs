// ABOUTME: Configuration loading for studyclaw.
// ABOUTME: Reads ~/.studyclaw/config.toml and applies CLI path overrides.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

/// Where the state document and the session log live on disk.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub state_file: PathBuf,
    pub log_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let base = Config::base_dir();
        Self {
            state_file: base.join("study_state.json"),
            log_file: base.join("session_log.txt"),
        }
    }
}

impl StorageConfig {
    /// Storage rooted in a single directory, using the standard file names.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            state_file: dir.join("study_state.json"),
            log_file: dir.join("session_log.txt"),
        }
    }
}

/// Diagnostics written to stderr by the binary.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Load config from ~/.studyclaw/config.toml, falling back to defaults.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load config from an explicit path. A missing file yields defaults.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Replace storage paths with any values given on the command line.
    pub fn with_overrides(
        mut self,
        state_file: Option<PathBuf>,
        log_file: Option<PathBuf>,
    ) -> Self {
        if let Some(path) = state_file {
            self.storage.state_file = path;
        }
        if let Some(path) = log_file {
            self.storage.log_file = path;
        }
        self
    }

    /// Directory holding config, state, and log files.
    pub fn base_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".studyclaw")
    }

    /// Path to the config file.
    pub fn config_path() -> PathBuf {
        Self::base_dir().join("config.toml")
    }
}
