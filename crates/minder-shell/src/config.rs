//! Shell configuration loaded from TOML.

use std::path::{Path, PathBuf};

use minder_core::EngineConfig;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ShellError};
use crate::history::History;

/// Shell settings from `config.toml`.
///
/// ```toml
/// history_file = "/home/me/.minder_history"
/// log_file = "/tmp/minder.log"
/// prompt = "> "
///
/// [engine]
/// preserve_symlinks = true
/// fsync = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// History file. Defaults to `~/.minder_history`.
    pub history_file: Option<PathBuf>,
    /// Log file. Defaults to the platform data directory.
    pub log_file: Option<PathBuf>,
    /// Prompt shown after the current location.
    pub prompt: String,
    /// Engine settings.
    pub engine: EngineConfig,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            history_file: None,
            log_file: None,
            prompt: "> ".to_string(),
            engine: EngineConfig::default(),
        }
    }
}

impl ShellConfig {
    /// Get the default config file path.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("minder").join("config.toml"))
    }

    /// Load from the default path. A missing file yields defaults.
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load from a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ShellError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&content).map_err(|source| ShellError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// The history file to append to.
    pub fn history_path(&self) -> PathBuf {
        self.history_file
            .clone()
            .unwrap_or_else(History::default_path)
    }

    /// The log file to write to.
    pub fn log_path(&self) -> PathBuf {
        self.log_file.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .map(|d| d.join("minder"))
                .unwrap_or_else(|| PathBuf::from("."))
                .join("minder.log")
        })
    }
}
