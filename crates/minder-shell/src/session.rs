//! Per-shell context passed to every command.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use minder_core::EngineConfig;
use minder_ops::{PathResolver, base_dir};

/// The shell's current location and engine configuration.
///
/// The location may be a file; relative paths then resolve against its
/// parent directory.
#[derive(Debug, Clone)]
pub struct Session {
    location: PathBuf,
    config: Arc<EngineConfig>,
}

impl Session {
    /// Create a session at `location`.
    pub fn new(location: impl Into<PathBuf>, config: EngineConfig) -> Self {
        Self {
            location: location.into(),
            config: Arc::new(config),
        }
    }

    /// The current location.
    pub fn location(&self) -> &Path {
        &self.location
    }

    /// Move to a new location.
    pub fn set_location(&mut self, location: impl Into<PathBuf>) {
        self.location = location.into();
        tracing::debug!(location = %self.location.display(), "Location changed");
    }

    /// The engine configuration.
    pub fn config(&self) -> &Arc<EngineConfig> {
        &self.config
    }

    /// A resolver for paths typed at this location.
    pub fn resolver(&self) -> PathResolver<'_> {
        PathResolver::new(&self.location).with_home(self.config.home())
    }

    /// The directory being displayed: the location, or its parent when the
    /// location is a file.
    pub fn view_dir(&self) -> PathBuf {
        base_dir(&self.location).unwrap_or_else(|_| self.location.clone())
    }
}
