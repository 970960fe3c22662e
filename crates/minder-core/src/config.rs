//! Engine configuration types.

use std::path::{Path, PathBuf};

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Configuration shared by every engine invocation.
///
/// Passed by reference into the transfer and removal engines; there is no
/// dynamic lookup of settings at call sites.
#[derive(Debug, Clone, Builder, Serialize, Deserialize, PartialEq, Eq)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct EngineConfig {
    /// Home directory used for `~` expansion and the removal guard.
    ///
    /// `None` disables both.
    #[builder(default = "dirs::home_dir()")]
    #[serde(default = "default_home_dir")]
    pub home_dir: Option<PathBuf>,

    /// Recreate symbolic links found inside copied trees instead of copying
    /// their target content.
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub preserve_symlinks: bool,

    /// Sync file data to disk after each copied file.
    #[builder(default = "false")]
    #[serde(default)]
    pub fsync: bool,
}

fn default_true() -> bool {
    true
}

fn default_home_dir() -> Option<PathBuf> {
    dirs::home_dir()
}

impl EngineConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(Some(home)) = &self.home_dir {
            if !home.is_absolute() {
                return Err(format!(
                    "Home directory must be absolute: {}",
                    home.display()
                ));
            }
        }
        Ok(())
    }
}

impl EngineConfig {
    /// Create a new engine config builder.
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    /// Create a config with the given home directory and default settings.
    pub fn with_home(home_dir: impl Into<PathBuf>) -> Self {
        Self {
            home_dir: Some(home_dir.into()),
            ..Self::default()
        }
    }

    /// The configured home directory, if any.
    pub fn home(&self) -> Option<&Path> {
        self.home_dir.as_deref()
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            home_dir: dirs::home_dir(),
            preserve_symlinks: true,
            fsync: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = EngineConfig::builder()
            .home_dir(Some(PathBuf::from("/home/user")))
            .fsync(true)
            .build()
            .unwrap();

        assert_eq!(config.home(), Some(Path::new("/home/user")));
        assert!(config.fsync);
        assert!(config.preserve_symlinks);
    }

    #[test]
    fn test_config_builder_rejects_relative_home() {
        let result = EngineConfig::builder()
            .home_dir(Some(PathBuf::from("relative/home")))
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_config_without_home() {
        let config = EngineConfig::builder()
            .home_dir(None::<PathBuf>)
            .build()
            .unwrap();
        assert!(config.home().is_none());
    }

    #[test]
    fn test_with_home() {
        let config = EngineConfig::with_home("/srv/me");
        assert_eq!(config.home(), Some(Path::new("/srv/me")));
        assert!(!config.fsync);
    }
}
