//! Config file loading

use crate::config::QuillConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Environment variable overriding `base_url`
pub const BASE_URL_ENV: &str = "QUILL_BASE_URL";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading or writing the config file failed
    #[error("config IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML for [`QuillConfig`]
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be rendered as TOML
    #[error("config serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Loads [`QuillConfig`] from disk
pub struct ConfigLoader;

impl ConfigLoader {
    /// Default config file path: `$XDG_CONFIG_HOME/quill/config.toml`
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join("quill")
            .join("config.toml")
    }

    /// Load configuration.
    ///
    /// An explicit `path` must exist and parse. Without one, the default path
    /// is used if present; a broken default file is reported and ignored.
    /// Environment overrides are applied last.
    pub fn load(path: Option<&Path>) -> ConfigResult<QuillConfig> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default = Self::default_path();
                if default.exists() {
                    match Self::from_file(&default) {
                        Ok(config) => config,
                        Err(e) => {
                            warn!("Ignoring config at {}: {}", default.display(), e);
                            QuillConfig::default()
                        }
                    }
                } else {
                    debug!("No config at {}, using defaults", default.display());
                    QuillConfig::default()
                }
            }
        };

        Self::apply_env_overrides(&mut config);
        Ok(config)
    }

    /// Parse a config file
    pub fn from_file(path: &Path) -> ConfigResult<QuillConfig> {
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Write a config file, creating parent directories
    pub fn save(config: &QuillConfig, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(config)?)?;
        Ok(())
    }

    fn apply_env_overrides(config: &mut QuillConfig) {
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            if !url.trim().is_empty() {
                debug!("Using base URL from {}", BASE_URL_ENV);
                config.base_url = url;
            }
        }
    }
}
