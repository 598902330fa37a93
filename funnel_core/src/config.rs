//! Configuration file support for the funnel.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/funnel/config.toml`.

use crate::{get_default_content, Error, FunnelContent, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub content: ContentConfig,
}

/// Logging configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Catalog/quiz content source
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct ContentConfig {
    /// TOML file replacing the embedded content; embedded content when unset
    #[serde(default)]
    pub path: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        match Self::default_config_path() {
            Some(config_path) if config_path.exists() => Self::load_from(&config_path),
            Some(config_path) => {
                tracing::debug!("No config file found at {:?}, using defaults", config_path);
                Ok(Self::default())
            }
            None => {
                tracing::debug!("No config directory available, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.check()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|base| base.join("funnel").join("config.toml"))
    }

    fn check(&self) -> Result<()> {
        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            other => Err(Error::Config(format!("Unknown log level '{}'", other))),
        }
    }

    /// Resolve the content this configuration points at, validated
    pub fn load_content(&self) -> Result<Arc<FunnelContent>> {
        match &self.content.path {
            Some(path) => Ok(Arc::new(FunnelContent::load_from(path)?)),
            None => {
                let content = get_default_content();
                let errors = content.validate();
                if !errors.is_empty() {
                    return Err(Error::ContentValidation(errors.join("; ")));
                }
                Ok(content)
            }
        }
    }
}
