//! Application configuration.
//!
//! Each subsystem owns its config struct with defaults; this file composes
//! them into one optional TOML document.  Missing sections and fields keep
//! their defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::recognition::{ClassifierConfig, StabilityConfig};
use crate::session::SessionConfig;

/// Dictionary settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DictionaryConfig {
    /// `signs.json` to load instead of the bundled one.
    pub path: Option<PathBuf>,
}

/// Everything configurable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub classifier: ClassifierConfig,
    pub stability: StabilityConfig,
    pub session: SessionConfig,
    pub dictionary: DictionaryConfig,
}

/// Failures while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value for {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

impl AppConfig {
    /// Parse TOML text.
    pub fn from_toml(path: &Path, text: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file, or defaults when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            debug!("no config file, using defaults");
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("loaded config from {}", path.display());
        Self::from_toml(path, &text)
    }

    /// Reject values the pipeline cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.classifier;
        if !(0.0..=1.0).contains(&c.min_point_confidence) {
            return Err(ConfigError::Invalid {
                field: "classifier.min_point_confidence",
                reason: format!("{} is outside [0, 1]", c.min_point_confidence),
            });
        }
        if c.lower_region_y > c.upper_region_y {
            return Err(ConfigError::Invalid {
                field: "classifier.lower_region_y",
                reason: format!(
                    "{} is above upper_region_y {}",
                    c.lower_region_y, c.upper_region_y
                ),
            });
        }
        if self.stability.required_matches == 0 {
            return Err(ConfigError::Invalid {
                field: "stability.required_matches",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.session.sample_every == 0 {
            return Err(ConfigError::Invalid {
                field: "session.sample_every",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
