//! Service configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use aquamon_core::ThresholdConfig;

/// Service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Seconds between risk evaluations across all basins.
    pub risk_interval_secs: u64,
    /// Commit a history entry every this many monitoring ticks.
    pub history_every_ticks: u64,
    /// Seconds inside which repeated risk notifications are suppressed.
    pub dedup_window_secs: u64,
    /// Display/polling settings.
    pub display: DisplayConfig,
    /// Per-parameter threshold overrides.
    pub thresholds: ThresholdConfig,
    /// Storage settings.
    pub storage: StorageConfig,
    /// Basins to monitor.
    #[serde(default)]
    pub basins: Vec<BasinConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            risk_interval_secs: 300,
            history_every_ticks: 100,
            dedup_window_secs: 300,
            display: DisplayConfig::default(),
            thresholds: ThresholdConfig::default(),
            storage: StorageConfig::default(),
            basins: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from the default path, falling back to defaults
    /// when no file exists or the file cannot be parsed.
    pub fn load_default() -> Self {
        Self::load_or_default(default_config_path())
    }

    /// Load configuration from `path`, recovering to defaults when the
    /// file is missing or malformed. A malformed file is logged before
    /// the fallback.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return Self::default();
        }
        Self::load(path).unwrap_or_else(|e| {
            warn!("Falling back to default configuration: {e}");
            Self::default()
        })
    }

    /// Load configuration from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Read {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.as_ref().to_path_buf(),
            source: e,
        })
    }

    /// Save configuration to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;

        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        std::fs::write(path.as_ref(), content).map_err(|e| ConfigError::Write {
            path: path.as_ref().to_path_buf(),
            source: e,
        })
    }

    /// Validate the configuration and return any errors.
    ///
    /// This checks:
    /// - Intervals and the history cadence are non-zero
    /// - Threshold bounds are finite and correctly ordered
    /// - Storage path is not empty
    /// - Basin ids are non-empty and unique
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.risk_interval_secs == 0 {
            errors.push(ValidationError {
                field: "risk_interval_secs".to_string(),
                message: "risk interval cannot be 0".to_string(),
            });
        }
        if self.history_every_ticks == 0 {
            errors.push(ValidationError {
                field: "history_every_ticks".to_string(),
                message: "history cadence cannot be 0".to_string(),
            });
        }

        errors.extend(self.display.validate());
        errors.extend(self.storage.validate());

        if let Err(e) = self.thresholds.validate() {
            errors.push(ValidationError {
                field: "thresholds".to_string(),
                message: e.to_string(),
            });
        }

        let mut seen_ids = std::collections::HashSet::new();
        for (i, basin) in self.basins.iter().enumerate() {
            let prefix = format!("basins[{}]", i);
            errors.extend(basin.validate(&prefix));

            let id_lower = basin.id.to_lowercase();
            if !basin.id.is_empty() && !seen_ids.insert(id_lower) {
                errors.push(ValidationError {
                    field: format!("{}.id", prefix),
                    message: format!("duplicate basin id '{}'", basin.id),
                });
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Load and validate configuration from a file.
    pub fn load_validated<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Self::load(path)?;
        config.validate()?;
        Ok(config)
    }
}

/// Display/polling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Milliseconds between sensor samples per basin.
    pub refresh_interval_ms: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            refresh_interval_ms: 3000,
        }
    }
}

impl DisplayConfig {
    /// Validate display configuration.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.refresh_interval_ms == 0 {
            errors.push(ValidationError {
                field: "display.refresh_interval_ms".to_string(),
                message: "refresh interval cannot be 0".to_string(),
            });
        }

        errors
    }
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Data directory for the file-backed store.
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: aquamon_store::default_data_dir(),
        }
    }
}

impl StorageConfig {
    /// Validate storage configuration.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.path.as_os_str().is_empty() {
            errors.push(ValidationError {
                field: "storage.path".to_string(),
                message: "data directory cannot be empty".to_string(),
            });
        }

        errors
    }
}

/// Configuration for a basin to monitor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasinConfig {
    /// Stable basin identifier (used as the storage key).
    pub id: String,
    /// Display name.
    pub name: String,
}

impl BasinConfig {
    /// Validate basin configuration.
    pub fn validate(&self, prefix: &str) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.id.is_empty() {
            errors.push(ValidationError {
                field: format!("{}.id", prefix),
                message: "basin id cannot be empty".to_string(),
            });
        }
        if self.name.is_empty() {
            errors.push(ValidationError {
                field: format!("{}.name", prefix),
                message: "basin name cannot be empty".to_string(),
            });
        }

        errors
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),
    #[error("Failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    Validation(Vec<ValidationError>),
}

/// A single validation error with context.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The field path (e.g., `display.refresh_interval_ms` or `basins[0].id`).
    pub field: String,
    /// Description of the validation failure.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Default configuration file path.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("aquamon")
        .join("service.toml")
}
