//! Configuration management.
//!
//! Configuration comes from a TOML file (explicit path, `ACOPIO_CONFIG_PATH`,
//! or the platform config directory) with environment variables layered on
//! top. Missing files and missing keys fall back to defaults.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::observability::{LogFormat, LoggingConfig};
use crate::services::DEFAULT_HISTORY_LIMIT;
use crate::services::deduplication::{DeduplicationConfig, SimilarityWeights};
use crate::{Error, Result};

/// Main configuration for acopio.
///
/// # Environment Variables
///
/// | Variable | Description |
/// |----------|-------------|
/// | `ACOPIO_DATA_DIR` | Directory holding the JSON store |
/// | `ACOPIO_OPERATOR` | Name recorded on stock movements |
/// | `ACOPIO_DEDUP_*` | See [`DeduplicationConfig`] |
#[derive(Debug, Clone, PartialEq)]
pub struct AcopioConfig {
    /// Path to the data directory.
    pub data_dir: PathBuf,
    /// Operator name recorded on stock movements.
    pub operator: String,
    /// Number of scans kept in the history.
    pub scan_history_limit: usize,
    /// Duplicate detection settings.
    pub dedup: DeduplicationConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Data directory.
    pub data_dir: Option<String>,
    /// Operator name.
    pub operator: Option<String>,
    /// Scan history limit.
    pub scan_history_limit: Option<usize>,
    /// Deduplication section.
    pub dedup: Option<ConfigFileDedup>,
    /// Logging section.
    pub logging: Option<ConfigFileLogging>,
}

/// `[dedup]` section in config file.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFileDedup {
    /// Duplicate threshold.
    pub threshold: Option<f64>,
    /// Name channel weight.
    pub weight_name: Option<f64>,
    /// Description channel weight.
    pub weight_description: Option<f64>,
    /// Metadata channel weight.
    pub weight_metadata: Option<f64>,
}

/// `[logging]` section in config file.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFileLogging {
    /// Default filter directive, e.g. `"info"` or `"acopio=debug"`.
    pub level: Option<String>,
    /// `"pretty"` or `"json"`.
    pub format: Option<String>,
    /// Log file path.
    pub file: Option<String>,
}

impl Default for AcopioConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            operator: "intake".to_string(),
            scan_history_limit: DEFAULT_HISTORY_LIMIT,
            dedup: DeduplicationConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AcopioConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file path, then applies environment
    /// overrides and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// resulting configuration is invalid.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::OperationFailed {
            operation: "read_config_file".to_string(),
            cause: format!("{}: {e}", path.display()),
        })?;

        let config = Self::from_toml(&contents)?.with_env_overrides();
        config.validate()?;
        tracing::debug!(path = %path.display(), "Loaded configuration file");
        Ok(config)
    }

    /// Parses configuration from TOML text without environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid configuration TOML.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(contents).map_err(|e| Error::OperationFailed {
            operation: "parse_config_file".to_string(),
            cause: e.to_string(),
        })?;
        Ok(Self::from_config_file(file))
    }

    /// Loads configuration from the default location.
    ///
    /// Uses `<platform config dir>/acopio/config.toml` if it exists and
    /// parses; defaults otherwise. Environment overrides always apply.
    #[must_use]
    pub fn load_default() -> Self {
        if let Some(path) = default_config_path() {
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!(
                            path = %path.display(),
                            error = %e,
                            "Ignoring unusable config file"
                        );
                    },
                }
            }
        }

        Self::default().with_env_overrides()
    }

    /// Applies environment overrides on top of this configuration.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(dir) = env_non_empty("ACOPIO_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(operator) = env_non_empty("ACOPIO_OPERATOR") {
            self.operator = operator;
        }
        self.dedup = self.dedup.with_env_overrides();
        self
    }

    /// Checks the configuration for unusable values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for an empty operator, a zero scan
    /// history limit, or invalid deduplication settings.
    pub fn validate(&self) -> Result<()> {
        if self.operator.trim().is_empty() {
            return Err(Error::InvalidInput("operator cannot be empty".to_string()));
        }
        if self.scan_history_limit == 0 {
            return Err(Error::InvalidInput(
                "scan_history_limit must be at least 1".to_string(),
            ));
        }
        self.dedup.validate()
    }

    /// Converts a `ConfigFile` to `AcopioConfig`.
    fn from_config_file(file: ConfigFile) -> Self {
        let mut config = Self::default();

        if let Some(data_dir) = file.data_dir {
            config.data_dir = PathBuf::from(data_dir);
        }
        if let Some(operator) = file.operator {
            config.operator = operator;
        }
        if let Some(limit) = file.scan_history_limit {
            config.scan_history_limit = limit;
        }
        if let Some(dedup) = file.dedup {
            let defaults = SimilarityWeights::default();
            config.dedup = DeduplicationConfig::default()
                .with_threshold(dedup.threshold.unwrap_or(config.dedup.threshold))
                .with_weights(SimilarityWeights {
                    name: dedup.weight_name.unwrap_or(defaults.name),
                    description: dedup.weight_description.unwrap_or(defaults.description),
                    metadata: dedup.weight_metadata.unwrap_or(defaults.metadata),
                });
        }
        if let Some(logging) = file.logging {
            if let Some(level) = logging.level {
                config.logging.level = level;
            }
            if let Some(format) = logging.format {
                config.logging.format = LogFormat::parse(&format);
            }
            config.logging.file = logging.file.map(PathBuf::from);
        }

        config
    }

    /// Sets the data directory.
    #[must_use]
    pub fn with_data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_dir = path.into();
        self
    }

    /// Sets the operator name.
    #[must_use]
    pub fn with_operator(mut self, operator: impl Into<String>) -> Self {
        self.operator = operator.into();
        self
    }
}

/// Returns `<platform config dir>/acopio/config.toml`.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|dirs| dirs.config_dir().join("acopio").join("config.toml"))
}

fn default_data_dir() -> PathBuf {
    directories::BaseDirs::new().map_or_else(
        || PathBuf::from(".acopio"),
        |dirs| dirs.data_dir().join("acopio"),
    )
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
