//! Application configuration.
//!
//! Settings are stored as TOML in the platform data directory. A missing file
//! yields defaults; command-line flags override whatever is loaded.

use crate::analysis::{AnalysisOptions, TimingMode};
use crate::columns::{ColumnOverrides, Keywords};
use crate::metrics::smoothing::{WindowPolicy, NP_WINDOW_SAMPLES};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Application version
    pub version: String,
    /// Data directory path
    #[serde(skip)]
    pub data_dir: PathBuf,
    /// Column detection settings
    pub detection: DetectionSettings,
    /// Metric calculation settings
    pub metrics: MetricSettings,
    /// Export settings
    pub export: ExportSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            data_dir: PathBuf::new(),
            detection: DetectionSettings::default(),
            metrics: MetricSettings::default(),
            export: ExportSettings::default(),
        }
    }
}

impl AppConfig {
    /// Analysis options derived from these settings.
    pub fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            keywords: Keywords {
                power: self.detection.power_keywords.clone(),
                time: self.detection.time_keywords.clone(),
            },
            overrides: ColumnOverrides::default(),
            timing: if self.detection.synthetic_timing {
                TimingMode::Synthetic
            } else {
                TimingMode::Detect
            },
            window_size: self.metrics.window_size,
            window_policy: self.metrics.window_policy,
        }
    }

    /// Location of the persisted FTP value.
    pub fn ftp_path(&self) -> PathBuf {
        self.data_dir.join(FTP_FILE_NAME)
    }
}

/// Column detection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionSettings {
    /// Substrings identifying the power column, in priority order
    pub power_keywords: Vec<String>,
    /// Substrings identifying the time column, in priority order
    pub time_keywords: Vec<String>,
    /// Always assume one sample per second
    pub synthetic_timing: bool,
}

impl Default for DetectionSettings {
    fn default() -> Self {
        let keywords = Keywords::default();
        Self {
            power_keywords: keywords.power,
            time_keywords: keywords.time,
            synthetic_timing: false,
        }
    }
}

/// Metric calculation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricSettings {
    /// Rolling window length in samples
    pub window_size: usize,
    /// Handling of positions before the window fills
    pub window_policy: WindowPolicy,
}

impl Default for MetricSettings {
    fn default() -> Self {
        Self {
            window_size: NP_WINDOW_SAMPLES,
            window_policy: WindowPolicy::Strict,
        }
    }
}

/// Export settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Decimal places for derived columns in CSV exports
    pub float_precision: usize,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self { float_precision: 3 }
    }
}

/// File name of the persisted FTP inside the data directory.
pub const FTP_FILE_NAME: &str = "ftp.txt";

/// Get the application data directory.
pub fn get_data_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "rideload", "RideLoad")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Get the configuration file path.
pub fn get_config_path() -> PathBuf {
    get_data_dir().join("config.toml")
}

/// Load application configuration from the default location.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from(&get_config_path(), get_data_dir())
}

/// Load configuration from `path`, using `data_dir` for derived paths.
pub fn load_config_from(path: &Path, data_dir: PathBuf) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        tracing::debug!("No config at {}, using defaults", path.display());
        return Ok(AppConfig {
            data_dir,
            ..Default::default()
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

    let mut config: AppConfig =
        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

    if config.metrics.window_size == 0 {
        return Err(ConfigError::ParseError(
            "metrics.window_size must be at least 1".to_string(),
        ));
    }

    config.data_dir = data_dir;

    Ok(config)
}

/// Save application configuration to the default location.
pub fn save_config(config: &AppConfig) -> Result<(), ConfigError> {
    save_config_to(config, &get_config_path())
}

/// Save configuration to `path`.
pub fn save_config_to(config: &AppConfig, path: &Path) -> Result<(), ConfigError> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
    }

    let content = toml::to_string_pretty(config).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

    Ok(())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}
