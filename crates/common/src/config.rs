//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{HeartifyError, HeartifyResult};

/// Default rasterization upscale factor.
pub const DEFAULT_SCALE_FACTOR: u32 = 4;

/// Largest accepted upscale factor.
pub const MAX_SCALE_FACTOR: u32 = 8;

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory where exported files are delivered.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Export settings.
    #[serde(default)]
    pub export: ExportDefaults,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Default export parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportDefaults {
    /// Font used for regular-weight text. Discovered when unset.
    #[serde(default)]
    pub font_path: Option<PathBuf>,

    /// Font used for bold text. Falls back to the regular face.
    #[serde(default)]
    pub bold_font_path: Option<PathBuf>,

    /// Upscale factor applied when rasterizing the export layout.
    #[serde(default = "default_scale_factor")]
    pub scale_factor: u32,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "heartify=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            export: ExportDefaults::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ExportDefaults {
    fn default() -> Self {
        Self {
            font_path: None,
            bold_font_path: None,
            scale_factor: DEFAULT_SCALE_FACTOR,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_file_path())
    }

    /// Load config from an explicit path, falling back to defaults.
    pub fn load_from(config_path: &Path) -> Self {
        match Self::read_from(config_path) {
            Ok(config) => config,
            Err(HeartifyError::FileNotFound { .. }) => Self::default(),
            Err(e) => {
                tracing::warn!("Failed to load config at {:?}: {}", config_path, e);
                Self::default()
            }
        }
    }

    /// Read config from a file that must exist and parse.
    pub fn read_from(config_path: &Path) -> HeartifyResult<Self> {
        if !config_path.exists() {
            return Err(HeartifyError::FileNotFound {
                path: config_path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(config_path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Reject settings no export can honor.
    pub fn validate(&self) -> HeartifyResult<()> {
        let scale = self.export.scale_factor;
        if !(1..=MAX_SCALE_FACTOR).contains(&scale) {
            return Err(HeartifyError::config(format!(
                "scale_factor {scale} outside 1..={MAX_SCALE_FACTOR}"
            )));
        }
        Ok(())
    }

    /// Save config to the standard location.
    pub fn save(&self) -> HeartifyResult<()> {
        self.save_to(&config_file_path())
    }

    /// Save config to an explicit path.
    pub fn save_to(&self, config_path: &Path) -> HeartifyResult<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, json)?;
        Ok(())
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("heartify").join("config.json")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_scale_factor() -> u32 {
    DEFAULT_SCALE_FACTOR
}
