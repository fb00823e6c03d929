//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use steel_core::{WheelConfig, WheelError};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Wheel(#[from] WheelError),
}

/// Top-level settings, loadable from JSON. Missing fields use defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub title: String,
    pub wheel: WheelConfig,
    /// Page the overlay is attached to; decides the board id.
    pub page_url: String,
    /// Simulated frame interval for the native shell, in milliseconds.
    pub frame_interval_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Steel".to_string(),
            wheel: WheelConfig::default(),
            page_url: "https://jira.local/boards/1".to_string(),
            frame_interval_ms: 16,
        }
    }
}

impl AppConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.wheel.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
