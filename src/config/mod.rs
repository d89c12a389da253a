//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::models::Outcome;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Points awarded per outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreConfig {
    #[serde(default = "default_win")]
    pub win: f64,

    #[serde(default = "default_lose")]
    pub lose: f64,

    #[serde(default = "default_draw")]
    pub draw: f64,

    /// A bye counts as a win unless configured otherwise
    #[serde(default = "default_bye")]
    pub bye: f64,
}

fn default_win() -> f64 {
    1.0
}

fn default_lose() -> f64 {
    0.0
}

fn default_draw() -> f64 {
    0.5
}

fn default_bye() -> f64 {
    1.0
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            win: default_win(),
            lose: default_lose(),
            draw: default_draw(),
            bye: default_bye(),
        }
    }
}

impl ScoreConfig {
    /// Points for a single outcome.
    pub fn score_for(&self, outcome: impl Into<Outcome>) -> f64 {
        match outcome.into() {
            Outcome::Win => self.win,
            Outcome::Lose => self.lose,
            Outcome::Draw => self.draw,
            Outcome::Bye => self.bye,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (label, value) in [
            ("win", self.win),
            ("lose", self.lose),
            ("draw", self.draw),
            ("bye", self.bye),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::ValidationError(format!(
                    "Score for '{}' must be a non-negative number, got {}",
                    label, value
                )));
            }
        }
        Ok(())
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub scores: ScoreConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            scores: ScoreConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            debug!("No config at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.scores.validate()?;

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
