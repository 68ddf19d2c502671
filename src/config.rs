//! Process configuration
//!
//! Loaded once at startup from a TOML file and immutable afterwards. A
//! missing file yields the defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::relay::{DEFAULT_RELAY_PORT, RelayClient};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("frame rate must be a positive number, got {0}")]
    InvalidFrameRate(f64),
    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Frames per second of the render loop
    #[serde(default = "Config::default_frame_rate", alias = "framerate")]
    pub frame_rate: f64,
    #[serde(default)]
    pub opc: OpcConfig,
    #[serde(default)]
    pub http: HttpConfig,
    /// PSU relay; power management is disabled without it
    #[serde(default, alias = "PSUs")]
    pub psu: Option<PsuConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpcConfig {
    #[serde(default = "OpcConfig::default_address")]
    pub address: String,
    #[serde(default)]
    pub channel: u8,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "HttpConfig::default_listen")]
    pub listen: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PsuConfig {
    pub ip: String,
    #[serde(default = "PsuConfig::default_port")]
    pub port: u16,
    pub index: u32,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    3000
}

impl Config {
    fn default_frame_rate() -> f64 {
        40.0
    }

    /// Load the configuration at `path`, falling back to defaults if absent
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Parse and validate a TOML document
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.frame_rate.is_finite() || self.frame_rate <= 0.0 {
            return Err(ConfigError::InvalidFrameRate(self.frame_rate));
        }
        if self.opc.timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout("opc.timeout_ms"));
        }
        if self.psu.as_ref().is_some_and(|psu| psu.timeout_ms == 0) {
            return Err(ConfigError::ZeroTimeout("psu.timeout_ms"));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            frame_rate: Self::default_frame_rate(),
            opc: OpcConfig::default(),
            http: HttpConfig::default(),
            psu: None,
        }
    }
}

impl OpcConfig {
    fn default_address() -> String {
        "127.0.0.1:7890".to_string()
    }

    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for OpcConfig {
    fn default() -> Self {
        Self {
            address: Self::default_address(),
            channel: 0,
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl HttpConfig {
    fn default_listen() -> String {
        "0.0.0.0:8000".to_string()
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            listen: Self::default_listen(),
        }
    }
}

impl PsuConfig {
    fn default_port() -> u16 {
        DEFAULT_RELAY_PORT
    }

    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Relay client for this PSU
    pub fn client(&self) -> RelayClient {
        RelayClient::new(self.ip.clone(), self.port, self.index, self.timeout())
    }
}
