//! Application configuration structures

use gasmon_common::thingspeak::{ThingSpeakConfig, DEFAULT_FEED_URL};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Config {
    /// HTTP server configuration
    #[validate]
    pub server: ServerConfig,

    /// Upstream feed configuration
    #[validate]
    pub thingspeak: ThingSpeakSettings,

    /// Chart rendering settings
    #[validate]
    pub chart: ChartSettings,

    /// Logging configuration
    pub logging: LoggingSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            thingspeak: ThingSpeakSettings::default(),
            chart: ChartSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Config {
    /// Validate the whole configuration tree
    pub fn validate_all(&self) -> Result<(), validator::ValidationErrors> {
        self.validate()
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind on
    #[validate(length(min = 1, message = "Bind address cannot be empty"))]
    pub bind_addr: String,

    /// Port to listen on
    #[validate(range(min = 1, message = "Port must be non-zero"))]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

impl ServerConfig {
    /// The `address:port` string to bind the listener on
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

/// Upstream feed configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ThingSpeakSettings {
    /// Channel feed URL
    #[validate(url(message = "Feed URL must be a valid URL"))]
    pub feed_url: String,

    /// Optional request timeout in seconds; unset means no timeout
    pub timeout_seconds: Option<u64>,
}

impl Default for ThingSpeakSettings {
    fn default() -> Self {
        Self {
            feed_url: DEFAULT_FEED_URL.to_string(),
            timeout_seconds: None,
        }
    }
}

impl ThingSpeakSettings {
    /// Build the feed client configuration from these settings
    pub fn to_client_config(&self) -> ThingSpeakConfig {
        ThingSpeakConfig {
            feed_url: self.feed_url.clone(),
            timeout_seconds: self.timeout_seconds,
        }
    }
}

/// Chart rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ChartSettings {
    /// Chart width in pixels
    #[validate(range(min = 100, max = 4000, message = "Width must be between 100 and 4000 pixels"))]
    pub width: u32,

    /// Chart height in pixels
    #[validate(range(
        min = 100,
        max = 4000,
        message = "Height must be between 100 and 4000 pixels"
    ))]
    pub height: u32,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 600,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level filter
    pub level: String,

    /// Optional log file path
    pub file: Option<String>,

    /// Pretty console output
    pub pretty: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            pretty: true,
        }
    }
}
