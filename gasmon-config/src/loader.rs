//! Configuration loading utilities

use crate::Config;
use gasmon_common::Result as GasmonResult;
use std::env;
use std::path::Path;
use thiserror::Error;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Configuration validation error
    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {source}")]
    EnvParseError {
        var: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl From<ConfigError> for gasmon_common::GasmonError {
    fn from(err: ConfigError) -> Self {
        gasmon_common::GasmonError::config(err.to_string())
    }
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML file with environment variable overrides
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let mut config: Config = serde_yaml::from_str(&content)?;

        Self::apply_env_overrides(&mut config)?;
        config.validate_all()?;

        Ok(config)
    }

    /// Load configuration from environment variables and files
    pub fn load() -> GasmonResult<Config> {
        let config = if let Ok(config_path) = env::var("GASMON_CONFIG_PATH") {
            Self::load_config(&config_path)?
        } else if Path::new("config.yaml").exists() {
            Self::load_config("config.yaml")?
        } else if Path::new("config.yml").exists() {
            Self::load_config("config.yml")?
        } else {
            // No config file found, use defaults with env overrides
            let mut config = Config::default();
            Self::apply_env_overrides(&mut config)?;
            config.validate_all().map_err(ConfigError::ValidationError)?;
            config
        };

        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> GasmonResult<Config> {
        Ok(Self::load_config(path)?)
    }

    /// Apply environment variable overrides to configuration
    fn apply_env_overrides(config: &mut Config) -> Result<(), ConfigError> {
        if let Ok(bind_addr) = env::var("GASMON_BIND_ADDR") {
            config.server.bind_addr = bind_addr;
        }

        if let Ok(port) = env::var("GASMON_PORT") {
            config.server.port = port.parse().map_err(|e| ConfigError::EnvParseError {
                var: "GASMON_PORT".to_string(),
                source: Box::new(e),
            })?;
        }

        if let Ok(feed_url) = env::var("THINGSPEAK_FEED_URL") {
            config.thingspeak.feed_url = feed_url;
        }

        if let Ok(timeout) = env::var("THINGSPEAK_TIMEOUT") {
            config.thingspeak.timeout_seconds =
                Some(timeout.parse().map_err(|e| ConfigError::EnvParseError {
                    var: "THINGSPEAK_TIMEOUT".to_string(),
                    source: Box::new(e),
                })?);
        }

        if let Ok(level) = env::var("GASMON_LOG_LEVEL") {
            config.logging.level = level;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_from_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            concat!(
                "server:\n",
                "  bind_addr: 127.0.0.1\n",
                "  port: 8080\n",
                "thingspeak:\n",
                "  feed_url: https://example.com/feeds.json\n",
                "  timeout_seconds: 15\n",
            )
        )
        .unwrap();

        let config = ConfigLoader::load_from_file(file.path()).unwrap();

        assert_eq!(config.server.bind_address(), "127.0.0.1:8080");
        assert_eq!(config.thingspeak.feed_url, "https://example.com/feeds.json");
        assert_eq!(config.thingspeak.timeout_seconds, Some(15));
        // Unspecified sections keep their defaults
        assert_eq!(config.chart.width, 1000);
    }

    #[test]
    fn test_load_rejects_invalid_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "server: [not, a, mapping]").unwrap();

        assert!(ConfigLoader::load_from_file(file.path()).is_err());
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "chart:\n  width: 10").unwrap();

        assert!(ConfigLoader::load_from_file(file.path()).is_err());
    }

    #[test]
    fn test_env_overrides() {
        env::set_var("GASMON_PORT", "9001");
        env::set_var("GASMON_LOG_LEVEL", "debug");

        let mut config = Config::default();
        ConfigLoader::apply_env_overrides(&mut config).unwrap();

        env::remove_var("GASMON_PORT");
        env::remove_var("GASMON_LOG_LEVEL");

        assert_eq!(config.server.port, 9001);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_env_override_parse_failure() {
        env::set_var("THINGSPEAK_TIMEOUT", "soon");

        let mut config = Config::default();
        let result = ConfigLoader::apply_env_overrides(&mut config);

        env::remove_var("THINGSPEAK_TIMEOUT");

        assert!(matches!(result, Err(ConfigError::EnvParseError { .. })));
    }
}
