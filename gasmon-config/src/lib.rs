//! Configuration management for the gasmon service

pub mod loader;
pub mod settings;

pub use loader::{ConfigError, ConfigLoader};
pub use settings::{ChartSettings, Config, LoggingSettings, ServerConfig, ThingSpeakSettings};
