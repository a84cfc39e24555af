//! Error types and utilities for gasmon

use thiserror::Error;

/// Result type alias for gasmon operations
pub type Result<T> = std::result::Result<T, GasmonError>;

/// Main error type for gasmon operations
#[derive(Error, Debug)]
pub enum GasmonError {
    /// Upstream feed errors (network, HTTP status, or response body)
    #[error("Feed fetch error: {message}")]
    Fetch {
        message: String,
        status_code: Option<u16>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A feed record that cannot be converted into a reading
    #[error("Malformed feed data: {message}")]
    MalformedData { message: String },

    /// Chart rendering and PNG encoding errors
    #[error("Render error: {message}")]
    Render {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl GasmonError {
    /// Create a new fetch error
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch {
            message: msg.into(),
            status_code: None,
            source: None,
        }
    }

    /// Create a new fetch error with an HTTP status code
    pub fn fetch_with_status(msg: impl Into<String>, status: u16) -> Self {
        Self::Fetch {
            message: msg.into(),
            status_code: Some(status),
            source: None,
        }
    }

    /// Create a new fetch error with source
    pub fn fetch_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Fetch {
            message: msg.into(),
            status_code: None,
            source: Some(Box::new(source)),
        }
    }

    /// Create a new malformed data error
    pub fn malformed_data(msg: impl Into<String>) -> Self {
        Self::MalformedData {
            message: msg.into(),
        }
    }

    /// Create a new render error
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new render error with source
    pub fn render_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Render {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source
    pub fn config_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Whether this error originated in the upstream fetch path
    pub fn is_fetch(&self) -> bool {
        matches!(self, Self::Fetch { .. })
    }
}

// Error conversion implementations for external types

/// Convert from reqwest::Error to GasmonError
impl From<reqwest::Error> for GasmonError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::fetch_with_source("Request timeout", err)
        } else if err.is_connect() {
            Self::fetch_with_source("Connection failed", err)
        } else if err.is_status() {
            let status_code = err.status().map(|s| s.as_u16()).unwrap_or(0);
            Self::Fetch {
                message: format!("HTTP error: {}", status_code),
                status_code: Some(status_code),
                source: Some(Box::new(err)),
            }
        } else {
            Self::fetch_with_source("Network request failed", err)
        }
    }
}

#[cfg(feature = "plotters")]
/// Convert from plotters drawing errors to GasmonError
impl<T> From<plotters::drawing::DrawingAreaErrorKind<T>> for GasmonError
where
    T: std::error::Error + Send + Sync + 'static,
{
    fn from(err: plotters::drawing::DrawingAreaErrorKind<T>) -> Self {
        Self::render_with_source("Chart rendering failed", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{error::Error, io};

    #[test]
    fn test_error_creation() {
        let fetch_error = GasmonError::fetch("upstream unreachable");
        assert!(fetch_error.to_string().contains("Feed fetch error"));
        assert!(fetch_error.to_string().contains("upstream unreachable"));
        assert!(fetch_error.is_fetch());

        let status_error = GasmonError::fetch_with_status("server error", 503);
        assert!(status_error.to_string().contains("server error"));
        if let GasmonError::Fetch { status_code, .. } = status_error {
            assert_eq!(status_code, Some(503));
        } else {
            panic!("Expected fetch variant");
        }

        let data_error = GasmonError::malformed_data("field1 is not an integer");
        assert!(data_error.to_string().contains("Malformed feed data"));
        assert!(!data_error.is_fetch());

        let render_error = GasmonError::render("backend failure");
        assert!(render_error.to_string().contains("Render error"));

        let config_error = GasmonError::config("missing field");
        assert_eq!(
            config_error.to_string(),
            "Configuration error: missing field"
        );
    }

    #[test]
    fn test_error_with_source() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "socket closed");
        let wrapped = GasmonError::fetch_with_source("Request failed", io_error);

        assert!(wrapped.to_string().contains("Request failed"));
        assert!(wrapped.source().is_some());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let gasmon_error: GasmonError = io_error.into();

        assert!(gasmon_error.to_string().contains("I/O error"));
        assert!(gasmon_error.source().is_some());
    }

    #[test]
    fn test_serde_error_conversion() {
        let invalid_json = r#"{"feeds": [}"#;
        let serde_error = serde_json::from_str::<serde_json::Value>(invalid_json).unwrap_err();
        let gasmon_error: GasmonError = serde_error.into();

        assert!(gasmon_error.to_string().contains("Serialization error"));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_result() -> Result<u32> {
            Ok(42)
        }

        fn returns_error() -> Result<u32> {
            Err(GasmonError::fetch("failure"))
        }

        assert!(returns_result().is_ok());
        assert!(returns_error().is_err());
    }
}
