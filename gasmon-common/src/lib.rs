//! Common utilities and types for the gasmon service

pub mod error;
pub mod logging;
pub mod thingspeak;
pub mod types;

// Re-export commonly used types
pub use error::{GasmonError, Result};
pub use logging::{init_default_logging, init_logging, LoggingConfig};
pub use thingspeak::{ThingSpeakClient, ThingSpeakConfig, DEFAULT_FEED_URL};
pub use types::{Feed, FeedsResponse, Reading, ReadingTable};
