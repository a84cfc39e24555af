//! ThingSpeak channel feed client
//!
//! One outbound GET per invocation, serialized process-wide so that at most
//! one upstream request is in flight at a time. Concurrent callers queue on
//! the guard; there is no timeout unless one is configured.

use crate::error::{GasmonError, Result};
use crate::types::{Feed, FeedsResponse};
use reqwest::Client;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument};

/// Default channel feed URL
pub const DEFAULT_FEED_URL: &str = "https://api.thingspeak.com/channels/2566728/feeds.json";

/// Configuration for the ThingSpeak feed client
#[derive(Debug, Clone)]
pub struct ThingSpeakConfig {
    /// Full URL of the channel feed endpoint
    pub feed_url: String,
    /// Optional request timeout in seconds; `None` means the request may
    /// wait indefinitely
    pub timeout_seconds: Option<u64>,
}

impl Default for ThingSpeakConfig {
    fn default() -> Self {
        Self {
            feed_url: DEFAULT_FEED_URL.to_string(),
            timeout_seconds: None,
        }
    }
}

impl ThingSpeakConfig {
    /// Create a configuration pointing at a specific feed URL
    pub fn new(feed_url: impl Into<String>) -> Self {
        Self {
            feed_url: feed_url.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = Some(timeout_seconds);
        self
    }
}

/// ThingSpeak feed client with single-flight fetch serialization
#[derive(Debug)]
pub struct ThingSpeakClient {
    client: Client,
    config: ThingSpeakConfig,
    // Held across the outbound await: serializes concurrent fetches
    fetch_guard: Mutex<()>,
}

impl ThingSpeakClient {
    /// Create a new client with the given configuration
    pub fn new(config: ThingSpeakConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| GasmonError::config_with_source("Failed to create HTTP client", e))?;

        Ok(Self {
            client,
            config,
            fetch_guard: Mutex::new(()),
        })
    }

    /// Create a new client with default configuration
    pub fn with_defaults() -> Result<Self> {
        Self::new(ThingSpeakConfig::default())
    }

    /// The feed URL this client fetches from
    pub fn feed_url(&self) -> &str {
        &self.config.feed_url
    }

    /// Fetch the channel feed.
    ///
    /// Network errors, non-success statuses, and malformed JSON bodies all
    /// surface as `GasmonError::Fetch`; callers decide how to degrade.
    #[instrument(skip(self))]
    pub async fn fetch_feeds(&self) -> Result<Vec<Feed>> {
        let _guard = self.fetch_guard.lock().await;

        debug!("Fetching channel feed from {}", self.config.feed_url);

        let response = match self.client.get(&self.config.feed_url).send().await {
            Ok(response) => response,
            Err(e) => {
                error!("Error fetching feed: {}", e);
                return Err(GasmonError::from(e));
            }
        };

        let status = response.status();
        if !status.is_success() {
            error!("Feed endpoint returned {}", status);
            return Err(GasmonError::fetch_with_status(
                format!("Feed endpoint returned {}", status),
                status.as_u16(),
            ));
        }

        let body = response.text().await.map_err(|e| {
            error!("Error reading feed response body: {}", e);
            GasmonError::fetch_with_source("Failed to read response body", e)
        })?;

        let parsed: FeedsResponse = serde_json::from_str(&body).map_err(|e| {
            error!("Error decoding feed response: {}", e);
            GasmonError::fetch_with_source("Malformed feed response body", e)
        })?;

        info!("Fetched {} feed entries", parsed.feeds.len());
        Ok(parsed.feeds)
    }
}
