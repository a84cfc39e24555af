//! Feed source seam for the HTTP layer

use async_trait::async_trait;
use gasmon_common::{Feed, Result, ThingSpeakClient};

/// Anything the endpoint layer can pull a feed snapshot from
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetch the current feed entries
    async fn fetch_feeds(&self) -> Result<Vec<Feed>>;
}

#[async_trait]
impl FeedSource for ThingSpeakClient {
    async fn fetch_feeds(&self) -> Result<Vec<Feed>> {
        ThingSpeakClient::fetch_feeds(self).await
    }
}
