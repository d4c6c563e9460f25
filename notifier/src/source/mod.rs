pub mod http;

use async_trait::async_trait;
use icaocore::feed::Snapshot;
use icaocore::prelude::FeedError;
use log::warn;
use std::time::Duration;

pub use http::VrsSource;

/// Provider of aircraft list snapshots.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self) -> Result<Snapshot, FeedError>;
}

/// Bounded retry with a fixed delay between attempts.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub retries: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(retries: u32, delay: Duration) -> Self {
        Self { retries, delay }
    }

    /// Fetches a snapshot, trying at most `retries + 1` times. Returns the
    /// last error when every attempt fails.
    pub async fn fetch(&self, source: &dyn FeedSource) -> Result<Snapshot, FeedError> {
        let mut attempt = 0;
        loop {
            match source.fetch().await {
                Ok(snapshot) => return Ok(snapshot),
                Err(err) if attempt < self.retries => {
                    attempt += 1;
                    warn!("fetch attempt {} failed: {}, retrying", attempt, err);
                    tokio::time::sleep(self.delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
