//! Channel store abstraction.
//!
//! The [`ChannelStore`] trait is the single data-fetch contract the pipeline
//! depends on: hand back the current channel list or fail. Backends (the
//! aggregation API over HTTP, a local JSON file, the in-memory store) live
//! behind it so callers can swap them without touching the pipeline.
//!
//! Implementations must be `Send + Sync` to work with async runtimes.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::Channel;
use crate::pipeline::ChannelSnapshot;

/// Source of the raw channel list.
#[async_trait]
pub trait ChannelStore: Send + Sync {
    /// Fetch the full channel list.
    ///
    /// A failure means "no data available"; callers must not run the
    /// pipeline against a partial result.
    async fn fetch_channels(&self) -> Result<Vec<Channel>>;

    /// Fetch the list and wrap it in a ranked [`ChannelSnapshot`].
    async fn fetch_snapshot(&self) -> Result<ChannelSnapshot> {
        let channels = self.fetch_channels().await?;
        Ok(ChannelSnapshot::new(channels))
    }
}
