//! In-memory [`ChannelStore`] implementation for tests and embedding.
//!
//! Holds the channel list behind a `std::sync::RwLock`; `replace` swaps in
//! a new list the way a fresh fetch would.

use std::sync::RwLock;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::models::Channel;

use super::ChannelStore;

/// In-memory channel store.
pub struct InMemoryChannelStore {
    channels: RwLock<Vec<Channel>>,
}

impl InMemoryChannelStore {
    pub fn new(channels: Vec<Channel>) -> Self {
        Self {
            channels: RwLock::new(channels),
        }
    }

    /// Replace the stored list.
    pub fn replace(&self, channels: Vec<Channel>) -> Result<()> {
        let mut guard = self
            .channels
            .write()
            .map_err(|_| anyhow!("channel store lock poisoned"))?;
        *guard = channels;
        Ok(())
    }
}

impl Default for InMemoryChannelStore {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl ChannelStore for InMemoryChannelStore {
    async fn fetch_channels(&self) -> Result<Vec<Channel>> {
        let guard = self
            .channels
            .read()
            .map_err(|_| anyhow!("channel store lock poisoned"))?;
        Ok(guard.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_returns_stored_list() {
        let store = InMemoryChannelStore::new(vec![Channel::new("a", "A")]);
        let channels = store.fetch_channels().await.unwrap();
        assert_eq!(channels.len(), 1);
        assert_eq!(channels[0].channel_id, "a");
    }

    #[tokio::test]
    async fn test_replace_swaps_list() {
        let store = InMemoryChannelStore::default();
        assert!(store.fetch_channels().await.unwrap().is_empty());

        store
            .replace(vec![Channel::new("a", "A"), Channel::new("b", "B")])
            .unwrap();
        assert_eq!(store.fetch_channels().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_snapshot_is_ranked() {
        let store = InMemoryChannelStore::new(vec![
            Channel {
                subscribers: 10,
                ..Channel::new("a", "A")
            },
            Channel {
                subscribers: 20,
                ..Channel::new("b", "B")
            },
        ]);
        let snapshot = store.fetch_snapshot().await.unwrap();
        assert_eq!(snapshot.ranks().original_rank("b"), Some(1));
        assert_eq!(snapshot.ranks().original_rank("a"), Some(2));
    }
}
