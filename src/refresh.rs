//! Snapshot cache with periodic refresh.
//!
//! The server reads the channel list from a [`SnapshotCache`]. A background
//! task started by [`spawn_poller`] refetches it on a fixed interval. When a
//! refresh fails the previous snapshot stays in place, so readers always see
//! either nothing (before the first success) or a complete list.

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use vtdash_core::store::ChannelStore;
use vtdash_core::ChannelSnapshot;

#[derive(Clone)]
pub struct SnapshotCache {
    store: Arc<dyn ChannelStore>,
    current: Arc<RwLock<Option<Arc<ChannelSnapshot>>>>,
}

impl SnapshotCache {
    pub fn new(store: Arc<dyn ChannelStore>) -> Self {
        Self {
            store,
            current: Arc::new(RwLock::new(None)),
        }
    }

    /// The latest successfully fetched snapshot, if any.
    pub async fn current(&self) -> Option<Arc<ChannelSnapshot>> {
        self.current.read().await.clone()
    }

    /// Fetch a fresh snapshot and install it.
    ///
    /// On error the cached snapshot is left untouched and the error returned.
    pub async fn refresh(&self) -> Result<Arc<ChannelSnapshot>> {
        let snapshot = Arc::new(self.store.fetch_snapshot().await?);
        *self.current.write().await = Some(snapshot.clone());
        info!(channels = snapshot.len(), "channel snapshot refreshed");
        Ok(snapshot)
    }
}

/// Refresh `cache` now and then every `interval` until the task is aborted.
pub fn spawn_poller(cache: SnapshotCache, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if let Err(e) = cache.refresh().await {
                warn!(error = %e, "channel refresh failed; keeping previous snapshot");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use vtdash_core::store::memory::InMemoryChannelStore;
    use vtdash_core::Channel;

    /// Succeeds on the first call, fails afterwards.
    struct FlakyStore {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ChannelStore for FlakyStore {
        async fn fetch_channels(&self) -> Result<Vec<Channel>> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(vec![Channel::new("a", "A")])
            } else {
                bail!("upstream down")
            }
        }
    }

    #[tokio::test]
    async fn test_empty_until_first_refresh() {
        let cache = SnapshotCache::new(Arc::new(InMemoryChannelStore::default()));
        assert!(cache.current().await.is_none());
        cache.refresh().await.unwrap();
        assert!(cache.current().await.is_some());
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous() {
        let cache = SnapshotCache::new(Arc::new(FlakyStore {
            calls: AtomicUsize::new(0),
        }));
        cache.refresh().await.unwrap();
        assert!(cache.refresh().await.is_err());

        let snapshot = cache.current().await.unwrap();
        assert_eq!(snapshot.len(), 1);
        assert!(snapshot.find("a").is_some());
    }

    #[tokio::test]
    async fn test_refresh_picks_up_new_data() {
        let store = Arc::new(InMemoryChannelStore::new(vec![Channel::new("a", "A")]));
        let cache = SnapshotCache::new(store.clone());
        cache.refresh().await.unwrap();

        store
            .replace(vec![Channel::new("a", "A"), Channel::new("b", "B")])
            .unwrap();
        cache.refresh().await.unwrap();
        assert_eq!(cache.current().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_poller_populates_cache() {
        let cache = SnapshotCache::new(Arc::new(InMemoryChannelStore::new(vec![Channel::new(
            "a", "A",
        )])));
        let handle = spawn_poller(cache.clone(), Duration::from_secs(3600));

        for _ in 0..50 {
            if cache.current().await.is_some() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        handle.abort();
        assert!(cache.current().await.is_some());
    }
}
