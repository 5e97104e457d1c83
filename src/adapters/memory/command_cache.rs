//! In-memory command cache with TTL expiry.
//!
//! Expired entries are swept at most once per TTL period, on the next
//! write after the period ends, so the map holds at most about two TTL
//! windows of ids. Not shared across processes, so deduplication only
//! holds within one node.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::domain::foundation::CommandId;
use crate::domain::room::CacheError;
use crate::ports::CommandCache;

#[derive(Debug)]
struct Entry {
    owner: String,
    expires_at: Instant,
}

#[derive(Debug)]
struct Entries {
    by_id: HashMap<String, Entry>,
    next_sweep: Instant,
}

impl Entries {
    /// Drops expired entries once the sweep deadline has passed.
    fn sweep(&mut self, now: Instant, ttl: Duration) {
        if now < self.next_sweep {
            return;
        }
        self.by_id.retain(|_, entry| entry.expires_at > now);
        self.next_sweep = now + ttl;
    }

    fn live(&self, id: &str, now: Instant) -> Option<&Entry> {
        self.by_id.get(id).filter(|entry| entry.expires_at > now)
    }
}

/// In-memory [`CommandCache`].
#[derive(Debug, Clone)]
pub struct InMemoryCommandCache {
    ttl: Duration,
    entries: Arc<RwLock<Entries>>,
}

impl InMemoryCommandCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Arc::new(RwLock::new(Entries {
                by_id: HashMap::new(),
                next_sweep: Instant::now() + ttl,
            })),
        }
    }

    /// Number of stored entries, including expired ones not yet swept.
    pub async fn len(&self) -> usize {
        self.entries.read().await.by_id.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn entry(&self, owner: &str, now: Instant) -> Entry {
        Entry {
            owner: owner.to_string(),
            expires_at: now + self.ttl,
        }
    }
}

#[async_trait]
impl CommandCache for InMemoryCommandCache {
    async fn exists(&self, id: &CommandId) -> Result<bool, CacheError> {
        let entries = self.entries.read().await;
        Ok(entries.live(id.as_str(), Instant::now()).is_some())
    }

    async fn save(&self, id: &CommandId, owner: &str) -> Result<(), CacheError> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        entries.sweep(now, self.ttl);
        entries
            .by_id
            .insert(id.as_str().to_string(), self.entry(owner, now));
        Ok(())
    }

    async fn save_if_absent(&self, id: &CommandId, owner: &str) -> Result<bool, CacheError> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        entries.sweep(now, self.ttl);
        if let Some(entry) = entries.live(id.as_str(), now) {
            return Ok(entry.owner == owner);
        }
        entries
            .by_id
            .insert(id.as_str().to_string(), self.entry(owner, now));
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: &str) -> CommandId {
        CommandId::new(raw).unwrap()
    }

    #[tokio::test]
    async fn save_if_absent_records_once() {
        let cache = InMemoryCommandCache::new(Duration::from_secs(60));

        assert!(cache.save_if_absent(&id("c1"), "a").await.unwrap());
        assert!(!cache.save_if_absent(&id("c1"), "b").await.unwrap());
        assert!(cache.exists(&id("c1")).await.unwrap());
        assert!(!cache.exists(&id("c2")).await.unwrap());
    }

    #[tokio::test]
    async fn repeated_reservation_by_same_owner_succeeds() {
        let cache = InMemoryCommandCache::new(Duration::from_secs(60));

        assert!(cache.save_if_absent(&id("c1"), "a").await.unwrap());
        assert!(cache.save_if_absent(&id("c1"), "a").await.unwrap());
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn expired_entries_can_be_reserved_again() {
        let cache = InMemoryCommandCache::new(Duration::from_millis(20));
        cache.save(&id("c1"), "a").await.unwrap();

        tokio::time::sleep(Duration::from_millis(40)).await;

        assert!(!cache.exists(&id("c1")).await.unwrap());
        assert!(cache.save_if_absent(&id("c1"), "b").await.unwrap());
    }

    #[tokio::test]
    async fn expired_entries_are_swept_on_write() {
        let cache = InMemoryCommandCache::new(Duration::from_millis(5));
        for n in 0..1000 {
            cache.save_if_absent(&id(&format!("old-{}", n)), "a").await.unwrap();
        }

        tokio::time::sleep(Duration::from_millis(30)).await;
        for n in 0..10 {
            cache.save_if_absent(&id(&format!("new-{}", n)), "a").await.unwrap();
        }

        assert_eq!(cache.len().await, 10);
    }

    #[tokio::test]
    async fn concurrent_reservations_have_one_winner() {
        let cache = InMemoryCommandCache::new(Duration::from_secs(60));

        let attempts = (0..16).map(|n| {
            let cache = cache.clone();
            tokio::spawn(async move {
                cache
                    .save_if_absent(&id("c1"), &format!("owner-{}", n))
                    .await
                    .unwrap()
            })
        });
        let results = futures::future::join_all(attempts).await;

        let winners = results.into_iter().filter(|r| *r.as_ref().unwrap()).count();
        assert_eq!(winners, 1);
        assert_eq!(cache.len().await, 1);
    }
}
