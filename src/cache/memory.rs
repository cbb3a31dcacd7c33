//! In-memory cache backend
//!
//! HashMap storage with optional per-entry TTL. Expired entries read as
//! misses and are swept by the background cleanup task.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::cache::{decode_value, encode_value, Cache, CacheEntry, CacheKey, CacheResult};
use crate::error::CacheError;

// == Memory Cache ==
/// Process-local cache backend.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub async fn cleanup_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired());
        before - entries.len()
    }

    /// Returns the current number of entries, expired ones included.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, key: &CacheKey) -> CacheResult<i64> {
        let entries = self.entries.read().await;
        match entries.get(key.as_str()) {
            Some(entry) if !entry.is_expired() => decode_value(key, &entry.value),
            _ => Err(CacheError::KeyNotFound(key.to_string())),
        }
    }

    async fn set(&self, key: &CacheKey, value: i64, ttl: Option<Duration>) -> CacheResult<()> {
        let entry = CacheEntry::new(encode_value(value), ttl);
        self.entries
            .write()
            .await
            .insert(key.as_str().to_string(), entry);
        Ok(())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::Operation;

    fn key(a: i64, b: i64) -> CacheKey {
        CacheKey::new(a, b, Operation::Add)
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let cache = MemoryCache::new();

        cache.set(&key(1, 2), 3, None).await.unwrap();

        assert_eq!(cache.get(&key(1, 2)).await.unwrap(), 3);
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_get_nonexistent() {
        let cache = MemoryCache::new();

        let result = cache.get(&key(9, 9)).await;
        assert!(matches!(result, Err(CacheError::KeyNotFound(_))));
    }

    #[tokio::test]
    async fn test_overwrite() {
        let cache = MemoryCache::new();

        cache.set(&key(1, 2), 3, None).await.unwrap();
        cache.set(&key(1, 2), 4, None).await.unwrap();

        assert_eq!(cache.get(&key(1, 2)).await.unwrap(), 4);
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_ttl_expiration() {
        let cache = MemoryCache::new();

        cache
            .set(&key(1, 2), 3, Some(Duration::from_millis(50)))
            .await
            .unwrap();
        assert!(cache.get(&key(1, 2)).await.is_ok());

        tokio::time::sleep(Duration::from_millis(80)).await;

        let result = cache.get(&key(1, 2)).await;
        assert!(matches!(result, Err(CacheError::KeyNotFound(_))));
    }

    #[tokio::test]
    async fn test_huge_ttl_never_expires_early() {
        let cache = MemoryCache::new();

        cache
            .set(&key(4, 5), 9, Some(Duration::from_secs(u64::MAX)))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(cache.cleanup_expired().await, 0);
        assert_eq!(cache.get(&key(4, 5)).await.unwrap(), 9);
    }

    #[tokio::test]
    async fn test_cleanup_expired() {
        let cache = MemoryCache::new();

        cache
            .set(&key(1, 1), 2, Some(Duration::from_millis(50)))
            .await
            .unwrap();
        cache.set(&key(2, 2), 4, None).await.unwrap();

        tokio::time::sleep(Duration::from_millis(80)).await;

        assert_eq!(cache.cleanup_expired().await, 1);
        assert_eq!(cache.len().await, 1);
        assert_eq!(cache.get(&key(2, 2)).await.unwrap(), 4);
    }
}
