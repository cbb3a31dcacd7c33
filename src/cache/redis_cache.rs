//! Redis/Valkey cache backend
//!
//! Values are stored as decimal strings. The connection manager reconnects
//! on its own after the initial connect succeeds.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::info;

use crate::cache::{decode_value, encode_value, Cache, CacheKey, CacheResult};
use crate::error::CacheError;

// == Redis Cache ==
#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
}

impl RedisCache {
    /// Opens a managed connection to `url`, e.g. `redis://valkey:6379`.
    pub async fn connect(url: &str) -> CacheResult<Self> {
        let client =
            redis::Client::open(url).map_err(|e| CacheError::ConnectFailed(e.to_string()))?;
        let conn = ConnectionManager::new(client)
            .await
            .map_err(|e| CacheError::ConnectFailed(e.to_string()))?;

        info!("Connected to cache at {}", url);
        Ok(Self { conn })
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn get(&self, key: &CacheKey) -> CacheResult<i64> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn
            .get(key.as_str())
            .await
            .map_err(|e| CacheError::ReadFailed(e.to_string()))?;

        match raw {
            Some(raw) => decode_value(key, &raw),
            None => Err(CacheError::KeyNotFound(key.to_string())),
        }
    }

    async fn set(&self, key: &CacheKey, value: i64, ttl: Option<Duration>) -> CacheResult<()> {
        let mut conn = self.conn.clone();
        let encoded = encode_value(value);

        let outcome: redis::RedisResult<()> = match ttl {
            Some(ttl) => conn.set_ex(key.as_str(), encoded, expiry_seconds(ttl)).await,
            None => conn.set(key.as_str(), encoded).await,
        };

        outcome.map_err(|e| CacheError::WriteFailed(e.to_string()))
    }
}

/// `EX` argument for `ttl`: whole seconds, rounded up, never zero.
fn expiry_seconds(ttl: Duration) -> u64 {
    let rounded = ttl
        .as_secs()
        .saturating_add(u64::from(ttl.subsec_nanos() > 0));
    rounded.max(1)
}
