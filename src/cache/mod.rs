//! Cache Module
//!
//! Integer-valued key-value cache used for cache-aside lookups of calculation
//! results. Two backends: an in-process map with optional TTL and Redis/Valkey.

mod entry;
mod memory;
mod redis_cache;

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::CacheError;
use crate::service::Operation;

// Re-export public types
pub use entry::CacheEntry;
pub use memory::MemoryCache;
pub use redis_cache::RedisCache;

/// Convenience Result type for cache operations.
pub type CacheResult<T> = std::result::Result<T, CacheError>;

// == Cache Trait ==
/// A string-keyed store of integer results.
///
/// Implementations must tolerate concurrent calls from many requests.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Returns the value under `key`, `CacheError::KeyNotFound` when absent or expired.
    async fn get(&self, key: &CacheKey) -> CacheResult<i64>;

    /// Stores `value` under `key`. `ttl = None` means the entry never expires.
    async fn set(&self, key: &CacheKey, value: i64, ttl: Option<Duration>) -> CacheResult<()>;
}

// == Cache Key ==
/// Key of a cached calculation: `"<operand1>:<operand2>:<operation>"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(operand1: i64, operand2: i64, operation: Operation) -> Self {
        Self(format!("{}:{}:{}", operand1, operand2, operation.as_str()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// == Value Codec ==
/// Serializes a cached result as decimal text.
pub fn encode_value(value: i64) -> String {
    value.to_string()
}

/// Parses a cached result written by [`encode_value`].
pub fn decode_value(key: &CacheKey, raw: &str) -> CacheResult<i64> {
    raw.trim().parse::<i64>().map_err(|e| {
        CacheError::ReadFailed(format!("value under '{}' is not an integer: {}", key, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_format() {
        let key = CacheKey::new(3, 5, Operation::Multiply);
        assert_eq!(key.as_str(), "3:5:multiply");
        assert_eq!(CacheKey::new(-4, 2, Operation::Divide).to_string(), "-4:2:divide");
    }

    #[test]
    fn test_cache_key_is_order_sensitive() {
        assert_ne!(
            CacheKey::new(1, 2, Operation::Add),
            CacheKey::new(2, 1, Operation::Add)
        );
        assert_ne!(
            CacheKey::new(1, 2, Operation::Add),
            CacheKey::new(1, 2, Operation::Subtract)
        );
    }

    #[test]
    fn test_decode_value() {
        let key = CacheKey::new(1, 1, Operation::Add);
        assert_eq!(decode_value(&key, &encode_value(-42)).unwrap(), -42);
        assert!(matches!(
            decode_value(&key, "forty-two"),
            Err(CacheError::ReadFailed(_))
        ));
    }
}
