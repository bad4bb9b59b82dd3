use redis::aio::ConnectionManager;
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Keys examined per SCAN round trip
const SCAN_BATCH: usize = 200;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    RedisError(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Two-tier store for computed pair results
///
/// A small per-process moka cache sits in front of Redis, which is shared
/// by every service instance. Values are JSON in both tiers and expire
/// after the same TTL.
pub struct CacheManager {
    redis: ConnectionManager,
    local: moka::future::Cache<String, String>,
    ttl: Duration,
}

impl CacheManager {
    pub async fn new(redis_url: &str, l1_size: u64, ttl_secs: u64) -> Result<Self, CacheError> {
        let client = redis::Client::open(redis_url)?;
        let redis = ConnectionManager::new(client).await?;
        let ttl = Duration::from_secs(ttl_secs);

        let local = moka::future::CacheBuilder::new(l1_size)
            .time_to_live(ttl)
            .build();

        Ok(Self { redis, local, ttl })
    }

    /// Look a key up locally, then in Redis; `None` on a miss
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        if let Some(json) = self.local.get(key).await {
            return Ok(Some(serde_json::from_str(&json)?));
        }

        let mut conn = self.redis.clone();
        let stored: Option<String> = redis::cmd("GET").arg(key).query_async(&mut conn).await?;

        match stored {
            Some(json) => {
                let value = serde_json::from_str(&json)?;
                self.local.insert(key.to_string(), json).await;
                tracing::trace!("Redis hit: {}", key);
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let json = serde_json::to_string(value)?;

        let mut conn = self.redis.clone();
        redis::cmd("SET")
            .arg(key)
            .arg(&json)
            .arg("EX")
            .arg(self.ttl.as_secs())
            .query_async::<()>(&mut conn)
            .await?;

        self.local.insert(key.to_string(), json).await;
        Ok(())
    }

    /// Delete every Redis key matching a glob pattern
    ///
    /// The local tier cannot be searched by pattern and is emptied instead.
    pub async fn invalidate_pattern(&self, pattern: &str) -> Result<usize, CacheError> {
        self.local.invalidate_all();

        let mut conn = self.redis.clone();
        let mut cursor: u64 = 0;
        let mut removed = 0;

        loop {
            let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await?;

            if !keys.is_empty() {
                removed += keys.len();
                redis::cmd("UNLINK")
                    .arg(&keys)
                    .query_async::<()>(&mut conn)
                    .await?;
            }

            if next == 0 {
                break;
            }
            cursor = next;
        }

        tracing::debug!("Invalidated {} cached entries for {}", removed, pattern);
        Ok(removed)
    }

    /// Drop every cached pair result that involves `user_id`
    pub async fn invalidate_user(&self, user_id: &str) -> Result<(), CacheError> {
        for pattern in CacheKey::user_match_patterns(user_id) {
            self.invalidate_pattern(&pattern).await?;
        }
        Ok(())
    }
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Key for `user1_id` scored against `user2_id` under one scorer configuration
    ///
    /// Order matters: scores are direction-dependent. The fingerprint keeps
    /// results from a differently tuned scorer out of reach.
    pub fn pair_match(fingerprint: &str, user1_id: &str, user2_id: &str) -> String {
        format!("match:{}:{}:{}", fingerprint, user1_id, user2_id)
    }

    /// Patterns covering every pair result involving a user, on either side,
    /// under any scorer configuration
    pub fn user_match_patterns(user_id: &str) -> [String; 2] {
        [
            format!("match:*:{}:*", user_id),
            format!("match:*:*:{}", user_id),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore = "Requires Redis"]
    async fn test_cache_roundtrip_and_user_invalidation() {
        let cache = CacheManager::new("redis://127.0.0.1:6379", 1000, 60)
            .await
            .expect("Failed to create cache");

        let key = CacheKey::pair_match("w35/20/35/10-t80/60/40/20-b1.2", "user_pop_1", "match_1");

        assert_eq!(cache.get::<String>("match:none:a:b").await.unwrap(), None);

        cache.set(&key, &"cached").await.unwrap();
        assert_eq!(cache.get::<String>(&key).await.unwrap().as_deref(), Some("cached"));

        cache.invalidate_user("match_1").await.unwrap();
        assert_eq!(cache.get::<String>(&key).await.unwrap(), None);
    }

    #[test]
    fn test_pair_key_is_ordered_and_scoped_by_config() {
        assert_eq!(CacheKey::pair_match("cfg", "a", "b"), "match:cfg:a:b");
        assert_ne!(
            CacheKey::pair_match("cfg", "a", "b"),
            CacheKey::pair_match("cfg", "b", "a")
        );
        assert_ne!(
            CacheKey::pair_match("cfg1", "a", "b"),
            CacheKey::pair_match("cfg2", "a", "b")
        );
    }

    #[test]
    fn test_user_patterns_cover_both_sides() {
        assert_eq!(
            CacheKey::user_match_patterns("a"),
            ["match:*:a:*".to_string(), "match:*:*:a".to_string()]
        );
    }
}
