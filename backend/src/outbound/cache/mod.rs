//! Redis cache adapter.
//!
//! Implements the `CacheStore` port over a `bb8-redis` pool. Values are the
//! JSON strings produced by the domain's read-through wrapper. TTLs carry a
//! small random jitter so hot keys do not expire in lockstep, and pattern
//! deletion walks the keyspace with cursor-based `SCAN` rather than the
//! blocking `KEYS`.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bb8_redis::bb8::{Pool, PooledConnection};
use bb8_redis::redis::{AsyncCommands, cmd};
use bb8_redis::RedisConnectionManager;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::domain::cache::CacheKey;
use crate::domain::ports::{CacheStore, CacheStoreError, CacheStoreStats};

/// Keys examined per `SCAN` iteration.
const SCAN_BATCH: u32 = 100;

/// Redis-backed implementation of the `CacheStore` port.
///
/// Hit and miss counters live here, injected into the service layer through
/// `stats` rather than kept as ambient globals.
pub struct RedisCacheStore {
    pool: Pool<RedisConnectionManager>,
    hits: AtomicU64,
    misses: AtomicU64,
    rng: Mutex<SmallRng>,
}

impl RedisCacheStore {
    /// Connect a pooled client to the given Redis URL.
    pub async fn connect(redis_url: &str, pool_size: u32) -> Result<Self, CacheStoreError> {
        let manager = RedisConnectionManager::new(redis_url)
            .map_err(|err| CacheStoreError::backend(err.to_string()))?;
        let pool = Pool::builder()
            .max_size(pool_size)
            .build(manager)
            .await
            .map_err(|err| CacheStoreError::backend(err.to_string()))?;

        Ok(Self {
            pool,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            rng: Mutex::new(SmallRng::from_entropy()),
        })
    }

    async fn connection(
        &self,
    ) -> Result<PooledConnection<'_, RedisConnectionManager>, CacheStoreError> {
        self.pool
            .get()
            .await
            .map_err(|err| CacheStoreError::backend(err.to_string()))
    }

    fn jittered_ttl(&self, ttl: Duration) -> u64 {
        let jitter = match self.rng.lock() {
            Ok(mut rng) => jitter_for(ttl, &mut *rng),
            Err(_) => 0,
        };
        ttl.as_secs().max(1) + jitter
    }
}

/// Random expiry extension of up to 10% of the base TTL.
fn jitter_for(ttl: Duration, rng: &mut impl Rng) -> u64 {
    let cap = ttl.as_secs().max(1) / 10;
    if cap == 0 { 0 } else { rng.gen_range(0..=cap) }
}

/// Extract `used_memory` from a Redis `INFO memory` reply.
fn parse_used_memory(info: &str) -> Option<u64> {
    info.lines()
        .find_map(|line| line.strip_prefix("used_memory:"))
        .and_then(|value| value.trim().parse().ok())
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    async fn get(&self, key: &CacheKey) -> Result<Option<String>, CacheStoreError> {
        let mut conn = self.connection().await?;
        let value: Option<String> = conn
            .get(key.as_str())
            .await
            .map_err(|err| CacheStoreError::backend(err.to_string()))?;

        if value.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
        Ok(value)
    }

    async fn set(
        &self,
        key: &CacheKey,
        value: &str,
        ttl: Duration,
    ) -> Result<(), CacheStoreError> {
        let mut conn = self.connection().await?;
        let seconds = self.jittered_ttl(ttl);
        conn.set_ex::<_, _, ()>(key.as_str(), value, seconds)
            .await
            .map_err(|err| CacheStoreError::backend(err.to_string()))
    }

    async fn delete(&self, key: &CacheKey) -> Result<u64, CacheStoreError> {
        let mut conn = self.connection().await?;
        conn.del(key.as_str())
            .await
            .map_err(|err| CacheStoreError::backend(err.to_string()))
    }

    async fn delete_pattern(&self, pattern: &str) -> Result<u64, CacheStoreError> {
        let mut conn = self.connection().await?;
        let mut cursor: u64 = 0;
        let mut deleted: u64 = 0;

        // Cursor-based scan keeps each round-trip bounded; Redis guarantees
        // termination once the cursor returns to zero.
        loop {
            let (next, keys): (u64, Vec<String>) = cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut *conn)
                .await
                .map_err(|err| CacheStoreError::backend(err.to_string()))?;

            if !keys.is_empty() {
                let removed: u64 = conn
                    .del(&keys)
                    .await
                    .map_err(|err| CacheStoreError::backend(err.to_string()))?;
                deleted += removed;
            }

            cursor = next;
            if cursor == 0 {
                break;
            }
        }

        debug!(pattern, deleted, "cache pattern delete completed");
        Ok(deleted)
    }

    async fn stats(&self) -> Result<CacheStoreStats, CacheStoreError> {
        let mut conn = self.connection().await?;
        let keys: u64 = cmd("DBSIZE")
            .query_async(&mut *conn)
            .await
            .map_err(|err| CacheStoreError::backend(err.to_string()))?;
        let info: String = cmd("INFO")
            .arg("memory")
            .query_async(&mut *conn)
            .await
            .map_err(|err| CacheStoreError::backend(err.to_string()))?;

        Ok(CacheStoreStats {
            keys,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            memory_used_bytes: parse_used_memory(&info),
        })
    }
}
