//! Driving port for the operator cache surface.

use async_trait::async_trait;

use crate::domain::{Error, UserId};

use super::cache_store::CacheStoreStats;

/// Request to clear keys matching a wildcard pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearCacheRequest {
    pub pattern: String,
}

/// Response reporting how many keys a clear removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearCacheResponse {
    pub deleted: u64,
}

/// Request to warm the statistics cache for one or all users.
#[derive(Debug, Clone, PartialEq)]
pub struct WarmCacheRequest {
    /// When absent, every known user is warmed.
    pub user_id: Option<UserId>,
}

/// Response reporting how many users were warmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarmCacheResponse {
    pub users_warmed: u64,
}

/// Operator-facing cache administration port.
///
/// Unlike the request path, operator calls surface cache backend failures
/// instead of swallowing them; an operator asking for stats wants to know
/// the backend is down.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheAdmin: Send + Sync {
    /// Backend statistics (key count, hit/miss counters, memory usage).
    async fn stats(&self) -> Result<CacheStoreStats, Error>;

    /// Delete every key matching the pattern.
    async fn clear(&self, request: ClearCacheRequest) -> Result<ClearCacheResponse, Error>;

    /// Precompute social statistics for one or all users.
    async fn warm(&self, request: WarmCacheRequest) -> Result<WarmCacheResponse, Error>;
}

/// Fixture admin implementation reporting an empty backend.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCacheAdmin;

#[async_trait]
impl CacheAdmin for FixtureCacheAdmin {
    async fn stats(&self) -> Result<CacheStoreStats, Error> {
        Ok(CacheStoreStats {
            keys: 0,
            hits: 0,
            misses: 0,
            memory_used_bytes: None,
        })
    }

    async fn clear(&self, _request: ClearCacheRequest) -> Result<ClearCacheResponse, Error> {
        Ok(ClearCacheResponse { deleted: 0 })
    }

    async fn warm(&self, _request: WarmCacheRequest) -> Result<WarmCacheResponse, Error> {
        Ok(WarmCacheResponse { users_warmed: 0 })
    }
}
