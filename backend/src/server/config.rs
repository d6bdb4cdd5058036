//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use drowse::domain::ports::CacheStore;
use drowse::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) cache_store: Option<Arc<dyn CacheStore>>,
}

impl ServerConfig {
    /// Construct a server configuration binding the given address.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            db_pool: None,
            cache_store: None,
        }
    }

    /// Attach a database connection pool for persistence adapters.
    ///
    /// When absent, the server falls back to the in-memory store used by
    /// local development and the integration suites.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Attach a cache store adapter.
    ///
    /// When absent, an in-process fixture store serves the cache paths so
    /// the service still runs without Redis.
    #[must_use]
    pub fn with_cache_store(mut self, store: Arc<dyn CacheStore>) -> Self {
        self.cache_store = Some(store);
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
