//! bb8-backed connection pool for `diesel-async` PostgreSQL connections.
//!
//! Checkout is async and bounded by an acquire timeout; failures surface as
//! [`PoolError`] so repositories can translate them into their own port
//! errors without seeing bb8 types.

use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};

const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

/// Failures raised while building the pool or acquiring a connection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// No connection could be acquired within the timeout.
    #[error("could not acquire a database connection: {message}")]
    Acquire { message: String },
    /// The pool itself could not be created.
    #[error("could not create the database pool: {message}")]
    Create { message: String },
}

impl PoolError {
    /// Acquire-phase failure.
    pub fn acquire(message: impl Into<String>) -> Self {
        Self::Acquire {
            message: message.into(),
        }
    }

    /// Creation-phase failure.
    pub fn create(message: impl Into<String>) -> Self {
        Self::Create {
            message: message.into(),
        }
    }

    /// The underlying failure message, whichever phase produced it.
    pub fn message(&self) -> &str {
        match self {
            Self::Acquire { message } | Self::Create { message } => message,
        }
    }
}

/// Pool sizing and connection settings.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    database_url: String,
    max_connections: u32,
    acquire_timeout: Duration,
}

impl PoolConfig {
    /// Configuration for `database_url` with default sizing (10 connections,
    /// 30 second acquire timeout).
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
        }
    }

    /// Cap the number of simultaneous connections.
    pub fn with_max_size(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    /// Bound how long a checkout may wait for a free connection.
    pub fn with_acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    /// The configured database URL.
    pub fn database_url(&self) -> &str {
        &self.database_url
    }
}

/// Shared async PostgreSQL pool.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<AsyncPgConnection>,
}

impl DbPool {
    /// Build a pool from the configuration.
    ///
    /// # Errors
    /// Returns [`PoolError::Create`] when the manager or pool cannot be
    /// constructed.
    pub async fn new(config: PoolConfig) -> Result<Self, PoolError> {
        let manager =
            AsyncDieselConnectionManager::<AsyncPgConnection>::new(config.database_url());

        Pool::builder()
            .max_size(config.max_connections)
            .connection_timeout(config.acquire_timeout)
            .build(manager)
            .await
            .map(|inner| Self { inner })
            .map_err(|err| PoolError::create(err.to_string()))
    }

    /// Check out one connection.
    ///
    /// # Errors
    /// Returns [`PoolError::Acquire`] when no connection becomes available
    /// within the configured timeout.
    pub async fn get(&self) -> Result<PooledConnection<'_, AsyncPgConnection>, PoolError> {
        self.inner
            .get()
            .await
            .map_err(|err| PoolError::acquire(err.to_string()))
    }
}
