//! Backend entry-point: wires REST endpoints and OpenAPI docs.

mod server;

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::web;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use drowse::inbound::http::health::HealthState;
use drowse::outbound::cache::RedisCacheStore;
use drowse::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use server::ServerConfig;

const DEFAULT_BIND: &str = "0.0.0.0:8080";

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let bind_addr: SocketAddr = env::var("BIND_ADDR")
        .unwrap_or_else(|_| DEFAULT_BIND.into())
        .parse()
        .map_err(|e| std::io::Error::other(format!("invalid BIND_ADDR: {e}")))?;

    let mut config = ServerConfig::new(bind_addr);

    match env::var("DATABASE_URL") {
        Ok(database_url) => {
            run_pending_migrations(&database_url).map_err(std::io::Error::other)?;
            let pool_size = env::var("DB_POOL_SIZE")
                .ok()
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(10);
            let pool = DbPool::new(PoolConfig::new(&database_url).with_max_size(pool_size))
                .await
                .map_err(|e| std::io::Error::other(e.to_string()))?;
            config = config.with_db_pool(pool);
        }
        Err(_) => {
            warn!("DATABASE_URL not set; serving from the in-memory store");
        }
    }

    match env::var("REDIS_URL") {
        Ok(redis_url) => {
            let pool_size = env::var("REDIS_POOL_SIZE")
                .ok()
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(10);
            let store = RedisCacheStore::connect(&redis_url, pool_size)
                .await
                .map_err(|e| std::io::Error::other(e.to_string()))?;
            config = config.with_cache_store(Arc::new(store));
        }
        Err(_) => {
            warn!("REDIS_URL not set; caching in process memory");
        }
    }

    let health_state = web::Data::new(HealthState::new());
    let server = server::create_server(health_state, config)?;

    info!(%bind_addr, "listening");
    server.await
}
