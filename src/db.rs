use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

/// Sizing and timeout settings for the PostgreSQL connection pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        PoolSettings {
            max_connections: 10,
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

fn pool_options(settings: &PoolSettings) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout)
}

/// Builds a connection pool and verifies the database is reachable
pub async fn connect_sqlx(db_url: &str, settings: &PoolSettings) -> Result<PgPool, sqlx::Error> {
    pool_options(settings).connect(db_url).await
}

/// Builds a connection pool which doesn't open any connections until one is first requested
pub fn connect_sqlx_lazy(db_url: &str, settings: &PoolSettings) -> Result<PgPool, sqlx::Error> {
    pool_options(settings).connect_lazy(db_url)
}
