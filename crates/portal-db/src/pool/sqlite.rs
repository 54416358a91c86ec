//! SQLite connection pool management

use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

pub use sqlx::SqlitePool;

/// Embedded migrations, applied on startup
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Database configuration for connection pool
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// SQLite connection URL (e.g. `sqlite://portal.db`)
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Maximum time to wait for a connection
    pub acquire_timeout: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::from("sqlite://portal.db"),
            max_connections: 5,
            acquire_timeout: Duration::from_secs(10),
        }
    }
}

impl DatabaseConfig {
    /// Create a config for the given URL, keeping the remaining defaults
    #[must_use]
    pub fn new(url: impl Into<String>, max_connections: u32) -> Self {
        Self {
            url: url.into(),
            max_connections,
            ..Default::default()
        }
    }
}

/// Create a new SQLite connection pool
///
/// The database file is created if missing and foreign keys are enforced.
pub async fn create_pool(config: &DatabaseConfig) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect_with(options)
        .await
}

/// Apply pending migrations
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Create a migrated in-memory pool for tests
///
/// Capped at one connection: each in-memory connection is its own database,
/// so a larger pool would hand out empty schemas.
pub async fn create_memory_pool() -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    MIGRATOR.run(&pool).await?;
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DatabaseConfig::default();
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.acquire_timeout, Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_memory_pool_migrates() {
        let pool = create_memory_pool().await.unwrap();
        let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM patients")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(n, 0);
    }
}
