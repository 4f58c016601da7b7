//! SQLite pool setup and the [`Database`] handle.
//!
//! ```text
//!   DbConfig ──► Database::new ──► SqlitePool (up to max_connections)
//!                     │
//!                     └── migrations applied before the handle is returned
//!
//!   handlers ──► db.products() / db.sales() / ... ──► pooled connection
//!   POST /sales ──► db.begin() keeps one connection until commit or drop
//! ```
//!
//! File databases use WAL journaling so dashboard reads keep flowing while a
//! sale holds the write lock.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::catalog::{CategoryRepository, LocationRepository};
use crate::repository::inventory::InventoryRepository;
use crate::repository::product::ProductRepository;
use crate::repository::report::ReportRepository;
use crate::repository::sale::SaleRepository;
use crate::repository::user::UserRepository;

const IN_MEMORY_URL: &str = "sqlite::memory:";

/// Pool settings for [`Database::new`].
///
/// ```rust,ignore
/// let config = DbConfig::new("sqlite://buttery.db")
///     .max_connections(10)
///     .acquire_timeout(Duration::from_secs(5));
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// SQLite connection URL, e.g. `sqlite://buttery.db`.
    pub database_url: String,

    /// Upper bound on pooled connections (10).
    pub max_connections: u32,

    /// Connections kept open while idle (1).
    pub min_connections: u32,

    /// Wait for a free connection before giving up (30s).
    pub acquire_timeout: Duration,

    /// Idle connections are closed after this long; `None` keeps them (10 min).
    pub idle_timeout: Option<Duration>,

    /// Apply pending migrations while connecting.
    pub run_migrations: bool,
}

impl DbConfig {
    /// Defaults for a file database at `database_url`, created on first use.
    pub fn new(database_url: impl Into<String>) -> Self {
        DbConfig {
            database_url: database_url.into(),
            max_connections: 10,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Some(Duration::from_secs(600)),
            run_migrations: true,
        }
    }

    pub fn max_connections(mut self, limit: u32) -> Self {
        self.max_connections = limit;
        self
    }

    pub fn min_connections(mut self, floor: u32) -> Self {
        self.min_connections = floor;
        self
    }

    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    pub fn run_migrations(mut self, enabled: bool) -> Self {
        self.run_migrations = enabled;
        self
    }

    /// A private in-memory database, migrated and holding the reference data.
    /// Used by tests.
    pub fn in_memory() -> Self {
        DbConfig {
            database_url: IN_MEMORY_URL.to_string(),
            // Each in-memory connection is its own database
            max_connections: 1,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(5),
            idle_timeout: None,
            run_migrations: true,
        }
    }

    fn is_in_memory(&self) -> bool {
        self.database_url.contains(":memory:") || self.database_url.contains("mode=memory")
    }
}

/// Handle to the store. Clones share one pool; repositories are built on demand.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the pool with foreign keys enforced and, for file databases,
    /// WAL journaling with `synchronous = NORMAL`. Migrations run last unless
    /// disabled in `config`.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(url = %config.database_url, "Initializing database connection");

        let mut connect_options = SqliteConnectOptions::from_str(&config.database_url)
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
            .foreign_keys(true)
            .create_if_missing(true);

        if !config.is_in_memory() {
            connect_options = connect_options
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal);
        }

        debug!(in_memory = config.is_in_memory(), "SQLite options ready");

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.acquire_timeout)
            .idle_timeout(config.idle_timeout);

        if config.is_in_memory() {
            // Dropping the only connection would drop the database
            pool_options = pool_options.max_lifetime(None::<Duration>);
        }

        let pool = pool_options
            .connect_with(connect_options)
            .await
            .map_err(|source| DbError::ConnectionFailed(source.to_string()))?;

        info!(max_connections = config.max_connections, "Database pool open");

        let database = Database { pool };
        if config.run_migrations {
            database.run_migrations().await?;
        }
        Ok(database)
    }

    /// Applies any migration not yet recorded in `_sqlx_migrations`.
    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Starts a transaction on a pooled connection.
    ///
    /// Dropping the returned value without `commit()` rolls it back.
    pub async fn begin(&self) -> DbResult<Transaction<'static, Sqlite>> {
        Ok(self.pool.begin().await?)
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.pool.clone())
    }

    pub fn locations(&self) -> LocationRepository {
        LocationRepository::new(self.pool.clone())
    }

    pub fn categories(&self) -> CategoryRepository {
        CategoryRepository::new(self.pool.clone())
    }

    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.pool.clone())
    }

    pub fn sales(&self) -> SaleRepository {
        SaleRepository::new(self.pool.clone())
    }

    /// Stock movements and the ledger.
    pub fn inventory(&self) -> InventoryRepository {
        InventoryRepository::new(self.pool.clone())
    }

    /// Read-only aggregates for the dashboards.
    pub fn reports(&self) -> ReportRepository {
        ReportRepository::new(self.pool.clone())
    }

    /// Waits for checked-out connections to return, then closes the pool.
    pub async fn close(&self) {
        info!("Closing database pool");
        self.pool.close().await;
    }

    /// `SELECT 1` round trip; false once the pool is closed or unreachable.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_store_answers_queries() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(db.health_check().await);
        assert!(!db.locations().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_closed_pool_is_unhealthy() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;
        assert!(!db.health_check().await);
    }

    #[test]
    fn test_config_builder() {
        let config = DbConfig::new("sqlite://buttery.db")
            .max_connections(20)
            .min_connections(2)
            .acquire_timeout(Duration::from_secs(3))
            .run_migrations(false);

        assert_eq!(config.max_connections, 20);
        assert_eq!(config.min_connections, 2);
        assert_eq!(config.acquire_timeout, Duration::from_secs(3));
        assert!(!config.run_migrations);
        assert!(!config.is_in_memory());
        assert!(DbConfig::in_memory().is_in_memory());
    }
}
