//! # Database Pool Management
//!
//! Opens the SQLite store and owns the handle everything else borrows.
//!
//! ## Session Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  First caller (editor startup, a test, the seed tool)                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(DbConfig) ── open-or-create file, apply migrations      │
//! │     or Database::shared(DbConfig) ── same, but once per process        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌──────────────────────────────┐                                      │
//! │  │  SqlitePool + EventBus       │   one handle, cloned freely;         │
//! │  │  (WAL, NORMAL sync, FKs on)  │   never re-opened per call           │
//! │  └──────────────────────────────┘                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  db.invoices().save(..) / db.subscribe()                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! WAL journaling keeps list reads responsive while a save commits; with a
//! single writing process that is all the concurrency this store needs.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::events::{EventBus, StoreEvent};
use crate::migrations;
use crate::repository::invoice::InvoiceRepository;

// =============================================================================
// Configuration
// =============================================================================

/// Database configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("/path/to/quickinvoice.db")
///     .max_connections(5)
///     .min_connections(1);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Where the SQLite file lives. Created on first open.
    pub database_path: PathBuf,

    /// Pool ceiling. A single-user invoice editor needs very few;
    /// defaults to 5.
    pub max_connections: u32,

    /// Connections kept warm between bursts. Defaults to 1.
    pub min_connections: u32,

    /// How long an acquire may wait for a free connection.
    /// Defaults to 30 seconds.
    pub connect_timeout: Duration,

    /// Idle time before a surplus connection is dropped.
    /// Defaults to 10 minutes.
    pub idle_timeout: Duration,

    /// How long a statement waits on a locked database before it fails.
    /// Defaults to 5 seconds.
    pub busy_timeout: Duration,

    /// Apply pending migrations as part of opening. Defaults to true.
    pub run_migrations: bool,
}

impl DbConfig {
    /// Configuration with defaults suitable for the on-disk store.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            busy_timeout: Duration::from_secs(5),
            run_migrations: true,
        }
    }

    /// Sets the pool ceiling.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the warm-connection floor.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets the acquire timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the locked-database wait.
    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Sets whether opening also migrates.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Configuration for an isolated in-memory store, used by tests.
    ///
    /// Capped at one connection: each SQLite `:memory:` connection is its
    /// own database, so a second connection would see empty tables.
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            busy_timeout: Duration::from_secs(5),
            run_migrations: true,
        }
    }
}

// =============================================================================
// Database
// =============================================================================

/// Process-wide handle for [`Database::shared`].
static SHARED: OnceCell<Database> = OnceCell::const_new();

/// Main database handle providing repository access and change
/// notifications.
///
/// Cloning is cheap: clones share the same pool and the same notification
/// channel.
#[derive(Debug, Clone)]
pub struct Database {
    /// The SQLite connection pool.
    pool: SqlitePool,

    /// Repository-owned change-notification channel.
    events: EventBus,
}

impl Database {
    /// Opens (or creates) the store and returns a ready handle.
    ///
    /// SQLite is configured for a local single-user store: WAL journal
    /// mode, NORMAL synchronous, foreign keys on (item rows cascade with
    /// their invoice), and a busy timeout so a statement that catches the
    /// store mid-commit waits instead of failing fast. Pending migrations
    /// run before the handle is returned unless the config opts out.
    pub async fn new(config: DbConfig) -> StoreResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Initializing database connection"
        );

        let connect_options = if config.database_path == Path::new(":memory:") {
            SqliteConnectOptions::from_str("sqlite::memory:")
        } else {
            // mode=rwc: read-write, create when missing
            SqliteConnectOptions::from_str(&format!(
                "sqlite://{}?mode=rwc",
                config.database_path.display()
            ))
        }
        .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .foreign_keys(true)
        .busy_timeout(config.busy_timeout)
        .create_if_missing(true);

        debug!("Connection options configured");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect_with(connect_options)
            .await
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            "Database pool created"
        );

        let db = Database {
            pool,
            events: EventBus::new(),
        };

        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Returns the process-wide shared database handle, opening it on
    /// first use.
    ///
    /// ## Semantics
    /// Lazy and idempotent: concurrent callers race to initialize exactly
    /// one handle; every later call returns that same handle and ignores
    /// its `config` argument. There is no implicit teardown; the handle
    /// lives for the rest of the process.
    pub async fn shared(config: DbConfig) -> StoreResult<&'static Database> {
        SHARED.get_or_try_init(|| Database::new(config)).await
    }

    /// Applies pending migrations. `new()` already does this unless the
    /// config disabled it; idempotent either way.
    pub async fn run_migrations(&self) -> StoreResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    /// The raw connection pool, for queries the repository does not
    /// cover. Prefer repository methods when one exists.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Returns the invoice repository.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let recent = db.invoices().list_recent(5).await?;
    /// ```
    pub fn invoices(&self) -> InvoiceRepository {
        InvoiceRepository::new(self.pool.clone(), self.events.clone())
    }

    /// Subscribes to change notifications.
    ///
    /// Events fire only after the corresponding transaction commits. They
    /// carry no payload; re-query to observe the new state.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    /// Closes the pool. Every repository call through this handle fails
    /// afterwards; only useful on the way out of the process.
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }

    /// Whether the store can currently execute a query.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(db.health_check().await);

        let (embedded, applied) = migrations::migration_status(db.pool()).await.unwrap();
        assert_eq!(embedded, applied);
    }

    #[tokio::test]
    async fn test_config_builder() {
        let config = DbConfig::new("/tmp/test.db")
            .max_connections(10)
            .min_connections(2)
            .busy_timeout(Duration::from_secs(1))
            .run_migrations(false);

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 2);
        assert_eq!(config.busy_timeout, Duration::from_secs(1));
        assert!(!config.run_migrations);
    }

    #[tokio::test]
    async fn test_shared_handle_is_idempotent() {
        let first = Database::shared(DbConfig::in_memory()).await.unwrap();
        let second = Database::shared(DbConfig::in_memory()).await.unwrap();
        assert!(std::ptr::eq(first, second));
    }
}
