//! # Storage Handle
//!
//! Opens the SQLite file (or a private in-memory database) and hands out
//! repositories that share one pool.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Storage Handle Lifecycle                           │
//! │                                                                         │
//! │  Process start                                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbConfig::new(path) ← file location, pool sizing, lending rules       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(config).await ← Open pool + run migrations              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  db.members() / db.books() / db.lending()                              │
//! │       │        (each borrows a clone of the same pool)                 │
//! │       ▼                                                                 │
//! │  db.close().await ← Once, on every exit path                           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is no module-level connection: whoever builds the `Database` owns
//! it and hands repositories out from it.

use biblio_core::LendingPolicy;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::lending::LendingService;
use crate::migrations;
use crate::repository::book::BookRepository;
use crate::repository::member::MemberRepository;

/// Path value selecting a private in-memory database.
const IN_MEMORY_PATH: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// Where the catalog lives and how the pool around it behaves.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("/srv/library/biblio.db")
///     .max_connections(2)
///     .lending_policy(LendingPolicy::with_max_loans(5));
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// SQLite file; created on first open. `:memory:` for a private database.
    pub database_path: PathBuf,

    /// Pool ceiling. Default 1: the console is the only writer.
    pub max_connections: u32,

    /// Connections kept open while idle. Default 1.
    pub min_connections: u32,

    /// How long to wait for a free connection. Default 30 s.
    pub connect_timeout: Duration,

    /// Idle connections are closed after this. `None` keeps them. Default 10 min.
    pub idle_timeout: Option<Duration>,

    /// Apply pending migrations when opening. Default true.
    pub run_migrations: bool,

    /// Rules applied by [`LendingService`].
    pub lending_policy: LendingPolicy,
}

impl DbConfig {
    /// Configuration for the SQLite file at `path`, with defaults elsewhere.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Some(Duration::from_secs(600)),
            run_migrations: true,
            lending_policy: LendingPolicy::default(),
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Skip (or force) migrations on open.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Replaces the default lending rules.
    pub fn lending_policy(mut self, policy: LendingPolicy) -> Self {
        self.lending_policy = policy;
        self
    }

    /// A private, empty database that vanishes with the pool.
    ///
    /// Every call yields a separate database, so tests never share state:
    /// ```rust,ignore
    /// let db = Database::new(DbConfig::in_memory()).await?;
    /// ```
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(IN_MEMORY_PATH),
            // Each connection would open its own empty database.
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            // Closing the only connection drops the data.
            idle_timeout: None,
            run_migrations: true,
            lending_policy: LendingPolicy::default(),
        }
    }

    /// True for [`DbConfig::in_memory`] configurations.
    pub fn is_in_memory(&self) -> bool {
        self.database_path == Path::new(IN_MEMORY_PATH)
    }

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        if self.is_in_memory() {
            return SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::ConnectionFailed(e.to_string()));
        }

        Ok(SqliteConnectOptions::new()
            .filename(&self.database_path)
            // Readers never wait on the writer.
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .create_if_missing(true))
    }
}

// =============================================================================
// Database
// =============================================================================

/// Open storage plus the lending rules in force.
///
/// ## Usage
/// ```rust,ignore
/// let db = Database::new(DbConfig::new("./biblio.db")).await?;
///
/// db.members().register("12345678Z", "Mercè", "Rodoreda").await?;
/// let id = db.books().add("La plaça del Diamant", "Mercè Rodoreda").await?;
/// db.lending().borrow(id, &"12345678Z".parse()?).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,

    lending_policy: LendingPolicy,
}

impl Database {
    /// Opens the pool and, unless disabled, brings the schema up to date.
    ///
    /// ## Returns
    /// * `Ok(Database)` - Storage ready for repositories
    /// * `Err(DbError::ConnectionFailed)` - File could not be opened or created
    /// * `Err(DbError::MigrationFailed)` - Schema could not be applied
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            in_memory = config.is_in_memory(),
            "Opening catalog database"
        );

        let options = config.connect_options()?;

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(config.idle_timeout)
            .connect_with(options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        debug!(max_connections = config.max_connections, "Pool ready");

        let db = Database {
            pool,
            lending_policy: config.lending_policy,
        };

        if config.run_migrations {
            db.migrate().await?;
        }

        Ok(db)
    }

    /// Applies pending migrations. Called by [`Database::new`] by default.
    pub async fn migrate(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    /// Raw pool, for queries no repository offers.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn members(&self) -> MemberRepository {
        MemberRepository::new(self.pool.clone())
    }

    pub fn books(&self) -> BookRepository {
        BookRepository::new(self.pool.clone())
    }

    /// Borrow/return operations under this database's lending policy.
    pub fn lending(&self) -> LendingService {
        LendingService::new(self.pool.clone(), self.lending_policy)
    }

    pub fn lending_policy(&self) -> LendingPolicy {
        self.lending_policy
    }

    /// Closes every connection. Later queries fail with `ConnectionFailed`.
    pub async fn close(&self) {
        info!("Closing catalog database");
        self.pool.close().await;
    }

    /// True if a trivial query succeeds.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
