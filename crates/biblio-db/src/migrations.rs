//! # Schema Migrations
//!
//! The catalog schema ships inside the binary; opening a database brings it
//! up to date.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      On Database::new                                   │
//! │                                                                         │
//! │  _sqlx_migrations (created on first open)                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  embedded files not yet recorded?                                      │
//! │       │                                                                 │
//! │       └── 001_initial_schema.sql (members, books)                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  apply each in its own transaction, in file order                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! New schema changes go in a new `migrations/sqlite/NNN_name.sql` file.
//! Applied files are checksummed, so editing one breaks existing databases.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// How far a database's schema has been brought.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationStatus {
    /// Migrations compiled into this build.
    pub embedded: usize,
    /// Migrations recorded as applied in the database.
    pub applied: usize,
}

impl MigrationStatus {
    pub fn is_current(&self) -> bool {
        self.applied >= self.embedded
    }
}

/// Applies every embedded migration the database has not seen yet.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    debug!(embedded = MIGRATOR.migrations.len(), "Applying migrations");

    MIGRATOR.run(pool).await?;

    info!("Schema up to date");
    Ok(())
}

/// Compares embedded migrations with those recorded in the database.
///
/// A database that was never migrated reports zero applied.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<MigrationStatus> {
    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await
        .unwrap_or(0);

    Ok(MigrationStatus {
        embedded: MIGRATOR.migrations.len(),
        applied: usize::try_from(applied).unwrap_or(0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_unmigrated_database() {
        let db = Database::new(DbConfig::in_memory().run_migrations(false))
            .await
            .unwrap();

        let status = migration_status(db.pool()).await.unwrap();
        assert_eq!(status.applied, 0);
        assert!(!status.is_current());

        db.migrate().await.unwrap();
        assert!(migration_status(db.pool()).await.unwrap().is_current());
    }

    #[tokio::test]
    async fn test_migrating_twice_is_a_no_op() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        db.migrate().await.unwrap();

        let status = migration_status(db.pool()).await.unwrap();
        assert_eq!(
            status,
            MigrationStatus {
                embedded: 1,
                applied: 1
            }
        );
    }
}
