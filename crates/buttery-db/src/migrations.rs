//! Schema and reference data, embedded from `crates/buttery-db/migrations/`.
//!
//! `001_initial_schema.sql` creates the tables; `002_reference_data.sql` inserts
//! the fixed locations and categories. sqlx records each applied file with its
//! checksum, so released files are append-only: schema changes go in a new
//! `NNN_description.sql`.

use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;

/// Embedded migrations from this crate's `migrations` directory.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    MIGRATOR.run(pool).await?;
    info!(embedded = MIGRATOR.migrations.len(), "Schema up to date");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    #[tokio::test]
    async fn test_every_embedded_migration_is_recorded() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(applied as usize, MIGRATOR.migrations.len());
        assert!(applied >= 2);

        // idempotent
        db.run_migrations().await.unwrap();
    }
}
