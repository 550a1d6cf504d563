//! Database access shared across vocabox services

pub mod init;

use crate::Result;
use sqlx::SqlitePool;
use std::path::Path;

/// Initialize the service database connection pool.
///
/// Opens (or creates) the SQLite database at `db_path` and creates any
/// missing tables.
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Proper SQLite URI with mode=rwc (read, write, create)
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    tracing::debug!("Connecting to database: {}", db_url);

    let pool = SqlitePool::connect(&db_url).await?;

    init::create_tables(&pool).await?;

    Ok(pool)
}
