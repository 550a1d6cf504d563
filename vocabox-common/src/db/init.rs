//! Table creation for the vocabox database
//!
//! Exposed individually so test databases can create exactly the schema
//! they need.

use crate::Result;
use sqlx::SqlitePool;

/// Create all vocabox tables that do not yet exist.
pub async fn create_tables(pool: &SqlitePool) -> Result<()> {
    create_word_ext_table(pool).await?;
    tracing::info!("Database tables initialized (word_ext)");
    Ok(())
}

/// Create the `word_ext` enrichment cache table.
///
/// One row per dictionary entry, keyed by the upstream `vc_id`. A field
/// counts as populated only when non-empty after trimming; empty string
/// and NULL both mean "not yet fetched".
pub async fn create_word_ext_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS word_ext (
            vc_id TEXT PRIMARY KEY,
            word TEXT NOT NULL DEFAULT '',
            phonetic_us TEXT NOT NULL DEFAULT '',
            phonetic_uk TEXT NOT NULL DEFAULT '',
            translation TEXT NOT NULL DEFAULT '',
            raw_translation TEXT NOT NULL DEFAULT '',
            example TEXT NOT NULL DEFAULT '',
            image_url TEXT NOT NULL DEFAULT '',
            audio_us_url TEXT NOT NULL DEFAULT '',
            audio_uk_url TEXT NOT NULL DEFAULT '',
            word_from TEXT NOT NULL DEFAULT '',
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Prefix search for suggestions walks this index instead of the table
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_word_ext_word ON word_ext(word)")
        .execute(pool)
        .await?;

    Ok(())
}
