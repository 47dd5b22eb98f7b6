//! Database access for joia-ui
//!
//! Connects to the shared joia.db in the root folder and owns the songs
//! table.

pub mod songs;

use joia_common::Result;
use sqlx::SqlitePool;
use std::path::Path;

/// Initialize database connection pool
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Use proper SQLite URI with mode=rwc (read, write, create)
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    tracing::debug!("Connecting to database: {}", db_url);

    let pool = SqlitePool::connect(&db_url).await?;

    init_tables(&pool).await?;

    Ok(pool)
}

/// Initialize joia-ui specific tables
///
/// Creates the songs table if it doesn't exist. Identifiers and
/// timestamps are assigned here, never by callers: guid at insert time,
/// created_at/updated_at by the store.
pub async fn init_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS songs (
            guid TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            artist TEXT NOT NULL,
            language TEXT,
            source_type TEXT NOT NULL CHECK (source_type IN ('youtube', 'local')),
            source_url TEXT NOT NULL,
            duration_seconds INTEGER,
            song_key TEXT,
            tempo_bpm INTEGER,
            duet INTEGER NOT NULL DEFAULT 0,
            notes TEXT,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("Database tables initialized (songs)");

    Ok(())
}
