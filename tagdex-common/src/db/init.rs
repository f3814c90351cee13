//! Database initialization
//!
//! Creates the database on first run and applies the schema. All DDL is
//! `IF NOT EXISTS`, safe to run on every startup.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // mode=rwc: read, write, create
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // Enable foreign keys
    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    // WAL allows readers to proceed while a write is in flight
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;

    // Wait for locks instead of failing immediately under contention
    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    create_schema(&pool).await?;

    Ok(pool)
}

/// Create all tables and indexes (idempotent)
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_media_table(pool).await?;
    create_media_tags_table(pool).await?;
    create_tag_votes_table(pool).await?;
    Ok(())
}

/// Media registry: the external media key is the guid
pub async fn create_media_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS media (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            guid TEXT NOT NULL UNIQUE,
            title TEXT,
            created_at INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

/// Associations: unique on (media_id, tag), never mutated in place
pub async fn create_media_tags_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS media_tags (
            media_id INTEGER NOT NULL REFERENCES media(id) ON DELETE CASCADE,
            tag TEXT NOT NULL,
            contributor_user_id TEXT,
            created_at INTEGER NOT NULL,
            PRIMARY KEY (media_id, tag)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Tag-keyed group-bys (suggestions, co-occurrence, recency)
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_media_tags_tag ON media_tags(tag)")
        .execute(pool)
        .await?;
    Ok(())
}

/// Votes: at most one row per (media, tag, user); direction 0 is never stored
pub async fn create_tag_votes_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tag_votes (
            media_id INTEGER NOT NULL REFERENCES media(id) ON DELETE CASCADE,
            tag TEXT NOT NULL,
            user_id TEXT NOT NULL,
            direction INTEGER NOT NULL CHECK (direction IN (-1, 1)),
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL,
            PRIMARY KEY (media_id, tag, user_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Score sums per (media, tag)
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_tag_votes_media_tag ON tag_votes(media_id, tag)")
        .execute(pool)
        .await?;
    Ok(())
}
