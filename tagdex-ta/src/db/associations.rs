//! Tag ↔ media associations
//!
//! Association rows are unique on (media_id, tag). Inserts are idempotent
//! at the store layer, so duplicate adds are a no-op success rather than
//! an error.

use sqlx::SqlitePool;
use std::collections::HashSet;
use tagdex_common::normalize::normalize_tag;
use tagdex_common::time::now_ms;
use tagdex_common::{Error, Result};
use tracing::warn;

/// Add a tag to a media item, returning the normalized tag.
///
/// Rejects tags that normalize to empty. Adding a tag the media item
/// already carries leaves exactly one row in place.
pub async fn add_tag(
    pool: &SqlitePool,
    media_id: i64,
    raw_tag: &str,
    contributor_user_id: Option<&str>,
) -> Result<String> {
    let tag = normalize_tag(raw_tag);
    if tag.is_empty() {
        return Err(Error::InvalidInput("empty tag".to_string()));
    }

    sqlx::query(
        r#"
        INSERT INTO media_tags (media_id, tag, contributor_user_id, created_at)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(media_id, tag) DO NOTHING
        "#,
    )
    .bind(media_id)
    .bind(&tag)
    .bind(contributor_user_id)
    .bind(now_ms())
    .execute(pool)
    .await?;

    Ok(tag)
}

/// Normalize and dedupe a raw tag list, dropping empties (order-stable)
fn normalize_tag_list(raw_tags: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut tags = Vec::new();
    for raw in raw_tags {
        let tag = normalize_tag(raw);
        if !tag.is_empty() && seen.insert(tag.clone()) {
            tags.push(tag);
        }
    }
    tags
}

/// Delete all matching (media, tag) rows across the media set in one
/// statement. Returns the number of rows removed; 0 is a valid outcome.
pub async fn remove_tags(pool: &SqlitePool, media_ids: &[i64], raw_tags: &[String]) -> Result<u64> {
    let tags = normalize_tag_list(raw_tags);
    if media_ids.is_empty() || tags.is_empty() {
        return Ok(0);
    }

    let id_marks = vec!["?"; media_ids.len()].join(", ");
    let tag_marks = vec!["?"; tags.len()].join(", ");
    let sql = format!(
        "DELETE FROM media_tags WHERE media_id IN ({}) AND tag IN ({})",
        id_marks, tag_marks
    );

    let mut query = sqlx::query(&sql);
    for id in media_ids {
        query = query.bind(id);
    }
    for tag in &tags {
        query = query.bind(tag);
    }
    let result = query.execute(pool).await?;
    Ok(result.rows_affected())
}

/// Replace every association on the media set with the given tag list.
///
/// An empty tag list clears all tags. Inserts are best-effort per pair:
/// a failing pair is logged and skipped, and the caller only learns the
/// count of inserted rows.
pub async fn replace_tags(pool: &SqlitePool, media_ids: &[i64], raw_tags: &[String]) -> Result<u64> {
    if media_ids.is_empty() {
        return Ok(0);
    }
    let tags = normalize_tag_list(raw_tags);

    let id_marks = vec!["?"; media_ids.len()].join(", ");
    let sql = format!("DELETE FROM media_tags WHERE media_id IN ({})", id_marks);
    let mut query = sqlx::query(&sql);
    for id in media_ids {
        query = query.bind(id);
    }
    query.execute(pool).await?;

    let mut inserted = 0u64;
    for &media_id in media_ids {
        for tag in &tags {
            let result = sqlx::query(
                r#"
                INSERT INTO media_tags (media_id, tag, created_at)
                VALUES (?, ?, ?)
                ON CONFLICT(media_id, tag) DO NOTHING
                "#,
            )
            .bind(media_id)
            .bind(tag)
            .bind(now_ms())
            .execute(pool)
            .await;
            match result {
                Ok(r) => inserted += r.rows_affected(),
                Err(e) => warn!("replace_tags: insert ({}, {}) failed: {}", media_id, tag, e),
            }
        }
    }
    Ok(inserted)
}
