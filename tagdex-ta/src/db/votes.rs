//! Per-user tag votes and score aggregation
//!
//! Votes are unique on (media_id, tag, user_id) and written with the
//! store's atomic upsert, so concurrent same-key writers cannot leave two
//! rows behind. Direction 0 is never stored; it deletes the row.

use serde::Serialize;
use sqlx::{Row, SqlitePool};
use tagdex_common::normalize::normalize_tag;
use tagdex_common::time::now_ms;
use tagdex_common::{Error, Result};

/// A tag on a media item with its aggregate score
#[derive(Debug, Serialize)]
pub struct TagScore {
    pub tag: String,
    pub score: i64,
    pub my_vote: i64,
    pub contributor_user_id: Option<String>,
}

/// Outcome of [`apply_vote`]
#[derive(Debug, PartialEq, Eq)]
pub enum VoteOutcome {
    /// A live vote row now holds the given direction
    Recorded,
    /// The user's vote row was deleted (or was already absent)
    Removed,
}

/// Record, change, or remove a user's vote on a tag.
///
/// Direction 1 or -1 upserts the vote; 0 deletes it. Removing an absent
/// vote succeeds.
pub async fn apply_vote(
    pool: &SqlitePool,
    media_id: i64,
    raw_tag: &str,
    user_id: &str,
    direction: i64,
) -> Result<VoteOutcome> {
    if !matches!(direction, -1 | 0 | 1) {
        return Err(Error::InvalidInput(format!(
            "invalid vote direction: {}",
            direction
        )));
    }
    let tag = normalize_tag(raw_tag);
    if tag.is_empty() {
        return Err(Error::InvalidInput("empty tag".to_string()));
    }

    if direction == 0 {
        sqlx::query("DELETE FROM tag_votes WHERE media_id = ? AND tag = ? AND user_id = ?")
            .bind(media_id)
            .bind(&tag)
            .bind(user_id)
            .execute(pool)
            .await?;
        return Ok(VoteOutcome::Removed);
    }

    let now = now_ms();
    sqlx::query(
        r#"
        INSERT INTO tag_votes (media_id, tag, user_id, direction, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT(media_id, tag, user_id) DO UPDATE SET
            direction = excluded.direction,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(media_id)
    .bind(&tag)
    .bind(user_id)
    .bind(direction)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(VoteOutcome::Recorded)
}

/// All tags on a media item with aggregate score and the requesting
/// user's own vote, ordered `score DESC, tag ASC`.
pub async fn tags_with_scores(
    pool: &SqlitePool,
    media_id: i64,
    user_id: &str,
) -> Result<Vec<TagScore>> {
    let rows = sqlx::query(
        r#"
        SELECT mt.tag,
               COALESCE((SELECT SUM(v.direction) FROM tag_votes v
                         WHERE v.media_id = mt.media_id AND v.tag = mt.tag), 0) AS score,
               COALESCE((SELECT v.direction FROM tag_votes v
                         WHERE v.media_id = mt.media_id AND v.tag = mt.tag
                           AND v.user_id = ?), 0) AS my_vote,
               mt.contributor_user_id
        FROM media_tags mt
        WHERE mt.media_id = ?
        ORDER BY score DESC, mt.tag ASC
        "#,
    )
    .bind(user_id)
    .bind(media_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| TagScore {
            tag: row.get("tag"),
            score: row.get("score"),
            my_vote: row.get("my_vote"),
            contributor_user_id: row.get("contributor_user_id"),
        })
        .collect())
}
