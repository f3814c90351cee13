//! Tag association and voting endpoints

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tagdex_common::Error;

use crate::api::ApiError;
use crate::{db, AppState};

#[derive(Debug, Deserialize)]
pub struct AddTagBody {
    pub tag: String,
    pub contributor_user_id: Option<String>,
}

/// POST /api/media/:key/tags
///
/// Adds a tag to the media item. Idempotent: re-adding a tag the item
/// already carries is a no-op success.
pub async fn add_tag(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(body): Json<AddTagBody>,
) -> Result<Json<Value>, ApiError> {
    let media_id = db::media::resolve_media_id(&state.db, &key)
        .await?
        .ok_or_else(|| Error::NotFound(format!("media not found: {}", key)))?;

    let tag = db::associations::add_tag(
        &state.db,
        media_id,
        &body.tag,
        body.contributor_user_id.as_deref(),
    )
    .await?;

    Ok(Json(json!({ "ok": true, "tag": tag })))
}

#[derive(Debug, Deserialize)]
pub struct ScoresQuery {
    pub user_id: Option<String>,
}

/// GET /api/media/:key/tags?user_id=U
///
/// Tags on the media item with aggregate scores and the requesting
/// user's own vote. An unknown media key yields an empty list, not an
/// error: absence of tags is a valid state.
pub async fn tags_with_scores(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(query): Query<ScoresQuery>,
) -> Result<Json<Value>, ApiError> {
    let tags = match db::media::resolve_media_id(&state.db, &key).await? {
        Some(media_id) => {
            let user_id = query.user_id.as_deref().unwrap_or("");
            db::votes::tags_with_scores(&state.db, media_id, user_id).await?
        }
        None => Vec::new(),
    };
    Ok(Json(json!({ "tags": tags })))
}

#[derive(Debug, Deserialize)]
pub struct VoteBody {
    pub tag: String,
    pub user_id: String,
    pub direction: i64,
}

/// POST /api/media/:key/vote
///
/// Direction 1/-1 records or changes the user's vote; 0 removes it.
pub async fn apply_vote(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(body): Json<VoteBody>,
) -> Result<Json<Value>, ApiError> {
    let media_id = db::media::resolve_media_id(&state.db, &key)
        .await?
        .ok_or_else(|| Error::NotFound(format!("media not found: {}", key)))?;

    let outcome =
        db::votes::apply_vote(&state.db, media_id, &body.tag, &body.user_id, body.direction)
            .await?;
    let removed = outcome == db::votes::VoteOutcome::Removed;

    Ok(Json(json!({ "ok": true, "removed": removed })))
}

#[derive(Debug, Deserialize)]
pub struct BulkTagsBody {
    pub media_ids: Vec<i64>,
    pub tags: Vec<String>,
}

/// POST /api/tags/remove
///
/// Deletes all matching (media, tag) pairs across the media set.
pub async fn remove_tags(
    State(state): State<AppState>,
    Json(body): Json<BulkTagsBody>,
) -> Result<Json<Value>, ApiError> {
    let affected = db::associations::remove_tags(&state.db, &body.media_ids, &body.tags).await?;
    Ok(Json(json!({ "affected": affected })))
}

/// POST /api/tags/replace
///
/// Replaces every association on the media set; an empty tag list clears
/// all tags.
pub async fn replace_tags(
    State(state): State<AppState>,
    Json(body): Json<BulkTagsBody>,
) -> Result<Json<Value>, ApiError> {
    let affected = db::associations::replace_tags(&state.db, &body.media_ids, &body.tags).await?;
    Ok(Json(json!({ "affected": affected })))
}
