//! Analytics endpoints
//!
//! Suggestion and co-occurrence responses pass through the process-local
//! TTL cache and report whether they were served from it; the other
//! views are recomputed on every call.

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tagdex_common::Error;

use crate::api::ApiError;
use crate::bounds::clamp_or_default;
use crate::cache::cache_key;
use crate::{db, typo, AppState};

fn to_value<T: Serialize>(value: T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError(Error::Internal(e.to_string())))
}

#[derive(Debug, Deserialize)]
pub struct SuggestionsQuery {
    pub limit: Option<i64>,
    #[serde(default)]
    pub nocache: bool,
}

/// GET /api/analytics/suggestions?limit=&nocache=
///
/// Most-used tags. `nocache` forces a fresh computation and skips cache
/// population, leaving any existing entry untouched.
pub async fn suggestions(
    State(state): State<AppState>,
    Query(query): Query<SuggestionsQuery>,
) -> Result<Json<Value>, ApiError> {
    let limit = clamp_or_default(query.limit, 20, 200);
    let key = cache_key(
        "/api/analytics/suggestions",
        &[("limit", limit.to_string())],
    );

    if !query.nocache {
        if let Some(tags) = state.cache.get(&key) {
            return Ok(Json(json!({ "tags": tags, "cached": true })));
        }
    }

    let tags = to_value(db::analytics::suggestions(&state.db, limit).await?)?;
    if !query.nocache {
        state.cache.set(&key, tags.clone());
    }
    Ok(Json(json!({ "tags": tags, "cached": false })))
}

#[derive(Debug, Deserialize)]
pub struct CooccurrenceQuery {
    pub limit: Option<i64>,
    #[serde(default)]
    pub nocache: bool,
}

/// GET /api/analytics/cooccurrence?limit=&nocache=
pub async fn cooccurrence(
    State(state): State<AppState>,
    Query(query): Query<CooccurrenceQuery>,
) -> Result<Json<Value>, ApiError> {
    let limit = clamp_or_default(query.limit, 50, 300);
    let key = cache_key(
        "/api/analytics/cooccurrence",
        &[("limit", limit.to_string())],
    );

    if !query.nocache {
        if let Some(pairs) = state.cache.get(&key) {
            return Ok(Json(json!({ "pairs": pairs, "cached": true })));
        }
    }

    let pairs = to_value(db::analytics::cooccurrence(&state.db, limit).await?)?;
    if !query.nocache {
        state.cache.set(&key, pairs.clone());
    }
    Ok(Json(json!({ "pairs": pairs, "cached": false })))
}

#[derive(Debug, Deserialize)]
pub struct CoverageQuery {
    pub min: Option<i64>,
    pub limit: Option<i64>,
    #[serde(default)]
    pub full: bool,
}

/// GET /api/analytics/coverage?min=&limit=&full=
pub async fn coverage(
    State(state): State<AppState>,
    Query(query): Query<CoverageQuery>,
) -> Result<Json<db::analytics::CoverageReport>, ApiError> {
    let min = clamp_or_default(query.min, 1, 10);
    let limit = clamp_or_default(query.limit, 2000, 10_000);
    let report = db::analytics::coverage(&state.db, min, limit, query.full).await?;
    Ok(Json(report))
}

#[derive(Debug, Deserialize)]
pub struct TypoQuery {
    pub distance: Option<i64>,
    pub max_groups: Option<i64>,
    pub min_uses: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct TypoResponse {
    pub groups: Vec<typo::TypoGroup>,
}

/// GET /api/analytics/typos?distance=&max_groups=&min_uses=
pub async fn typo_candidates(
    State(state): State<AppState>,
    Query(query): Query<TypoQuery>,
) -> Result<Json<TypoResponse>, ApiError> {
    let distance = clamp_or_default(query.distance, 2, 3);
    let max_groups = clamp_or_default(query.max_groups, 50, 200);
    let min_uses = clamp_or_default(query.min_uses, 1, i64::MAX);

    let pool_cap = (max_groups * 4).min(400);
    let candidates = db::analytics::typo_candidates(&state.db, min_uses, pool_cap).await?;
    let groups = typo::cluster_typos(&candidates, distance as usize, max_groups as usize);

    Ok(Json(TypoResponse { groups }))
}

#[derive(Debug, Deserialize)]
pub struct RecencyQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct RecencyResponse {
    pub tags: Vec<db::analytics::RecencyEntry>,
}

/// GET /api/analytics/recency?limit=
pub async fn recency(
    State(state): State<AppState>,
    Query(query): Query<RecencyQuery>,
) -> Result<Json<RecencyResponse>, ApiError> {
    let limit = clamp_or_default(query.limit, 50, 300);
    let tags = db::analytics::recency(&state.db, limit).await?;
    Ok(Json(RecencyResponse { tags }))
}
