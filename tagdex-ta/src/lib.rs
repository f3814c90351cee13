//! tagdex-ta library - Tag Analytics module
//!
//! Records media↔tag associations and per-user votes against the shared
//! SQLite database, and serves the derived analytics views (suggestions,
//! co-occurrence, coverage, typo clusters, recency).

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod bounds;
pub mod cache;
pub mod db;
pub mod typo;

use cache::TtlCache;

/// TTL for cached analytics responses
const CACHE_TTL: Duration = Duration::from_secs(60);

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Process-local analytics cache (suggestions, co-occurrence)
    pub cache: Arc<TtlCache>,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool) -> Self {
        Self {
            db,
            cache: Arc::new(TtlCache::new(CACHE_TTL)),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    Router::new()
        .route(
            "/api/media/:key/tags",
            post(api::tags::add_tag).get(api::tags::tags_with_scores),
        )
        .route("/api/media/:key/vote", post(api::tags::apply_vote))
        .route("/api/tags/remove", post(api::tags::remove_tags))
        .route("/api/tags/replace", post(api::tags::replace_tags))
        .route("/api/analytics/suggestions", get(api::analytics::suggestions))
        .route("/api/analytics/cooccurrence", get(api::analytics::cooccurrence))
        .route("/api/analytics/coverage", get(api::analytics::coverage))
        .route("/api/analytics/typos", get(api::analytics::typo_candidates))
        .route("/api/analytics/recency", get(api::analytics::recency))
        .merge(api::health::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
