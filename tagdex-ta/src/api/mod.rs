//! HTTP API for the tag analytics service

pub mod analytics;
pub mod health;
pub mod tags;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tagdex_common::Error;

/// API error envelope: failures surface as `{ok: false, reason}` bodies,
/// never as uncaught panics across the service boundary.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Store failures cross the boundary with minimal detail
        let reason = match &self.0 {
            Error::Database(_) => "database error".to_string(),
            e => e.to_string(),
        };
        (status, Json(json!({ "ok": false, "reason": reason }))).into_response()
    }
}
