//! RESTful API over a [`Snowflake`] generator.
//!
//! Endpoints:
//!   /id      - returns an ID
//!   /ids     - returns a full millisecond slot of IDs
//!   /range   - returns a pair of IDs defining a range
//!   /status  - returns the service status
//!
//! IDs are serialized as decimal strings so consumers without native
//! 64-bit integers (e.g. JavaScript) receive them losslessly.

use crate::{Error, Snowflake};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;

/// Builds the service router around a shared generator.
pub fn router(flake: Arc<Snowflake>) -> Router {
    Router::new()
        .route("/status", get(status_handler))
        .route("/id", get(id_handler))
        .route("/ids", get(ids_handler))
        .route("/range", get(range_handler))
        .with_state(flake)
}

#[derive(Serialize)]
struct IdResponse {
    id: String,
}

#[derive(Serialize)]
struct IdsResponse {
    ids: Vec<String>,
}

#[derive(Serialize)]
struct RangeResponse {
    lower: String,
    upper: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// Maps any generator error onto a 500 with a plain-text message body.
struct ApiError(Error);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

async fn status_handler() -> &'static str {
    "OK"
}

async fn id_handler(State(flake): State<Arc<Snowflake>>) -> Result<Json<IdResponse>, ApiError> {
    let id = flake.next_id().map_err(ApiError)?;
    Ok(Json(IdResponse { id: id.to_string() }))
}

async fn ids_handler(State(flake): State<Arc<Snowflake>>) -> Result<Json<IdsResponse>, ApiError> {
    let ids = flake.next_id_range_fill().map_err(ApiError)?;
    Ok(Json(IdsResponse {
        ids: ids.iter().map(ToString::to_string).collect(),
    }))
}

async fn range_handler(
    State(flake): State<Arc<Snowflake>>,
) -> Result<Json<RangeResponse>, ApiError> {
    let range = flake.next_id_range().map_err(ApiError)?;
    Ok(Json(RangeResponse {
        lower: range.lower.to_string(),
        upper: range.upper.to_string(),
    }))
}
