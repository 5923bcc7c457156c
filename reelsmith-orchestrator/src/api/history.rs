//! History API Handlers
//!
//! HTTP endpoints for browsing and deleting past generations.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::{StatusCode, header},
    response::IntoResponse,
};
use reelsmith_core::domain::job::VideoJob;
use reelsmith_core::dto::history::HistoryQuery;
use uuid::Uuid;

use crate::api::AppState;
use crate::api::error::{ApiError, ApiResult};
use crate::service::history_service::{self, HistoryError};

fn history_error(err: HistoryError) -> ApiError {
    match err {
        HistoryError::NotFound(id) => ApiError::NotFound(format!("History entry {} not found", id)),
        HistoryError::InProgress(id, status) => ApiError::Conflict(format!(
            "History entry {} is still {}; retry once it has completed or failed",
            id, status
        )),
        HistoryError::StorageError(err) => {
            ApiError::InternalError(format!("Failed to remove stored video: {:#}", err))
        }
        HistoryError::DatabaseError(err) => ApiError::DatabaseError(err),
    }
}

/// GET /api/history?limit&page
/// List past generations, newest first
///
/// Unparseable paging parameters fall back to the defaults.
pub async fn list_history(
    State(state): State<AppState>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let query = query.map(|Query(q)| q).unwrap_or_default();

    let page = history_service::list_history(&state.pool, &query)
        .await
        .map_err(history_error)?;

    Ok(([(header::CACHE_CONTROL, "no-store")], Json(page)))
}

/// GET /api/history/{id}
/// Get one generation, e.g. to follow a job that outlived its request
pub async fn get_entry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    tracing::debug!("Getting history entry: {}", id);

    let job: VideoJob = history_service::get_entry(&state.pool, id)
        .await
        .map_err(history_error)?;

    Ok(([(header::CACHE_CONTROL, "no-store")], Json(job)))
}

/// DELETE /api/history/{id}
/// Delete a finished generation and its stored video
///
/// Running jobs answer 409.
pub async fn delete_entry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    tracing::info!("Deleting history entry: {}", id);

    history_service::delete_entry(&state.pool, &*state.storage, id)
        .await
        .map_err(history_error)?;

    Ok(StatusCode::NO_CONTENT)
}
