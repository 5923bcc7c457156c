//! Generation API Handler
//!
//! Runs the video pipeline for one request.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use reelsmith_core::dto::generation::{GenerateVideo, GenerationSucceeded};

use crate::api::AppState;
use crate::api::error::{ApiError, ApiResult};

/// POST /api/generate-video
/// Generate a video and wait for its terminal state
///
/// The pipeline runs in its own task. When the request deadline passes
/// first, the caller gets the job id and the task keeps going until the
/// ledger row is terminal.
pub async fn generate_video(
    State(state): State<AppState>,
    payload: Result<Json<GenerateVideo>, JsonRejection>,
) -> ApiResult<Json<GenerationSucceeded>> {
    let Json(req) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let job = state.pipeline.accept(req).await?;
    let job_id = job.id;

    tracing::info!("Generating video for job {}", job_id);

    let pipeline = state.pipeline.clone();
    let run = tokio::spawn(async move { pipeline.drive(job).await });

    match tokio::time::timeout(state.request_deadline, run).await {
        Ok(Ok(result)) => Ok(Json(result?)),
        Ok(Err(err)) => Err(ApiError::InternalError(format!(
            "Generation task for job {} aborted: {}",
            job_id, err
        ))),
        Err(_) => {
            tracing::warn!(
                "Job {}: still running after {:?}, answering early",
                job_id,
                state.request_deadline
            );
            Err(ApiError::DeadlineExceeded(job_id))
        }
    }
}
