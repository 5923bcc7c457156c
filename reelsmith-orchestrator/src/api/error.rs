//! API Error Handling
//!
//! Unified error types and conversion for API responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use reelsmith_core::dto::generation::GenerationFailed;
use uuid::Uuid;

use crate::service::pipeline::{PipelineError, PipelineFailure};

/// API error type
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Conflict(String),
    DatabaseError(sqlx::Error),
    InternalError(String),
    /// A generation ended in `failed`
    Pipeline(PipelineFailure),
    /// The caller's deadline passed while the job was still running
    DeadlineExceeded(Uuid),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, message(msg)),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, message(msg)),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, message(msg)),
            ApiError::DatabaseError(err) => {
                tracing::error!("Database error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    message("Internal server error".to_string()),
                )
            }
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, message(msg))
            }
            ApiError::Pipeline(failure) => pipeline_response(failure),
            ApiError::DeadlineExceeded(job_id) => (
                StatusCode::GATEWAY_TIMEOUT,
                GenerationFailed {
                    error: "Video generation is still running; check the history entry later"
                        .to_string(),
                    details: None,
                    job_id: Some(job_id),
                },
            ),
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::DatabaseError(err)
    }
}

impl From<PipelineFailure> for ApiError {
    fn from(failure: PipelineFailure) -> Self {
        ApiError::Pipeline(failure)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

fn message(error: String) -> GenerationFailed {
    GenerationFailed {
        error,
        details: None,
        job_id: None,
    }
}

/// HTTP status of a failed generation
pub fn pipeline_status(error: &PipelineError) -> StatusCode {
    match error {
        PipelineError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        PipelineError::Submission { .. }
        | PipelineError::MissingHandle
        | PipelineError::Poll { .. }
        | PipelineError::GenerationFailed { .. }
        | PipelineError::Download { .. } => StatusCode::BAD_GATEWAY,
        PipelineError::PollTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        PipelineError::ArtifactNotReady { .. } => StatusCode::SERVICE_UNAVAILABLE,
        PipelineError::Storage(_)
        | PipelineError::Ledger(_)
        | PipelineError::InvalidTransition(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn pipeline_response(failure: PipelineFailure) -> (StatusCode, GenerationFailed) {
    let status = pipeline_status(&failure.error);

    let (error, details) = match &failure.error {
        PipelineError::Submission { body, .. } => {
            ("Video creation failed".to_string(), Some(body.clone()))
        }
        PipelineError::Poll { detail, .. } => {
            ("Video status poll failed".to_string(), Some(detail.clone()))
        }
        PipelineError::Download { detail, .. } => {
            ("Failed to download video".to_string(), Some(detail.clone()))
        }
        PipelineError::ArtifactNotReady { last_error, .. } => (
            failure.error.to_string(),
            Some(last_error.clone()).filter(|e| !e.is_empty()),
        ),
        PipelineError::Storage(detail) => ("Failed to store video".to_string(), Some(detail.clone())),
        other => (other.to_string(), None),
    };

    if status.is_server_error() {
        tracing::error!("Generation failed ({}): {}", status, failure.error);
    }

    (
        status,
        GenerationFailed {
            error,
            details,
            job_id: failure.job_id,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_pipeline_status_mapping() {
        let cases = [
            (
                PipelineError::InvalidRequest("missing".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                PipelineError::Submission {
                    status: Some(400),
                    body: "bad".to_string(),
                },
                StatusCode::BAD_GATEWAY,
            ),
            (
                PipelineError::GenerationFailed {
                    message: "blocked".to_string(),
                },
                StatusCode::BAD_GATEWAY,
            ),
            (
                PipelineError::PollTimeout {
                    budget: Duration::from_secs(180),
                },
                StatusCode::GATEWAY_TIMEOUT,
            ),
            (
                PipelineError::ArtifactNotReady {
                    attempts: 3,
                    last_error: String::new(),
                },
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                PipelineError::Storage("denied".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(pipeline_status(&error), expected, "{:?}", error);
        }
    }

    #[test]
    fn test_failure_body_carries_job_id_and_details() {
        let job_id = Uuid::new_v4();
        let failure = PipelineFailure::new(
            Some(job_id),
            PipelineError::Submission {
                status: Some(400),
                body: "{\"error\":\"quota\"}".to_string(),
            },
        );

        let (status, body) = pipeline_response(failure);

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body.error, "Video creation failed");
        assert_eq!(body.details.as_deref(), Some("{\"error\":\"quota\"}"));
        assert_eq!(body.job_id, Some(job_id));
    }
}
