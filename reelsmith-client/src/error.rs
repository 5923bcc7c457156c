//! Error types for the Reelsmith client

use reelsmith_core::dto::generation::GenerationFailed;
use thiserror::Error;
use uuid::Uuid;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when using the Reelsmith client
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// API returned an error status code
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
        /// Upstream detail, e.g. the provider's raw response body
        details: Option<String>,
        /// Ledger row of a generation that failed or is still running
        job_id: Option<Uuid>,
    },

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

impl ClientError {
    /// Create an API error from status code and response body
    ///
    /// Bodies in the orchestrator's `{"error", "details", "jobId"}` shape are
    /// unpacked; anything else becomes the message verbatim.
    pub fn api_error(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();

        match serde_json::from_str::<GenerationFailed>(&body) {
            Ok(failure) => Self::ApiError {
                status,
                message: failure.error,
                details: failure.details,
                job_id: failure.job_id,
            },
            Err(_) => Self::ApiError {
                status,
                message: body,
                details: None,
                job_id: None,
            },
        }
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ApiError { status: 404, .. })
    }

    /// Check if the job may still finish: the generation outlived the
    /// request, or its video was not downloadable yet
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::ApiError { status: 503 | 504, .. })
    }

    /// Ledger row the error refers to, if the orchestrator reported one
    pub fn job_id(&self) -> Option<Uuid> {
        match self {
            Self::ApiError { job_id, .. } => *job_id,
            _ => None,
        }
    }

    /// Upstream detail, if the orchestrator reported one
    pub fn details(&self) -> Option<&str> {
        match self {
            Self::ApiError { details, .. } => details.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orchestrator_error_body_is_unpacked() {
        let job_id = Uuid::new_v4();
        let body = format!(
            "{{\"error\":\"Video creation failed\",\"details\":\"quota exceeded\",\"jobId\":\"{}\"}}",
            job_id
        );

        let err = ClientError::api_error(502, body);

        assert_eq!(
            err.to_string(),
            "API error (status 502): Video creation failed"
        );
        assert_eq!(err.details(), Some("quota exceeded"));
        assert_eq!(err.job_id(), Some(job_id));
        assert!(!err.is_pending());
    }

    #[test]
    fn test_plain_body_is_kept_verbatim() {
        let err = ClientError::api_error(404, "not here");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "API error (status 404): not here");
        assert_eq!(err.job_id(), None);
    }

    #[test]
    fn test_pending_statuses() {
        assert!(ClientError::api_error(504, "{\"error\":\"still running\"}").is_pending());
        assert!(ClientError::api_error(503, "").is_pending());
        assert!(!ClientError::api_error(500, "").is_pending());
    }
}
