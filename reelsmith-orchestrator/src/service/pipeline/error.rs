//! Pipeline error types

use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// Why a generation ended in `failed`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// Request is missing required fields; no ledger row was created
    #[error("{0}")]
    InvalidRequest(String),

    /// Provider rejected the creation call; never retried
    #[error("{body}")]
    Submission { status: Option<u16>, body: String },

    /// Provider accepted the creation call but returned no job handle
    #[error("Provider did not return a video id")]
    MissingHandle,

    /// A status query failed at the transport level or with a non-2xx response
    #[error("Video status poll failed: {detail}")]
    Poll { status: Option<u16>, detail: String },

    /// Provider reported the job as failed
    #[error("{message}")]
    GenerationFailed { message: String },

    /// Poll budget ran out before the provider reached a terminal status
    #[error("Video generation timed out after {}s without finishing", .budget.as_secs())]
    PollTimeout { budget: Duration },

    /// Artifact download failed in a way retrying will not fix
    #[error("Failed to download video: {detail}")]
    Download { status: Option<u16>, detail: String },

    /// Fetch budget ran out while the artifact was still unavailable
    #[error(
        "Video is not downloadable yet after {attempts} attempt(s); the job may still finish, try again later"
    )]
    ArtifactNotReady { attempts: u32, last_error: String },

    /// Upload or public URL resolution failed
    #[error("Failed to store video: {0}")]
    Storage(String),

    /// Status ledger rejected a write the pipeline depends on
    #[error("Status ledger error: {0}")]
    Ledger(String),

    /// A stage produced an outcome that does not belong to it
    #[error("Invalid pipeline transition: {0}")]
    InvalidTransition(String),
}

impl PipelineError {
    /// Failure detail recorded on the ledger row
    pub fn detail(&self) -> String {
        match self {
            Self::Submission { body, .. } => body.clone(),
            Self::Poll { detail, .. } => detail.clone(),
            Self::ArtifactNotReady { last_error, .. } if !last_error.is_empty() => {
                format!("{} (last error: {})", self, last_error)
            }
            other => other.to_string(),
        }
    }

    /// Whether the caller may sensibly retry or check back later
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::PollTimeout { .. } | Self::ArtifactNotReady { .. }
        )
    }
}

/// Failure payload of one pipeline run
#[derive(Debug, Clone, Error)]
#[error("{error}")]
pub struct PipelineFailure {
    /// Ledger row of the run, if one was created
    pub job_id: Option<Uuid>,
    pub error: PipelineError,
}

impl PipelineFailure {
    pub fn new(job_id: Option<Uuid>, error: PipelineError) -> Self {
        Self { job_id, error }
    }
}
