//! Job submission
//!
//! A single creation call. Rejections are treated as non-transient
//! (malformed prompt, quota) and are never retried.

use tracing::{error, info};
use uuid::Uuid;

use super::error::PipelineError;
use crate::repository::{GenerationProvider, VideoRequest};

/// Submit `request` and return the provider's job handle
pub(super) async fn submit(
    provider: &dyn GenerationProvider,
    job_id: Uuid,
    request: &VideoRequest,
) -> Result<String, PipelineError> {
    info!(
        "Job {}: submitting video ({} model, {}, {}s)",
        job_id, request.model, request.size, request.seconds
    );

    let created = provider.create(request).await.map_err(|err| {
        error!(
            "Job {}: video create failed (status {:?}): {}",
            job_id,
            err.status(),
            err.detail()
        );
        PipelineError::Submission {
            status: err.status(),
            body: err.detail(),
        }
    })?;

    match created.handle.filter(|handle| !handle.trim().is_empty()) {
        Some(handle) => {
            info!("Job {}: provider accepted video {}", job_id, handle);
            Ok(handle)
        }
        None => {
            error!("Job {}: provider response carried no video id", job_id);
            Err(PipelineError::MissingHandle)
        }
    }
}
