//! Artifact publisher

use tracing::{error, info};
use uuid::Uuid;

use super::error::PipelineError;
use crate::repository::ObjectStorage;

/// Storage path of a job's video
///
/// Derived only from the job id and provider handle, so a repeated upload
/// overwrites the same object.
pub fn storage_path(job_id: Uuid, handle: &str, extension: &str) -> String {
    format!("{}/{}.{}", job_id, handle, extension)
}

/// Upload `artifact` and resolve its public URL
///
/// Returns `(storage_path, public_url)`.
pub(super) async fn publish(
    storage: &dyn ObjectStorage,
    job_id: Uuid,
    handle: &str,
    artifact: Vec<u8>,
    content_type: &str,
    extension: &str,
) -> Result<(String, String), PipelineError> {
    let path = storage_path(job_id, handle, extension);
    let size = artifact.len();

    storage
        .put(&path, artifact, content_type)
        .await
        .map_err(|err| {
            error!("Job {}: upload to {} failed: {:#}", job_id, path, err);
            PipelineError::Storage(format!("{:#}", err))
        })?;

    let public_url = storage.public_url(&path).map_err(|err| {
        error!("Job {}: no public URL for {}: {:#}", job_id, path, err);
        PipelineError::Storage(format!("{:#}", err))
    })?;

    info!("Job {}: stored {} bytes at {}", job_id, size, path);

    Ok((path, public_url))
}
