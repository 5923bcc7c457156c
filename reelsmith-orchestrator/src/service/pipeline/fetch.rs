//! Artifact fetcher
//!
//! The provider may report a job complete before its video can actually be
//! downloaded. Each attempt tries the canonical content endpoint, then the
//! direct URL captured while polling (if any). Attempts repeat at a fixed
//! spacing until one succeeds or the fetch budget runs out.

use std::time::Duration;
use tokio::time::{Instant, sleep, timeout_at};
use tracing::{error, info, warn};
use uuid::Uuid;

use super::error::PipelineError;
use crate::repository::{GenerationProvider, ProviderError};

/// Result of one fetch attempt
enum Attempt {
    Fetched(Vec<u8>),
    NotReady(String),
    Failed(PipelineError),
    OutOfTime,
}

/// Download the finished video for `handle`
pub(super) async fn fetch_artifact(
    provider: &dyn GenerationProvider,
    job_id: Uuid,
    handle: &str,
    artifact_ref: Option<&str>,
    interval: Duration,
    budget: Duration,
) -> Result<Vec<u8>, PipelineError> {
    let deadline = Instant::now() + budget;
    let mut attempts: u32 = 0;
    let mut last_error = String::new();

    loop {
        attempts += 1;

        match attempt(provider, job_id, handle, artifact_ref, deadline).await {
            Attempt::Fetched(bytes) => {
                info!(
                    "Job {}: downloaded {} bytes for video {} (attempt {})",
                    job_id,
                    bytes.len(),
                    handle,
                    attempts
                );
                return Ok(bytes);
            }
            Attempt::Failed(err) => {
                error!("Job {}: giving up on video {}: {}", job_id, handle, err);
                return Err(err);
            }
            Attempt::NotReady(detail) => last_error = detail,
            Attempt::OutOfTime => break,
        }

        if Instant::now() + interval >= deadline {
            break;
        }
        sleep(interval).await;
    }

    warn!(
        "Job {}: video {} not downloadable after {} attempt(s) within {:?}",
        job_id, handle, attempts, budget
    );
    Err(PipelineError::ArtifactNotReady {
        attempts,
        last_error,
    })
}

async fn attempt(
    provider: &dyn GenerationProvider,
    job_id: Uuid,
    handle: &str,
    artifact_ref: Option<&str>,
    deadline: Instant,
) -> Attempt {
    let canonical_err = match timeout_at(deadline, provider.content(handle)).await {
        Ok(Ok(bytes)) => return Attempt::Fetched(bytes),
        Ok(Err(err)) => err,
        Err(_) => return Attempt::OutOfTime,
    };

    warn!(
        "Job {}: content endpoint for {} failed (status {:?}): {}",
        job_id,
        handle,
        canonical_err.status(),
        canonical_err.detail()
    );

    if let Some(url) = artifact_ref {
        match timeout_at(deadline, provider.download(url)).await {
            Ok(Ok(bytes)) => {
                info!("Job {}: fetched video {} from direct URL", job_id, handle);
                return Attempt::Fetched(bytes);
            }
            Ok(Err(err)) => warn!(
                "Job {}: direct URL for {} failed (status {:?}): {}",
                job_id,
                handle,
                err.status(),
                err.detail()
            ),
            Err(_) => return Attempt::OutOfTime,
        }
    }

    classify(canonical_err)
}

/// The canonical endpoint's error decides whether waiting can help
fn classify(err: ProviderError) -> Attempt {
    if err.is_retryable() {
        Attempt::NotReady(err.detail())
    } else {
        Attempt::Failed(PipelineError::Download {
            status: err.status(),
            detail: err.detail(),
        })
    }
}
