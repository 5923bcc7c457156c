//! Poll loop
//!
//! Queries the provider at a fixed interval until the job completes, fails,
//! or the poll budget runs out. A failed query ends the loop: a single flaky
//! poll cannot be told apart from a dead job.

use reelsmith_core::domain::provider::RemoteStatus;
use std::time::Duration;
use tokio::time::{Instant, sleep, timeout_at};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::error::PipelineError;
use crate::repository::GenerationProvider;

/// Poll `handle` until it settles
///
/// Returns the direct artifact reference on completion, which may be `None`;
/// the fetcher then relies on the content endpoint alone.
pub(super) async fn poll_until_settled(
    provider: &dyn GenerationProvider,
    job_id: Uuid,
    handle: &str,
    interval: Duration,
    budget: Duration,
) -> Result<Option<String>, PipelineError> {
    let deadline = Instant::now() + budget;
    let mut attempts: u32 = 0;

    while Instant::now() < deadline {
        attempts += 1;

        let snapshot = match timeout_at(deadline, provider.status(handle)).await {
            Ok(Ok(snapshot)) => snapshot,
            Ok(Err(err)) => {
                error!(
                    "Job {}: status poll {} for {} failed (status {:?}): {}",
                    job_id,
                    attempts,
                    handle,
                    err.status(),
                    err.detail()
                );
                return Err(PipelineError::Poll {
                    status: err.status(),
                    detail: err.detail(),
                });
            }
            // The query itself outlived the budget
            Err(_) => break,
        };

        match snapshot.status {
            RemoteStatus::Completed => {
                info!(
                    "Job {}: video {} completed after {} poll(s)",
                    job_id, handle, attempts
                );
                if snapshot.artifact_ref.is_none() {
                    warn!(
                        "Job {}: video {} completed without a URL; will use the content endpoint",
                        job_id, handle
                    );
                }
                return Ok(snapshot.artifact_ref);
            }
            RemoteStatus::Failed => {
                let message = snapshot.failure_message();
                warn!(
                    "Job {}: provider reported video {} as failed: {}",
                    job_id, handle, message
                );
                return Err(PipelineError::GenerationFailed { message });
            }
            RemoteStatus::InProgress(status) => {
                debug!(
                    "Job {}: video {} is '{}' (poll {})",
                    job_id, handle, status, attempts
                );
            }
        }

        sleep(interval).await;
    }

    warn!(
        "Job {}: video {} still running after {:?} ({} poll(s))",
        job_id, handle, budget, attempts
    );
    Err(PipelineError::PollTimeout { budget })
}
