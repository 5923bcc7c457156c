//! Status ledger DTOs

use serde::{Deserialize, Serialize};

use crate::domain::job::JobStatus;
use crate::domain::region::Region;

/// Initial fields of a ledger row, written once at submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewJob {
    pub title: String,
    pub recipe_text: String,
    pub people: String,
    pub region: Region,
    pub video_prompt: String,
}

/// Partial update of a ledger row
///
/// Every patch moves the row to `status`; the optional fields are written
/// only when present and otherwise left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobPatch {
    pub status: JobStatus,
    pub provider_job_id: Option<String>,
    pub storage_path: Option<String>,
    pub video_url: Option<String>,
    pub error_message: Option<String>,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl JobPatch {
    fn status(status: JobStatus) -> Self {
        Self {
            status,
            provider_job_id: None,
            storage_path: None,
            video_url: None,
            error_message: None,
            completed_at: None,
        }
    }

    /// Provider accepted the job and assigned `handle`
    pub fn generating(handle: impl Into<String>) -> Self {
        Self {
            provider_job_id: Some(handle.into()),
            ..Self::status(JobStatus::Generating)
        }
    }

    /// Artifact bytes are in hand and about to be stored
    pub fn uploading() -> Self {
        Self::status(JobStatus::Uploading)
    }

    /// Artifact stored and publicly resolvable; stamps the completion time
    pub fn completed(storage_path: impl Into<String>, video_url: impl Into<String>) -> Self {
        Self {
            storage_path: Some(storage_path.into()),
            video_url: Some(video_url.into()),
            completed_at: Some(chrono::Utc::now()),
            ..Self::status(JobStatus::Completed)
        }
    }

    pub fn failed(detail: impl Into<String>) -> Self {
        Self {
            error_message: Some(detail.into()),
            ..Self::status(JobStatus::Failed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completed_patch_sets_location_and_time() {
        let patch = JobPatch::completed("a/b.mp4", "https://cdn/a/b.mp4");
        assert_eq!(patch.status, JobStatus::Completed);
        assert_eq!(patch.storage_path.as_deref(), Some("a/b.mp4"));
        assert_eq!(patch.video_url.as_deref(), Some("https://cdn/a/b.mp4"));
        assert!(patch.completed_at.is_some());
        assert!(patch.error_message.is_none());
    }

    #[test]
    fn test_failed_patch_only_sets_detail() {
        let patch = JobPatch::failed("quota exceeded");
        assert_eq!(patch.status, JobStatus::Failed);
        assert_eq!(patch.error_message.as_deref(), Some("quota exceeded"));
        assert!(patch.storage_path.is_none());
        assert!(patch.video_url.is_none());
        assert!(patch.completed_at.is_none());
    }

    #[test]
    fn test_generating_patch_carries_handle() {
        let patch = JobPatch::generating("video_123");
        assert_eq!(patch.status, JobStatus::Generating);
        assert_eq!(patch.provider_job_id.as_deref(), Some("video_123"));
    }
}
