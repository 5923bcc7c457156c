//! History Service
//!
//! Read and administrative access to past generations.

use reelsmith_core::domain::job::{JobStatus, VideoJob};
use reelsmith_core::dto::history::{HistoryPage, HistoryQuery};
use sqlx::PgPool;
use uuid::Uuid;

use crate::repository::{ObjectStorage, job_repository};

/// Service error type
#[derive(Debug)]
pub enum HistoryError {
    NotFound(Uuid),
    /// The job has not settled yet and may still publish a video
    InProgress(Uuid, JobStatus),
    StorageError(anyhow::Error),
    DatabaseError(sqlx::Error),
}

impl From<sqlx::Error> for HistoryError {
    fn from(err: sqlx::Error) -> Self {
        HistoryError::DatabaseError(err)
    }
}

pub type Result<T> = std::result::Result<T, HistoryError>;

/// List one page of history, newest first
pub async fn list_history(pool: &PgPool, query: &HistoryQuery) -> Result<HistoryPage> {
    let total = job_repository::count(pool).await?;
    let history = job_repository::list_page(pool, query.limit(), query.offset()).await?;

    tracing::debug!(
        "Listed {} of {} history entries (page {}, limit {})",
        history.len(),
        total,
        query.page(),
        query.limit()
    );

    Ok(HistoryPage { history, total })
}

/// Get one history entry
pub async fn get_entry(pool: &PgPool, id: Uuid) -> Result<VideoJob> {
    job_repository::find_by_id(pool, id)
        .await?
        .ok_or(HistoryError::NotFound(id))
}

/// Refuse to delete a job the pipeline is still working on
pub fn ensure_deletable(job: &VideoJob) -> Result<()> {
    if job.status.is_terminal() {
        Ok(())
    } else {
        Err(HistoryError::InProgress(job.id, job.status))
    }
}

/// Delete a history entry and its stored video
///
/// Only terminal rows are deleted. The object goes first; a row is never
/// removed while its video is still stored.
pub async fn delete_entry(pool: &PgPool, storage: &dyn ObjectStorage, id: Uuid) -> Result<()> {
    let job = get_entry(pool, id).await?;
    ensure_deletable(&job)?;

    if let Some(path) = job.storage_path.as_deref() {
        storage
            .remove(path)
            .await
            .map_err(HistoryError::StorageError)?;
        tracing::info!("Removed stored video {} of job {}", path, id);
    }

    if !job_repository::delete_terminal(pool, id).await? {
        return Err(HistoryError::NotFound(id));
    }

    tracing::info!("Deleted history entry {}", id);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelsmith_core::domain::region::Region;

    fn job(status: JobStatus) -> VideoJob {
        VideoJob {
            id: Uuid::new_v4(),
            created_at: chrono::Utc::now(),
            completed_at: None,
            title: "Soup night".to_string(),
            recipe_text: "Simmer stock.".to_string(),
            people: "family".to_string(),
            region: Region::Asia,
            video_prompt: "Steam rising".to_string(),
            provider_job_id: Some("video_1".to_string()),
            status,
            error_message: None,
            storage_path: None,
            video_url: None,
        }
    }

    #[test]
    fn test_running_jobs_cannot_be_deleted() {
        for status in [JobStatus::Queued, JobStatus::Generating, JobStatus::Uploading] {
            let job = job(status);
            match ensure_deletable(&job) {
                Err(HistoryError::InProgress(id, got)) => {
                    assert_eq!(id, job.id);
                    assert_eq!(got, status);
                }
                other => panic!("expected InProgress for {}, got {:?}", status, other),
            }
        }
    }

    #[test]
    fn test_terminal_jobs_can_be_deleted() {
        assert!(ensure_deletable(&job(JobStatus::Completed)).is_ok());
        assert!(ensure_deletable(&job(JobStatus::Failed)).is_ok());
    }
}
