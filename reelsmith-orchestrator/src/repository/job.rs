//! Video Job Repository
//!
//! Handles all database operations related to the status ledger.

use reelsmith_core::domain::job::{JobStatus, VideoJob};
use reelsmith_core::domain::region::Region;
use reelsmith_core::dto::job::{JobPatch, NewJob};
use sqlx::PgPool;
use uuid::Uuid;

/// Create a new queued job in the database
pub async fn create(pool: &PgPool, req: NewJob) -> Result<VideoJob, sqlx::Error> {
    let id = Uuid::new_v4();
    let now = chrono::Utc::now();

    sqlx::query(
        r#"
        INSERT INTO video_generations
            (id, created_at, title, recipe_text, people, region, video_prompt, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(id)
    .bind(now)
    .bind(&req.title)
    .bind(&req.recipe_text)
    .bind(&req.people)
    .bind(req.region.as_str())
    .bind(&req.video_prompt)
    .bind(JobStatus::Queued.as_str())
    .execute(pool)
    .await?;

    Ok(VideoJob {
        id,
        created_at: now,
        completed_at: None,
        title: req.title,
        recipe_text: req.recipe_text,
        people: req.people,
        region: req.region,
        video_prompt: req.video_prompt,
        provider_job_id: None,
        status: JobStatus::Queued,
        error_message: None,
        storage_path: None,
        video_url: None,
    })
}

/// Find a job by ID
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<VideoJob>, sqlx::Error> {
    let row = sqlx::query_as::<_, JobRow>(
        r#"
        SELECT id, created_at, completed_at, title, recipe_text, people, region,
               video_prompt, provider_job_id, status, error_message, storage_path, video_url
        FROM video_generations
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| r.into()))
}

/// List one page of jobs, newest first
pub async fn list_page(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<VideoJob>, sqlx::Error> {
    let rows = sqlx::query_as::<_, JobRow>(
        r#"
        SELECT id, created_at, completed_at, title, recipe_text, people, region,
               video_prompt, provider_job_id, status, error_message, storage_path, video_url
        FROM video_generations
        ORDER BY created_at DESC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

/// Count all jobs
pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
    let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM video_generations")
        .fetch_one(pool)
        .await?;

    Ok(total)
}

/// Apply a status patch to one row
///
/// The row is only touched while its current status may legally move to
/// `patch.status`. Returns `false` when no row qualified (unknown id,
/// terminal row, or a regressing transition).
pub async fn apply_patch(pool: &PgPool, job_id: Uuid, patch: &JobPatch) -> Result<bool, sqlx::Error> {
    let allowed_from: Vec<String> = patch
        .status
        .predecessors()
        .into_iter()
        .map(|status| status.as_str().to_string())
        .collect();

    let result = sqlx::query(
        r#"
        UPDATE video_generations
        SET status = $2,
            provider_job_id = COALESCE($3, provider_job_id),
            storage_path = COALESCE($4, storage_path),
            video_url = COALESCE($5, video_url),
            error_message = COALESCE($6, error_message),
            completed_at = COALESCE($7, completed_at)
        WHERE id = $1 AND status = ANY($8)
        "#,
    )
    .bind(job_id)
    .bind(patch.status.as_str())
    .bind(&patch.provider_job_id)
    .bind(&patch.storage_path)
    .bind(&patch.video_url)
    .bind(&patch.error_message)
    .bind(patch.completed_at)
    .bind(allowed_from)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete a job by ID once it is terminal
///
/// Returns `false` when the row is unknown or still running, so a pipeline
/// that is about to publish never loses its row.
pub async fn delete_terminal(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let terminal: Vec<String> = JobStatus::ALL
        .into_iter()
        .filter(|status| status.is_terminal())
        .map(|status| status.as_str().to_string())
        .collect();

    let result = sqlx::query("DELETE FROM video_generations WHERE id = $1 AND status = ANY($2)")
        .bind(id)
        .bind(terminal)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct JobRow {
    id: Uuid,
    created_at: chrono::DateTime<chrono::Utc>,
    completed_at: Option<chrono::DateTime<chrono::Utc>>,
    title: String,
    recipe_text: String,
    people: String,
    region: String,
    video_prompt: String,
    provider_job_id: Option<String>,
    status: String,
    error_message: Option<String>,
    storage_path: Option<String>,
    video_url: Option<String>,
}

impl From<JobRow> for VideoJob {
    fn from(row: JobRow) -> Self {
        let status = row.status.parse::<JobStatus>().unwrap_or_else(|e| {
            tracing::warn!("Job {}: {}", row.id, e);
            JobStatus::Failed
        });

        let region = row.region.parse::<Region>().unwrap_or_else(|e| {
            tracing::warn!("Job {}: {}", row.id, e);
            Region::Us
        });

        VideoJob {
            id: row.id,
            created_at: row.created_at,
            completed_at: row.completed_at,
            title: row.title,
            recipe_text: row.recipe_text,
            people: row.people,
            region,
            video_prompt: row.video_prompt,
            provider_job_id: row.provider_job_id,
            status,
            error_message: row.error_message,
            storage_path: row.storage_path,
            video_url: row.video_url,
        }
    }
}
