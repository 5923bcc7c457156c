//! Status ledger
//!
//! Write side of the job record used by the generation pipeline.
//! Reads belong to the history service and go through `job_repository`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reelsmith_core::dto::job::{JobPatch, NewJob};
use sqlx::PgPool;
use uuid::Uuid;

use crate::repository::job_repository;

/// Repository trait for the durable record of one job's lifecycle
#[async_trait]
pub trait JobLedger: Send + Sync {
    /// Creates a queued row and returns its locally assigned id
    ///
    /// # Arguments
    /// * `job` - Initial fields of the row
    async fn insert(&self, job: NewJob) -> Result<Uuid>;

    /// Moves a row to a new status, writing the patch's optional fields
    ///
    /// Fails when the row does not exist or its current status cannot move
    /// to `patch.status`.
    ///
    /// # Arguments
    /// * `job_id` - The row to update
    /// * `patch` - Target status plus fields to set
    async fn update(&self, job_id: Uuid, patch: JobPatch) -> Result<()>;
}

/// Postgres implementation of JobLedger
///
/// Each call is a single row-scoped statement; concurrent jobs never
/// contend beyond their own row.
#[derive(Clone)]
pub struct PgJobLedger {
    pool: PgPool,
}

impl PgJobLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobLedger for PgJobLedger {
    async fn insert(&self, job: NewJob) -> Result<Uuid> {
        let job = job_repository::create(&self.pool, job)
            .await
            .context("Failed to insert job row")?;

        Ok(job.id)
    }

    async fn update(&self, job_id: Uuid, patch: JobPatch) -> Result<()> {
        let status = patch.status;
        let applied = job_repository::apply_patch(&self.pool, job_id, &patch)
            .await
            .with_context(|| format!("Failed to update job {}", job_id))?;

        if !applied {
            anyhow::bail!(
                "Job {} does not exist or cannot move to '{}'",
                job_id,
                status
            );
        }

        Ok(())
    }
}
