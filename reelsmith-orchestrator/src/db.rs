use sqlx::{PgPool, postgres::PgPoolOptions};
use std::time::Duration;

pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    // Create status ledger table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS video_generations (
            id UUID PRIMARY KEY,
            created_at TIMESTAMPTZ NOT NULL,
            completed_at TIMESTAMPTZ,
            title TEXT NOT NULL,
            recipe_text TEXT NOT NULL,
            people TEXT NOT NULL,
            region VARCHAR(16) NOT NULL,
            video_prompt TEXT NOT NULL,
            provider_job_id VARCHAR(255) UNIQUE,
            status VARCHAR(32) NOT NULL,
            error_message TEXT,
            storage_path TEXT,
            video_url TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes for history listing and reconciliation queries
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_video_generations_created_at ON video_generations(created_at DESC)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_video_generations_status ON video_generations(status)",
    )
    .execute(pool)
    .await?;

    tracing::info!("Database migrations completed successfully");
    Ok(())
}
