use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod api;
pub mod config;
pub mod db;
pub mod repository;
pub mod service;

use config::Config;
use repository::{HttpVideoProvider, PgJobLedger, RestObjectStorage};
use service::pipeline::GenerationPipeline;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; the environment may be set directly
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reelsmith_orchestrator=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Reelsmith Orchestrator...");

    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    tracing::info!(
        "Provider {} (video model {}, prompt model {}), bucket '{}'",
        config.provider_base_url,
        config.video_model,
        config.prompt_model,
        config.storage_bucket
    );

    tracing::info!("Connecting to database...");

    // Create database connection pool
    let pool = db::create_pool(&config.database_url)
        .await
        .context("Failed to create database pool")?;

    tracing::info!("Database connection pool created");

    // Run migrations
    db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    // One HTTP client shared by the provider and storage repositories
    let http = reqwest::Client::builder()
        .timeout(config.http_timeout)
        .build()
        .context("Failed to build HTTP client")?;

    let provider = Arc::new(HttpVideoProvider::with_client(
        http.clone(),
        &config.provider_base_url,
        &config.provider_api_key,
    ));
    let storage = Arc::new(RestObjectStorage::with_client(
        http,
        &config.storage_url,
        &config.storage_service_key,
        &config.storage_bucket,
    ));
    let ledger = Arc::new(PgJobLedger::new(pool.clone()));

    let pipeline = GenerationPipeline::new(
        ledger,
        provider.clone(),
        storage.clone(),
        config.pipeline_settings(),
    );

    // Build router with all API endpoints
    let app = api::create_router(api::AppState {
        pool,
        pipeline: Arc::new(pipeline),
        completer: provider,
        storage,
        prompt_model: config.prompt_model.clone(),
        request_deadline: config.request_deadline,
    });

    tracing::info!("Listening on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;

    axum::serve(listener, app)
        .await
        .context("Failed to start server")?;

    Ok(())
}
