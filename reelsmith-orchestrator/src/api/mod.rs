//! API Module
//!
//! HTTP API layer for the orchestrator.
//! Each submodule handles endpoints for a specific domain.

pub mod error;
pub mod generation;
pub mod health;
pub mod history;
pub mod prompt;

use axum::{
    Router,
    routing::{get, post},
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;

use crate::repository::{ObjectStorage, PromptCompleter};
use crate::service::pipeline::GenerationPipeline;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub pipeline: Arc<GenerationPipeline>,
    pub completer: Arc<dyn PromptCompleter>,
    pub storage: Arc<dyn ObjectStorage>,
    pub prompt_model: String,
    /// How long a generate request waits before answering with the job id
    pub request_deadline: Duration,
}

/// Create the main API router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Generation endpoints
        .route("/api/video-prompt", post(prompt::compose_prompt))
        .route("/api/generate-video", post(generation::generate_video))
        // History endpoints
        .route("/api/history", get(history::list_history))
        .route(
            "/api/history/{id}",
            get(history::get_entry).delete(history::delete_entry),
        )
        // Add state and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
