//! Prompt API Handler

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use reelsmith_core::dto::prompt::{ComposePrompt, ComposedPrompt};

use crate::api::AppState;
use crate::api::error::{ApiError, ApiResult};
use crate::service::prompt_service::{self, PromptError};

/// POST /api/video-prompt
/// Compose a video prompt from a recipe
pub async fn compose_prompt(
    State(state): State<AppState>,
    payload: Result<Json<ComposePrompt>, JsonRejection>,
) -> ApiResult<Json<ComposedPrompt>> {
    let Json(req) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    tracing::info!("Composing video prompt with {}", state.prompt_model);

    let composed = prompt_service::compose(&*state.completer, &state.prompt_model, req)
        .await
        .map_err(|e| match e {
            PromptError::InvalidRequest => ApiError::BadRequest(e.to_string()),
            PromptError::Provider(_) | PromptError::Empty => ApiError::InternalError(e.to_string()),
        })?;

    Ok(Json(composed))
}
