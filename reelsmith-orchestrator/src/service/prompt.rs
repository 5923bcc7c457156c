//! Prompt Service
//!
//! Turns a recipe into a video directive with one chat completion.

use reelsmith_core::domain::region::Region;
use reelsmith_core::dto::prompt::{ComposePrompt, ComposedPrompt};
use thiserror::Error;

use crate::repository::{ChatMessage, ChatRequest, PromptCompleter, ProviderError};

const TEMPERATURE: f32 = 0.7;

/// Service error type
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("recipeText, people, and region are required")]
    InvalidRequest,

    #[error("{}", .0.detail())]
    Provider(#[from] ProviderError),

    #[error("Failed to generate video prompt")]
    Empty,
}

/// Pacing and look that suit each market
pub fn regional_flavor(region: Region) -> &'static str {
    match region {
        Region::Us => "Use slightly faster pacing and bolder on-screen text.",
        Region::Europe => "Use balanced pacing and a subtle, warm aesthetic.",
        Region::Asia => "Use slightly faster cuts and dynamic plating shots.",
    }
}

pub fn system_prompt(region: Region) -> String {
    format!(
        "You are a precise video director crafting a cooking video prompt for a HelloFresh-style brand.\n\
         - Initially show a HelloFresh-like green lemon logo.\n\
         - Then show all ingredients laid out on one table.\n\
         - Then show the cooking steps clearly with minimal cuts.\n\
         - At the end show happy, fulfilled people enjoying the meal.\n\
         - Match the exact ingredients and steps from the provided recipe.\n\
         - Region: {}. {}\n\
         - Keep tone upbeat, vivid, and food-forward. Output only the video prompt text.",
        region,
        regional_flavor(region)
    )
}

/// Build the chat request for `req`
///
/// Fails when recipe text or people are blank or the region is missing.
pub fn build_request(model: &str, req: &ComposePrompt) -> Result<ChatRequest, PromptError> {
    let recipe_text = req.recipe_text.trim();
    let people = req.people.trim();

    let region = match req.region {
        Some(region) if !recipe_text.is_empty() && !people.is_empty() => region,
        _ => return Err(PromptError::InvalidRequest),
    };

    Ok(ChatRequest {
        model: model.to_string(),
        temperature: TEMPERATURE,
        messages: vec![
            ChatMessage::system(system_prompt(region)),
            ChatMessage::user(format!(
                "Recipe:\n{}\n\nPeople to show: {}\nRegion: {}",
                recipe_text, people, region
            )),
        ],
    })
}

/// Compose a video prompt for `req`
pub async fn compose(
    completer: &dyn PromptCompleter,
    model: &str,
    req: ComposePrompt,
) -> Result<ComposedPrompt, PromptError> {
    let request = build_request(model, &req)?;

    let content = completer.complete(&request).await.map_err(|err| {
        tracing::error!(
            "Prompt completion failed (status {:?}): {}",
            err.status(),
            err.detail()
        );
        PromptError::from(err)
    })?;

    let video_prompt = content
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .ok_or(PromptError::Empty)?;

    tracing::info!("Composed video prompt ({} chars)", video_prompt.len());

    Ok(ComposedPrompt {
        video_prompt: video_prompt.to_string(),
    })
}
