//! Prompt composition DTOs

use serde::{Deserialize, Serialize};

use crate::domain::region::Region;

/// Request to compose a video prompt from a recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposePrompt {
    #[serde(default)]
    pub recipe_text: String,
    #[serde(default)]
    pub people: String,
    pub region: Option<Region>,
}

/// Composed video prompt
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposedPrompt {
    pub video_prompt: String,
}
