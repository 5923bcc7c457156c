//! Video generation DTOs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::job::JobStatus;
use crate::domain::region::Region;
use crate::dto::job::NewJob;
use crate::dto::lenient;

pub const DEFAULT_TITLE: &str = "Untitled Recipe";

/// Request to generate a video
///
/// `size` and `seconds` are optional; values outside the provider allow-lists,
/// including values of the wrong type, are replaced by the configured defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateVideo {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub recipe_text: String,
    #[serde(default)]
    pub people: String,
    pub region: Option<Region>,
    #[serde(default)]
    pub video_prompt: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub size: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub seconds: Option<u32>,
}

impl GenerateVideo {
    /// Check required fields and build the initial ledger row
    pub fn to_new_job(&self) -> Result<NewJob, String> {
        let recipe_text = self.recipe_text.trim();
        let people = self.people.trim();
        let video_prompt = self.video_prompt.trim();

        let region = match self.region {
            Some(region)
                if !recipe_text.is_empty() && !people.is_empty() && !video_prompt.is_empty() =>
            {
                region
            }
            _ => {
                return Err("recipeText, people, region, and videoPrompt are required".to_string());
            }
        };

        let title = self
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_TITLE);

        Ok(NewJob {
            title: title.to_string(),
            recipe_text: recipe_text.to_string(),
            people: people.to_string(),
            region,
            video_prompt: video_prompt.to_string(),
        })
    }
}

/// Terminal success payload of a generation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationSucceeded {
    pub db_id: Uuid,
    pub status: JobStatus,
    pub video_url: String,
    pub provider_job_id: String,
    pub storage_path: String,
}

/// Terminal failure payload of a generation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationFailed {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<Uuid>,
}
