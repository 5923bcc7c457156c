//! Video generation endpoints

use crate::ReelsmithClient;
use crate::error::Result;
use reelsmith_core::dto::generation::{GenerateVideo, GenerationSucceeded};
use reelsmith_core::dto::prompt::{ComposePrompt, ComposedPrompt};

impl ReelsmithClient {
    /// Compose a video prompt from a recipe
    ///
    /// # Arguments
    /// * `req` - Recipe text, people and region
    ///
    /// # Returns
    /// The composed prompt, ready to pass to `generate_video`
    pub async fn compose_prompt(&self, req: ComposePrompt) -> Result<ComposedPrompt> {
        let url = format!("{}/api/video-prompt", self.base_url);
        let response = self.client.post(&url).json(&req).send().await?;

        self.handle_response(response).await
    }

    /// Generate a video and wait for it to be stored
    ///
    /// Blocks for the whole generation. When the orchestrator answers before
    /// the job is terminal, the error carries the job id
    /// (see `ClientError::job_id`) for follow-up with `get_job`.
    ///
    /// # Example
    /// ```no_run
    /// # use reelsmith_client::ReelsmithClient;
    /// # use reelsmith_core::domain::region::Region;
    /// # use reelsmith_core::dto::generation::GenerateVideo;
    /// # async fn example() -> anyhow::Result<()> {
    /// let client = ReelsmithClient::new("http://localhost:8080");
    /// let video = client.generate_video(GenerateVideo {
    ///     recipe_text: "Grill corn, brush with lime butter.".to_string(),
    ///     people: "friends at a barbecue".to_string(),
    ///     region: Some(Region::Us),
    ///     video_prompt: "Sunny backyard, corn on the grill".to_string(),
    ///     ..Default::default()
    /// }).await?;
    /// println!("{}", video.video_url);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn generate_video(&self, req: GenerateVideo) -> Result<GenerationSucceeded> {
        let url = format!("{}/api/generate-video", self.base_url);
        let response = self.client.post(&url).json(&req).send().await?;

        self.handle_response(response).await
    }
}
