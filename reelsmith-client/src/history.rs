//! History endpoints

use crate::ReelsmithClient;
use crate::error::Result;
use reelsmith_core::domain::job::VideoJob;
use reelsmith_core::dto::history::{HistoryPage, HistoryQuery};
use uuid::Uuid;

impl ReelsmithClient {
    /// List past generations, newest first
    ///
    /// # Arguments
    /// * `query` - Page size and one-based page number; the orchestrator
    ///   clamps out-of-range values
    pub async fn list_history(&self, query: &HistoryQuery) -> Result<HistoryPage> {
        let url = format!("{}/api/history", self.base_url);
        let response = self.client.get(&url).query(query).send().await?;

        self.handle_response(response).await
    }

    /// Get one generation by ID
    pub async fn get_job(&self, job_id: Uuid) -> Result<VideoJob> {
        let url = format!("{}/api/history/{}", self.base_url, job_id);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// Delete a generation and its stored video
    pub async fn delete_job(&self, job_id: Uuid) -> Result<()> {
        let url = format!("{}/api/history/{}", self.base_url, job_id);
        let response = self.client.delete(&url).send().await?;

        self.handle_empty_response(response).await
    }
}
