//! Object storage repository
//!
//! Handles durable storage of generated videos:
//! - Uploading (with overwrite) under a caller-chosen path
//! - Resolving the public URL of a stored object
//! - Removing objects when a history entry is deleted

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;

/// Repository trait for object storage
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Stores `bytes` at `path`, replacing any existing object
    ///
    /// # Arguments
    /// * `path` - Object path inside the bucket
    /// * `bytes` - Object content
    /// * `content_type` - MIME type recorded with the object
    async fn put(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<()>;

    /// Resolves the publicly addressable URL of `path`
    fn public_url(&self, path: &str) -> Result<String>;

    /// Removes the object at `path`
    async fn remove(&self, path: &str) -> Result<()>;
}

/// HTTP implementation of ObjectStorage for the Supabase storage API
#[derive(Debug, Clone)]
pub struct RestObjectStorage {
    client: Client,
    base_url: String,
    service_key: String,
    bucket: String,
}

impl RestObjectStorage {
    /// Creates a new storage repository
    ///
    /// # Arguments
    /// * `base_url` - Project root (e.g., "https://xyz.supabase.co")
    /// * `service_key` - Service role key
    /// * `bucket` - Bucket that receives the objects
    pub fn new(
        base_url: impl Into<String>,
        service_key: impl Into<String>,
        bucket: impl Into<String>,
    ) -> Self {
        Self::with_client(Client::new(), base_url, service_key, bucket)
    }

    /// Creates a storage repository reusing a configured reqwest Client
    pub fn with_client(
        client: Client,
        base_url: impl Into<String>,
        service_key: impl Into<String>,
        bucket: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key: service_key.into(),
            bucket: bucket.into(),
        }
    }

    fn object_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url, self.bucket, path
        )
    }
}

fn validate_path(path: &str) -> Result<()> {
    if path.is_empty() || path.starts_with('/') || path.split('/').any(|part| part == "..") {
        anyhow::bail!("Invalid object path '{}'", path);
    }
    Ok(())
}

#[async_trait]
impl ObjectStorage for RestObjectStorage {
    async fn put(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<()> {
        validate_path(path)?;

        let response = self
            .client
            .post(self.object_url(path))
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
            .header("x-upsert", "true")
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await
            .context("Failed to upload object")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Failed to upload object: {} - {}", status, body);
        }

        Ok(())
    }

    fn public_url(&self, path: &str) -> Result<String> {
        validate_path(path)?;

        Ok(format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.bucket, path
        ))
    }

    async fn remove(&self, path: &str) -> Result<()> {
        validate_path(path)?;

        let url = format!("{}/storage/v1/object/{}", self.base_url, self.bucket);

        let response = self
            .client
            .delete(&url)
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
            .json(&serde_json::json!({ "prefixes": [path] }))
            .send()
            .await
            .context("Failed to remove object")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Failed to remove object: {} - {}", status, body);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> RestObjectStorage {
        RestObjectStorage::new("https://xyz.supabase.co/", "service-key", "videos")
    }

    #[test]
    fn test_public_url() {
        let url = storage().public_url("job-1/video_1.mp4").unwrap();
        assert_eq!(
            url,
            "https://xyz.supabase.co/storage/v1/object/public/videos/job-1/video_1.mp4"
        );
    }

    #[test]
    fn test_object_url() {
        assert_eq!(
            storage().object_url("job-1/video_1.mp4"),
            "https://xyz.supabase.co/storage/v1/object/videos/job-1/video_1.mp4"
        );
    }

    #[test]
    fn test_invalid_paths_are_rejected() {
        assert!(storage().public_url("").is_err());
        assert!(storage().public_url("/abs/path.mp4").is_err());
        assert!(storage().public_url("job-1/../other.mp4").is_err());
    }
}
