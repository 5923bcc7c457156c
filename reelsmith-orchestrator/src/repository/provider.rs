//! Generation provider repository
//!
//! Handles communication with the remote generation provider:
//! - Creating video jobs
//! - Querying job status
//! - Downloading finished videos (content endpoint or direct URL)
//! - Chat completions used for prompt composition

use async_trait::async_trait;
use reelsmith_core::domain::provider::PollSnapshot;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned by the generation provider
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The request never produced a response (network, DNS, TLS, timeout)
    #[error("HTTP request failed: {0}")]
    Transport(String),

    /// Provider returned a non-2xx status code
    #[error("Provider API error (status {status}): {body}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// Response body was not what the provider contract promises
    #[error("Failed to parse provider response: {0}")]
    Parse(String),
}

impl ProviderError {
    /// Create an API error from status code and body
    pub fn api_error(status: u16, body: impl Into<String>) -> Self {
        Self::Api {
            status,
            body: body.into(),
        }
    }

    /// Text recorded on the ledger: the raw body for API errors
    pub fn detail(&self) -> String {
        match self {
            Self::Api { body, .. } => body.clone(),
            other => other.to_string(),
        }
    }

    /// HTTP status, when the provider answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the failure may clear up on its own, e.g. an artifact that
    /// is not downloadable yet
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Api { status, .. } => matches!(status, 404 | 409 | 425 | 429 | 500..=599),
            Self::Parse(_) => false,
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

// =============================================================================
// Traits
// =============================================================================

/// Repository trait for video generation with the provider
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Submits a generation job
    ///
    /// Returns the provider's response; a successful response without a job
    /// handle is passed through for the caller to reject.
    async fn create(&self, request: &VideoRequest) -> Result<CreatedVideo, ProviderError>;

    /// Queries the current status of a job
    async fn status(&self, handle: &str) -> Result<PollSnapshot, ProviderError>;

    /// Downloads the finished video through the job's canonical content endpoint
    async fn content(&self, handle: &str) -> Result<Vec<u8>, ProviderError>;

    /// Downloads the finished video from a direct URL reported by a poll
    async fn download(&self, url: &str) -> Result<Vec<u8>, ProviderError>;
}

/// Repository trait for chat completions
#[async_trait]
pub trait PromptCompleter: Send + Sync {
    /// Returns the content of the first choice, if the provider produced one
    async fn complete(&self, request: &ChatRequest) -> Result<Option<String>, ProviderError>;
}

// =============================================================================
// Request/Response Types
// =============================================================================

/// Video creation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoRequest {
    pub model: String,
    pub prompt: String,
    pub size: String,
    /// Sent as an enumerated string ("4", "8", "12")
    pub seconds: String,
}

/// Video creation response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatedVideo {
    #[serde(rename = "id")]
    pub handle: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub temperature: f32,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

// =============================================================================
// HTTP implementation
// =============================================================================

/// HTTP implementation of GenerationProvider and PromptCompleter
/// for an OpenAI-compatible API
#[derive(Debug, Clone)]
pub struct HttpVideoProvider {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HttpVideoProvider {
    /// Creates a new HTTP provider
    ///
    /// # Arguments
    /// * `base_url` - API root (e.g., "https://api.openai.com/v1")
    /// * `api_key` - Bearer token
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url, api_key)
    }

    /// Creates a provider reusing a configured reqwest Client
    /// (timeouts, proxies, connection pooling)
    pub fn with_client(
        client: Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Turn a non-2xx response into an API error carrying the raw body
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ProviderError> {
        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ProviderError::api_error(status.as_u16(), body));
        }

        Ok(response)
    }

    async fn read_bytes(response: reqwest::Response) -> Result<Vec<u8>, ProviderError> {
        let response = Self::check(response).await?;
        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl GenerationProvider for HttpVideoProvider {
    async fn create(&self, request: &VideoRequest) -> Result<CreatedVideo, ProviderError> {
        let url = format!("{}/videos", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        Self::check(response)
            .await?
            .json::<CreatedVideo>()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))
    }

    async fn status(&self, handle: &str) -> Result<PollSnapshot, ProviderError> {
        let url = format!("{}/videos/{}", self.base_url, handle);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        let body = Self::check(response)
            .await?
            .json::<serde_json::Value>()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        Ok(PollSnapshot::from_value(&body))
    }

    async fn content(&self, handle: &str) -> Result<Vec<u8>, ProviderError> {
        let url = format!("{}/videos/{}/content", self.base_url, handle);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        Self::read_bytes(response).await
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, ProviderError> {
        // Direct URLs are pre-signed; no credentials are attached
        let response = self.client.get(url).send().await?;

        Self::read_bytes(response).await
    }
}

#[async_trait]
impl PromptCompleter for HttpVideoProvider {
    async fn complete(&self, request: &ChatRequest) -> Result<Option<String>, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let completion = Self::check(response)
            .await?
            .json::<ChatResponse>()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        Ok(completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content))
    }
}
