//! Generation provider status snapshots
//!
//! The provider's status response does not place the artifact reference in a
//! fixed field. Depending on the model and API revision it shows up as a
//! nested object URL, an output-array URL, a top-level output URL or a bare
//! URL field. Lookup goes through an ordered list of extractors; the first
//! non-empty result wins.

use serde_json::Value;

const DEFAULT_FAILURE_MESSAGE: &str = "Video generation failed.";

/// Status of a provider job as reported by one poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteStatus {
    Completed,
    Failed,
    /// Any non-terminal provider status (`queued`, `in_progress`, ...)
    InProgress(String),
}

impl RemoteStatus {
    pub fn from_provider(status: &str) -> Self {
        match status {
            "completed" => RemoteStatus::Completed,
            "failed" => RemoteStatus::Failed,
            other => RemoteStatus::InProgress(other.to_string()),
        }
    }
}

/// Result of one status query against a provider job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollSnapshot {
    pub status: RemoteStatus,
    /// Direct artifact URL, when the provider included one
    pub artifact_ref: Option<String>,
    /// Human-readable failure message, when the provider included one
    pub error_message: Option<String>,
}

impl PollSnapshot {
    /// Interpret a raw status response body
    pub fn from_value(body: &Value) -> Self {
        let status = body
            .get("status")
            .and_then(Value::as_str)
            .map(RemoteStatus::from_provider)
            .unwrap_or_else(|| RemoteStatus::InProgress("unknown".to_string()));

        let error_message = body
            .pointer("/error/message")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string);

        Self {
            status,
            artifact_ref: extract_artifact_ref(body),
            error_message,
        }
    }

    /// Failure message to record when the provider reports `failed`
    pub fn failure_message(&self) -> String {
        self.error_message
            .clone()
            .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string())
    }
}

// =============================================================================
// Artifact reference extraction
// =============================================================================

type ArtifactRefExtractor = fn(&Value) -> Option<&str>;

/// Extractors in priority order
const ARTIFACT_REF_EXTRACTORS: &[ArtifactRefExtractor] = &[
    nested_object_url,
    output_array_url,
    top_level_output_url,
    bare_url,
];

/// Find the artifact URL in a status response, if any extractor yields one
pub fn extract_artifact_ref(body: &Value) -> Option<String> {
    ARTIFACT_REF_EXTRACTORS
        .iter()
        .find_map(|extract| extract(body).map(str::trim).filter(|url| !url.is_empty()))
        .map(str::to_string)
}

/// `{"video": {"url": ...}}`
fn nested_object_url(body: &Value) -> Option<&str> {
    body.pointer("/video/url").and_then(Value::as_str)
}

/// `{"output": [{"url": ...}]}`
fn output_array_url(body: &Value) -> Option<&str> {
    body.pointer("/output/0/url").and_then(Value::as_str)
}

/// `{"output_url": ...}`
fn top_level_output_url(body: &Value) -> Option<&str> {
    body.get("output_url").and_then(Value::as_str)
}

/// `{"url": ...}`
fn bare_url(body: &Value) -> Option<&str> {
    body.get("url").and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_object_url_has_priority() {
        let body = json!({
            "status": "completed",
            "video": { "url": "https://cdn/nested.mp4" },
            "output": [{ "url": "https://cdn/array.mp4" }],
            "output_url": "https://cdn/top.mp4",
            "url": "https://cdn/bare.mp4"
        });
        assert_eq!(
            extract_artifact_ref(&body).as_deref(),
            Some("https://cdn/nested.mp4")
        );
    }

    #[test]
    fn test_falls_back_through_priority_order() {
        let body = json!({
            "output": [{ "url": "https://cdn/array.mp4" }],
            "output_url": "https://cdn/top.mp4",
            "url": "https://cdn/bare.mp4"
        });
        assert_eq!(
            extract_artifact_ref(&body).as_deref(),
            Some("https://cdn/array.mp4")
        );

        let body = json!({ "output_url": "https://cdn/top.mp4", "url": "https://cdn/bare.mp4" });
        assert_eq!(
            extract_artifact_ref(&body).as_deref(),
            Some("https://cdn/top.mp4")
        );

        let body = json!({ "url": "https://cdn/bare.mp4" });
        assert_eq!(
            extract_artifact_ref(&body).as_deref(),
            Some("https://cdn/bare.mp4")
        );
    }

    #[test]
    fn test_empty_values_do_not_win() {
        let body = json!({
            "video": { "url": "" },
            "output": [],
            "url": "https://cdn/bare.mp4"
        });
        assert_eq!(
            extract_artifact_ref(&body).as_deref(),
            Some("https://cdn/bare.mp4")
        );
    }

    #[test]
    fn test_completed_without_reference_is_tolerated() {
        let snapshot = PollSnapshot::from_value(&json!({ "id": "video_1", "status": "completed" }));
        assert_eq!(snapshot.status, RemoteStatus::Completed);
        assert_eq!(snapshot.artifact_ref, None);
    }

    #[test]
    fn test_failed_snapshot_message() {
        let snapshot = PollSnapshot::from_value(&json!({
            "status": "failed",
            "error": { "message": "moderation_blocked" }
        }));
        assert_eq!(snapshot.status, RemoteStatus::Failed);
        assert_eq!(snapshot.failure_message(), "moderation_blocked");

        let snapshot = PollSnapshot::from_value(&json!({ "status": "failed" }));
        assert_eq!(snapshot.failure_message(), DEFAULT_FAILURE_MESSAGE);
    }

    #[test]
    fn test_in_progress_statuses() {
        let snapshot = PollSnapshot::from_value(&json!({ "status": "in_progress", "progress": 40 }));
        assert_eq!(
            snapshot.status,
            RemoteStatus::InProgress("in_progress".to_string())
        );

        let snapshot = PollSnapshot::from_value(&json!({}));
        assert!(matches!(snapshot.status, RemoteStatus::InProgress(_)));
    }
}
