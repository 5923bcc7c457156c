//! Render parameters
//!
//! Size and duration values accepted by the video provider. Requests carrying
//! values outside these allow-lists fall back to the configured defaults
//! instead of being rejected.

use serde::{Deserialize, Serialize};

// =============================================================================
// Allow-lists
// =============================================================================

/// Frame sizes (`WIDTHxHEIGHT`) the provider accepts.
pub const ALLOWED_SIZES: &[&str] = &["720x1280", "1280x720", "1024x1792", "1792x1024"];

/// Clip durations in seconds the provider accepts.
pub const ALLOWED_SECONDS: &[u32] = &[4, 8, 12];

pub const DEFAULT_SIZE: &str = "1280x720";
pub const DEFAULT_SECONDS: u32 = 12;

pub fn is_allowed_size(size: &str) -> bool {
    ALLOWED_SIZES.contains(&size)
}

pub fn is_allowed_seconds(seconds: u32) -> bool {
    ALLOWED_SECONDS.contains(&seconds)
}

// =============================================================================
// Resolved parameters
// =============================================================================

/// Size and duration of one generation, always drawn from the allow-lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderParams {
    pub size: String,
    pub seconds: u32,
}

impl RenderParams {
    /// Resolve requested values against the allow-lists.
    ///
    /// Missing or unknown values are replaced by the matching field of
    /// `defaults`; this never fails.
    pub fn resolve(size: Option<&str>, seconds: Option<u32>, defaults: &RenderParams) -> Self {
        let size = size
            .map(str::trim)
            .filter(|s| is_allowed_size(s))
            .map(str::to_string)
            .unwrap_or_else(|| defaults.size.clone());

        let seconds = seconds
            .filter(|s| is_allowed_seconds(*s))
            .unwrap_or(defaults.seconds);

        Self { size, seconds }
    }
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE.to_string(),
            seconds: DEFAULT_SECONDS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> RenderParams {
        RenderParams {
            size: "720x1280".to_string(),
            seconds: 8,
        }
    }

    #[test]
    fn test_allowed_values_are_kept() {
        let params = RenderParams::resolve(Some("1792x1024"), Some(4), &defaults());
        assert_eq!(params.size, "1792x1024");
        assert_eq!(params.seconds, 4);
    }

    #[test]
    fn test_invalid_values_fall_back_to_defaults() {
        let params = RenderParams::resolve(Some("640x480"), Some(30), &defaults());
        assert_eq!(params, defaults());
    }

    #[test]
    fn test_missing_values_fall_back_to_defaults() {
        let params = RenderParams::resolve(None, None, &defaults());
        assert_eq!(params, defaults());
    }

    #[test]
    fn test_each_field_falls_back_independently() {
        let params = RenderParams::resolve(Some("1280x720"), Some(7), &defaults());
        assert_eq!(params.size, "1280x720");
        assert_eq!(params.seconds, 8);
    }

    #[test]
    fn test_builtin_defaults_are_allowed() {
        let params = RenderParams::default();
        assert!(is_allowed_size(&params.size));
        assert!(is_allowed_seconds(params.seconds));
    }
}
