//! GenAI client configuration.

use std::time::Duration;

use crate::error::{GenAiError, GenAiResult};

/// Default endpoint for the Google generative APIs.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Text/search model used for trend discovery.
pub const DEFAULT_TEXT_MODEL: &str = "gemini-3-flash-preview";

/// Video model used for ad generation.
pub const DEFAULT_VIDEO_MODEL: &str = "veo-3.1-fast-generate-preview";

/// Configuration shared by the trend and video clients.
#[derive(Debug, Clone)]
pub struct GenAiConfig {
    /// API key appended to every request
    pub api_key: String,
    /// Base URL of the generative API (overridable for tests)
    pub base_url: String,
    /// Model used for trend discovery
    pub text_model: String,
    /// Model used for video generation
    pub video_model: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl GenAiConfig {
    /// Create a config with default endpoints for the given key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            video_model: DEFAULT_VIDEO_MODEL.to_string(),
            timeout: Duration::from_secs(120),
        }
    }

    /// Create config from environment variables.
    ///
    /// `GEMINI_API_KEY` is required; everything else falls back to the
    /// defaults above.
    pub fn from_env() -> GenAiResult<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| GenAiError::config("GEMINI_API_KEY not set"))?;

        Ok(Self {
            api_key,
            base_url: std::env::var("GENAI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            text_model: std::env::var("GENAI_TEXT_MODEL")
                .unwrap_or_else(|_| DEFAULT_TEXT_MODEL.to_string()),
            video_model: std::env::var("GENAI_VIDEO_MODEL")
                .unwrap_or_else(|_| DEFAULT_VIDEO_MODEL.to_string()),
            timeout: Duration::from_secs(
                std::env::var("GENAI_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(120),
            ),
        })
    }

    /// Point the config at a different endpoint (wiremock in tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}
