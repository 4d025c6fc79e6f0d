//! Veo video generation client.
//!
//! Starts an asynchronous generation job and exposes the poll/download
//! primitives the engine's tracker drives. A job must be polled until
//! `done`; on success it yields a URI to the MP4 bytes, which are fetched
//! with the API key appended as a query parameter.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use tvision_models::TrendingProduct;

use crate::config::GenAiConfig;
use crate::error::{GenAiError, GenAiResult};

// One vertical 720p video per job.
const VIDEO_COUNT: u8 = 1;
const RESOLUTION: &str = "720p";
const ASPECT_RATIO: &str = "9:16";

/// Synthesize the ad prompt for a product from its name and visual brief.
pub fn ad_prompt(product: &TrendingProduct) -> String {
    format!(
        "A professional, high-energy TikTok video ad for {}. {}. Vibrant colors, cinematic lighting, 4k, trending style.",
        product.name, product.visual_prompt
    )
}

/// Video generation request.
#[derive(Debug, Serialize)]
struct GenerateVideosRequest {
    instances: Vec<Instance>,
    parameters: VideoParameters,
}

#[derive(Debug, Serialize)]
struct Instance {
    prompt: String,
}

#[derive(Debug, Serialize)]
struct VideoParameters {
    #[serde(rename = "sampleCount")]
    sample_count: u8,
    resolution: String,
    #[serde(rename = "aspectRatio")]
    aspect_ratio: String,
}

/// A long-running video generation operation.
///
/// Returned by job creation and by every poll; `done` flips once the
/// remote job reaches a terminal state.
#[derive(Debug, Clone, Deserialize)]
pub struct VideoOperation {
    /// Operation resource name, referenced by every poll
    pub name: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub response: Option<OperationResponse>,
    #[serde(default)]
    pub error: Option<OperationError>,
}

/// Terminal error payload of a failed operation.
#[derive(Debug, Clone, Deserialize)]
pub struct OperationError {
    #[serde(default)]
    pub code: Option<i64>,
    pub message: String,
}

/// Result payload of a completed operation.
///
/// The service has produced two shapes for this payload; both are
/// accepted and drained by [`VideoOperation::video_uri`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationResponse {
    #[serde(default)]
    generated_videos: Option<Vec<GeneratedVideo>>,
    #[serde(default)]
    generate_video_response: Option<GenerateVideoResponse>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateVideoResponse {
    #[serde(default)]
    generated_samples: Vec<GeneratedVideo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct GeneratedVideo {
    #[serde(default)]
    video: Option<VideoRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct VideoRef {
    #[serde(default)]
    uri: Option<String>,
}

impl VideoOperation {
    /// Content URI of the first generated video, if the result carries one.
    pub fn video_uri(&self) -> Option<&str> {
        let response = self.response.as_ref()?;

        if let Some(uri) = response
            .generated_videos
            .as_deref()
            .and_then(first_video_uri)
        {
            return Some(uri);
        }

        response
            .generate_video_response
            .as_ref()
            .and_then(|r| first_video_uri(&r.generated_samples))
    }
}

fn first_video_uri(videos: &[GeneratedVideo]) -> Option<&str> {
    videos
        .first()
        .and_then(|v| v.video.as_ref())
        .and_then(|v| v.uri.as_deref())
}

/// Client for the Veo video generation service.
pub struct VideoClient {
    http: Client,
    config: GenAiConfig,
}

impl VideoClient {
    /// Create a new video client.
    pub fn new(config: GenAiConfig) -> GenAiResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(GenAiError::Network)?;

        Ok(Self { http, config })
    }

    /// Start an asynchronous generation job for `prompt`.
    pub async fn start_generation(&self, prompt: &str) -> GenAiResult<VideoOperation> {
        let url = format!(
            "{}/models/{}:predictLongRunning",
            self.config.base_url, self.config.video_model
        );

        let request = GenerateVideosRequest {
            instances: vec![Instance {
                prompt: prompt.to_string(),
            }],
            parameters: VideoParameters {
                sample_count: VIDEO_COUNT,
                resolution: RESOLUTION.to_string(),
                aspect_ratio: ASPECT_RATIO.to_string(),
            },
        };

        debug!("Starting video generation via {}", url);

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.config.api_key.as_str())])
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GenAiError::RequestFailed(format!(
                "Veo API returned {}: {}",
                status, body
            )));
        }

        check_operation(response.json().await?)
    }

    /// Poll a previously created operation once.
    pub async fn poll_operation(&self, operation: &VideoOperation) -> GenAiResult<VideoOperation> {
        let url = format!("{}/{}", self.config.base_url, operation.name);

        let response = self
            .http
            .get(&url)
            .query(&[("key", self.config.api_key.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GenAiError::RequestFailed(format!(
                "Veo operation poll returned {}: {}",
                status, body
            )));
        }

        check_operation(response.json().await?)
    }

    /// Fetch the finished video bytes from the returned content URI.
    ///
    /// The service requires the API key appended to the URI.
    pub async fn fetch_video(&self, uri: &str) -> GenAiResult<Vec<u8>> {
        let mut url = Url::parse(uri)
            .map_err(|e| GenAiError::invalid_response(format!("bad video URI: {e}")))?;
        url.query_pairs_mut().append_pair("key", &self.config.api_key);

        let response = self.http.get(url).send().await?;

        if !response.status().is_success() {
            return Err(GenAiError::DownloadFailed(response.status().to_string()));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

/// An operation carrying an error payload is a failure, whatever `done` says.
fn check_operation(operation: VideoOperation) -> GenAiResult<VideoOperation> {
    if let Some(err) = &operation.error {
        let message = match err.code {
            Some(code) => format!("{}: {}", code, err.message),
            None => err.message.clone(),
        };
        return Err(GenAiError::RequestFailed(message));
    }
    Ok(operation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tvision_models::ProductId;

    fn sample_product() -> TrendingProduct {
        TrendingProduct {
            id: ProductId::from_index(0),
            name: "Mini Projector".to_string(),
            description: "A pocket cinema.".to_string(),
            trend_reason: "Dorm-room makeovers.".to_string(),
            ad_hook: "Turn any wall into a theater.".to_string(),
            visual_prompt: "A dark bedroom lit by a projected movie".to_string(),
        }
    }

    #[test]
    fn test_ad_prompt_combines_name_and_visual_prompt() {
        let prompt = ad_prompt(&sample_product());
        assert!(prompt.contains("TikTok video ad for Mini Projector"));
        assert!(prompt.contains("A dark bedroom lit by a projected movie"));
        assert!(prompt.ends_with("trending style."));
    }

    #[test]
    fn test_video_uri_from_generated_videos_shape() {
        let op: VideoOperation = serde_json::from_value(json!({
            "name": "models/veo/operations/op-1",
            "done": true,
            "response": {
                "generatedVideos": [{ "video": { "uri": "https://files/video-1" } }]
            }
        }))
        .unwrap();

        assert_eq!(op.video_uri(), Some("https://files/video-1"));
    }

    #[test]
    fn test_video_uri_from_generated_samples_shape() {
        let op: VideoOperation = serde_json::from_value(json!({
            "name": "models/veo/operations/op-2",
            "done": true,
            "response": {
                "generateVideoResponse": {
                    "generatedSamples": [{ "video": { "uri": "https://files/video-2" } }]
                }
            }
        }))
        .unwrap();

        assert_eq!(op.video_uri(), Some("https://files/video-2"));
    }

    #[test]
    fn test_video_uri_absent() {
        let op: VideoOperation = serde_json::from_value(json!({
            "name": "models/veo/operations/op-3",
            "done": true,
            "response": {}
        }))
        .unwrap();

        assert_eq!(op.video_uri(), None);
    }

    #[test]
    fn test_operation_error_payload_is_a_failure() {
        let op: VideoOperation = serde_json::from_value(json!({
            "name": "models/veo/operations/op-4",
            "done": true,
            "error": { "code": 403, "message": "The caller does not have permission" }
        }))
        .unwrap();

        let err = check_operation(op).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("403"));
        assert!(message.contains("does not have permission"));
    }
}
