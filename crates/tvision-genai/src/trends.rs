//! Trend discovery client.
//!
//! Asks Gemini, grounded with Google Search, for the currently trending
//! TikTok products, constrained to a structured JSON response shape.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

use tvision_models::{ProductId, TrendingProduct};

use crate::config::GenAiConfig;
use crate::error::{GenAiError, GenAiResult};

/// Fixed discovery query. Requests exactly eight products with the five
/// fields the board needs.
const TRENDS_PROMPT: &str = "\
Search for the top 8 currently trending products on TikTok (Viral in the last 30 days).
Return a structured JSON list of these 8 products.
For each product, include:
1. name: The product name.
2. description: A 1-sentence description.
3. trendReason: Why it's viral right now.
4. adHook: A catchy first-line hook for a 60-second video ad.
5. visualPrompt: A detailed visual description of a high-energy, vertical video ad for this product (9:16 aspect ratio).";

/// Gemini API request.
#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    tools: Vec<Tool>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct Tool {
    #[serde(rename = "googleSearch")]
    google_search: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
    #[serde(rename = "responseSchema")]
    response_schema: serde_json::Value,
}

/// Gemini API response.
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: ResponseContent,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: String,
}

/// One product record as returned by the model, before id assignment.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DiscoveredProduct {
    name: String,
    description: String,
    trend_reason: String,
    ad_hook: String,
    visual_prompt: String,
}

/// Schema constraining the discovery payload to an array of objects with
/// all five string fields required.
fn response_schema() -> serde_json::Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "name": { "type": "STRING" },
                "description": { "type": "STRING" },
                "trendReason": { "type": "STRING" },
                "adHook": { "type": "STRING" },
                "visualPrompt": { "type": "STRING" },
            },
            "required": ["name", "description", "trendReason", "adHook", "visualPrompt"]
        }
    })
}

/// Strip a Markdown code fence if the model wrapped its JSON in one.
fn extract_json(text: &str) -> &str {
    let text = text.trim();
    let text = text.strip_prefix("```json").unwrap_or(text);
    let text = text.strip_suffix("```").unwrap_or(text);
    text.trim()
}

/// Client for trend discovery.
pub struct TrendsClient {
    http: Client,
    config: GenAiConfig,
}

impl TrendsClient {
    /// Create a new trends client.
    pub fn new(config: GenAiConfig) -> GenAiResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(GenAiError::Network)?;

        Ok(Self { http, config })
    }

    /// Discover the current trending products.
    ///
    /// Sends the fixed query and parses the structured response into a
    /// board of [`TrendingProduct`]s with enumeration-ordered ids. No
    /// retry is attempted here; failure handling belongs to the caller.
    pub async fn find_trending(&self) -> GenAiResult<Vec<TrendingProduct>> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.base_url, self.config.text_model
        );

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: TRENDS_PROMPT.to_string(),
                }],
            }],
            tools: vec![Tool {
                google_search: json!({}),
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: response_schema(),
            },
        };

        debug!("Sending trend discovery request to {}", url);

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
                "Gemini API returned {}: {}",
                status, body
            )));
        }

        let payload: GenerateContentResponse = response.json().await?;

        let text = payload
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.as_str())
            .ok_or_else(|| GenAiError::invalid_response("no content in Gemini response"))?;

        let records: Vec<DiscoveredProduct> = serde_json::from_str(extract_json(text))?;

        info!("Discovered {} trending products", records.len());

        Ok(records
            .into_iter()
            .enumerate()
            .map(|(idx, record)| TrendingProduct {
                id: ProductId::from_index(idx),
                name: record.name,
                description: record.description,
                trend_reason: record.trend_reason,
                ad_hook: record.ad_hook,
                visual_prompt: record.visual_prompt,
            })
            .collect())
    }
}
