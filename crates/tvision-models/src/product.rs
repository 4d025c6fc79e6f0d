//! Trending product models.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a discovered product.
///
/// Ids are assigned by enumeration order within a discovery batch
/// (`prod-0`, `prod-1`, ...) and are only valid for the batch that
/// produced them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub String);

impl ProductId {
    /// Build the id for the product at `index` in a discovery response.
    pub fn from_index(index: usize) -> Self {
        Self(format!("prod-{index}"))
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ProductId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ProductId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// One product surfaced by a trend discovery pass.
///
/// All text fields come verbatim from the discovery response. A board of
/// products is immutable once created and replaced wholesale by the next
/// discovery pass; there is no incremental merge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingProduct {
    pub id: ProductId,
    /// The product name.
    pub name: String,
    /// A one-sentence description.
    pub description: String,
    /// Why the product is viral right now.
    pub trend_reason: String,
    /// A catchy first-line hook for a 60-second video ad.
    pub ad_hook: String,
    /// A detailed visual description of a vertical (9:16) video ad.
    pub visual_prompt: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_id_from_index() {
        assert_eq!(ProductId::from_index(0).as_str(), "prod-0");
        assert_eq!(ProductId::from_index(7).as_str(), "prod-7");
        assert_eq!(ProductId::from_index(3).to_string(), "prod-3");
    }

    #[test]
    fn test_product_serde_uses_camel_case() {
        let product = TrendingProduct {
            id: ProductId::from_index(0),
            name: "LED Face Mask".to_string(),
            description: "A light-therapy mask.".to_string(),
            trend_reason: "Skincare routines are viral.".to_string(),
            ad_hook: "Glow up in 10 minutes.".to_string(),
            visual_prompt: "Close-up of a glowing mask in a dark room.".to_string(),
        };

        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["id"], "prod-0");
        assert_eq!(json["trendReason"], "Skincare routines are viral.");
        assert_eq!(json["adHook"], "Glow up in 10 minutes.");
        assert!(json["visualPrompt"].is_string());

        let back: TrendingProduct = serde_json::from_value(json).unwrap();
        assert_eq!(back, product);
    }
}
