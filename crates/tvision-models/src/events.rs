//! Status events published while ads are generated.
//!
//! Front-ends can subscribe to these instead of polling the status map.
//! Events for a single product arrive in order; events across different
//! products are interleaved arbitrarily since each product's job runs
//! independently.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ProductId;

/// Event envelope for per-product generation updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StatusEvent {
    /// Synthetic progress update (0-100)
    Progress {
        #[serde(rename = "productId")]
        product_id: ProductId,
        value: u8,
    },

    /// Generation finished and a playable handle is available
    Completed {
        #[serde(rename = "productId")]
        product_id: ProductId,
        #[serde(rename = "fileName")]
        file_name: String,
    },

    /// Generation failed
    Error {
        #[serde(rename = "productId")]
        product_id: ProductId,
        message: String,
        timestamp: DateTime<Utc>,
    },
}

impl StatusEvent {
    /// The product this event belongs to.
    pub fn product_id(&self) -> &ProductId {
        match self {
            StatusEvent::Progress { product_id, .. } => product_id,
            StatusEvent::Completed { product_id, .. } => product_id,
            StatusEvent::Error { product_id, .. } => product_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_event_wire_shape() {
        let event = StatusEvent::Progress {
            product_id: ProductId::from_index(2),
            value: 45,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "progress");
        assert_eq!(json["productId"], "prod-2");
        assert_eq!(json["value"], 45);
    }

    #[test]
    fn test_completed_event_wire_shape() {
        let event = StatusEvent::Completed {
            product_id: ProductId::from_index(0),
            file_name: "led_face_mask_tiktok_ad.mp4".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "completed");
        assert_eq!(json["fileName"], "led_face_mask_tiktok_ad.mp4");
    }
}
