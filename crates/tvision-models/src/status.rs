//! Per-product ad generation status.
//!
//! The tracker in `tvision-engine` owns one [`GenerationStatus`] per
//! discovered product and mutates it through the methods here, so the
//! state/field invariants live in one place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ProductId;

/// Progress assigned as soon as a generation attempt starts.
pub const INITIAL_PROGRESS: u8 = 5;

/// Progress gained per poll iteration.
pub const PROGRESS_STEP: u8 = 5;

/// Ceiling for synthetic progress while the remote job is still running.
pub const PROGRESS_CAP: u8 = 95;

/// Synthetic progress for a still-running job after `poll_count` polls.
///
/// Real progress is never queried from the video service; the ramp is a
/// deterministic function of the poll count, capped at [`PROGRESS_CAP`]
/// until the operation reports completion.
pub fn simulated_progress(poll_count: u32) -> u8 {
    let stepped = poll_count.saturating_mul(PROGRESS_STEP as u32);
    stepped.min(PROGRESS_CAP as u32) as u8
}

/// Generation lifecycle state for one product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GenerationState {
    /// No attempt has been made yet
    #[default]
    Idle,
    /// A generation job is in flight
    Generating,
    /// A playable video is available
    Completed,
    /// The last attempt failed
    Error,
}

impl GenerationState {
    /// Get string representation of the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationState::Idle => "idle",
            GenerationState::Generating => "generating",
            GenerationState::Completed => "completed",
            GenerationState::Error => "error",
        }
    }

    /// Check if this is a terminal state for the current attempt.
    ///
    /// An errored product can still be retried, which starts a new attempt.
    pub fn is_terminal(&self) -> bool {
        matches!(self, GenerationState::Completed | GenerationState::Error)
    }
}

impl std::fmt::Display for GenerationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Playable video content fetched from the generation service.
///
/// The raw bytes are process-local and never serialized; only the
/// metadata travels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoHandle {
    #[serde(skip)]
    pub data: Vec<u8>,
    pub mime_type: String,
    /// Download file name, already sanitized (see [`crate::ad_file_name`]).
    pub file_name: String,
}

impl VideoHandle {
    /// Wrap fetched MP4 bytes into a handle.
    pub fn new(data: Vec<u8>, file_name: impl Into<String>) -> Self {
        Self {
            data,
            mime_type: "video/mp4".to_string(),
            file_name: file_name.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Tracked status of one product's ad generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationStatus {
    /// Product this status belongs to
    pub product_id: ProductId,
    /// Current lifecycle state
    pub state: GenerationState,
    /// Progress percentage (0-100), meaningful while generating
    pub progress: u8,
    /// Playable handle, present iff completed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<VideoHandle>,
    /// Human-readable failure detail, present iff errored
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// When the status last changed
    pub updated_at: DateTime<Utc>,
}

impl GenerationStatus {
    /// Create a fresh idle status for a product.
    pub fn idle(product_id: ProductId) -> Self {
        Self {
            product_id,
            state: GenerationState::Idle,
            progress: 0,
            video: None,
            error: None,
            updated_at: Utc::now(),
        }
    }

    /// Enter the generating state for a new attempt.
    ///
    /// Clears any previous error and video and resets progress to
    /// [`INITIAL_PROGRESS`]. Retrying an errored product goes through here,
    /// which is what clears the stale `error` detail.
    pub fn begin(&mut self) {
        self.state = GenerationState::Generating;
        self.progress = INITIAL_PROGRESS;
        self.video = None;
        self.error = None;
        self.updated_at = Utc::now();
    }

    /// Update progress and bump the updated_at timestamp.
    pub fn set_progress(&mut self, progress: u8) {
        self.progress = progress.min(100);
        self.updated_at = Utc::now();
    }

    /// Mark the attempt as completed with a playable handle.
    pub fn complete(&mut self, video: VideoHandle) {
        self.state = GenerationState::Completed;
        self.progress = 100;
        self.video = Some(video);
        self.error = None;
        self.updated_at = Utc::now();
    }

    /// Mark the attempt as failed.
    ///
    /// Progress is left at its last value so the UI shows where the
    /// attempt stalled.
    pub fn fail(&mut self, error: impl Into<String>) {
        self.state = GenerationState::Error;
        self.error = Some(error.into());
        self.video = None;
        self.updated_at = Utc::now();
    }

    /// Check if the current attempt reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_status_creation() {
        let status = GenerationStatus::idle(ProductId::from_index(0));
        assert_eq!(status.state, GenerationState::Idle);
        assert_eq!(status.progress, 0);
        assert!(status.video.is_none());
        assert!(status.error.is_none());
        assert!(!status.is_terminal());
    }

    #[test]
    fn test_status_transitions() {
        let mut status = GenerationStatus::idle(ProductId::from_index(1));

        status.begin();
        assert_eq!(status.state, GenerationState::Generating);
        assert_eq!(status.progress, INITIAL_PROGRESS);

        status.set_progress(50);
        assert_eq!(status.progress, 50);

        status.complete(VideoHandle::new(vec![1, 2, 3], "ad.mp4"));
        assert_eq!(status.state, GenerationState::Completed);
        assert_eq!(status.progress, 100);
        assert_eq!(status.video.as_ref().unwrap().len(), 3);
        assert!(status.is_terminal());
    }

    #[test]
    fn test_fail_keeps_progress_and_drops_video() {
        let mut status = GenerationStatus::idle(ProductId::from_index(2));
        status.begin();
        status.set_progress(35);

        status.fail("something broke");
        assert_eq!(status.state, GenerationState::Error);
        assert_eq!(status.progress, 35);
        assert!(status.video.is_none());
        assert_eq!(status.error.as_deref(), Some("something broke"));
    }

    #[test]
    fn test_retry_clears_previous_error() {
        let mut status = GenerationStatus::idle(ProductId::from_index(3));
        status.begin();
        status.fail("first attempt failed");

        status.begin();
        assert_eq!(status.state, GenerationState::Generating);
        assert_eq!(status.progress, INITIAL_PROGRESS);
        assert!(status.error.is_none());
    }

    #[test]
    fn test_simulated_progress_ramp() {
        assert_eq!(simulated_progress(1), 5);
        assert_eq!(simulated_progress(2), 10);
        assert_eq!(simulated_progress(10), 50);
        assert_eq!(simulated_progress(19), 95);
        // Capped at 95 until the job actually completes
        assert_eq!(simulated_progress(20), 95);
        assert_eq!(simulated_progress(10_000), 95);
    }
}
