//! Shared data models for TrendVision.
//!
//! This crate provides Serde-serializable types for:
//! - Discovered trending products
//! - Per-product ad generation status and synthetic progress
//! - Top-level view state
//! - Status event messages published during generation

pub mod events;
pub mod product;
pub mod status;
pub mod utils;
pub mod view;

// Re-export common types
pub use events::StatusEvent;
pub use product::{ProductId, TrendingProduct};
pub use status::{
    simulated_progress, GenerationState, GenerationStatus, VideoHandle, INITIAL_PROGRESS,
    PROGRESS_CAP, PROGRESS_STEP,
};
pub use utils::ad_file_name;
pub use view::ViewState;
