//! TrendVision engine.
//!
//! The core of the trend-to-ad workflow:
//! - [`JobTracker`] owns per-product generation status, drives the poll
//!   loop against the video service, and classifies failures.
//! - [`App`] is the top-level view-state controller
//!   (Idle -> Searching -> ProductsFound) around trend discovery.
//! - [`KeyStore`] tracks the host-provided API credential flag.
//!
//! Presentation layers consume status snapshots and [`tvision_models::StatusEvent`]s
//! and issue generate/retry/discover commands; they never mutate state
//! directly.

pub mod config;
pub mod controller;
pub mod error;
pub mod keys;
pub mod logging;
pub mod tracker;

pub use config::EngineConfig;
pub use controller::{App, DISCOVERY_FAILED_MESSAGE};
pub use error::{
    classify_failure, is_permission_denial, EngineError, EngineResult, FailureKind,
    PERMISSION_DENIED_MESSAGE,
};
pub use keys::{KeyHost, KeyState, KeyStore};
pub use logging::GenerationLogger;
pub use tracker::JobTracker;
