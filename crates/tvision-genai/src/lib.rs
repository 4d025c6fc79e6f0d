//! HTTP clients for the Google generative APIs.
//!
//! Two remote collaborators live here:
//! - [`TrendsClient`] asks Gemini (with Google Search grounding) for the
//!   current trending-product board as structured JSON.
//! - [`VideoClient`] starts asynchronous Veo video jobs and exposes the
//!   poll/download primitives.
//!
//! Both are thin request/response adapters; lifecycle policy (polling
//! cadence, progress, status tracking, error classification) lives in
//! `tvision-engine`.

pub mod config;
pub mod error;
pub mod trends;
pub mod veo;

pub use config::GenAiConfig;
pub use error::{GenAiError, GenAiResult};
pub use trends::TrendsClient;
pub use veo::{ad_prompt, VideoClient, VideoOperation};
