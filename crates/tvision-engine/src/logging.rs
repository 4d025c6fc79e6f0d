//! Structured generation logging utilities.
//!
//! Provides consistent, structured logging for generation attempts with
//! tracing spans and contextual information.

use tracing::{error, info, warn, Span};

use tvision_models::ProductId;

/// Logger for one product's generation lifecycle.
///
/// Attaches the product id and operation type to every line so per-item
/// jobs running concurrently stay distinguishable.
#[derive(Debug, Clone)]
pub struct GenerationLogger {
    product_id: String,
    operation: String,
}

impl GenerationLogger {
    /// Create a new logger for a product and operation.
    pub fn new(product_id: &ProductId, operation: &str) -> Self {
        Self {
            product_id: product_id.to_string(),
            operation: operation.to_string(),
        }
    }

    /// Log the start of an attempt.
    pub fn log_start(&self, message: &str) {
        info!(
            product_id = %self.product_id,
            operation = %self.operation,
            "Generation started: {}", message
        );
    }

    /// Log a progress update.
    pub fn log_progress(&self, message: &str) {
        info!(
            product_id = %self.product_id,
            operation = %self.operation,
            "Generation progress: {}", message
        );
    }

    /// Log a warning.
    pub fn log_warning(&self, message: &str) {
        warn!(
            product_id = %self.product_id,
            operation = %self.operation,
            "Generation warning: {}", message
        );
    }

    /// Log an error.
    pub fn log_error(&self, message: &str) {
        error!(
            product_id = %self.product_id,
            operation = %self.operation,
            "Generation error: {}", message
        );
    }

    /// Log the completion of an attempt.
    pub fn log_completion(&self, message: &str) {
        info!(
            product_id = %self.product_id,
            operation = %self.operation,
            "Generation completed: {}", message
        );
    }

    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Create a tracing span for this attempt.
    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "generation",
            product_id = %self.product_id,
            operation = %self.operation
        )
    }
}
