//! Engine error types and failure classification.

use thiserror::Error;

use tvision_models::ProductId;

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("GenAI client error: {0}")]
    GenAi(#[from] tvision_genai::GenAiError),

    #[error("No completed video for {0}")]
    VideoNotReady(ProductId),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// User-facing message substituted for permission-classified failures.
pub const PERMISSION_DENIED_MESSAGE: &str =
    "Permission Denied: Veo generation requires an API key from a PAID Google Cloud project (billing enabled).";

/// Signatures of billing/permission denials from the video service,
/// matched case-insensitively as substrings of the raw error message.
const PERMISSION_DENIAL_SIGNATURES: &[&str] = &[
    "permission_denied",
    "403",
    "permission",
    "does not have permission",
    "entity was not found",
];

/// How a failed generation attempt is surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Billing/credential denial; also forces credential re-selection
    Permission,
    /// Any other generation failure, surfaced with its raw message
    Generation,
}

/// Classify a raw failure message from the video pipeline.
pub fn classify_failure(message: &str) -> FailureKind {
    if is_permission_denial(message) {
        FailureKind::Permission
    } else {
        FailureKind::Generation
    }
}

/// Check a message against the permission-denial signatures.
pub fn is_permission_denial(message: &str) -> bool {
    let lowered = message.to_lowercase();
    PERMISSION_DENIAL_SIGNATURES
        .iter()
        .any(|sig| lowered.contains(sig))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_signatures_match_case_insensitively() {
        assert!(is_permission_denial("403 PERMISSION_DENIED"));
        assert!(is_permission_denial("The caller does not have permission"));
        assert!(is_permission_denial("Requested entity was not found"));
        assert!(is_permission_denial("permission denied by policy"));
        assert!(is_permission_denial("HTTP 403 from upstream"));
    }

    #[test]
    fn test_other_failures_are_generic() {
        assert_eq!(
            classify_failure("connection reset by peer"),
            FailureKind::Generation
        );
        assert_eq!(
            classify_failure("Veo API returned 500 Internal Server Error"),
            FailureKind::Generation
        );
        assert_eq!(
            classify_failure("Video generation failed to return a URI"),
            FailureKind::Generation
        );
    }

    #[test]
    fn test_classify_permission() {
        assert_eq!(
            classify_failure("Veo API returned 403 Forbidden: billing disabled"),
            FailureKind::Permission
        );
    }
}
