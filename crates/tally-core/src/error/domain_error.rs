//! Domain errors - error types for the domain layer

use thiserror::Error;

/// Domain layer errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Invalid reaction: {0:?}")]
    InvalidReaction(String),

    #[error("Target emoji set is empty")]
    EmptyTargetSet,

    #[error("Report interval must be between 1 second and 1 day, got {0}s")]
    InvalidInterval(i64),

    #[error("Report template has no {{count}} placeholder")]
    MissingPlaceholder,
}
