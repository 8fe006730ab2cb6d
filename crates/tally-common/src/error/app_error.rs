//! Application error types
//!
//! Unified error type for startup and the agent's outer surfaces.

use crate::config::ConfigError;
use std::fmt;

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Startup errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    // Stream transport errors
    #[error("Transport error: {0}")]
    Transport(String),

    // Report publishing errors
    #[error("Publish error: {0}")]
    Publish(String),
}

impl AppError {
    /// Get error code for structured logs
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::Publish(_) => "PUBLISH_ERROR",
        }
    }

    /// Create a transport error
    #[must_use]
    pub fn transport(msg: impl fmt::Display) -> Self {
        Self::Transport(msg.to_string())
    }

    /// Create a publish error
    #[must_use]
    pub fn publish(msg: impl fmt::Display) -> Self {
        Self::Publish(msg.to_string())
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
