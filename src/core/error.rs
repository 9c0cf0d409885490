//! Error types and handling for the page server.
//!
//! Request-time outcomes (denied, missing) are data, not errors. This enum
//! covers what can actually fail: startup configuration, I/O and the outer
//! surfaces.

use thiserror::Error;

use super::security::GateError;

/// A specialized Result type for page server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the page server.
#[derive(Debug, Error)]
pub enum Error {
    /// Error raised by the path gate.
    #[error("Gate error: {0}")]
    Gate(#[from] GateError),

    /// Error originating from the pages domain.
    #[error("Page error: {0}")]
    Page(#[from] crate::domains::pages::PageError),

    /// Error originating from the resources domain.
    #[error("Resource error: {0}")]
    Resource(#[from] crate::domains::resources::ResourceError),

    /// Configuration-related errors. The server must not start.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors from file operations or network communication.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal server errors that should not occur under normal operation.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Classify a gate error, promoting startup failures to configuration
    /// errors.
    pub fn from_gate(error: GateError) -> Self {
        if error.is_configuration() {
            Self::Config(error.to_string())
        } else {
            Self::Gate(error)
        }
    }
}
