//! Page-specific error types.

use thiserror::Error;

use crate::core::security::GateError;

/// Failures while turning an approved page into a response.
///
/// None of these reach a client verbatim; the service logs them and answers
/// with a fixed rejection.
#[derive(Debug, Error)]
pub enum PageError {
    /// Opening or reading the approved file failed.
    #[error(transparent)]
    Gate(#[from] GateError),

    /// The renderer refused the page.
    #[error("Render failed: {0}")]
    Render(String),

    /// The blocking read task did not complete.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PageError {
    /// Create a new render error.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Create a new internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether the file changed underneath the gate. This is treated as a
    /// denial rather than a missing page.
    pub fn is_tampering(&self) -> bool {
        matches!(self, Self::Gate(GateError::Changed { .. }))
    }
}
