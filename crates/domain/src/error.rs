//! Unified error types for the domain layer
//!
//! The domain normalizes malformed upstream data instead of failing, so this
//! error type is reserved for caller mistakes: constructing an invalid value
//! or driving a state machine through a transition it does not allow.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// State transition not allowed
    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),
}

impl DomainError {
    /// Creates a validation error for values that cannot be constructed.
    ///
    /// # Example
    /// ```ignore
    /// if audio_url.trim().is_empty() {
    ///     return Err(DomainError::validation("Queue item needs an audio URL"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an invalid state transition error
    pub fn invalid_transition(msg: impl Into<String>) -> Self {
        Self::InvalidStateTransition(msg.into())
    }
}
