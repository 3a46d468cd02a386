//! Application layer error types
//!
//! Every failure the session or the interaction helpers can hit is caught at
//! the boundary where the async call was issued and converted into one of
//! these values. None of them are fatal.

use crate::ports::outbound::{ApiError, EngineError};

/// Errors returned by [`PlaybackSession`](crate::application::services::PlaybackSession) commands.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SessionError {
    /// The engine refused to load or play the current item.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// The command needs a loaded item and there is none.
    #[error("Nothing is loaded")]
    NothingLoaded,

    /// The session has been disposed.
    #[error("Playback session is closed")]
    Closed,
}

impl SessionError {
    /// Message suitable for a transient notification.
    pub fn user_message(&self) -> String {
        match self {
            SessionError::Engine(EngineError::LoadFailed { .. }) => {
                "This audio could not be loaded.".to_string()
            }
            SessionError::Engine(_) => "Playback stopped unexpectedly.".to_string(),
            SessionError::NothingLoaded => "Nothing is playing.".to_string(),
            SessionError::Closed => "The player has been closed.".to_string(),
        }
    }
}

/// An optimistic interaction was rejected and its local value rolled back.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct InteractionError {
    message: String,
    #[source]
    source: ApiError,
}

impl InteractionError {
    pub fn rejected(source: ApiError) -> Self {
        Self {
            message: source.user_message(),
            source,
        }
    }

    /// Text to show the user, already extracted from the failure.
    pub fn user_message(&self) -> &str {
        &self.message
    }

    pub fn api_error(&self) -> &ApiError {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::outbound::GENERIC_ERROR_MESSAGE;

    #[test]
    fn rejected_interaction_extracts_message() {
        let err = InteractionError::rejected(ApiError::status(403, "You cannot follow yourself"));
        assert_eq!(err.user_message(), "You cannot follow yourself");
        assert_eq!(err.to_string(), "You cannot follow yourself");
    }

    #[test]
    fn rejected_interaction_without_message_uses_fallback() {
        let err = InteractionError::rejected(ApiError::Network("timeout".into()));
        assert_eq!(err.user_message(), GENERIC_ERROR_MESSAGE);
        assert!(matches!(err.api_error(), ApiError::Network(_)));
    }

    #[test]
    fn engine_errors_convert_into_session_errors() {
        let err: SessionError = EngineError::load_failed("https://x/a.mp3", "404").into();
        assert_eq!(err.user_message(), "This audio could not be loaded.");
    }
}
