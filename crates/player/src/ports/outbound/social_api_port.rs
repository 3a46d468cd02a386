//! Social API port - the slice of the remote backend used by interaction helpers.

use async_trait::async_trait;
use ridecast_domain::{LikeState, PostId, UserId};

/// Fallback text shown when a failure carries no usable message.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

/// Errors returned by the remote API client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("Request failed with status {status}")]
    Status {
        status: u16,
        message: Option<String>,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Not signed in")]
    Unauthorized,
}

impl ApiError {
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: Some(message.into()),
        }
    }

    /// Message suitable for a transient notification.
    ///
    /// Server-provided messages are shown as-is; everything else falls back
    /// to [`GENERIC_ERROR_MESSAGE`].
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.trim().to_string(),
            ApiError::Unauthorized => "Please sign in again.".to_string(),
            _ => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SocialApiPort: Send + Sync {
    async fn follow_user(&self, user_id: &UserId) -> Result<(), ApiError>;

    async fn unfollow_user(&self, user_id: &UserId) -> Result<(), ApiError>;

    async fn is_following(&self, user_id: &UserId) -> Result<bool, ApiError>;

    async fn like_post(&self, post_id: &PostId) -> Result<(), ApiError>;

    async fn unlike_post(&self, post_id: &PostId) -> Result<(), ApiError>;

    async fn post_like_status(&self, post_id: &PostId) -> Result<LikeState, ApiError>;

    /// Record a play of a post's audio. Returns the server's play count when it sends one.
    async fn play_post(&self, post_id: &PostId, duration: f64) -> Result<Option<u64>, ApiError>;
}
