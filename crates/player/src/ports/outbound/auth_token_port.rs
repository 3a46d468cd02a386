use chrono::{DateTime, Utc};

/// Persisted authentication tokens, as seen by the auth status monitor.
#[cfg_attr(test, mockall::automock)]
pub trait AuthTokenPort: Send + Sync {
    /// True when an access token exists and has not expired.
    fn has_valid_tokens(&self) -> bool;

    /// Expiry of the current access token, if any is stored.
    fn expires_at(&self) -> Option<DateTime<Utc>>;
}
