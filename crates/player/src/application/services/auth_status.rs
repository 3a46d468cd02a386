//! Sign-in status checks that clear playback on logout.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::playback_session::PlaybackSession;
use crate::application::error::SessionError;
use crate::ports::outbound::AuthTokenPort;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    SignedIn { expires_at: Option<DateTime<Utc>> },
    SignedOut,
}

impl AuthStatus {
    pub fn is_signed_in(&self) -> bool {
        matches!(self, AuthStatus::SignedIn { .. })
    }
}

/// Watches token validity and tears down the playback session when the user
/// is no longer signed in.
pub struct AuthStatusMonitor {
    tokens: Arc<dyn AuthTokenPort>,
    session: PlaybackSession,
}

impl AuthStatusMonitor {
    pub fn new(tokens: Arc<dyn AuthTokenPort>, session: PlaybackSession) -> Self {
        Self { tokens, session }
    }

    pub fn status(&self) -> AuthStatus {
        if self.tokens.has_valid_tokens() {
            AuthStatus::SignedIn {
                expires_at: self.tokens.expires_at(),
            }
        } else {
            AuthStatus::SignedOut
        }
    }

    /// Re-check tokens when the app returns to the foreground.
    pub async fn on_foreground(&self) -> Result<AuthStatus, SessionError> {
        let status = self.status();
        if status == AuthStatus::SignedOut {
            tracing::info!("Tokens no longer valid; clearing playback session");
            self.session.reset().await?;
        }
        Ok(status)
    }

    pub async fn logout(&self) -> Result<(), SessionError> {
        tracing::info!("Logout; clearing playback session");
        self.session.reset().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::playback_session::{PlaybackSnapshot, SessionConfig};
    use crate::infrastructure::testing::fixtures::episode;
    use crate::infrastructure::testing::{FakeAudioEngine, TokioClock};
    use crate::ports::outbound::MockAuthTokenPort;
    use chrono::TimeZone;

    fn playing_session(engine: &FakeAudioEngine) -> PlaybackSession {
        PlaybackSession::start(
            Arc::new(engine.clone()),
            Arc::new(TokioClock::evening()),
            SessionConfig::default(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn valid_tokens_leave_playback_alone() {
        let expires = Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap();
        let mut tokens = MockAuthTokenPort::new();
        tokens.expect_has_valid_tokens().return_const(true);
        tokens.expect_expires_at().return_const(Some(expires));

        let engine = FakeAudioEngine::new();
        let session = playing_session(&engine);
        session.load_and_play(episode("a", 300.0), None).await.unwrap();

        let monitor = AuthStatusMonitor::new(Arc::new(tokens), session.clone());
        let status = monitor.on_foreground().await.unwrap();

        assert_eq!(
            status,
            AuthStatus::SignedIn {
                expires_at: Some(expires)
            }
        );
        assert!(session.snapshot().current_item.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn expired_tokens_reset_session_and_release_source() {
        let mut tokens = MockAuthTokenPort::new();
        tokens.expect_has_valid_tokens().return_const(false);

        let engine = FakeAudioEngine::new();
        let session = playing_session(&engine);
        session.load_and_play(episode("a", 300.0), None).await.unwrap();

        let monitor = AuthStatusMonitor::new(Arc::new(tokens), session.clone());
        let status = monitor.on_foreground().await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(1)).await;

        assert!(!status.is_signed_in());
        assert_eq!(session.snapshot(), PlaybackSnapshot::default());
        assert!(engine.loaded_sources().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn logout_always_clears_session() {
        let tokens = MockAuthTokenPort::new();
        let engine = FakeAudioEngine::new();
        let session = playing_session(&engine);
        session.load_and_play(episode("a", 300.0), None).await.unwrap();

        AuthStatusMonitor::new(Arc::new(tokens), session.clone())
            .logout()
            .await
            .unwrap();

        assert!(session.snapshot().current_item.is_none());
    }
}
