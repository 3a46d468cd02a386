use serde::Serialize;

use super::TransportGlyph;
use crate::application::error::SessionError;
use crate::application::services::{PlaybackSession, PlaybackSnapshot};

/// The collapsed player bar shown above the tab bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MiniPlayerView {
    pub title: String,
    pub artist: Option<String>,
    pub artwork: Option<String>,
    pub glyph: TransportGlyph,
    /// Fraction of the item played, in `[0, 1]`.
    pub progress: f64,
}

impl MiniPlayerView {
    /// `None` hides the bar.
    pub fn from_snapshot(snapshot: &PlaybackSnapshot) -> Option<Self> {
        let item = snapshot.current_item.as_ref()?;
        Some(Self {
            title: item.title().to_string(),
            artist: item.artist().map(str::to_string),
            artwork: item.artwork().map(str::to_string),
            glyph: TransportGlyph::for_snapshot(snapshot),
            progress: snapshot.progress(),
        })
    }
}

#[derive(Clone)]
pub struct MiniPlayer {
    session: PlaybackSession,
}

impl MiniPlayer {
    pub fn new(session: PlaybackSession) -> Self {
        Self { session }
    }

    pub fn view(&self) -> Option<MiniPlayerView> {
        MiniPlayerView::from_snapshot(&self.session.snapshot())
    }

    pub async fn toggle(&self) -> Result<(), SessionError> {
        self.session.toggle_play_pause().await
    }

    /// Closing the bar ends the session.
    pub async fn close(&self) -> Result<(), SessionError> {
        self.session.reset().await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::application::services::SessionConfig;
    use crate::infrastructure::testing::fixtures::episode;
    use crate::infrastructure::testing::{FakeAudioEngine, TokioClock};

    fn mini_player(engine: &FakeAudioEngine) -> MiniPlayer {
        MiniPlayer::new(PlaybackSession::start(
            Arc::new(engine.clone()),
            Arc::new(TokioClock::evening()),
            SessionConfig::default(),
        ))
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn hidden_until_something_is_loaded() {
        let engine = FakeAudioEngine::new();
        let mini = mini_player(&engine);
        assert_eq!(mini.view(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn shows_item_and_progress() {
        let engine = FakeAudioEngine::new();
        let mini = mini_player(&engine);
        mini.session
            .load_and_play(episode("a", 200.0), None)
            .await
            .unwrap();
        let handle = engine.last_handle().unwrap();
        engine.emit_progress(handle, 50.0, 200.0);
        settle().await;

        let view = mini.view().unwrap();
        assert_eq!(view.title, "Episode a");
        assert_eq!(view.glyph, TransportGlyph::Pause);
        assert_eq!(view.progress, 0.25);

        mini.toggle().await.unwrap();
        assert_eq!(mini.view().unwrap().glyph, TransportGlyph::Play);
    }

    #[tokio::test(start_paused = true)]
    async fn close_resets_session() {
        let engine = FakeAudioEngine::new();
        let mini = mini_player(&engine);
        mini.session
            .load_and_play(episode("a", 200.0), None)
            .await
            .unwrap();

        mini.close().await.unwrap();
        settle().await;

        assert_eq!(mini.view(), None);
        assert!(engine.loaded_sources().is_empty());
    }
}
