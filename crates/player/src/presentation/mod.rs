//! Transport surface view-models.
//!
//! Surfaces render from a [`PlaybackSnapshot`] and forward user actions to the
//! [`PlaybackSession`](crate::application::services::PlaybackSession). They
//! hold no playback state of their own.

mod episode_play_button;
mod full_player;
mod mini_player;

pub use episode_play_button::{ButtonPress, EpisodePlayButton};
pub use full_player::{sleep_options, FullPlayer, FullPlayerView, SleepOption};
pub use mini_player::{MiniPlayer, MiniPlayerView};

use serde::Serialize;

use crate::application::services::PlaybackSnapshot;

/// What the transport button shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportGlyph {
    Play,
    Pause,
    Loading,
}

impl TransportGlyph {
    pub fn for_snapshot(snapshot: &PlaybackSnapshot) -> Self {
        if snapshot.is_loading {
            TransportGlyph::Loading
        } else if snapshot.is_playing {
            TransportGlyph::Pause
        } else {
            TransportGlyph::Play
        }
    }
}
