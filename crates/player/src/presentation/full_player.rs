use std::time::Duration;

use serde::Serialize;

use ridecast_domain::{format_duration, MediaType, SleepTimer, SleepTimerMode, SLEEP_TIMER_PRESETS};

use super::TransportGlyph;
use crate::application::error::SessionError;
use crate::application::services::{LoadOutcome, PlaybackSession, PlaybackSnapshot};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FullPlayerView {
    pub title: String,
    pub artist: Option<String>,
    pub artwork: Option<String>,
    pub media_type: MediaType,
    pub glyph: TransportGlyph,
    pub position_label: String,
    pub duration_label: String,
    /// Time left in the item, shown as `-m:ss`.
    pub remaining_label: String,
    pub progress: f64,
    pub has_next: bool,
    pub has_previous: bool,
    /// Countdown shown next to the moon icon while a sleep timer is armed.
    pub sleep_label: Option<String>,
}

impl FullPlayerView {
    pub fn from_snapshot(
        snapshot: &PlaybackSnapshot,
        sleep_remaining: Option<Duration>,
    ) -> Option<Self> {
        let item = snapshot.current_item.as_ref()?;
        Some(Self {
            title: item.title().to_string(),
            artist: item.artist().map(str::to_string),
            artwork: item.artwork().map(str::to_string),
            media_type: item.media_type(),
            glyph: TransportGlyph::for_snapshot(snapshot),
            position_label: format_duration(snapshot.position),
            duration_label: format_duration(snapshot.duration),
            remaining_label: format!("-{}", format_duration(snapshot.remaining())),
            progress: snapshot.progress(),
            has_next: snapshot.has_next(),
            has_previous: snapshot.has_previous(),
            sleep_label: sleep_remaining.map(sleep_label),
        })
    }
}

/// Countdowns round up so the label never reads 0:00 before the timer fires.
fn sleep_label(remaining: Duration) -> String {
    let seconds = remaining.as_secs_f64().ceil();
    format!("Sleep in {}", format_duration(seconds))
}

/// One entry of the sleep timer menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepOption {
    pub label: String,
    pub mode: SleepTimerMode,
    pub is_default: bool,
}

pub fn sleep_options(default_minutes: u32) -> Vec<SleepOption> {
    SLEEP_TIMER_PRESETS
        .iter()
        .map(|&minutes| SleepOption {
            label: format!("{minutes} minutes"),
            mode: SleepTimerMode::Minutes(minutes),
            is_default: minutes == default_minutes,
        })
        .chain(std::iter::once(SleepOption {
            label: "End of track".to_string(),
            mode: SleepTimerMode::EndOfTrack,
            is_default: false,
        }))
        .collect()
}

/// The expanded "now playing" screen.
#[derive(Clone)]
pub struct FullPlayer {
    session: PlaybackSession,
    default_sleep_minutes: u32,
}

impl FullPlayer {
    pub fn new(session: PlaybackSession, default_sleep_minutes: u32) -> Self {
        Self {
            session,
            default_sleep_minutes,
        }
    }

    pub fn view(&self) -> Option<FullPlayerView> {
        FullPlayerView::from_snapshot(
            &self.session.snapshot(),
            self.session.sleep_timer_remaining(),
        )
    }

    pub fn sleep_options(&self) -> Vec<SleepOption> {
        sleep_options(self.default_sleep_minutes)
    }

    pub async fn toggle(&self) -> Result<(), SessionError> {
        self.session.toggle_play_pause().await
    }

    pub async fn next(&self) -> Result<LoadOutcome, SessionError> {
        self.session.skip_to_next().await
    }

    pub async fn previous(&self) -> Result<LoadOutcome, SessionError> {
        self.session.skip_to_previous().await
    }

    /// Scrubber release, with `fraction` of the item's duration.
    pub async fn scrub_to(&self, fraction: f64) -> Result<(), SessionError> {
        let duration = self.session.snapshot().duration;
        let fraction = if fraction.is_finite() {
            fraction.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.session.seek(duration * fraction).await
    }

    pub async fn choose_sleep_option(
        &self,
        option: &SleepOption,
    ) -> Result<Option<SleepTimer>, SessionError> {
        self.session.set_sleep_timer(option.mode).await
    }

    pub async fn cancel_sleep_timer(&self) -> Result<(), SessionError> {
        self.session.clear_sleep_timer().await
    }
}
