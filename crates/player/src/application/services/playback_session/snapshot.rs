use chrono::{DateTime, Utc};
use serde::Serialize;

use ridecast_domain::{QueueItem, QueueItemId};

/// Point-in-time view of the playback session, published on every change.
///
/// Surfaces render from this and never keep their own copy of transport state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackSnapshot {
    pub current_item: Option<QueueItem>,
    pub queue: Vec<QueueItem>,
    pub current_index: Option<usize>,
    pub is_playing: bool,
    /// A load for the current item has been issued and not yet settled.
    pub is_loading: bool,
    pub position: f64,
    pub duration: f64,
    pub sleep_timer_end: Option<DateTime<Utc>>,
    /// User-facing description of the last engine failure, cleared by the next load.
    pub last_error: Option<String>,
}

impl PlaybackSnapshot {
    pub fn is_current(&self, id: &QueueItemId) -> bool {
        self.current_item.as_ref().is_some_and(|item| item.id() == id)
    }

    pub fn has_next(&self) -> bool {
        self.current_index
            .is_some_and(|index| index + 1 < self.queue.len())
    }

    pub fn has_previous(&self) -> bool {
        self.current_index.is_some_and(|index| index > 0)
    }

    pub fn remaining(&self) -> f64 {
        (self.duration - self.position).max(0.0)
    }

    pub fn progress(&self) -> f64 {
        if self.duration > 0.0 {
            (self.position / self.duration).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}
