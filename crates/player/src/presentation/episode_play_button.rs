use ridecast_domain::{QueueItem, QueueItemId};

use super::TransportGlyph;
use crate::application::error::SessionError;
use crate::application::services::{LoadOutcome, PlaybackSession, PlaybackSnapshot};

/// What pressing the button did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonPress {
    Toggled,
    Loaded(LoadOutcome),
}

/// Inline play button shown on an episode, post or chapter row.
///
/// The button only reflects the session when its item is the current one;
/// every other row shows Play.
#[derive(Clone)]
pub struct EpisodePlayButton {
    session: PlaybackSession,
    item: QueueItem,
    context: Option<Vec<QueueItem>>,
}

impl EpisodePlayButton {
    pub fn new(session: PlaybackSession, item: QueueItem) -> Self {
        Self {
            session,
            item,
            context: None,
        }
    }

    /// Queue to play when this row starts playback, e.g. the rest of the feed.
    pub fn with_context(mut self, context: Vec<QueueItem>) -> Self {
        self.context = Some(context);
        self
    }

    pub fn item_id(&self) -> &QueueItemId {
        self.item.id()
    }

    pub fn glyph(&self) -> TransportGlyph {
        self.glyph_for(&self.session.snapshot())
    }

    pub fn glyph_for(&self, snapshot: &PlaybackSnapshot) -> TransportGlyph {
        if snapshot.is_current(self.item.id()) {
            TransportGlyph::for_snapshot(snapshot)
        } else {
            TransportGlyph::Play
        }
    }

    pub async fn press(&self) -> Result<ButtonPress, SessionError> {
        if self.session.snapshot().is_current(self.item.id()) {
            self.session.toggle_play_pause().await?;
            return Ok(ButtonPress::Toggled);
        }

        tracing::debug!(item_id = %self.item.id(), "Play button starting item");
        let outcome = self
            .session
            .load_and_play(self.item.clone(), self.context.clone())
            .await?;
        Ok(ButtonPress::Loaded(outcome))
    }
}
