//! The unit of playback.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::sanitize_seconds;
use crate::entities::PostKind;
use crate::error::DomainError;
use crate::ids::{
    AudiobookId, ChapterId, EpisodeId, PodcastId, PostId, QueueItemId, UserId, VoiceMemoId,
};

/// Which kind of source content a [`QueueItem`] was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Audiobook,
    Podcast,
    Post,
    VoiceMemo,
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaType::Audiobook => write!(f, "audiobook"),
            MediaType::Podcast => write!(f, "podcast"),
            MediaType::Post => write!(f, "post"),
            MediaType::VoiceMemo => write!(f, "voicememo"),
        }
    }
}

/// Source-specific details carried along for the UI. The session never reads these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum QueueItemMetadata {
    Audiobook {
        audiobook_id: AudiobookId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        chapter_id: Option<ChapterId>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        chapter_number: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        narrator: Option<String>,
    },
    Podcast {
        podcast_id: PodcastId,
        episode_id: EpisodeId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        episode_number: Option<u32>,
    },
    Post {
        post_id: PostId,
        kind: PostKind,
        author_id: UserId,
    },
    VoiceMemo {
        memo_id: VoiceMemoId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        category: Option<String>,
    },
}

impl QueueItemMetadata {
    pub fn media_type(&self) -> MediaType {
        match self {
            QueueItemMetadata::Audiobook { .. } => MediaType::Audiobook,
            QueueItemMetadata::Podcast { .. } => MediaType::Podcast,
            QueueItemMetadata::Post { .. } => MediaType::Post,
            QueueItemMetadata::VoiceMemo { .. } => MediaType::VoiceMemo,
        }
    }
}

/// A normalized playable unit.
///
/// Immutable once built: the builder-style `with_*` methods consume `self`,
/// and there are no `&mut` accessors. A changed source means a new item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueItem {
    id: QueueItemId,
    title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    artwork: Option<String>,
    audio_url: String,
    duration: f64,
    metadata: QueueItemMetadata,
}

impl QueueItem {
    /// Create a queue item.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the audio URL is blank.
    pub fn new(
        id: QueueItemId,
        title: impl Into<String>,
        audio_url: impl Into<String>,
        duration: f64,
        metadata: QueueItemMetadata,
    ) -> Result<Self, DomainError> {
        let audio_url = audio_url.into().trim().to_string();
        if audio_url.is_empty() {
            return Err(DomainError::validation(format!(
                "Queue item {} has no audio URL",
                id
            )));
        }

        Ok(Self {
            id,
            title: title.into(),
            artist: None,
            artwork: None,
            audio_url,
            duration: sanitize_seconds(duration),
            metadata,
        })
    }

    pub fn with_artist(mut self, artist: Option<String>) -> Self {
        self.artist = artist.filter(|a| !a.trim().is_empty());
        self
    }

    pub fn with_artwork(mut self, artwork: Option<String>) -> Self {
        self.artwork = artwork.filter(|a| !a.trim().is_empty());
        self
    }

    pub fn id(&self) -> &QueueItemId {
        &self.id
    }

    pub fn media_type(&self) -> MediaType {
        self.metadata.media_type()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn artist(&self) -> Option<&str> {
        self.artist.as_deref()
    }

    pub fn artwork(&self) -> Option<&str> {
        self.artwork.as_deref()
    }

    pub fn audio_url(&self) -> &str {
        &self.audio_url
    }

    /// Duration in seconds as reported by the source content (0 when unknown).
    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn metadata(&self) -> &QueueItemMetadata {
        &self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memo_metadata() -> QueueItemMetadata {
        QueueItemMetadata::VoiceMemo {
            memo_id: VoiceMemoId::new("m1"),
            category: Some("ideas".to_string()),
        }
    }

    #[test]
    fn blank_audio_url_is_rejected() {
        let result = QueueItem::new(
            QueueItemId::new("voicememo:m1"),
            "Memo",
            "   ",
            10.0,
            memo_metadata(),
        );
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn negative_duration_is_clamped() {
        let item = QueueItem::new(
            QueueItemId::new("voicememo:m1"),
            "Memo",
            "https://cdn.example/m1.m4a",
            -5.0,
            memo_metadata(),
        )
        .unwrap();
        assert_eq!(item.duration(), 0.0);
        assert_eq!(item.media_type(), MediaType::VoiceMemo);
    }

    #[test]
    fn blank_artist_is_dropped() {
        let item = QueueItem::new(
            QueueItemId::new("voicememo:m1"),
            "Memo",
            "https://cdn.example/m1.m4a",
            5.0,
            memo_metadata(),
        )
        .unwrap()
        .with_artist(Some(" ".to_string()))
        .with_artwork(Some("https://cdn.example/a.png".to_string()));

        assert!(item.artist().is_none());
        assert_eq!(item.artwork(), Some("https://cdn.example/a.png"));
    }

    #[test]
    fn metadata_is_tagged_by_type() {
        let json = serde_json::to_value(memo_metadata()).unwrap();
        assert_eq!(json["type"], "voicememo");
        assert_eq!(json["memo_id"], "m1");
    }
}
