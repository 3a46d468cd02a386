//! JSON play requests accepted by the `ridecast-player` binary.
//!
//! ```json
//! {
//!   "type": "episode",
//!   "episode": { "id": "ep-2", "podcastId": "pod-1", "title": "...", "audioUrl": "..." },
//!   "podcast": { "id": "pod-1", "title": "Night Drive" },
//!   "episodes": [],
//!   "sleepTimer": { "minutes": 15 }
//! }
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use ridecast_domain::{
    audiobook_queue, episode_item, episode_queue, post_item, post_queue, voice_memo_item,
    voice_memo_queue, Audiobook, Chapter, ChapterId, Podcast, PodcastEpisode, Post, QueueItem,
    QueueItemId, SleepTimerMode, VoiceMemo,
};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum PlayContent {
    Audiobook {
        audiobook: Audiobook,
        #[serde(default)]
        chapters: Vec<Chapter>,
        #[serde(default)]
        start_chapter: Option<ChapterId>,
    },
    Episode {
        episode: PodcastEpisode,
        #[serde(default)]
        podcast: Option<Podcast>,
        /// The rest of the feed, to queue around the episode.
        #[serde(default)]
        episodes: Vec<PodcastEpisode>,
    },
    Post {
        post: Post,
        #[serde(default)]
        feed: Vec<Post>,
    },
    Memo {
        memo: VoiceMemo,
        #[serde(default)]
        memos: Vec<VoiceMemo>,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayRequest {
    #[serde(flatten)]
    pub content: PlayContent,
    #[serde(default)]
    pub sleep_timer: Option<SleepTimerMode>,
}

/// The arguments for `PlaybackSession::load_and_play`.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackPlan {
    pub item: QueueItem,
    pub context: Option<Vec<QueueItem>>,
}

fn with_context(item: QueueItem, context: Vec<QueueItem>) -> PlaybackPlan {
    PlaybackPlan {
        item,
        context: (!context.is_empty()).then_some(context),
    }
}

impl PlayRequest {
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read play request {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("Invalid play request {}", path.display()))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("Play request is not valid JSON")
    }

    /// Adapt the requested content into the item to start and its queue.
    pub fn plan(&self) -> Result<PlaybackPlan> {
        match &self.content {
            PlayContent::Audiobook {
                audiobook,
                chapters,
                start_chapter,
            } => {
                let queue = audiobook_queue(audiobook, chapters);
                let start = start_chapter
                    .as_ref()
                    .map(|chapter| QueueItemId::for_chapter(&audiobook.id, chapter))
                    .and_then(|id| queue.iter().find(|item| item.id() == &id))
                    .or_else(|| queue.first())
                    .cloned()
                    .with_context(|| format!("Audiobook {} has nothing to play", audiobook.id))?;
                Ok(with_context(start, queue))
            }
            PlayContent::Episode {
                episode,
                podcast,
                episodes,
            } => {
                let item = episode_item(episode, podcast.as_ref())
                    .with_context(|| format!("Episode {} has no playable audio", episode.id))?;
                Ok(with_context(item, episode_queue(episodes, podcast.as_ref())))
            }
            PlayContent::Post { post, feed } => {
                let item = post_item(post)
                    .with_context(|| format!("Post {} has no playable audio", post.id))?;
                Ok(with_context(item, post_queue(feed)))
            }
            PlayContent::Memo { memo, memos } => {
                let item = voice_memo_item(memo)
                    .with_context(|| format!("Voice memo {} has no playable audio", memo.id))?;
                Ok(with_context(item, voice_memo_queue(memos)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const AUDIOBOOK: &str = r#"{
        "type": "audiobook",
        "audiobook": { "id": "book-1", "title": "Long Road", "author": "A. Writer" },
        "chapters": [
            { "id": "ch-1", "title": "One", "audioUrl": "https://cdn.example/1.mp3", "duration": "10:00" },
            { "id": "ch-2", "title": "Two", "audioUrl": "https://cdn.example/2.mp3", "duration": 480 }
        ],
        "startChapter": "ch-2",
        "sleepTimer": "end_of_track"
    }"#;

    #[test]
    fn audiobook_request_starts_at_requested_chapter() {
        let request = PlayRequest::parse(AUDIOBOOK).unwrap();
        assert_eq!(request.sleep_timer, Some(SleepTimerMode::EndOfTrack));

        let plan = request.plan().unwrap();
        assert_eq!(plan.item.title(), "Two");
        assert_eq!(plan.item.duration(), 480.0);
        assert_eq!(plan.context.map(|queue| queue.len()), Some(2));
    }

    #[test]
    fn lone_episode_has_no_context() {
        let request = PlayRequest::parse(
            r#"{
                "type": "episode",
                "episode": { "id": "ep-1", "podcastId": "pod-1", "title": "Pilot",
                             "audioUrl": "https://cdn.example/ep-1.mp3" },
                "podcast": { "id": "pod-1", "title": "Night Drive", "host": "Sam" },
                "sleepTimer": { "minutes": 15 }
            }"#,
        )
        .unwrap();

        let plan = request.plan().unwrap();
        assert_eq!(plan.item.artist(), Some("Sam"));
        assert_eq!(plan.context, None);
        assert_eq!(request.sleep_timer, Some(SleepTimerMode::Minutes(15)));
    }

    #[test]
    fn text_post_is_rejected() {
        let request = PlayRequest::parse(
            r#"{
                "type": "post",
                "post": { "id": "p-1", "kind": "text",
                          "author": { "id": "u-1", "displayName": "Dan" } }
            }"#,
        )
        .unwrap();

        let err = request.plan().unwrap_err();
        assert!(err.to_string().contains("no playable audio"));
    }

    #[tokio::test]
    async fn loads_request_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(AUDIOBOOK.as_bytes()).unwrap();

        let request = PlayRequest::load(file.path()).await.unwrap();
        assert!(matches!(request.content, PlayContent::Audiobook { .. }));
    }

    #[tokio::test]
    async fn unreadable_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");

        let err = PlayRequest::load(&missing).await.unwrap_err();
        assert!(format!("{err:#}").contains("missing.json"));
    }
}
