use std::fmt;

use serde::{Deserialize, Serialize};

/// Backend ids are opaque strings; we only ever compare and format them.
macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

// Content IDs
define_id!(AudiobookId);
define_id!(ChapterId);
define_id!(PodcastId);
define_id!(EpisodeId);
define_id!(PostId);
define_id!(VoiceMemoId);

// People
define_id!(UserId);

// Playback
define_id!(QueueItemId);

impl QueueItemId {
    /// Id for an audiobook played as a whole (no chapters).
    pub fn for_audiobook(audiobook_id: &AudiobookId) -> Self {
        Self(format!("audiobook:{}", audiobook_id))
    }

    /// Chapters are scoped by their parent book so two books can share chapter ids.
    pub fn for_chapter(audiobook_id: &AudiobookId, chapter_id: &ChapterId) -> Self {
        Self(format!("audiobook:{}:{}", audiobook_id, chapter_id))
    }

    pub fn for_episode(episode_id: &EpisodeId) -> Self {
        Self(format!("podcast:{}", episode_id))
    }

    /// Posts are prefixed by their kind.
    pub fn for_post(kind: &str, post_id: &PostId) -> Self {
        Self(format!("post:{}:{}", kind, post_id))
    }

    pub fn for_voice_memo(memo_id: &VoiceMemoId) -> Self {
        Self(format!("voicememo:{}", memo_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chapter_ids_are_scoped_by_audiobook() {
        let chapter = ChapterId::new("1");
        let a = QueueItemId::for_chapter(&AudiobookId::new("book-a"), &chapter);
        let b = QueueItemId::for_chapter(&AudiobookId::new("book-b"), &chapter);

        assert_ne!(a, b);
        assert_eq!(a.as_str(), "audiobook:book-a:1");
    }

    #[test]
    fn same_source_yields_same_id() {
        let first = QueueItemId::for_episode(&EpisodeId::new("ep-42"));
        let second = QueueItemId::for_episode(&EpisodeId::from("ep-42"));
        assert_eq!(first, second);
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = PostId::new("abc");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc\"");
        let back: PostId = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(back, id);
    }
}
