use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::RawDuration;
use crate::ids::{PostId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostKind {
    Text,
    Audio,
    Voice,

    /// Forward-compatibility fallback for newer variants.
    #[serde(other)]
    Unknown,
}

impl PostKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostKind::Text => "text",
            PostKind::Audio => "audio",
            PostKind::Voice => "voice",
            PostKind::Unknown => "unknown",
        }
    }

    /// Whether posts of this kind carry a playable clip.
    pub fn has_audio(&self) -> bool {
        matches!(self, PostKind::Audio | PostKind::Voice)
    }
}

impl fmt::Display for PostKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostAuthor {
    pub id: UserId,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    pub kind: PostKind,
    pub author: PostAuthor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<RawDuration>,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub play_count: u64,
}

impl Post {
    /// The clip URL, if this post has one worth playing.
    pub fn playable_url(&self) -> Option<&str> {
        if !self.kind.has_audio() {
            return None;
        }
        self.audio_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}
