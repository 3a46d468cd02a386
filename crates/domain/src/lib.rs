//! Ridecast domain crate.
//!
//! Pure types shared by the playback session and the UI layer:
//!
//! - `entities/` - source content as delivered by the backend (audiobooks,
//!   podcast episodes, social posts, voice memos)
//! - `value_objects/` - [`QueueItem`], transport clamps, sleep timer values and
//!   the optimistic-mutation state machine
//! - `aggregates/` - [`PlaybackQueue`], the ordered queue with its cursor
//! - `queue_adapters` - pure mappings from entities to queue items
//! - `common` - duration parsing and formatting
//!
//! Nothing in this crate performs I/O or depends on an async runtime.

extern crate self as ridecast_domain;

pub mod aggregates;
pub mod common;
pub mod entities;
pub mod error;
pub mod ids;
pub mod queue_adapters;
pub mod value_objects;

pub use aggregates::{PlaybackQueue, QueueMove};
pub use common::{format_duration, parse_duration, sanitize_seconds, RawDuration};
pub use entities::{
    Audiobook, Chapter, Podcast, PodcastEpisode, Post, PostAuthor, PostKind, VoiceMemo,
};
pub use error::DomainError;
pub use ids::{
    AudiobookId, ChapterId, EpisodeId, PodcastId, PostId, QueueItemId, UserId, VoiceMemoId,
};
pub use queue_adapters::{
    audiobook_queue, episode_item, episode_queue, post_item, post_queue, voice_memo_item,
    voice_memo_queue,
};
pub use value_objects::{
    LikeState, MediaType, Optimistic, QueueItem, QueueItemMetadata, SleepTimer, SleepTimerMode,
    TransportState, SLEEP_TIMER_PRESETS,
};
