//! Domain entities - content as delivered by the backend
//!
//! These mirror the API payloads closely. They are not playable on their own;
//! `queue_adapters` turns them into [`crate::QueueItem`]s.

mod audiobook;
mod podcast;
mod post;
mod voice_memo;

pub use audiobook::{Audiobook, Chapter};
pub use podcast::{Podcast, PodcastEpisode};
pub use post::{Post, PostAuthor, PostKind};
pub use voice_memo::VoiceMemo;
