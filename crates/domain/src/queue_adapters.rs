//! Queue adapters - pure mappings from backend content to [`QueueItem`]s.
//!
//! These are the only functions that know the shape of each source type.
//! The same input always produces the same item id. Items without a usable
//! audio URL are skipped rather than reported.

use crate::common::RawDuration;
use crate::entities::{Audiobook, Chapter, Podcast, PodcastEpisode, Post, VoiceMemo};
use crate::ids::QueueItemId;
use crate::value_objects::{QueueItem, QueueItemMetadata};

/// One item per chapter, or a single item for the book itself when it has no chapters.
pub fn audiobook_queue(audiobook: &Audiobook, chapters: &[Chapter]) -> Vec<QueueItem> {
    if chapters.is_empty() {
        return audiobook_item(audiobook).into_iter().collect();
    }

    chapters
        .iter()
        .filter_map(|chapter| chapter_item(audiobook, chapter))
        .collect()
}

fn audiobook_item(audiobook: &Audiobook) -> Option<QueueItem> {
    let audio_url = audiobook.audio_url.as_deref()?;
    QueueItem::new(
        QueueItemId::for_audiobook(&audiobook.id),
        audiobook.title.clone(),
        audio_url,
        RawDuration::seconds_or_zero(audiobook.duration.as_ref()),
        QueueItemMetadata::Audiobook {
            audiobook_id: audiobook.id.clone(),
            chapter_id: None,
            chapter_number: None,
            narrator: audiobook.narrator.clone(),
        },
    )
    .ok()
    .map(|item| {
        item.with_artist(audiobook.author.clone())
            .with_artwork(audiobook.cover_url.clone())
    })
}

fn chapter_item(audiobook: &Audiobook, chapter: &Chapter) -> Option<QueueItem> {
    QueueItem::new(
        QueueItemId::for_chapter(&audiobook.id, &chapter.id),
        chapter.title.clone(),
        chapter.audio_url.as_str(),
        RawDuration::seconds_or_zero(chapter.duration.as_ref()),
        QueueItemMetadata::Audiobook {
            audiobook_id: audiobook.id.clone(),
            chapter_id: Some(chapter.id.clone()),
            chapter_number: chapter.chapter_number,
            narrator: audiobook.narrator.clone(),
        },
    )
    .ok()
    .map(|item| {
        item.with_artist(audiobook.author.clone())
            .with_artwork(audiobook.cover_url.clone())
    })
}

/// An episode, optionally decorated with its show's host and cover art.
pub fn episode_item(episode: &PodcastEpisode, podcast: Option<&Podcast>) -> Option<QueueItem> {
    let artist = podcast.and_then(|p| p.host.clone().or_else(|| Some(p.title.clone())));
    let artwork = episode
        .artwork_url
        .clone()
        .or_else(|| podcast.and_then(|p| p.cover_url.clone()));

    QueueItem::new(
        QueueItemId::for_episode(&episode.id),
        episode.title.clone(),
        episode.audio_url.as_str(),
        RawDuration::seconds_or_zero(episode.duration.as_ref()),
        QueueItemMetadata::Podcast {
            podcast_id: episode.podcast_id.clone(),
            episode_id: episode.id.clone(),
            episode_number: episode.episode_number,
        },
    )
    .ok()
    .map(|item| item.with_artist(artist).with_artwork(artwork))
}

pub fn episode_queue(episodes: &[PodcastEpisode], podcast: Option<&Podcast>) -> Vec<QueueItem> {
    episodes
        .iter()
        .filter_map(|episode| episode_item(episode, podcast))
        .collect()
}

/// The audio clip of a social post. Text posts and posts without audio yield nothing.
pub fn post_item(post: &Post) -> Option<QueueItem> {
    let audio_url = post.playable_url()?;
    let title = post
        .caption
        .as_deref()
        .map(str::trim)
        .filter(|caption| !caption.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("{} {}", post.author.display_name, post.kind));

    QueueItem::new(
        QueueItemId::for_post(post.kind.as_str(), &post.id),
        title,
        audio_url,
        RawDuration::seconds_or_zero(post.duration.as_ref()),
        QueueItemMetadata::Post {
            post_id: post.id.clone(),
            kind: post.kind,
            author_id: post.author.id.clone(),
        },
    )
    .ok()
    .map(|item| {
        item.with_artist(Some(post.author.display_name.clone()))
            .with_artwork(post.author.avatar_url.clone())
    })
}

pub fn post_queue(posts: &[Post]) -> Vec<QueueItem> {
    posts.iter().filter_map(post_item).collect()
}

pub fn voice_memo_item(memo: &VoiceMemo) -> Option<QueueItem> {
    QueueItem::new(
        QueueItemId::for_voice_memo(&memo.id),
        memo.title.clone(),
        memo.audio_url.as_str(),
        RawDuration::seconds_or_zero(memo.duration.as_ref()),
        QueueItemMetadata::VoiceMemo {
            memo_id: memo.id.clone(),
            category: memo.category.clone(),
        },
    )
    .ok()
}

pub fn voice_memo_queue(memos: &[VoiceMemo]) -> Vec<QueueItem> {
    memos.iter().filter_map(voice_memo_item).collect()
}
