//! Simple test fixtures used across unit tests.

use ridecast_domain::{
    EpisodeId, PodcastId, QueueItem, QueueItemId, QueueItemMetadata,
};

use crate::ports::outbound::ApiError;

pub fn api_rejected(msg: &str) -> ApiError {
    ApiError::status(400, msg)
}

/// A podcast episode item with the given id and duration in seconds.
pub fn episode(id: &str, duration: f64) -> QueueItem {
    let episode_id = EpisodeId::new(id);
    QueueItem::new(
        QueueItemId::for_episode(&episode_id),
        format!("Episode {id}"),
        format!("https://cdn.example/{id}.mp3"),
        duration,
        QueueItemMetadata::Podcast {
            podcast_id: PodcastId::new("pod-1"),
            episode_id,
            episode_number: None,
        },
    )
    .unwrap_or_else(|err| panic!("fixture episode {id} is invalid: {err}"))
}

/// An episode whose audio URL the fake and simulated engines refuse to load.
pub fn broken_episode(id: &str) -> QueueItem {
    let episode_id = EpisodeId::new(id);
    QueueItem::new(
        QueueItemId::for_episode(&episode_id),
        format!("Broken {id}"),
        format!("https://cdn.example/{id}.invalid"),
        60.0,
        QueueItemMetadata::Podcast {
            podcast_id: PodcastId::new("pod-1"),
            episode_id,
            episode_number: None,
        },
    )
    .unwrap_or_else(|err| panic!("fixture episode {id} is invalid: {err}"))
}

/// Three episodes `a`, `b`, `c` of five minutes each.
pub fn three_episodes() -> Vec<QueueItem> {
    vec![episode("a", 300.0), episode("b", 300.0), episode("c", 300.0)]
}
