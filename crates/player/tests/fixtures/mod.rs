#![allow(dead_code)]

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use ridecast_domain::{
    episode_queue, LikeState, Podcast, PodcastEpisode, PodcastId, PostId, QueueItem, RawDuration,
    UserId,
};
use ridecast_player::infrastructure::SimulatedAudioEngine;
use ridecast_player::infrastructure::testing::TokioClock;
use ridecast_player::ports::outbound::{ApiError, SocialApiPort};
use ridecast_player::{PlaybackSession, SessionConfig};

/// Social API that records calls and rejects every mutation with `message`.
#[derive(Default)]
pub struct RejectingSocialApi {
    pub message: String,
    pub calls: Mutex<Vec<String>>,
}

impl RejectingSocialApi {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn reject(&self, call: String) -> ApiError {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
        ApiError::status(403, self.message.clone())
    }
}

#[async_trait]
impl SocialApiPort for RejectingSocialApi {
    async fn follow_user(&self, user_id: &UserId) -> Result<(), ApiError> {
        Err(self.reject(format!("follow {user_id}")))
    }

    async fn unfollow_user(&self, user_id: &UserId) -> Result<(), ApiError> {
        Err(self.reject(format!("unfollow {user_id}")))
    }

    async fn is_following(&self, _user_id: &UserId) -> Result<bool, ApiError> {
        Ok(false)
    }

    async fn like_post(&self, post_id: &PostId) -> Result<(), ApiError> {
        Err(self.reject(format!("like {post_id}")))
    }

    async fn unlike_post(&self, post_id: &PostId) -> Result<(), ApiError> {
        Err(self.reject(format!("unlike {post_id}")))
    }

    async fn post_like_status(&self, _post_id: &PostId) -> Result<LikeState, ApiError> {
        Ok(LikeState::new(false, 7))
    }

    async fn play_post(&self, post_id: &PostId, _duration: f64) -> Result<Option<u64>, ApiError> {
        Err(self.reject(format!("play {post_id}")))
    }
}

pub fn night_drive() -> Podcast {
    Podcast {
        id: PodcastId::new("pod-1"),
        title: "Night Drive".to_string(),
        host: Some("Sam".to_string()),
        cover_url: Some("https://cdn.example/pod-1.jpg".to_string()),
    }
}

/// Episodes with the given durations in seconds, registered with `engine`.
pub fn episodes(engine: &SimulatedAudioEngine, durations: &[f64]) -> Vec<QueueItem> {
    let episodes: Vec<PodcastEpisode> = durations
        .iter()
        .enumerate()
        .map(|(n, &duration)| PodcastEpisode {
            id: format!("ep-{n}").into(),
            podcast_id: PodcastId::new("pod-1"),
            title: format!("Episode {n}"),
            audio_url: format!("https://cdn.example/ep-{n}.mp3"),
            episode_number: Some(n as u32 + 1),
            artwork_url: None,
            duration: Some(RawDuration::Seconds(duration)),
        })
        .collect();

    let items = episode_queue(&episodes, Some(&night_drive()));
    for item in &items {
        engine.register_source(item.audio_url(), item.duration());
    }
    items
}

pub fn engine() -> SimulatedAudioEngine {
    SimulatedAudioEngine::new(Duration::from_secs(1))
}

pub fn start(engine: &SimulatedAudioEngine, config: SessionConfig) -> PlaybackSession {
    PlaybackSession::start(
        Arc::new(engine.clone()),
        Arc::new(TokioClock::evening()),
        config,
    )
}

pub async fn run_for(duration: Duration) {
    tokio::time::sleep(duration).await;
}

/// An episode the simulated engine refuses to load.
pub fn broken_episode() -> QueueItem {
    let episode = PodcastEpisode {
        id: "ep-broken".into(),
        podcast_id: PodcastId::new("pod-1"),
        title: "Lost Episode".to_string(),
        audio_url: "https://cdn.example/ep-broken.invalid".to_string(),
        episode_number: None,
        artwork_url: None,
        duration: Some(RawDuration::Text("4:00".to_string())),
    };
    ridecast_domain::episode_item(&episode, Some(&night_drive())).unwrap()
}
