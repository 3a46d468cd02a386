//! Ridecast Player - composition root binary.
//!
//! Plays a JSON play request on the simulated engine and logs the full
//! player view until playback stops.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ridecast_player::application::services::{
    NotificationCenter, PlaybackSession, PlaybackSnapshot,
};
use ridecast_player::infrastructure::{
    PlayRequest, PlayerConfig, SimulatedAudioEngine, SystemClock,
};
use ridecast_player::presentation::FullPlayer;

#[tokio::main]
async fn main() -> Result<()> {
    load_dotenv_from_repo_root();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ridecast_player=debug,ridecast_domain=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Ridecast Player");

    let request_path = std::env::args()
        .nth(1)
        .context("usage: ridecast-player <request.json>")?;

    let config = PlayerConfig::from_env()?;
    tracing::info!("Configuration loaded");
    tracing::info!("  Progress interval: {:?}", config.progress_interval);
    tracing::info!("  Auto-advance: {}", config.session.auto_advance);

    let request = PlayRequest::load(&request_path).await?;
    let plan = request.plan()?;

    let engine = SimulatedAudioEngine::new(config.progress_interval);
    for item in plan.context.iter().flatten().chain([&plan.item]) {
        if item.duration() > 0.0 {
            engine.register_source(item.audio_url(), item.duration());
        }
    }

    let clock = Arc::new(SystemClock::new());
    let session = PlaybackSession::start(Arc::new(engine), clock.clone(), config.session.clone());
    let notifications = NotificationCenter::new(clock);
    let player = FullPlayer::new(session.clone(), config.default_sleep_minutes);

    if let Err(error) = session.load_and_play(plan.item, plan.context).await {
        notifications.report_session_error(&error);
        session.dispose().await?;
        return Err(error).context("Playback did not start");
    }

    if let Some(mode) = request.sleep_timer {
        match session.set_sleep_timer(mode).await? {
            Some(timer) => tracing::info!(end_time = %timer.end_time(), "Sleep timer armed"),
            None => tracing::info!(?mode, "Sleep timer had nothing to wait for"),
        }
    }

    let mut updates = session.subscribe();
    let mut reported_error = None;
    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = updates.borrow_and_update().clone();
                if let Some(view) = player.view() {
                    tracing::info!(
                        title = %view.title,
                        position = %view.position_label,
                        duration = %view.duration_label,
                        sleep = view.sleep_label.as_deref().unwrap_or("off"),
                        "Now playing"
                    );
                }
                relay_session_error(&notifications, &mut reported_error, &snapshot);
                if !snapshot.is_playing && !snapshot.is_loading {
                    tracing::info!("Playback stopped");
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Received Ctrl+C, stopping playback");
                break;
            }
        }
    }

    session.dispose().await?;
    Ok(())
}

/// Notify when the session's error changes, not on every snapshot that
/// still carries it.
fn relay_session_error(
    notifications: &NotificationCenter,
    reported: &mut Option<String>,
    snapshot: &PlaybackSnapshot,
) {
    if snapshot.last_error == *reported {
        return;
    }
    if let Some(message) = &snapshot.last_error {
        notifications.notify_error(message.clone());
    }
    reported.clone_from(&snapshot.last_error);
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_error_is_notified_once_per_change() {
        let notifications = NotificationCenter::new(Arc::new(SystemClock::new()));
        let mut reported = None;
        let mut snapshot = PlaybackSnapshot::default();

        relay_session_error(&notifications, &mut reported, &snapshot);
        assert!(notifications.is_empty());

        snapshot.last_error = Some("Playback stopped unexpectedly.".to_string());
        relay_session_error(&notifications, &mut reported, &snapshot);
        snapshot.position = 12.0;
        relay_session_error(&notifications, &mut reported, &snapshot);
        assert_eq!(notifications.len(), 1);

        snapshot.last_error = None;
        relay_session_error(&notifications, &mut reported, &snapshot);
        snapshot.last_error = Some("Playback stopped unexpectedly.".to_string());
        relay_session_error(&notifications, &mut reported, &snapshot);
        assert_eq!(notifications.len(), 2);
    }
}
