//! In-process audio engine that plays nothing but keeps time.
//!
//! Each playing source owns a ticker task that advances its position by one
//! tick per tick interval and publishes a progress report, then a finished
//! report when it reaches its duration. Used by the binary and end-to-end
//! tests; nothing is decoded.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::ports::outbound::{AudioEnginePort, EngineError, EngineEvent, SourceHandle};

const EVENT_CAPACITY: usize = 256;

/// Duration for URLs nobody registered.
const DEFAULT_SOURCE_DURATION: f64 = 180.0;

struct Source {
    url: String,
    position: f64,
    duration: f64,
    playing: bool,
    ticker: Option<JoinHandle<()>>,
}

impl Source {
    fn halt(&mut self) {
        self.playing = false;
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}

#[derive(Default)]
struct State {
    next_handle: u64,
    durations: HashMap<String, f64>,
    sources: HashMap<SourceHandle, Source>,
}

fn lock(state: &Mutex<State>) -> MutexGuard<'_, State> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Clone)]
pub struct SimulatedAudioEngine {
    tick: Duration,
    load_latency: Duration,
    default_duration: f64,
    state: Arc<Mutex<State>>,
    events: broadcast::Sender<EngineEvent>,
}

impl SimulatedAudioEngine {
    /// `tick` is both the report cadence and the amount of audio each report
    /// advances, so sources play in real time.
    pub fn new(tick: Duration) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            tick: tick.max(Duration::from_millis(1)),
            load_latency: Duration::ZERO,
            default_duration: DEFAULT_SOURCE_DURATION,
            state: Arc::new(Mutex::new(State::default())),
            events,
        }
    }

    pub fn with_load_latency(mut self, latency: Duration) -> Self {
        self.load_latency = latency;
        self
    }

    pub fn with_default_duration(mut self, seconds: f64) -> Self {
        self.default_duration = seconds.max(0.0);
        self
    }

    /// Declare how long the audio behind `url` is.
    pub fn register_source(&self, url: impl Into<String>, duration: f64) {
        lock(&self.state)
            .durations
            .insert(url.into(), duration.max(0.0));
    }

    pub fn position(&self, handle: SourceHandle) -> Option<f64> {
        lock(&self.state)
            .sources
            .get(&handle)
            .map(|source| source.position)
    }

    pub fn is_playing(&self, handle: SourceHandle) -> bool {
        lock(&self.state)
            .sources
            .get(&handle)
            .is_some_and(|source| source.playing)
    }

    /// URLs of every source currently held, in handle order.
    pub fn loaded_urls(&self) -> Vec<String> {
        let state = lock(&self.state);
        let mut handles: Vec<_> = state.sources.keys().copied().collect();
        handles.sort();
        handles
            .into_iter()
            .filter_map(|handle| state.sources.get(&handle).map(|s| s.url.clone()))
            .collect()
    }

    fn unknown(handle: SourceHandle) -> EngineError {
        EngineError::Unavailable(format!("{handle} is not loaded"))
    }

    fn spawn_ticker(&self, handle: SourceHandle) -> JoinHandle<()> {
        let tick = self.tick;
        let state = Arc::clone(&self.state);
        let events = self.events.clone();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + tick, tick);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;
                let (position, duration) = {
                    let mut state = lock(&state);
                    let Some(source) = state.sources.get_mut(&handle) else {
                        return;
                    };
                    if !source.playing {
                        return;
                    }
                    source.position = (source.position + tick.as_secs_f64()).min(source.duration);
                    if source.position >= source.duration {
                        source.playing = false;
                        source.ticker = None;
                    }
                    (source.position, source.duration)
                };

                let _ = events.send(EngineEvent::progress(handle, position, duration));
                if position >= duration {
                    tracing::debug!(%handle, "Simulated source finished");
                    let _ = events.send(EngineEvent::finished(handle));
                    return;
                }
            }
        })
    }
}

#[async_trait]
impl AudioEnginePort for SimulatedAudioEngine {
    async fn load(&self, url: &str) -> Result<SourceHandle, EngineError> {
        if !self.load_latency.is_zero() {
            tokio::time::sleep(self.load_latency).await;
        }
        if url.trim().is_empty() || url.ends_with(".invalid") {
            return Err(EngineError::load_failed(url, "unsupported source"));
        }

        let mut state = lock(&self.state);
        let duration = state
            .durations
            .get(url)
            .copied()
            .unwrap_or(self.default_duration);
        state.next_handle += 1;
        let handle = SourceHandle::new(state.next_handle);
        state.sources.insert(
            handle,
            Source {
                url: url.to_string(),
                position: 0.0,
                duration,
                playing: false,
                ticker: None,
            },
        );
        tracing::debug!(%handle, url, duration, "Simulated source loaded");
        Ok(handle)
    }

    async fn play(&self, handle: SourceHandle) -> Result<(), EngineError> {
        let mut state = lock(&self.state);
        let source = state
            .sources
            .get_mut(&handle)
            .ok_or_else(|| Self::unknown(handle))?;
        if source.playing {
            return Ok(());
        }
        if source.position >= source.duration {
            source.position = 0.0;
        }
        source.playing = true;
        source.ticker = Some(self.spawn_ticker(handle));
        Ok(())
    }

    async fn pause(&self, handle: SourceHandle) -> Result<(), EngineError> {
        let mut state = lock(&self.state);
        let source = state
            .sources
            .get_mut(&handle)
            .ok_or_else(|| Self::unknown(handle))?;
        source.halt();
        Ok(())
    }

    async fn seek(&self, handle: SourceHandle, position: f64) -> Result<(), EngineError> {
        let (position, duration) = {
            let mut state = lock(&self.state);
            let source = state
                .sources
                .get_mut(&handle)
                .ok_or_else(|| Self::unknown(handle))?;
            source.position = position.clamp(0.0, source.duration);
            (source.position, source.duration)
        };
        let _ = self
            .events
            .send(EngineEvent::progress(handle, position, duration));
        Ok(())
    }

    async fn stop(&self, handle: SourceHandle) -> Result<(), EngineError> {
        if let Some(mut source) = lock(&self.state).sources.remove(&handle) {
            source.halt();
            tracing::debug!(%handle, "Simulated source released");
        }
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::outbound::EngineEventKind;

    fn engine() -> SimulatedAudioEngine {
        SimulatedAudioEngine::new(Duration::from_secs(1))
    }

    fn drain(rx: &mut broadcast::Receiver<EngineEvent>) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[tokio::test(start_paused = true)]
    async fn plays_through_and_reports_finish() {
        let engine = engine();
        engine.register_source("https://cdn.example/short.mp3", 3.0);
        let mut rx = engine.subscribe();

        let handle = engine.load("https://cdn.example/short.mp3").await.unwrap();
        engine.play(handle).await.unwrap();
        tokio::time::sleep(Duration::from_millis(3500)).await;

        let kinds: Vec<_> = drain(&mut rx).into_iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                EngineEventKind::Progress { position: 1.0, duration: 3.0 },
                EngineEventKind::Progress { position: 2.0, duration: 3.0 },
                EngineEventKind::Progress { position: 3.0, duration: 3.0 },
                EngineEventKind::Finished,
            ]
        );
        assert!(!engine.is_playing(handle));
    }

    #[tokio::test(start_paused = true)]
    async fn pause_holds_position() {
        let engine = engine();
        let handle = engine.load("https://cdn.example/a.mp3").await.unwrap();
        engine.play(handle).await.unwrap();
        tokio::time::sleep(Duration::from_millis(2500)).await;
        engine.pause(handle).await.unwrap();
        tokio::time::sleep(Duration::from_secs(10)).await;

        assert_eq!(engine.position(handle), Some(2.0));
    }

    #[tokio::test(start_paused = true)]
    async fn stop_releases_source_and_silences_reports() {
        let engine = engine();
        let mut rx = engine.subscribe();
        let handle = engine.load("https://cdn.example/a.mp3").await.unwrap();
        engine.play(handle).await.unwrap();
        engine.stop(handle).await.unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert!(drain(&mut rx).is_empty());
        assert!(engine.loaded_urls().is_empty());
        assert!(engine.play(handle).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_urls_fail_to_load() {
        let err = engine()
            .load("https://cdn.example/gone.invalid")
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::LoadFailed { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn seek_is_clamped_and_reported() {
        let engine = engine().with_default_duration(60.0);
        let mut rx = engine.subscribe();
        let handle = engine.load("https://cdn.example/a.mp3").await.unwrap();

        engine.seek(handle, 90.0).await.unwrap();

        assert_eq!(engine.position(handle), Some(60.0));
        assert_eq!(drain(&mut rx), vec![EngineEvent::progress(handle, 60.0, 60.0)]);
    }
}
