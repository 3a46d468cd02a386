//! In-memory `AudioEnginePort` for tests.
//!
//! Records every call, can hold loads open until released, fails loads for
//! URLs ending in `.invalid` (or any URL registered with `fail_loads_for`),
//! and lets tests emit engine reports by hand. It never advances position
//! on its own.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tokio::sync::{broadcast, watch};

use crate::ports::outbound::{AudioEnginePort, EngineError, EngineEvent, SourceHandle};

#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    Load(String),
    Play(SourceHandle),
    Pause(SourceHandle),
    Seek(SourceHandle, f64),
    Stop(SourceHandle),
}

#[derive(Default)]
struct State {
    next_handle: u64,
    calls: Vec<EngineCall>,
    loaded: HashSet<SourceHandle>,
    last_handle: Option<SourceHandle>,
    failing_urls: HashSet<String>,
    fail_playback: bool,
}

#[derive(Clone)]
pub struct FakeAudioEngine {
    state: Arc<Mutex<State>>,
    load_gate: Arc<watch::Sender<bool>>,
    events: broadcast::Sender<EngineEvent>,
}

impl Default for FakeAudioEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeAudioEngine {
    pub fn new() -> Self {
        let (load_gate, _) = watch::channel(true);
        let (events, _) = broadcast::channel(64);
        Self {
            state: Arc::new(Mutex::new(State::default())),
            load_gate: Arc::new(load_gate),
            events,
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Loads started from now on wait until [`release_loads`](Self::release_loads).
    pub fn hold_loads(&self) {
        self.load_gate.send_replace(false);
    }

    pub fn release_loads(&self) {
        self.load_gate.send_replace(true);
    }

    pub fn fail_loads_for(&self, url: impl Into<String>) {
        self.lock().failing_urls.insert(url.into());
    }

    /// Make `play`, `pause` and `seek` fail until switched back.
    pub fn fail_playback(&self, fail: bool) {
        self.lock().fail_playback = fail;
    }

    pub fn calls(&self) -> Vec<EngineCall> {
        self.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// Sources loaded and not yet stopped.
    pub fn loaded_sources(&self) -> Vec<SourceHandle> {
        let mut loaded: Vec<_> = self.lock().loaded.iter().copied().collect();
        loaded.sort();
        loaded
    }

    pub fn last_handle(&self) -> Option<SourceHandle> {
        self.lock().last_handle
    }

    pub fn emit(&self, event: EngineEvent) {
        let _ = self.events.send(event);
    }

    pub fn emit_progress(&self, handle: SourceHandle, position: f64, duration: f64) {
        self.emit(EngineEvent::progress(handle, position, duration));
    }

    pub fn emit_finished(&self, handle: SourceHandle) {
        self.emit(EngineEvent::finished(handle));
    }

    fn transport_call(&self, call: EngineCall) -> Result<(), EngineError> {
        let mut state = self.lock();
        state.calls.push(call);
        if state.fail_playback {
            Err(EngineError::playback("output device unavailable"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl AudioEnginePort for FakeAudioEngine {
    async fn load(&self, url: &str) -> Result<SourceHandle, EngineError> {
        self.lock().calls.push(EngineCall::Load(url.to_string()));

        let mut gate = self.load_gate.subscribe();
        gate.wait_for(|open| *open)
            .await
            .map_err(|_| EngineError::Unavailable("fake engine dropped".into()))?;

        let mut state = self.lock();
        if url.ends_with(".invalid") || state.failing_urls.contains(url) {
            return Err(EngineError::load_failed(url, "source not found"));
        }
        state.next_handle += 1;
        let handle = SourceHandle::new(state.next_handle);
        state.loaded.insert(handle);
        state.last_handle = Some(handle);
        Ok(handle)
    }

    async fn play(&self, handle: SourceHandle) -> Result<(), EngineError> {
        self.transport_call(EngineCall::Play(handle))
    }

    async fn pause(&self, handle: SourceHandle) -> Result<(), EngineError> {
        self.transport_call(EngineCall::Pause(handle))
    }

    async fn seek(&self, handle: SourceHandle, position: f64) -> Result<(), EngineError> {
        self.transport_call(EngineCall::Seek(handle, position))
    }

    async fn stop(&self, handle: SourceHandle) -> Result<(), EngineError> {
        let mut state = self.lock();
        state.calls.push(EngineCall::Stop(handle));
        state.loaded.remove(&handle);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.events.subscribe()
    }
}
