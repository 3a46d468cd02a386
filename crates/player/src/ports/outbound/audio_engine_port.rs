//! Audio engine port - the opaque capability that decodes and outputs audio.
//!
//! The session drives the engine through this trait and never assumes a
//! decoding format. Every loaded source is identified by a [`SourceHandle`];
//! reports published on the event channel carry the handle they belong to,
//! so consumers can drop reports from sources they have already released.

use std::fmt;

use async_trait::async_trait;
use tokio::sync::broadcast;

/// Identity of one loaded source inside the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceHandle(u64);

impl SourceHandle {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "src-{}", self.0)
    }
}

/// Failures reported by the engine. All of them are recoverable.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("Failed to load {url}: {reason}")]
    LoadFailed { url: String, reason: String },

    #[error("Playback error: {0}")]
    Playback(String),

    #[error("Audio engine unavailable: {0}")]
    Unavailable(String),
}

impl EngineError {
    pub fn load_failed(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::LoadFailed {
            url: url.into(),
            reason: reason.into(),
        }
    }

    pub fn playback(message: impl Into<String>) -> Self {
        Self::Playback(message.into())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEventKind {
    /// Periodic report, in seconds. `duration` is 0 while unknown.
    Progress { position: f64, duration: f64 },
    /// The source played through to its end.
    Finished,
    /// The source failed after loading.
    Failed(EngineError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineEvent {
    pub handle: SourceHandle,
    pub kind: EngineEventKind,
}

impl EngineEvent {
    pub fn progress(handle: SourceHandle, position: f64, duration: f64) -> Self {
        Self {
            handle,
            kind: EngineEventKind::Progress { position, duration },
        }
    }

    pub fn finished(handle: SourceHandle) -> Self {
        Self {
            handle,
            kind: EngineEventKind::Finished,
        }
    }

    pub fn failed(handle: SourceHandle, error: EngineError) -> Self {
        Self {
            handle,
            kind: EngineEventKind::Failed(error),
        }
    }
}

/// Contract for the platform audio engine.
///
/// `stop` releases the source; the handle must not be used afterwards.
/// `pause` keeps the source loaded so playback can resume without a reload.
#[async_trait]
pub trait AudioEnginePort: Send + Sync {
    async fn load(&self, url: &str) -> Result<SourceHandle, EngineError>;

    async fn play(&self, handle: SourceHandle) -> Result<(), EngineError>;

    async fn pause(&self, handle: SourceHandle) -> Result<(), EngineError>;

    async fn seek(&self, handle: SourceHandle, position: f64) -> Result<(), EngineError>;

    async fn stop(&self, handle: SourceHandle) -> Result<(), EngineError>;

    /// Subscribe to progress, end-of-track and failure reports for all sources.
    fn subscribe(&self) -> broadcast::Receiver<EngineEvent>;
}
