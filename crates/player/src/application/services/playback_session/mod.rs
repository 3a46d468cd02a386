//! Playback session - the single in-memory owner of what is playing.
//!
//! [`PlaybackSession::start`] spawns two tasks:
//!
//! - the session actor, which owns the queue, transport state and sleep timer
//!   and applies every command, engine result and timer firing in order
//! - the engine worker, which executes engine commands FIFO and runs loads
//!   that are abandoned once superseded
//!
//! The returned handle is cheap to clone and is what surfaces hold. State is
//! observed through a `watch` channel of [`PlaybackSnapshot`]s.
//!
//! # Stale results
//!
//! Every load bumps the session generation. Load results, command results and
//! engine reports that belong to an earlier generation (or to a released
//! source) are dropped, so a superseded load can never resurrect old state.

mod actor;
mod commands;
mod engine_worker;
mod snapshot;


use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};

use ridecast_domain::{QueueItem, SleepTimer, SleepTimerMode};

use self::actor::SessionActor;
use self::commands::SessionCommand;
use self::engine_worker::EngineWorker;
use crate::application::error::SessionError;
use crate::ports::outbound::{AudioEnginePort, ClockPort};

pub use snapshot::PlaybackSnapshot;

/// How a load-type command resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The engine loaded the item and started playing it (or holds it
    /// paused, if a pause arrived while it was loading).
    Started,
    /// A later command replaced this load before it settled.
    Superseded,
    /// Nothing to load: a skip at the queue boundary, an out-of-range index,
    /// or a skip-previous that restarted the current item.
    Unchanged,
}

/// Session behaviour knobs.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Move to the next queue item when the current one finishes.
    pub auto_advance: bool,
    /// When positive, skip-previous past this many seconds restarts the
    /// current item instead of moving back.
    pub skip_previous_restart_secs: f64,
    /// Capacity of the command channel.
    pub command_buffer: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            auto_advance: true,
            skip_previous_restart_secs: 0.0,
            command_buffer: 64,
        }
    }
}

/// Handle to a running playback session.
#[derive(Clone)]
pub struct PlaybackSession {
    commands: mpsc::Sender<SessionCommand>,
    state: watch::Receiver<PlaybackSnapshot>,
    clock: Arc<dyn ClockPort>,
}

impl PlaybackSession {
    /// Start a session on the current tokio runtime.
    pub fn start(
        engine: Arc<dyn AudioEnginePort>,
        clock: Arc<dyn ClockPort>,
        config: SessionConfig,
    ) -> Self {
        let (command_tx, command_rx) = mpsc::channel(config.command_buffer.max(1));
        let (internal_tx, internal_rx) = mpsc::unbounded_channel();
        let (job_tx, job_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(PlaybackSnapshot::default());
        let (generation_tx, generation_rx) = watch::channel(0);

        let events = engine.subscribe();
        let worker = EngineWorker::new(engine, generation_rx, internal_tx.clone());
        let worker = tokio::spawn(worker.run(job_rx));

        let actor = SessionActor::new(
            config,
            Arc::clone(&clock),
            state_tx,
            job_tx,
            internal_tx,
            generation_tx,
        );
        tokio::spawn(actor.run(command_rx, internal_rx, events, worker));

        tracing::info!("Playback session started");

        Self {
            commands: command_tx,
            state: state_rx,
            clock,
        }
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> SessionCommand,
    ) -> Result<T, SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.commands
            .send(build(reply_tx))
            .await
            .map_err(|_| SessionError::Closed)?;
        reply_rx.await.map_err(|_| SessionError::Closed)
    }

    /// Replace the current item and start playing it.
    ///
    /// With a `context`, the queue becomes that list positioned on `item`;
    /// otherwise it is just `item`. Resolves once the engine settles the load.
    pub async fn load_and_play(
        &self,
        item: QueueItem,
        context: Option<Vec<QueueItem>>,
    ) -> Result<LoadOutcome, SessionError> {
        self.request(|reply| SessionCommand::LoadAndPlay {
            item,
            context,
            reply,
        })
        .await?
    }

    /// No-op when nothing is loaded.
    pub async fn toggle_play_pause(&self) -> Result<(), SessionError> {
        self.request(|reply| SessionCommand::TogglePlayPause { reply })
            .await?
    }

    pub async fn play(&self) -> Result<(), SessionError> {
        self.request(|reply| SessionCommand::Play { reply }).await?
    }

    pub async fn pause(&self) -> Result<(), SessionError> {
        self.request(|reply| SessionCommand::Pause { reply }).await?
    }

    /// Seek within the current item; the position is clamped to its duration.
    pub async fn seek(&self, position: f64) -> Result<(), SessionError> {
        self.request(|reply| SessionCommand::Seek { position, reply })
            .await?
    }

    /// Does not wrap at the end of the queue.
    pub async fn skip_to_next(&self) -> Result<LoadOutcome, SessionError> {
        self.request(|reply| SessionCommand::SkipToNext { reply })
            .await?
    }

    /// Does not wrap at the start of the queue.
    pub async fn skip_to_previous(&self) -> Result<LoadOutcome, SessionError> {
        self.request(|reply| SessionCommand::SkipToPrevious { reply })
            .await?
    }

    pub async fn play_queue_index(&self, index: usize) -> Result<LoadOutcome, SessionError> {
        self.request(|reply| SessionCommand::PlayQueueIndex { index, reply })
            .await?
    }

    /// Arm the sleep timer, replacing any armed one. Returns `None` when the
    /// mode leaves nothing to wait for.
    pub async fn set_sleep_timer(
        &self,
        mode: SleepTimerMode,
    ) -> Result<Option<SleepTimer>, SessionError> {
        self.request(|reply| SessionCommand::SetSleepTimer { mode, reply })
            .await
    }

    pub async fn clear_sleep_timer(&self) -> Result<(), SessionError> {
        self.request(|reply| SessionCommand::ClearSleepTimer { reply })
            .await
    }

    /// Release the engine source and clear the queue, transport and sleep timer.
    pub async fn reset(&self) -> Result<(), SessionError> {
        self.request(|reply| SessionCommand::Reset { reply }).await
    }

    /// Reset, then stop the session. Later commands fail with [`SessionError::Closed`].
    pub async fn dispose(&self) -> Result<(), SessionError> {
        self.request(|reply| SessionCommand::Dispose { reply })
            .await
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<PlaybackSnapshot> {
        self.state.clone()
    }

    /// Time left on the armed sleep timer, for countdown display.
    pub fn sleep_timer_remaining(&self) -> Option<Duration> {
        let end_time = self.state.borrow().sleep_timer_end?;
        Some((end_time - self.clock.now()).to_std().unwrap_or(Duration::ZERO))
    }
}
