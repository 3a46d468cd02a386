//! Session actor - the single owner of playback state.
//!
//! User commands, engine results, engine reports and sleep timer firings all
//! arrive as messages and are applied one at a time. Each load bumps the
//! session generation; results tagged with an older generation are discarded.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;

use ridecast_domain::{PlaybackQueue, QueueMove, SleepTimer, SleepTimerMode, TransportState};

use super::commands::{
    CommandReply, EngineJob, InternalEvent, LoadReply, LoadWaiter, SessionCommand,
    TransportAction, TransportJob,
};
use super::{LoadOutcome, PlaybackSnapshot, SessionConfig};
use crate::application::error::SessionError;
use crate::ports::outbound::{
    ClockPort, EngineError, EngineEvent, EngineEventKind, SourceHandle,
};

struct PendingLoad {
    generation: u64,
    waiters: Vec<LoadWaiter>,
}

struct ArmedSleepTimer {
    id: u64,
    timer: SleepTimer,
    task: JoinHandle<()>,
}

pub(super) struct SessionActor {
    config: SessionConfig,
    clock: Arc<dyn ClockPort>,
    state_tx: watch::Sender<PlaybackSnapshot>,
    jobs: mpsc::UnboundedSender<EngineJob>,
    internal_tx: mpsc::UnboundedSender<InternalEvent>,
    latest_generation: watch::Sender<u64>,

    queue: PlaybackQueue,
    transport: TransportState,
    is_playing: bool,
    generation: u64,
    transport_sequence: u64,
    last_play_pause: u64,
    last_seek: u64,
    active_handle: Option<SourceHandle>,
    pending_load: Option<PendingLoad>,
    sleep_timer: Option<ArmedSleepTimer>,
    next_timer_id: u64,
    last_error: Option<String>,
    closing: Option<oneshot::Sender<()>>,
}

impl SessionActor {
    pub(super) fn new(
        config: SessionConfig,
        clock: Arc<dyn ClockPort>,
        state_tx: watch::Sender<PlaybackSnapshot>,
        jobs: mpsc::UnboundedSender<EngineJob>,
        internal_tx: mpsc::UnboundedSender<InternalEvent>,
        latest_generation: watch::Sender<u64>,
    ) -> Self {
        Self {
            config,
            clock,
            state_tx,
            jobs,
            internal_tx,
            latest_generation,
            queue: PlaybackQueue::empty(),
            transport: TransportState::default(),
            is_playing: false,
            generation: 0,
            transport_sequence: 0,
            last_play_pause: 0,
            last_seek: 0,
            active_handle: None,
            pending_load: None,
            sleep_timer: None,
            next_timer_id: 0,
            last_error: None,
            closing: None,
        }
    }

    pub(super) async fn run(
        mut self,
        mut commands: mpsc::Receiver<SessionCommand>,
        mut internal: mpsc::UnboundedReceiver<InternalEvent>,
        mut events: broadcast::Receiver<EngineEvent>,
        worker: JoinHandle<()>,
    ) {
        let mut events_open = true;

        loop {
            tokio::select! {
                biased;

                Some(event) = internal.recv() => self.handle_internal(event),

                command = commands.recv() => match command {
                    Some(command) => self.handle_command(command),
                    None => {
                        tracing::debug!("All session handles dropped");
                        self.shutdown(worker).await;
                        return;
                    }
                },

                event = events.recv(), if events_open => match event {
                    Ok(event) => self.handle_engine_event(event),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Session fell behind engine reports");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::warn!("Audio engine closed its report channel");
                        events_open = false;
                    }
                },
            }

            if let Some(reply) = self.closing.take() {
                self.shutdown(worker).await;
                let _ = reply.send(());
                return;
            }
        }
    }

    async fn shutdown(mut self, worker: JoinHandle<()>) {
        self.reset();
        tracing::info!("Playback session disposed");
        // Dropping the actor closes the job channel; the worker drains what is queued.
        drop(self);
        if let Err(error) = worker.await {
            tracing::warn!(%error, "Engine worker ended abnormally");
        }
    }

    fn handle_command(&mut self, command: SessionCommand) {
        match command {
            SessionCommand::LoadAndPlay {
                item,
                context,
                reply,
            } => {
                self.queue = match context {
                    Some(context) => PlaybackQueue::from_context(item, context),
                    None => PlaybackQueue::single(item),
                };
                self.begin_load(Some(LoadWaiter::Load(reply)));
            }
            SessionCommand::SkipToNext { reply } => {
                let moved = self.queue.advance();
                self.load_after_move(moved, reply);
            }
            SessionCommand::SkipToPrevious { reply } => {
                if self.should_restart_current() {
                    self.restart_current();
                    let _ = reply.send(Ok(LoadOutcome::Unchanged));
                } else {
                    let moved = self.queue.retreat();
                    self.load_after_move(moved, reply);
                }
            }
            SessionCommand::PlayQueueIndex { index, reply } => {
                let moved = self.queue.jump_to(index);
                self.load_after_move(moved, reply);
            }
            SessionCommand::TogglePlayPause { reply } => {
                let target = !self.is_playing;
                self.set_playing(target, reply);
            }
            SessionCommand::Play { reply } => self.set_playing(true, reply),
            SessionCommand::Pause { reply } => self.set_playing(false, reply),
            SessionCommand::Seek { position, reply } => self.seek(position, reply),
            SessionCommand::SetSleepTimer { mode, reply } => {
                let armed = self.arm_sleep_timer(mode);
                let _ = reply.send(armed);
            }
            SessionCommand::ClearSleepTimer { reply } => {
                if self.disarm_sleep_timer() {
                    tracing::debug!("Sleep timer cleared");
                    self.publish();
                }
                let _ = reply.send(());
            }
            SessionCommand::Reset { reply } => {
                self.reset();
                let _ = reply.send(());
            }
            SessionCommand::Dispose { reply } => {
                self.closing = Some(reply);
            }
        }
    }

    fn handle_internal(&mut self, event: InternalEvent) {
        match event {
            InternalEvent::LoadSettled { generation, result } => {
                self.on_load_settled(generation, result)
            }
            InternalEvent::TransportSettled { job, result } => {
                self.on_transport_settled(job, result)
            }
            InternalEvent::SleepTimerFired { timer_id } => self.on_sleep_timer_fired(timer_id),
        }
    }

    fn handle_engine_event(&mut self, event: EngineEvent) {
        if self.active_handle != Some(event.handle) {
            tracing::trace!(handle = %event.handle, "Dropping report for inactive source");
            return;
        }

        match event.kind {
            EngineEventKind::Progress { position, duration } => {
                self.transport = self.transport.with_report(position, duration);
                self.publish();
            }
            EngineEventKind::Finished => self.on_track_finished(),
            EngineEventKind::Failed(error) => {
                tracing::warn!(handle = %event.handle, %error, "Engine reported a playback failure");
                self.fail_playback(error);
                self.publish();
            }
        }
    }

    // ---- loading -------------------------------------------------------

    fn load_after_move(&mut self, moved: QueueMove, reply: LoadReply) {
        match moved {
            QueueMove::Moved(index) => {
                tracing::debug!(index, "Queue cursor moved");
                self.begin_load(Some(LoadWaiter::Load(reply)));
            }
            QueueMove::AtBoundary => {
                let _ = reply.send(Ok(LoadOutcome::Unchanged));
            }
        }
    }

    /// Supersede whatever is loaded and start loading the queue's current item.
    fn begin_load(&mut self, waiter: Option<LoadWaiter>) {
        let Some(item) = self.queue.current().cloned() else {
            if let Some(waiter) = waiter {
                waiter.resolve(Ok(LoadOutcome::Unchanged));
            }
            return;
        };

        self.supersede();
        self.transport = TransportState::starting(item.duration());
        self.is_playing = true;
        self.last_error = None;
        self.pending_load = Some(PendingLoad {
            generation: self.generation,
            waiters: waiter.into_iter().collect(),
        });

        tracing::debug!(
            item_id = %item.id(),
            generation = self.generation,
            "Loading item"
        );
        self.dispatch(EngineJob::Load {
            generation: self.generation,
            url: item.audio_url().to_string(),
        });
        self.publish();
    }

    /// Invalidate in-flight work for the current generation and release the
    /// active source. The release is queued ahead of any subsequent load.
    fn supersede(&mut self) {
        self.generation += 1;
        self.latest_generation.send_replace(self.generation);

        if let Some(pending) = self.pending_load.take() {
            tracing::debug!(generation = pending.generation, "Load superseded");
            for waiter in pending.waiters {
                waiter.resolve(Ok(LoadOutcome::Superseded));
            }
        }

        if let Some(handle) = self.active_handle.take() {
            self.dispatch(EngineJob::Stop { handle });
        }
    }

    fn on_load_settled(&mut self, generation: u64, result: Result<SourceHandle, EngineError>) {
        let pending = match self.pending_load.take() {
            Some(pending) if pending.generation == generation => pending,
            other => {
                self.pending_load = other;
                tracing::debug!(generation, "Discarding stale load result");
                if let Ok(handle) = result {
                    self.dispatch(EngineJob::Stop { handle });
                }
                return;
            }
        };

        match result {
            Ok(handle) => {
                tracing::info!(%handle, generation, "Item loaded");
                self.active_handle = Some(handle);
                let mut waiters = pending.waiters;
                if self.transport.position() > 0.0 {
                    let action = TransportAction::Seek {
                        position: self.transport.position(),
                        previous: 0.0,
                    };
                    self.dispatch_transport(handle, action, Vec::new());
                }
                // Callers learn the outcome once the engine has actually started.
                if self.is_playing {
                    let waiters = std::mem::take(&mut waiters);
                    self.dispatch_transport(handle, TransportAction::Play, waiters);
                }
                for waiter in waiters {
                    waiter.resolve(Ok(LoadOutcome::Started));
                }
            }
            Err(error) => {
                tracing::warn!(generation, %error, "Load failed");
                self.fail_playback(error.clone());
                for waiter in pending.waiters {
                    waiter.resolve(Err(SessionError::Engine(error.clone())));
                }
            }
        }
        self.publish();
    }

    fn on_transport_settled(&mut self, job: TransportJob, result: Result<(), EngineError>) {
        if job.generation != self.generation {
            job.resolve(Ok(LoadOutcome::Superseded));
            return;
        }

        match result {
            Ok(()) => job.resolve(Ok(LoadOutcome::Started)),
            Err(error) => {
                tracing::warn!(
                    generation = job.generation,
                    action = ?job.action,
                    %error,
                    "Engine command failed"
                );
                self.last_error = Some(SessionError::Engine(error.clone()).user_message());
                self.roll_back(job.action, job.sequence);
                self.publish();
                job.resolve(Err(SessionError::Engine(error)));
            }
        }
    }

    /// Restore what the engine is still doing after it rejected `action`,
    /// unless a later command has already replaced that state.
    fn roll_back(&mut self, action: TransportAction, sequence: u64) {
        match action {
            TransportAction::Play if sequence == self.last_play_pause => self.is_playing = false,
            TransportAction::Pause if sequence == self.last_play_pause => self.is_playing = true,
            TransportAction::Seek { previous, .. } if sequence == self.last_seek => {
                self.transport = self.transport.with_position(previous);
            }
            _ => tracing::debug!(?action, "Failed command already replaced; nothing to roll back"),
        }
    }

    fn on_track_finished(&mut self) {
        if self.config.auto_advance {
            if let QueueMove::Moved(index) = self.queue.advance() {
                tracing::debug!(index, "Track finished; advancing");
                self.begin_load(None);
                return;
            }
        }

        tracing::debug!("Track finished");
        self.is_playing = false;
        self.transport = self.transport.at_end();
        self.publish();
    }

    fn fail_playback(&mut self, error: EngineError) {
        self.is_playing = false;
        self.last_error = Some(SessionError::Engine(error).user_message());
    }

    // ---- transport -----------------------------------------------------

    fn set_playing(&mut self, playing: bool, reply: CommandReply) {
        if self.queue.current().is_none() {
            let _ = reply.send(Ok(()));
            return;
        }

        match self.active_handle {
            Some(_) if self.is_playing == playing => {
                let _ = reply.send(Ok(()));
            }
            Some(handle) => {
                self.is_playing = playing;
                self.publish();
                let action = if playing {
                    TransportAction::Play
                } else {
                    TransportAction::Pause
                };
                self.dispatch_transport(handle, action, vec![LoadWaiter::Command(reply)]);
            }
            // The pending load picks up the desired state when it settles.
            None if self.pending_load.is_some() => {
                self.is_playing = playing;
                self.publish();
                let _ = reply.send(Ok(()));
            }
            // Nothing held by the engine, e.g. after a failed load: play reloads.
            None if playing => self.begin_load(Some(LoadWaiter::Command(reply))),
            None => {
                let _ = reply.send(Ok(()));
            }
        }
    }

    fn seek(&mut self, position: f64, reply: CommandReply) {
        if self.queue.current().is_none() {
            let _ = reply.send(Err(SessionError::NothingLoaded));
            return;
        }

        let previous = self.transport.position();
        self.transport = self.transport.with_position(position);
        self.publish();

        match self.active_handle {
            Some(handle) => {
                let action = TransportAction::Seek {
                    position: self.transport.position(),
                    previous,
                };
                self.dispatch_transport(handle, action, vec![LoadWaiter::Command(reply)]);
            }
            None => {
                let _ = reply.send(Ok(()));
            }
        }
    }

    fn should_restart_current(&self) -> bool {
        let threshold = self.config.skip_previous_restart_secs;
        threshold > 0.0 && self.active_handle.is_some() && self.transport.position() > threshold
    }

    fn restart_current(&mut self) {
        let Some(handle) = self.active_handle else {
            return;
        };
        tracing::debug!("Restarting current item");
        let action = TransportAction::Seek {
            position: 0.0,
            previous: self.transport.position(),
        };
        self.transport = self.transport.with_position(0.0);
        self.publish();
        self.dispatch_transport(handle, action, Vec::new());
    }

    // ---- sleep timer ---------------------------------------------------

    fn arm_sleep_timer(&mut self, mode: SleepTimerMode) -> Option<SleepTimer> {
        let Some(delay) = mode.delay(&self.transport) else {
            tracing::debug!(?mode, "Sleep timer not armed; no time to wait");
            return None;
        };
        let timer = SleepTimer::arm(self.clock.now(), delay)?;

        self.disarm_sleep_timer();
        self.next_timer_id += 1;
        let timer_id = self.next_timer_id;
        let internal = self.internal_tx.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = internal.send(InternalEvent::SleepTimerFired { timer_id });
        });

        tracing::info!(?mode, end_time = %timer.end_time(), "Sleep timer armed");
        self.sleep_timer = Some(ArmedSleepTimer {
            id: timer_id,
            timer,
            task,
        });
        self.publish();
        Some(timer)
    }

    fn disarm_sleep_timer(&mut self) -> bool {
        match self.sleep_timer.take() {
            Some(armed) => {
                armed.task.abort();
                true
            }
            None => false,
        }
    }

    fn on_sleep_timer_fired(&mut self, timer_id: u64) {
        if self.sleep_timer.as_ref().map(|armed| armed.id) != Some(timer_id) {
            tracing::debug!(timer_id, "Ignoring replaced sleep timer");
            return;
        }
        self.sleep_timer = None;
        tracing::info!("Sleep timer fired; pausing playback");

        if self.is_playing {
            self.is_playing = false;
            if let Some(handle) = self.active_handle {
                self.dispatch_transport(handle, TransportAction::Pause, Vec::new());
            }
        }
        self.publish();
    }

    // ---- lifecycle -----------------------------------------------------

    fn reset(&mut self) {
        self.supersede();
        self.disarm_sleep_timer();
        self.queue = PlaybackQueue::empty();
        self.transport = TransportState::default();
        self.is_playing = false;
        self.last_error = None;
        tracing::info!("Playback session reset");
        self.publish();
    }

    fn dispatch_transport(
        &mut self,
        handle: SourceHandle,
        action: TransportAction,
        waiters: Vec<LoadWaiter>,
    ) {
        self.transport_sequence += 1;
        let sequence = self.transport_sequence;
        match action {
            TransportAction::Play | TransportAction::Pause => self.last_play_pause = sequence,
            TransportAction::Seek { .. } => self.last_seek = sequence,
        }
        self.dispatch(EngineJob::Transport(TransportJob {
            generation: self.generation,
            sequence,
            handle,
            action,
            waiters,
        }));
    }

    fn dispatch(&self, job: EngineJob) {
        if self.jobs.send(job).is_err() {
            tracing::warn!("Engine worker has stopped; dropping engine command");
        }
    }

    fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            current_item: self.queue.current().cloned(),
            queue: self.queue.items().to_vec(),
            current_index: self.queue.current_index(),
            is_playing: self.is_playing,
            is_loading: self.pending_load.is_some(),
            position: self.transport.position(),
            duration: self.transport.duration(),
            sleep_timer_end: self.sleep_timer.as_ref().map(|armed| armed.timer.end_time()),
            last_error: self.last_error.clone(),
        }
    }

    fn publish(&self) {
        self.state_tx.send_replace(self.snapshot());
    }
}

impl Drop for SessionActor {
    fn drop(&mut self) {
        if let Some(armed) = self.sleep_timer.take() {
            armed.task.abort();
        }
    }
}
