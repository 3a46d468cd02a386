//! Messages exchanged between the session handle, the session actor and the
//! engine worker.

use tokio::sync::oneshot;

use ridecast_domain::{QueueItem, SleepTimer, SleepTimerMode};

use super::LoadOutcome;
use crate::application::error::SessionError;
use crate::ports::outbound::{EngineError, SourceHandle};

pub(super) type LoadReply = oneshot::Sender<Result<LoadOutcome, SessionError>>;
pub(super) type CommandReply = oneshot::Sender<Result<(), SessionError>>;

/// Commands issued through [`PlaybackSession`](super::PlaybackSession).
pub(super) enum SessionCommand {
    LoadAndPlay {
        item: QueueItem,
        context: Option<Vec<QueueItem>>,
        reply: LoadReply,
    },
    SkipToNext {
        reply: LoadReply,
    },
    SkipToPrevious {
        reply: LoadReply,
    },
    PlayQueueIndex {
        index: usize,
        reply: LoadReply,
    },
    TogglePlayPause {
        reply: CommandReply,
    },
    Play {
        reply: CommandReply,
    },
    Pause {
        reply: CommandReply,
    },
    Seek {
        position: f64,
        reply: CommandReply,
    },
    SetSleepTimer {
        mode: SleepTimerMode,
        reply: oneshot::Sender<Option<SleepTimer>>,
    },
    ClearSleepTimer {
        reply: oneshot::Sender<()>,
    },
    Reset {
        reply: oneshot::Sender<()>,
    },
    Dispose {
        reply: oneshot::Sender<()>,
    },
}

/// Results and timer firings fed back into the actor's serialized path.
pub(super) enum InternalEvent {
    LoadSettled {
        generation: u64,
        result: Result<SourceHandle, EngineError>,
    },
    TransportSettled {
        job: TransportJob,
        result: Result<(), EngineError>,
    },
    SleepTimerFired {
        timer_id: u64,
    },
}

/// Work for the engine worker. `Load` and `Transport` are tagged with the
/// session generation they were issued under.
pub(super) enum EngineJob {
    Load {
        generation: u64,
        url: String,
    },
    Transport(TransportJob),
    Stop {
        handle: SourceHandle,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) enum TransportAction {
    Play,
    Pause,
    /// `previous` is restored if the engine rejects the seek.
    Seek { position: f64, previous: f64 },
}

/// A transport command for a loaded source, plus everyone waiting on it.
pub(super) struct TransportJob {
    pub(super) generation: u64,
    /// Orders transport commands; a failure only rolls back state that no
    /// later command has replaced.
    pub(super) sequence: u64,
    pub(super) handle: SourceHandle,
    pub(super) action: TransportAction,
    pub(super) waiters: Vec<LoadWaiter>,
}

impl TransportJob {
    pub(super) fn resolve(self, result: Result<LoadOutcome, SessionError>) {
        for waiter in self.waiters {
            waiter.resolve(result.clone());
        }
    }
}

/// Someone waiting for a load, or the engine command that follows it, to settle.
pub(super) enum LoadWaiter {
    Load(LoadReply),
    Command(CommandReply),
}

impl LoadWaiter {
    pub(super) fn resolve(self, result: Result<LoadOutcome, SessionError>) {
        match self {
            LoadWaiter::Load(reply) => {
                let _ = reply.send(result);
            }
            LoadWaiter::Command(reply) => {
                let _ = reply.send(result.map(|_| ()));
            }
        }
    }
}
