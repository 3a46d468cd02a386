//! Engine worker - the only task that talks to the audio engine.
//!
//! Transport commands and releases are executed strictly in the order the
//! actor issued them, so the engine never sees a `play` overtake the `pause`
//! that preceded it. Loads run as their own tasks: a load is abandoned as soon
//! as the session generation moves past it, so a slow or hung source never
//! holds up the load that replaced it. A load that completes after being
//! superseded is released immediately, so at most one source is ever held on
//! the session's behalf.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinSet;

use super::commands::{EngineJob, InternalEvent, TransportAction, TransportJob};
use super::LoadOutcome;
use crate::ports::outbound::{AudioEnginePort, SourceHandle};

#[derive(Clone)]
pub(super) struct EngineWorker {
    engine: Arc<dyn AudioEnginePort>,
    generations: watch::Receiver<u64>,
    results: mpsc::UnboundedSender<InternalEvent>,
}

impl EngineWorker {
    pub(super) fn new(
        engine: Arc<dyn AudioEnginePort>,
        generations: watch::Receiver<u64>,
        results: mpsc::UnboundedSender<InternalEvent>,
    ) -> Self {
        Self {
            engine,
            generations,
            results,
        }
    }

    /// Process jobs until the actor drops its sender. Jobs already queued at
    /// that point, typically the final `Stop`, still run, and in-flight loads
    /// are waited out.
    pub(super) async fn run(self, mut jobs: mpsc::UnboundedReceiver<EngineJob>) {
        let mut loads = JoinSet::new();

        loop {
            tokio::select! {
                job = jobs.recv() => match job {
                    Some(EngineJob::Load { generation, url }) => {
                        self.start_load(&mut loads, generation, url)
                    }
                    Some(EngineJob::Transport(job)) => self.transport(job).await,
                    Some(EngineJob::Stop { handle }) => self.release(handle).await,
                    None => break,
                },
                Some(_) = loads.join_next(), if !loads.is_empty() => {}
            }
        }

        while loads.join_next().await.is_some() {}
        tracing::debug!("Engine worker stopped");
    }

    fn is_current(&self, generation: u64) -> bool {
        *self.generations.borrow() == generation
    }

    fn start_load(&self, loads: &mut JoinSet<()>, generation: u64, url: String) {
        if !self.is_current(generation) {
            tracing::debug!(generation, %url, "Skipping superseded load");
            return;
        }
        let worker = self.clone();
        loads.spawn(async move { worker.load(generation, url).await });
    }

    async fn load(&self, generation: u64, url: String) {
        tokio::select! {
            biased;

            result = self.engine.load(&url) => {
                if let Ok(handle) = &result {
                    if !self.is_current(generation) {
                        tracing::debug!(generation, %handle, "Load completed after supersession");
                        self.release(*handle).await;
                        return;
                    }
                }
                self.report(InternalEvent::LoadSettled { generation, result });
            }
            () = superseded(self.generations.clone(), generation) => {
                tracing::debug!(generation, %url, "Abandoned superseded load");
            }
        }
    }

    async fn transport(&self, job: TransportJob) {
        if !self.is_current(job.generation) {
            job.resolve(Ok(LoadOutcome::Superseded));
            return;
        }

        let result = match job.action {
            TransportAction::Play => self.engine.play(job.handle).await,
            TransportAction::Pause => self.engine.pause(job.handle).await,
            TransportAction::Seek { position, .. } => self.engine.seek(job.handle, position).await,
        };
        self.report(InternalEvent::TransportSettled { job, result });
    }

    async fn release(&self, handle: SourceHandle) {
        match self.engine.stop(handle).await {
            Ok(()) => tracing::debug!(%handle, "Released engine source"),
            Err(error) => tracing::warn!(%handle, %error, "Failed to release engine source"),
        }
    }

    fn report(&self, event: InternalEvent) {
        if self.results.send(event).is_err() {
            tracing::debug!("Session actor is gone; dropping engine result");
        }
    }
}

/// Resolves once the session has moved past `generation`, or has gone away.
async fn superseded(mut generations: watch::Receiver<u64>, generation: u64) {
    let _ = generations.wait_for(|latest| *latest != generation).await;
}
