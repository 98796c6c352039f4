//! Actor owning one playback session.

use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use kinoplay_core::playback::FailoverOutcome;
use kinoplay_core::{
    EmbedSurface, FilmIdentifiers, PlaybackSession, PlaybackSnapshot, ResolutionMode,
    ResolutionTicket,
};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use super::commands::{PlaybackCommand, ResolutionFinished};
use crate::resolver::SourceResolver;

pub(super) struct PlaybackActor<E> {
    session: PlaybackSession,
    resolver: SourceResolver,
    identifiers: FilmIdentifiers,
    mode: ResolutionMode,
    embed: E,
    in_flight: Option<JoinHandle<()>>,
    completions: mpsc::UnboundedSender<ResolutionFinished>,
    snapshots: watch::Sender<PlaybackSnapshot>,
}

impl<E: EmbedSurface + 'static> PlaybackActor<E> {
    pub(super) fn new(
        resolver: SourceResolver,
        identifiers: FilmIdentifiers,
        mode: ResolutionMode,
        embed: E,
        completions: mpsc::UnboundedSender<ResolutionFinished>,
        snapshots: watch::Sender<PlaybackSnapshot>,
    ) -> Self {
        Self {
            session: PlaybackSession::new(),
            resolver,
            identifiers,
            mode,
            embed,
            in_flight: None,
            completions,
            snapshots,
        }
    }

    /// Processes commands and resolution results until shutdown or until
    /// every handle is dropped.
    pub(super) async fn run(
        mut self,
        mut commands: mpsc::Receiver<PlaybackCommand>,
        mut finished: mpsc::UnboundedReceiver<ResolutionFinished>,
    ) {
        tracing::debug!(catalog_id = %self.identifiers.catalog_id, "Playback session actor started");

        loop {
            tokio::select! {
                command = commands.recv() => {
                    let Some(command) = command else { break };
                    if !self.handle_command(command) {
                        break;
                    }
                }
                Some(result) = finished.recv() => {
                    self.handle_finished(result);
                }
            }
        }

        self.cancel_in_flight();
        tracing::debug!(catalog_id = %self.identifiers.catalog_id, "Playback session actor stopped");
    }

    /// Returns false to shut down.
    fn handle_command(&mut self, command: PlaybackCommand) -> bool {
        match command {
            PlaybackCommand::Start { responder } => {
                self.cancel_in_flight();
                let ticket = self.session.start();
                self.embed.clear();
                self.publish();
                self.spawn_resolution(ticket);
                let _ = responder.send(ticket);
            }

            PlaybackCommand::SwitchTo { index, responder } => {
                let result = self.session.switch_to(index);
                if result.is_ok() {
                    self.sync_embed();
                    self.publish();
                }
                let _ = responder.send(result);
            }

            PlaybackCommand::ReportEmbedFailure { index, responder } => {
                let outcome = self.session.report_embed_failure(index);
                match outcome {
                    FailoverOutcome::Advanced { index: next } => {
                        tracing::info!(failed = index, next, "Embed failed, advancing to next candidate");
                    }
                    FailoverOutcome::Exhausted => {
                        tracing::info!(failed = index, "Embed failed, no candidates left");
                    }
                    FailoverOutcome::Ignored => {
                        tracing::debug!(index, "Ignoring embed failure for inactive candidate");
                    }
                }
                if outcome != FailoverOutcome::Ignored {
                    self.sync_embed();
                    self.publish();
                }
                let _ = responder.send(outcome);
            }

            PlaybackCommand::Stop { responder } => {
                self.cancel_in_flight();
                self.session.stop();
                self.embed.clear();
                self.publish();
                let _ = responder.send(());
            }

            PlaybackCommand::GetSnapshot { responder } => {
                let _ = responder.send(self.session.snapshot());
            }

            PlaybackCommand::Shutdown { responder } => {
                let _ = responder.send(());
                return false;
            }
        }

        true
    }

    fn handle_finished(&mut self, finished: ResolutionFinished) {
        let ResolutionFinished { ticket, outcome } = finished;

        let applied = match outcome {
            Some(candidates) => self.session.complete(ticket, candidates),
            None => {
                tracing::warn!(
                    generation = ticket.generation(),
                    "Resolution faulted, treating as no candidates"
                );
                self.session.fail(ticket)
            }
        };

        if applied {
            self.in_flight = None;
            self.sync_embed();
            self.publish();
        } else {
            tracing::debug!(
                generation = ticket.generation(),
                "Discarding result of superseded resolution"
            );
        }
    }

    fn spawn_resolution(&mut self, ticket: ResolutionTicket) {
        let resolver = self.resolver.clone();
        let identifiers = self.identifiers.clone();
        let mode = self.mode;
        let completions = self.completions.clone();

        self.in_flight = Some(tokio::spawn(async move {
            let outcome = AssertUnwindSafe(resolver.resolve(&identifiers, mode))
                .catch_unwind()
                .await
                .ok();
            let _ = completions.send(ResolutionFinished { ticket, outcome });
        }));
    }

    fn cancel_in_flight(&mut self) {
        if let Some(task) = self.in_flight.take() {
            task.abort();
        }
    }

    /// Points the embed surface at whatever the session now says.
    fn sync_embed(&mut self) {
        if let Some(candidate) = self.session.active_candidate() {
            self.embed.render(candidate);
        } else if let Some(message) = self.session.message() {
            self.embed.show_unavailable(message);
        } else {
            self.embed.clear();
        }
    }

    fn publish(&self) {
        tracing::debug!(
            state = ?self.session.state(),
            candidates = self.session.candidates().len(),
            active = ?self.session.active_index(),
            "Playback session transition"
        );
        self.snapshots.send_replace(self.session.snapshot());
    }
}
