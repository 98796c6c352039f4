//! Handle for communicating with a playback session actor.

use kinoplay_core::playback::FailoverOutcome;
use kinoplay_core::{PlaybackError, PlaybackSnapshot, ResolutionTicket};
use tokio::sync::{mpsc, oneshot, watch};

use super::commands::PlaybackCommand;

/// Handle for communicating with a playback session actor.
///
/// Cloning is cheap; all clones drive the same session. The session shuts
/// down once every handle is dropped or `shutdown` is called.
#[derive(Debug, Clone)]
pub struct PlaybackHandle {
    sender: mpsc::Sender<PlaybackCommand>,
    snapshots: watch::Receiver<PlaybackSnapshot>,
}

impl PlaybackHandle {
    pub(super) fn new(
        sender: mpsc::Sender<PlaybackCommand>,
        snapshots: watch::Receiver<PlaybackSnapshot>,
    ) -> Self {
        Self { sender, snapshots }
    }

    /// Begins resolution, superseding any resolution still in flight.
    ///
    /// Returns as soon as the session is `Resolving`; the outcome arrives
    /// later through `subscribe` or `wait_until_settled`.
    ///
    /// # Errors
    /// - `PlaybackError::SessionClosed` - Session actor has shut down
    pub async fn start(&self) -> Result<ResolutionTicket, PlaybackError> {
        let (responder, rx) = oneshot::channel();
        self.send(PlaybackCommand::Start { responder }).await?;
        rx.await.map_err(|_| PlaybackError::SessionClosed)
    }

    /// Activates the candidate at `index`.
    ///
    /// # Errors
    /// - `PlaybackError::InvalidCandidateIndex` - Session not ready or index out of range
    /// - `PlaybackError::SessionClosed` - Session actor has shut down
    pub async fn switch_to(&self, index: usize) -> Result<(), PlaybackError> {
        let (responder, rx) = oneshot::channel();
        self.send(PlaybackCommand::SwitchTo { index, responder })
            .await?;
        rx.await.map_err(|_| PlaybackError::SessionClosed)?
    }

    /// Reports that the embed showing candidate `index` failed to play.
    ///
    /// # Errors
    /// - `PlaybackError::SessionClosed` - Session actor has shut down
    pub async fn report_embed_failure(&self, index: usize) -> Result<FailoverOutcome, PlaybackError> {
        let (responder, rx) = oneshot::channel();
        self.send(PlaybackCommand::ReportEmbedFailure { index, responder })
            .await?;
        rx.await.map_err(|_| PlaybackError::SessionClosed)
    }

    /// Returns the session to idle, discarding any pending resolution.
    ///
    /// # Errors
    /// - `PlaybackError::SessionClosed` - Session actor has shut down
    pub async fn stop(&self) -> Result<(), PlaybackError> {
        let (responder, rx) = oneshot::channel();
        self.send(PlaybackCommand::Stop { responder }).await?;
        rx.await.map_err(|_| PlaybackError::SessionClosed)
    }

    /// Gets a copy of the current session state.
    ///
    /// # Errors
    /// - `PlaybackError::SessionClosed` - Session actor has shut down
    pub async fn snapshot(&self) -> Result<PlaybackSnapshot, PlaybackError> {
        let (responder, rx) = oneshot::channel();
        self.send(PlaybackCommand::GetSnapshot { responder })
            .await?;
        rx.await.map_err(|_| PlaybackError::SessionClosed)
    }

    /// Receiver that observes every published session transition.
    pub fn subscribe(&self) -> watch::Receiver<PlaybackSnapshot> {
        self.snapshots.clone()
    }

    /// Waits until the session is no longer resolving and returns that state.
    ///
    /// # Errors
    /// - `PlaybackError::SessionClosed` - Session actor has shut down
    pub async fn wait_until_settled(&self) -> Result<PlaybackSnapshot, PlaybackError> {
        let mut snapshots = self.snapshots.clone();
        let settled = snapshots
            .wait_for(|snapshot| !snapshot.state.is_resolving())
            .await
            .map_err(|_| PlaybackError::SessionClosed)?;
        Ok(settled.clone())
    }

    /// Shuts the session down and cancels any resolution in flight.
    ///
    /// # Errors
    /// - `PlaybackError::SessionClosed` - Session actor was already gone
    pub async fn shutdown(&self) -> Result<(), PlaybackError> {
        let (responder, rx) = oneshot::channel();
        self.send(PlaybackCommand::Shutdown { responder }).await?;
        rx.await.map_err(|_| PlaybackError::SessionClosed)
    }

    async fn send(&self, command: PlaybackCommand) -> Result<(), PlaybackError> {
        self.sender
            .send(command)
            .await
            .map_err(|_| PlaybackError::SessionClosed)
    }
}
