//! Command definitions for the playback session actor.

use kinoplay_core::playback::FailoverOutcome;
use kinoplay_core::{PlaybackError, PlaybackSnapshot, ResolutionResult, ResolutionTicket};
use tokio::sync::oneshot;

/// Commands that can be sent to the playback session actor.
///
/// Each command carries a response channel; the actor owns the session
/// exclusively and processes commands one at a time.
pub(crate) enum PlaybackCommand {
    /// Begin (or restart) resolution.
    Start {
        responder: oneshot::Sender<ResolutionTicket>,
    },
    /// Activate a candidate chosen by the user.
    SwitchTo {
        index: usize,
        responder: oneshot::Sender<Result<(), PlaybackError>>,
    },
    /// The embed rendering `index` reported that it cannot play.
    ReportEmbedFailure {
        index: usize,
        responder: oneshot::Sender<FailoverOutcome>,
    },
    /// Return to idle and cancel any resolution in flight.
    Stop { responder: oneshot::Sender<()> },
    /// Get a copy of the current session state.
    GetSnapshot {
        responder: oneshot::Sender<PlaybackSnapshot>,
    },
    /// Shutdown the actor.
    Shutdown { responder: oneshot::Sender<()> },
}

/// Internal notification from a resolution task.
pub(crate) struct ResolutionFinished {
    pub ticket: ResolutionTicket,
    /// `None` when resolution itself faulted.
    pub outcome: Option<ResolutionResult>,
}
