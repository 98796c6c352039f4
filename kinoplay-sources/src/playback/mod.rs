//! Playback session actor.
//!
//! Wraps a `PlaybackSession` in a task that owns it exclusively. Resolution
//! runs on a separate task per `start`; a newer `start` aborts the older task
//! and the session's ticket check discards anything that still slips through,
//! so the most recent invocation always determines the final state.

mod actor;
mod commands;
mod handle;

use kinoplay_core::{EmbedSurface, FilmIdentifiers, PlaybackSession, ResolutionMode};
use tokio::sync::{mpsc, watch};

use self::actor::PlaybackActor;
pub use self::handle::PlaybackHandle;
use crate::resolver::SourceResolver;

/// Spawns a playback session for one film and returns its handle.
///
/// The session starts `Idle`; call `start` to resolve. Every transition is
/// mirrored to `embed` and published to `PlaybackHandle::subscribe`.
pub fn spawn_playback_session<E>(
    resolver: SourceResolver,
    identifiers: FilmIdentifiers,
    mode: ResolutionMode,
    embed: E,
    command_buffer: usize,
) -> PlaybackHandle
where
    E: EmbedSurface + 'static,
{
    let (command_tx, command_rx) = mpsc::channel(command_buffer.max(1));
    let (finished_tx, finished_rx) = mpsc::unbounded_channel();
    let (snapshot_tx, snapshot_rx) = watch::channel(PlaybackSession::new().snapshot());

    let actor = PlaybackActor::new(
        resolver,
        identifiers,
        mode,
        embed,
        finished_tx,
        snapshot_tx,
    );
    tokio::spawn(actor.run(command_rx, finished_rx));

    PlaybackHandle::new(command_tx, snapshot_rx)
}
