//! Playback candidates and the per-film playback session.
//!
//! The session is a synchronous state machine; driving it from async code
//! (resolution, cancellation) is the job of the session actor in
//! `kinoplay-sources`.

pub mod candidate;
pub mod embed;
pub mod error;
pub mod session;

pub use candidate::{CandidateOrigin, PlaybackCandidate, ResolutionMode, ResolutionResult};
pub use embed::{EmbedSurface, NullEmbed, iframe_markup};
pub use error::PlaybackError;
pub use session::{
    FailoverOutcome, PlaybackSession, PlaybackSnapshot, PlaybackState, ResolutionTicket,
};
