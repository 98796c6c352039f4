//! Playback-level errors.

use thiserror::Error;

/// Message shown whenever a session ends up with nothing to play.
pub const NO_SOURCES_MESSAGE: &str = "No playback source is available for this film";

/// Errors surfaced by the playback session and its handle.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlaybackError {
    #[error("No playback candidates remain")]
    NoCandidates,

    #[error("Embedded player for {provider} failed to play")]
    EmbedPlaybackFailed { provider: String },

    #[error("Candidate index {index} out of range ({available} available)")]
    InvalidCandidateIndex { index: usize, available: usize },

    #[error("Playback session has shut down")]
    SessionClosed,
}

impl PlaybackError {
    /// Returns a user-friendly error message suitable for display.
    pub fn user_message(&self) -> String {
        match self {
            PlaybackError::NoCandidates => NO_SOURCES_MESSAGE.to_string(),
            PlaybackError::EmbedPlaybackFailed { provider } => {
                format!("Player {provider} could not play this film, trying the next one")
            }
            PlaybackError::InvalidCandidateIndex { .. } => "No such player".to_string(),
            PlaybackError::SessionClosed => "Playback was closed".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_candidates_message() {
        assert_eq!(PlaybackError::NoCandidates.user_message(), NO_SOURCES_MESSAGE);
    }
}
