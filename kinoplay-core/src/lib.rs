//! Kinoplay Core - Film identifiers and playback session state
//!
//! This crate holds the network-free half of playback source resolution:
//! the film record model, identifier mapping, playback candidates, the
//! playback session state machine and the embed surface capability, plus
//! configuration and tracing setup shared by the other Kinoplay crates.

pub mod config;
pub mod film;
pub mod identifiers;
pub mod playback;
pub mod tracing_setup;

// Re-export main types for convenient access
pub use config::KinoplayConfig;
pub use film::FilmRecord;
pub use identifiers::{CatalogId, ExternalId, FilmIdentifiers, IdentifierKind};
pub use playback::{
    CandidateOrigin, EmbedSurface, NullEmbed, PlaybackCandidate, PlaybackError, PlaybackSession,
    PlaybackSnapshot, PlaybackState, ResolutionMode, ResolutionResult, ResolutionTicket,
};

/// Top-level errors that can bubble up from any Kinoplay subsystem.
#[derive(Debug, thiserror::Error)]
pub enum KinoplayError {
    #[error("Playback error: {0}")]
    Playback(#[from] PlaybackError),

    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl KinoplayError {
    /// Returns a user-friendly error message suitable for display.
    pub fn user_message(&self) -> String {
        match self {
            KinoplayError::Playback(e) => e.user_message(),
            KinoplayError::Configuration { .. } => "Configuration error occurred".to_string(),
            KinoplayError::Io(_) => "File system error occurred".to_string(),
        }
    }

    /// Checks if this error is due to user input validation.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            KinoplayError::Configuration { .. }
                | KinoplayError::Playback(PlaybackError::InvalidCandidateIndex { .. })
        )
    }
}

