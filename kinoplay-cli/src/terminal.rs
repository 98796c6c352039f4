//! Embed surface that prints player markup to the terminal.

use kinoplay_core::playback::iframe_markup;
use kinoplay_core::{EmbedSurface, PlaybackCandidate};

#[derive(Debug, Default)]
pub struct TerminalEmbed;

impl EmbedSurface for TerminalEmbed {
    fn render(&mut self, candidate: &PlaybackCandidate) {
        println!("\nNow showing {}", candidate.label());
        println!("{}", iframe_markup(candidate));
    }

    fn clear(&mut self) {
        tracing::trace!("Player cleared");
    }

    fn show_unavailable(&mut self, message: &str) {
        println!("\n{message}");
    }
}
