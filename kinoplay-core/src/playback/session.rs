//! Playback session state machine
//!
//! `Idle -> Resolving -> {Ready, Exhausted}`. While `Ready`, the user may
//! switch candidates and embed failures advance to the next candidate until
//! none remain. `stop()` returns to `Idle` from anywhere; `start()` always
//! re-enters `Resolving`.
//!
//! Every `start()` hands out a [`ResolutionTicket`]. Only the ticket of the
//! most recent `start()` may complete resolution, so a slow, superseded
//! resolution can never overwrite a newer candidate list.

use serde::{Deserialize, Serialize};

use super::candidate::{PlaybackCandidate, ResolutionResult};
use super::error::{NO_SOURCES_MESSAGE, PlaybackError};

/// Playback session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    Idle,
    Resolving,
    Ready,
    Exhausted,
}

impl PlaybackState {
    /// Check if a candidate is currently active
    pub fn is_ready(&self) -> bool {
        matches!(self, PlaybackState::Ready)
    }

    /// Check if resolution is in flight
    pub fn is_resolving(&self) -> bool {
        matches!(self, PlaybackState::Resolving)
    }

    /// Check if no playable candidate remains
    pub fn is_exhausted(&self) -> bool {
        matches!(self, PlaybackState::Exhausted)
    }
}

/// Proof that a resolution was started by a particular `start()` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResolutionTicket {
    generation: u64,
}

impl ResolutionTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Result of reporting a failed embed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailoverOutcome {
    /// Moved on to the candidate at `index`.
    Advanced { index: usize },
    /// The failed candidate was the last one.
    Exhausted,
    /// The report did not concern the active candidate.
    Ignored,
}

/// Point-in-time copy of a session, suitable for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackSnapshot {
    pub state: PlaybackState,
    pub candidates: ResolutionResult,
    pub active_index: Option<usize>,
    /// User-visible message, set only when exhausted.
    pub message: Option<String>,
}

impl PlaybackSnapshot {
    pub fn active_candidate(&self) -> Option<&PlaybackCandidate> {
        self.active_index.and_then(|index| self.candidates.get(index))
    }
}

/// Per-film playback session.
///
/// Invariant: `active_index` is `Some(i)` with `i < candidates.len()` exactly
/// when `state == Ready`.
#[derive(Debug, Clone)]
pub struct PlaybackSession {
    state: PlaybackState,
    candidates: ResolutionResult,
    active_index: Option<usize>,
    generation: u64,
}

impl Default for PlaybackSession {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackSession {
    pub fn new() -> Self {
        Self {
            state: PlaybackState::Idle,
            candidates: Vec::new(),
            active_index: None,
            generation: 0,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn candidates(&self) -> &[PlaybackCandidate] {
        &self.candidates
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active_index
    }

    pub fn active_candidate(&self) -> Option<&PlaybackCandidate> {
        self.active_index.and_then(|index| self.candidates.get(index))
    }

    /// Checks whether `ticket` belongs to the resolution currently awaited.
    pub fn is_current(&self, ticket: ResolutionTicket) -> bool {
        self.state.is_resolving() && ticket.generation == self.generation
    }

    /// Enters `Resolving`, superseding any resolution still in flight.
    pub fn start(&mut self) -> ResolutionTicket {
        self.generation += 1;
        self.state = PlaybackState::Resolving;
        self.candidates.clear();
        self.active_index = None;

        tracing::debug!(generation = self.generation, "Playback session resolving");

        ResolutionTicket {
            generation: self.generation,
        }
    }

    /// Applies a resolution result.
    ///
    /// Returns `false` and leaves the session untouched when `ticket` is stale.
    pub fn complete(&mut self, ticket: ResolutionTicket, candidates: ResolutionResult) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(
                ticket = ticket.generation,
                current = self.generation,
                "Discarding stale resolution result"
            );
            return false;
        }

        if candidates.is_empty() {
            self.state = PlaybackState::Exhausted;
            self.active_index = None;
        } else {
            self.state = PlaybackState::Ready;
            self.active_index = Some(0);
        }
        self.candidates = candidates;

        tracing::debug!(
            generation = self.generation,
            state = ?self.state,
            candidates = self.candidates.len(),
            "Resolution applied"
        );
        true
    }

    /// Records a resolver fault; handled exactly like an empty result.
    pub fn fail(&mut self, ticket: ResolutionTicket) -> bool {
        self.complete(ticket, Vec::new())
    }

    /// Activates the candidate at `index`.
    ///
    /// # Errors
    /// - `PlaybackError::InvalidCandidateIndex` - not `Ready`, or `index` out of range;
    ///   the session is left unchanged
    pub fn switch_to(&mut self, index: usize) -> Result<(), PlaybackError> {
        let available = if self.state.is_ready() {
            self.candidates.len()
        } else {
            0
        };

        if index >= available {
            return Err(PlaybackError::InvalidCandidateIndex { index, available });
        }

        self.active_index = Some(index);
        Ok(())
    }

    /// Handles a "cannot play" signal from the embed rendering `failed_index`.
    pub fn report_embed_failure(&mut self, failed_index: usize) -> FailoverOutcome {
        if !self.state.is_ready() || self.active_index != Some(failed_index) {
            return FailoverOutcome::Ignored;
        }

        let next = failed_index + 1;
        if next < self.candidates.len() {
            self.active_index = Some(next);
            FailoverOutcome::Advanced { index: next }
        } else {
            self.state = PlaybackState::Exhausted;
            self.active_index = None;
            FailoverOutcome::Exhausted
        }
    }

    /// Returns to `Idle`, dropping candidates and invalidating in-flight tickets.
    pub fn stop(&mut self) {
        if self.state != PlaybackState::Idle {
            self.generation += 1;
        }
        self.state = PlaybackState::Idle;
        self.candidates.clear();
        self.active_index = None;
    }

    /// User-visible message for the current state, if any.
    pub fn message(&self) -> Option<&'static str> {
        self.state.is_exhausted().then_some(NO_SOURCES_MESSAGE)
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            state: self.state,
            candidates: self.candidates.clone(),
            active_index: self.active_index,
            message: self.message().map(str::to_string),
        }
    }
}
