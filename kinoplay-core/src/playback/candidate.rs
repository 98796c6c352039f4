//! Playback candidate types produced by source resolution.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

/// Where a candidate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateOrigin {
    /// Synthesized locally from a built-in provider descriptor.
    Static,
    /// Returned by the discovery provider.
    Discovered,
}

impl fmt::Display for CandidateOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CandidateOrigin::Static => write!(f, "static"),
            CandidateOrigin::Discovered => write!(f, "discovered"),
        }
    }
}

/// One concrete, ready-to-embed playback URL.
///
/// Fields are private so a candidate cannot change after resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackCandidate {
    provider_name: String,
    url: Url,
    origin: CandidateOrigin,
    quality: Option<String>,
}

impl PlaybackCandidate {
    pub fn new(provider_name: impl Into<String>, url: Url, origin: CandidateOrigin) -> Self {
        Self {
            provider_name: provider_name.into(),
            url,
            origin,
            quality: None,
        }
    }

    /// Attaches the quality label reported by discovery.
    pub fn with_quality(mut self, quality: Option<String>) -> Self {
        self.quality = quality.filter(|q| !q.trim().is_empty());
        self
    }

    pub fn provider_name(&self) -> &str {
        &self.provider_name
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn origin(&self) -> CandidateOrigin {
        self.origin
    }

    pub fn quality(&self) -> Option<&str> {
        self.quality.as_deref()
    }

    /// Tab label: provider name plus quality when known.
    pub fn label(&self) -> String {
        match &self.quality {
            Some(quality) => format!("{} ({quality})", self.provider_name),
            None => self.provider_name.clone(),
        }
    }
}

/// Ordered candidates; the order is both fallback order and tab order.
pub type ResolutionResult = Vec<PlaybackCandidate>;

/// Whether resolution may call the discovery provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionMode {
    StaticOnly,
    #[default]
    WithDiscovery,
}

impl fmt::Display for ResolutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionMode::StaticOnly => write!(f, "static-only"),
            ResolutionMode::WithDiscovery => write!(f, "with-discovery"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_label() {
        let url = Url::parse("https://api.collaps.cc/embed?kp=301").unwrap();
        let candidate = PlaybackCandidate::new("Collaps", url.clone(), CandidateOrigin::Discovered);
        assert_eq!(candidate.label(), "Collaps");

        let candidate = candidate.with_quality(Some("1080p".to_string()));
        assert_eq!(candidate.label(), "Collaps (1080p)");
        assert_eq!(candidate.url(), &url);
        assert_eq!(candidate.origin(), CandidateOrigin::Discovered);
    }

    #[test]
    fn test_blank_quality_is_dropped() {
        let url = Url::parse("https://voidboost.tv/embed/301").unwrap();
        let candidate = PlaybackCandidate::new("voidboost", url, CandidateOrigin::Static)
            .with_quality(Some("  ".to_string()));
        assert_eq!(candidate.quality(), None);
    }
}
