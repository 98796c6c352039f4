//! Provider descriptors: one parameterized description per embed provider.
//!
//! A descriptor declares which identifier kind it needs and how to turn that
//! identifier into a playback URL. Building is pure and never panics; a film
//! missing the required identifier yields `None`.

use std::fmt;

use kinoplay_core::{CandidateOrigin, FilmIdentifiers, IdentifierKind, PlaybackCandidate};
use url::Url;

use crate::discovery::DiscoveredSource;
use crate::errors::{BuildError, RegistryError};

pub mod registry;

pub use registry::ProviderRegistry;

/// Placeholder replaced with the (percent-encoded) identifier in templates.
pub const ID_PLACEHOLDER: &str = "{id}";

/// Validated URL template containing exactly one `{id}` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate(String);

impl UrlTemplate {
    /// Validates `template` for provider `provider`.
    ///
    /// # Errors
    /// - `RegistryError::InvalidTemplate` - Placeholder missing or repeated, or the
    ///   template is not an http(s) URL
    pub fn parse(provider: &str, template: &str) -> Result<Self, RegistryError> {
        let invalid = |reason: String| RegistryError::InvalidTemplate {
            provider: provider.to_string(),
            reason,
        };

        match template.matches(ID_PLACEHOLDER).count() {
            1 => {}
            0 => return Err(invalid(format!("missing {ID_PLACEHOLDER} placeholder"))),
            _ => return Err(invalid(format!("repeated {ID_PLACEHOLDER} placeholder"))),
        }

        let probe = template.replace(ID_PLACEHOLDER, "1");
        let url = Url::parse(&probe).map_err(|e| invalid(e.to_string()))?;
        if !is_web_url(&url) {
            return Err(invalid(format!("unsupported scheme {}", url.scheme())));
        }

        Ok(Self(template.to_string()))
    }

    /// Substitutes `value` and parses the result.
    fn expand(&self, value: &str) -> Result<Url, url::ParseError> {
        Url::parse(&self.0.replace(ID_PLACEHOLDER, &urlencoding::encode(value)))
    }
}

/// How a descriptor produces its URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlRule {
    /// Built-in player: substitute the required identifier into a template.
    Template(UrlTemplate),
    /// Discovered player: the URL was already produced for this film.
    Fixed(Url),
}

/// One playback provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderDescriptor {
    name: String,
    requires: IdentifierKind,
    rule: UrlRule,
    origin: CandidateOrigin,
    quality: Option<String>,
}

impl ProviderDescriptor {
    /// Creates a built-in, template-based provider.
    ///
    /// # Errors
    /// - `RegistryError::InvalidTemplate` - The template is not usable
    pub fn with_template(
        name: impl Into<String>,
        requires: IdentifierKind,
        template: &str,
    ) -> Result<Self, RegistryError> {
        let name = name.into();
        let template = UrlTemplate::parse(&name, template)?;
        Ok(Self {
            name,
            requires,
            rule: UrlRule::Template(template),
            origin: CandidateOrigin::Static,
            quality: None,
        })
    }

    /// Creates a provider from one discovery record.
    ///
    /// Discovery is keyed by catalog id, so these require one.
    pub fn discovered(source: DiscoveredSource) -> Self {
        Self {
            name: source.name,
            requires: IdentifierKind::CatalogId,
            rule: UrlRule::Fixed(source.url),
            origin: CandidateOrigin::Discovered,
            quality: source.quality,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn requires(&self) -> IdentifierKind {
        self.requires
    }

    pub fn origin(&self) -> CandidateOrigin {
        self.origin
    }

    /// Builds the playback URL, explaining why when it cannot.
    ///
    /// # Errors
    /// - `BuildError::MissingIdentifier` - The film lacks the required identifier
    /// - `BuildError::InvalidUrl` - Substitution produced an unparseable URL
    pub fn try_build(&self, identifiers: &FilmIdentifiers) -> Result<Url, BuildError> {
        let value = identifiers
            .value_for(self.requires)
            .ok_or_else(|| BuildError::MissingIdentifier {
                provider: self.name.clone(),
                kind: self.requires,
            })?;

        match &self.rule {
            UrlRule::Template(template) => {
                template
                    .expand(&value)
                    .map_err(|e| BuildError::InvalidUrl {
                        provider: self.name.clone(),
                        reason: e.to_string(),
                    })
            }
            UrlRule::Fixed(url) => Ok(url.clone()),
        }
    }

    /// Builds the playback URL, or `None` when the requirement is unmet.
    pub fn build(&self, identifiers: &FilmIdentifiers) -> Option<Url> {
        self.try_build(identifiers).ok()
    }

    /// Builds a candidate for `identifiers`.
    pub fn candidate(&self, identifiers: &FilmIdentifiers) -> Result<PlaybackCandidate, BuildError> {
        let url = self.try_build(identifiers)?;
        Ok(PlaybackCandidate::new(self.name.clone(), url, self.origin)
            .with_quality(self.quality.clone()))
    }
}

impl fmt::Display for ProviderDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, requires {})", self.name, self.origin, self.requires)
    }
}

/// Only http(s) URLs can be embedded.
pub(crate) fn is_web_url(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https") && url.host_str().is_some_and(|h| !h.is_empty())
}
