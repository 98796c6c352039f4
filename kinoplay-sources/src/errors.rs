//! Error types for provider, discovery and catalog operations.

use std::time::Duration;

use kinoplay_core::{CatalogId, IdentifierKind};
use thiserror::Error;

/// Discovery provider failures.
///
/// Never propagated past the resolver: each one only means "zero discovered
/// candidates".
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceError {
    /// Network communication error occurred during discovery.
    #[error("Discovery network error: {reason}")]
    Network {
        /// The reason for the network error
        reason: String,
    },

    /// Discovery answered with a non-success status.
    #[error("Discovery returned HTTP {status}")]
    HttpStatus {
        /// HTTP status code
        status: u16,
    },

    /// Discovery response did not have the expected shape.
    #[error("Malformed discovery response: {reason}")]
    MalformedResponse {
        /// What was wrong with the payload
        reason: String,
    },

    /// Discovery did not answer within its deadline.
    #[error("Discovery timed out after {after:?}")]
    Timeout {
        /// Deadline that expired
        after: Duration,
    },

    /// Discovery client panicked mid-call.
    #[error("Discovery client panicked")]
    Panicked,

    /// Discovery endpoint template is unusable.
    #[error("Invalid discovery endpoint: {reason}")]
    InvalidEndpoint {
        /// The reason the endpoint is invalid
        reason: String,
    },
}

/// Why a provider descriptor could not produce a URL.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BuildError {
    /// The film lacks the identifier kind the provider requires.
    #[error("Provider {provider} requires a {kind}")]
    MissingIdentifier {
        /// Provider name
        provider: String,
        /// Required identifier kind
        kind: IdentifierKind,
    },

    /// Substituting the identifier produced an unusable URL.
    #[error("Provider {provider} produced an invalid URL: {reason}")]
    InvalidUrl {
        /// Provider name
        provider: String,
        /// Parse failure
        reason: String,
    },
}

/// Provider registry construction errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// Two descriptors share a name.
    #[error("Duplicate provider name: {name}")]
    DuplicateProvider {
        /// The repeated name
        name: String,
    },

    /// A URL template is missing its placeholder or is not a URL.
    #[error("Invalid URL template for {provider}: {reason}")]
    InvalidTemplate {
        /// Provider name
        provider: String,
        /// The reason the template is invalid
        reason: String,
    },
}

/// Errors from the film catalog (metadata client).
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog has no film with this id.
    #[error("Film {catalog_id} not found")]
    FilmNotFound {
        /// Requested catalog id
        catalog_id: CatalogId,
    },

    /// Network communication error occurred.
    #[error("Catalog network error: {reason}")]
    Network {
        /// The reason for the network error
        reason: String,
    },

    /// The catalog answered with a non-success status.
    #[error("Catalog returned HTTP {status}")]
    HttpStatus {
        /// HTTP status code
        status: u16,
    },

    /// Failed to parse the catalog response.
    #[error("Catalog parse error: {reason}")]
    Parse {
        /// The reason for the parse error
        reason: String,
    },

    /// No API key is configured.
    #[error("Catalog API key is not configured (set KINOPLAY_CATALOG_API_KEY)")]
    MissingApiKey,
}

impl CatalogError {
    /// Returns a user-friendly error message suitable for display.
    pub fn user_message(&self) -> String {
        match self {
            CatalogError::FilmNotFound { .. } => "Film not found".to_string(),
            CatalogError::MissingApiKey => self.to_string(),
            _ => "The film catalog is unavailable right now".to_string(),
        }
    }
}
