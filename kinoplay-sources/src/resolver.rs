//! Source resolution: registry + identifiers + optional discovery.
//!
//! Resolution never fails. Providers whose identifier requirement is unmet
//! are filtered out, and any discovery fault (network, status, malformed
//! payload, deadline, panic) only means zero discovered candidates.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use kinoplay_core::{
    CatalogId, FilmIdentifiers, KinoplayConfig, ResolutionMode, ResolutionResult,
};

use crate::discovery::{DiscoveryClient, HttpDiscoveryClient};
use crate::errors::{BuildError, SourceError};
use crate::providers::{ProviderDescriptor, ProviderRegistry};

/// Produces ordered playback candidates for a film.
///
/// Cheap to clone and safe to share between sessions.
#[derive(Debug, Clone)]
pub struct SourceResolver {
    registry: ProviderRegistry,
    discovery: Option<Arc<dyn DiscoveryClient>>,
    discovery_timeout: Duration,
}

impl SourceResolver {
    /// Creates a resolver over `registry`, optionally backed by `discovery`.
    ///
    /// `discovery_timeout` bounds every discovery call; expiry is treated like
    /// any other discovery failure.
    pub fn new(
        registry: ProviderRegistry,
        discovery: Option<Arc<dyn DiscoveryClient>>,
        discovery_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            discovery,
            discovery_timeout,
        }
    }

    /// Resolver with built-in providers and the configured HTTP discovery.
    ///
    /// # Errors
    /// - `SourceError::InvalidEndpoint` - Configured discovery endpoint is unusable
    /// - `SourceError::Network` - HTTP client could not be constructed
    pub fn from_config(config: &KinoplayConfig) -> Result<Self, SourceError> {
        let discovery = HttpDiscoveryClient::from_config(&config.discovery)?
            .map(|client| Arc::new(client) as Arc<dyn DiscoveryClient>);

        Ok(Self::new(
            ProviderRegistry::builtin(config.playback.videocdn_token.as_deref()),
            discovery,
            config.discovery.timeout,
        ))
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub fn has_discovery(&self) -> bool {
        self.discovery.is_some()
    }

    /// Resolve playback candidates for `identifiers`.
    ///
    /// Static candidates come first in registry order, followed by discovered
    /// ones in the discovery provider's order. An empty result is valid.
    pub async fn resolve(
        &self,
        identifiers: &FilmIdentifiers,
        mode: ResolutionMode,
    ) -> ResolutionResult {
        let discovered = match mode {
            ResolutionMode::WithDiscovery => self.discover(identifiers.catalog_id).await,
            ResolutionMode::StaticOnly => Vec::new(),
        };

        let candidates: ResolutionResult = self
            .registry
            .lineup(mode, &discovered)
            .filter_map(|provider| match provider.candidate(identifiers) {
                Ok(candidate) => Some(candidate),
                Err(BuildError::MissingIdentifier { provider, kind }) => {
                    tracing::debug!(%provider, %kind, "Skipping provider without required identifier");
                    None
                }
                Err(e) => {
                    tracing::warn!("Skipping provider: {e}");
                    None
                }
            })
            .collect();

        tracing::info!(
            catalog_id = %identifiers.catalog_id,
            %mode,
            discovered = discovered.len(),
            candidates = candidates.len(),
            "Resolved playback candidates"
        );

        candidates
    }

    /// One bounded discovery call; failures become an empty list.
    async fn discover(&self, catalog_id: CatalogId) -> Vec<ProviderDescriptor> {
        let Some(discovery) = &self.discovery else {
            tracing::debug!(%catalog_id, "Discovery disabled, using static providers only");
            return Vec::new();
        };

        let call = AssertUnwindSafe(discovery.discover(catalog_id)).catch_unwind();
        let outcome = match tokio::time::timeout(self.discovery_timeout, call).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(_)) => Err(SourceError::Panicked),
            Err(_) => Err(SourceError::Timeout {
                after: self.discovery_timeout,
            }),
        };

        match outcome {
            Ok(sources) => sources
                .into_iter()
                .map(ProviderDescriptor::discovered)
                .collect(),
            Err(e) => {
                tracing::warn!(%catalog_id, "Discovery unavailable, continuing without it: {e}");
                Vec::new()
            }
        }
    }
}
