//! Ordered, read-only provider registry.

use std::collections::HashSet;
use std::sync::Arc;

use kinoplay_core::{IdentifierKind, ResolutionMode};

use super::ProviderDescriptor;
use crate::errors::RegistryError;

/// Videocdn player; only usable with an API token.
const VIDEOCDN_TEMPLATE: &str = "https://videocdn.tv/api/short?api_token={token}&kinopoisk_id={id}";

/// Built-in embed players that need no credentials, in fallback order.
const BUILTIN_PROVIDERS: &[(&str, IdentifierKind, &str)] = &[
    (
        "collaps",
        IdentifierKind::CatalogId,
        "https://api.collaps.cc/embed?kp={id}",
    ),
    (
        "voidboost",
        IdentifierKind::CatalogId,
        "https://voidboost.tv/embed/{id}",
    ),
    (
        "vidsrc",
        IdentifierKind::ExternalId,
        "https://vidsrc.xyz/embed/movie/{id}",
    ),
];

/// Static provider descriptors shared read-only across sessions.
///
/// Cloning is cheap.
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    providers: Arc<[ProviderDescriptor]>,
}

impl ProviderRegistry {
    /// Creates a registry from static descriptors, keeping their order.
    ///
    /// # Errors
    /// - `RegistryError::DuplicateProvider` - Two descriptors share a name
    pub fn new(providers: Vec<ProviderDescriptor>) -> Result<Self, RegistryError> {
        let mut seen = HashSet::new();
        for provider in &providers {
            if !seen.insert(provider.name()) {
                return Err(RegistryError::DuplicateProvider {
                    name: provider.name().to_string(),
                });
            }
        }

        Ok(Self {
            providers: providers.into(),
        })
    }

    /// Registry of the built-in embed players.
    ///
    /// Videocdn leads the lineup when `videocdn_token` is set and is left out
    /// otherwise.
    pub fn builtin(videocdn_token: Option<&str>) -> Self {
        let videocdn = videocdn_token
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(|token| {
                let template = VIDEOCDN_TEMPLATE.replace("{token}", &urlencoding::encode(token));
                ("videocdn", IdentifierKind::CatalogId, template)
            });
        if videocdn.is_none() {
            tracing::debug!("No videocdn token configured, leaving videocdn out");
        }

        let providers: Vec<ProviderDescriptor> = videocdn
            .into_iter()
            .chain(
                BUILTIN_PROVIDERS
                    .iter()
                    .map(|(name, requires, template)| (*name, *requires, template.to_string())),
            )
            .filter_map(|(name, requires, template)| {
                ProviderDescriptor::with_template(name, requires, &template)
                    .inspect_err(|e| tracing::error!("Skipping built-in provider: {e}"))
                    .ok()
            })
            .collect();

        Self {
            providers: providers.into(),
        }
    }

    /// Registry with no static providers (discovery only).
    pub fn empty() -> Self {
        Self {
            providers: Arc::from(Vec::new()),
        }
    }

    pub fn static_providers(&self) -> &[ProviderDescriptor] {
        &self.providers
    }

    /// Full fallback order for `mode`: static providers, then `discovered`.
    ///
    /// In `StaticOnly` mode `discovered` is ignored.
    pub fn lineup<'a>(
        &'a self,
        mode: ResolutionMode,
        discovered: &'a [ProviderDescriptor],
    ) -> impl Iterator<Item = &'a ProviderDescriptor> + 'a {
        let discovered = match mode {
            ResolutionMode::StaticOnly => &[][..],
            ResolutionMode::WithDiscovery => discovered,
        };
        self.providers.iter().chain(discovered.iter())
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::builtin(None)
    }
}
