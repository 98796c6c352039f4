//! Centralized configuration for Kinoplay.
//!
//! All tunable parameters and settings are defined here to avoid
//! hard-coded values scattered throughout the codebase.

use std::time::Duration;

use crate::playback::ResolutionMode;

/// Placeholder substituted with the catalog id in discovery endpoints.
pub const CATALOG_ID_PLACEHOLDER: &str = "{catalog_id}";

/// Central configuration for all Kinoplay components.
///
/// Supports environment variable overrides for runtime customization.
#[derive(Debug, Clone, Default)]
pub struct KinoplayConfig {
    pub discovery: DiscoveryConfig,
    pub catalog: CatalogConfig,
    pub playback: PlaybackConfig,
}

/// Discovery provider configuration.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Endpoint template containing `{catalog_id}`; `None` disables discovery
    pub endpoint: Option<String>,
    /// Deadline for the whole discovery call
    pub timeout: Duration,
    /// User agent for HTTP requests
    pub user_agent: &'static str,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            endpoint: Some("https://kinobox.tv/api/players/main?kinopoisk={catalog_id}".to_string()),
            timeout: Duration::from_secs(8),
            user_agent: "kinoplay/0.1.0",
        }
    }
}

/// Film catalog (metadata client) configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base URL of the catalog API
    pub base_url: String,
    /// API key sent as `X-API-KEY`
    pub api_key: Option<String>,
    /// HTTP request timeout
    pub timeout: Duration,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "https://kinopoiskapiunofficial.tech/api".to_string(),
            api_key: None,
            timeout: Duration::from_secs(10),
        }
    }
}

/// Playback session configuration.
#[derive(Debug, Clone)]
pub struct PlaybackConfig {
    /// Whether resolution consults the discovery provider
    pub mode: ResolutionMode,
    /// Capacity of the session actor's command channel
    pub command_buffer: usize,
    /// API token for the videocdn player; without one it is not offered
    pub videocdn_token: Option<String>,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            mode: ResolutionMode::WithDiscovery,
            command_buffer: 32,
            videocdn_token: None,
        }
    }
}

impl KinoplayConfig {
    /// Creates configuration with environment variable overrides.
    ///
    /// Unparseable values are ignored and the defaults kept.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(endpoint) = std::env::var("KINOPLAY_DISCOVERY_URL") {
            let endpoint = endpoint.trim();
            config.discovery.endpoint = if endpoint.is_empty() {
                None
            } else {
                Some(endpoint.to_string())
            };
        }

        if let Ok(timeout) = std::env::var("KINOPLAY_DISCOVERY_TIMEOUT_MS")
            && let Ok(millis) = timeout.parse::<u64>()
        {
            config.discovery.timeout = Duration::from_millis(millis);
        }

        if let Ok(base_url) = std::env::var("KINOPLAY_CATALOG_URL")
            && !base_url.trim().is_empty()
        {
            config.catalog.base_url = base_url.trim().trim_end_matches('/').to_string();
        }

        if let Ok(api_key) = std::env::var("KINOPLAY_CATALOG_API_KEY")
            && !api_key.trim().is_empty()
        {
            config.catalog.api_key = Some(api_key.trim().to_string());
        }

        if let Ok(token) = std::env::var("KINOPLAY_VIDEOCDN_TOKEN")
            && !token.trim().is_empty()
        {
            config.playback.videocdn_token = Some(token.trim().to_string());
        }

        if let Ok(static_only) = std::env::var("KINOPLAY_STATIC_ONLY")
            && static_only.parse().unwrap_or(false)
        {
            config.playback.mode = ResolutionMode::StaticOnly;
        }

        config
    }

    /// Creates a configuration optimized for testing: no network endpoints
    /// and short deadlines.
    pub fn for_testing() -> Self {
        Self {
            discovery: DiscoveryConfig {
                endpoint: None,
                timeout: Duration::from_millis(200),
                ..Default::default()
            },
            catalog: CatalogConfig {
                timeout: Duration::from_millis(500),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}
