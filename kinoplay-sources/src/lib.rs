//! Kinoplay Sources - Playback source resolution
//!
//! Turns a film's identifiers into an ordered list of embeddable playback
//! candidates: built-in providers first, then whatever the discovery
//! provider reports as live. Provider and network faults are absorbed here
//! and only ever shrink the candidate list.

pub mod catalog;
pub mod discovery;
pub mod errors;
pub mod playback;
pub mod providers;
pub mod resolver;

// Re-export main types
pub use catalog::{FilmCatalog, KinopoiskClient};
pub use discovery::{DiscoveredSource, DiscoveryClient, HttpDiscoveryClient};
pub use errors::{BuildError, CatalogError, RegistryError, SourceError};
pub use playback::{PlaybackHandle, spawn_playback_session};
pub use providers::{ProviderDescriptor, ProviderRegistry, UrlRule};
pub use resolver::SourceResolver;
