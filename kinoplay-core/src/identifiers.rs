//! Identifier mapping from catalog film records to provider-facing identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::film::FilmRecord;

/// Positive numeric catalog identifier (Kinopoisk id).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct CatalogId(u64);

impl CatalogId {
    /// Creates a catalog id, rejecting zero.
    pub fn new(value: u64) -> Option<Self> {
        (value > 0).then_some(Self(value))
    }

    /// Returns the raw numeric value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl TryFrom<u64> for CatalogId {
    type Error = String;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| "catalog id must be positive".to_string())
    }
}

impl From<CatalogId> for u64 {
    fn from(id: CatalogId) -> Self {
        id.0
    }
}

impl fmt::Display for CatalogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for CatalogId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u64 = s
            .trim()
            .parse()
            .map_err(|_| format!("Invalid catalog id: {s}"))?;
        Self::try_from(value)
    }
}

/// External-standard identifier (IMDb id such as `tt0133093`).
///
/// Never empty: blank values are mapped to an absent identifier instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExternalId(String);

impl ExternalId {
    /// Creates an external id from raw input, trimming whitespace.
    ///
    /// Returns `None` for blank input.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExternalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Kind of identifier a provider needs to build its playback URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierKind {
    CatalogId,
    ExternalId,
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentifierKind::CatalogId => write!(f, "catalog id"),
            IdentifierKind::ExternalId => write!(f, "external id"),
        }
    }
}

/// Identifiers of one film in the shapes providers consume.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilmIdentifiers {
    pub catalog_id: CatalogId,
    pub external_id: Option<ExternalId>,
}

impl FilmIdentifiers {
    /// Creates identifiers from already-validated parts.
    pub fn new(catalog_id: CatalogId, external_id: Option<ExternalId>) -> Self {
        Self {
            catalog_id,
            external_id,
        }
    }

    /// Maps a loaded film record to its identifiers.
    ///
    /// Total and side-effect free: a missing or blank external id becomes
    /// `None`, never an empty string.
    pub fn extract(film: &FilmRecord) -> Self {
        Self {
            catalog_id: film.catalog_id,
            external_id: film.imdb_id.as_deref().and_then(ExternalId::parse),
        }
    }

    /// Returns the identifier value for `kind`, if present.
    pub fn value_for(&self, kind: IdentifierKind) -> Option<String> {
        match kind {
            IdentifierKind::CatalogId => Some(self.catalog_id.to_string()),
            IdentifierKind::ExternalId => self.external_id.as_ref().map(|id| id.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn film_with_imdb(imdb_id: Option<&str>) -> FilmRecord {
        let mut film = FilmRecord::new(CatalogId::new(301).unwrap());
        film.imdb_id = imdb_id.map(str::to_string);
        film
    }

    #[test]
    fn test_extract_without_external_id() {
        let ids = FilmIdentifiers::extract(&film_with_imdb(None));

        assert_eq!(ids.catalog_id.get(), 301);
        assert_eq!(ids.external_id, None);
        assert_eq!(ids.value_for(IdentifierKind::CatalogId).as_deref(), Some("301"));
        assert_eq!(ids.value_for(IdentifierKind::ExternalId), None);
    }

    #[test]
    fn test_extract_maps_blank_external_id_to_absent() {
        assert_eq!(FilmIdentifiers::extract(&film_with_imdb(Some(""))).external_id, None);
        assert_eq!(
            FilmIdentifiers::extract(&film_with_imdb(Some("   "))).external_id,
            None
        );
    }

    #[test]
    fn test_extract_with_external_id() {
        let ids = FilmIdentifiers::extract(&film_with_imdb(Some(" tt0133093 ")));

        assert_eq!(ids.external_id.as_ref().map(ExternalId::as_str), Some("tt0133093"));
        assert_eq!(
            ids.value_for(IdentifierKind::CatalogId),
            Some("301".to_string())
        );
        assert_eq!(
            ids.value_for(IdentifierKind::ExternalId),
            Some("tt0133093".to_string())
        );
    }

    #[test]
    fn test_catalog_id_rejects_zero() {
        assert!(CatalogId::new(0).is_none());
        assert!("0".parse::<CatalogId>().is_err());
        assert!("abc".parse::<CatalogId>().is_err());
        assert_eq!("  42 ".parse::<CatalogId>().unwrap().get(), 42);
    }

    proptest::proptest! {
        #[test]
        fn test_external_id_is_never_blank(raw in ".*") {
            match ExternalId::parse(&raw) {
                Some(id) => {
                    proptest::prop_assert!(!id.as_str().is_empty());
                    proptest::prop_assert_eq!(id.as_str(), raw.trim());
                }
                None => proptest::prop_assert!(raw.trim().is_empty()),
            }
        }
    }

    #[test]
    fn test_catalog_id_deserialization_validates() {
        let id: CatalogId = serde_json::from_str("301").unwrap();
        assert_eq!(id.get(), 301);
        assert!(serde_json::from_str::<CatalogId>("0").is_err());
    }
}
