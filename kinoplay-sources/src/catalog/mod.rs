//! Film catalog (metadata) client.
//!
//! Talks to the Kinopoisk unofficial API. Only `get_film` feeds playback;
//! the listing operations back the browsing commands of the CLI.

mod types;

use std::time::Duration;

use async_trait::async_trait;
use chrono::{Datelike, Month};
use kinoplay_core::config::CatalogConfig;
use kinoplay_core::{CatalogId, FilmRecord};
use serde::de::DeserializeOwned;
use url::Url;

pub use self::types::{CollectionKind, CollectionPage, FilmList, SearchPage};
use crate::errors::CatalogError;

const API_KEY_HEADER: &str = "X-API-KEY";

/// Trait for film metadata sources.
#[async_trait]
pub trait FilmCatalog: Send + Sync + std::fmt::Debug {
    /// Full record for one film.
    ///
    /// # Errors
    /// - `CatalogError::FilmNotFound` - No film with this id
    /// - `CatalogError::Network` / `HttpStatus` / `Parse` - Catalog unavailable
    async fn get_film(&self, catalog_id: CatalogId) -> Result<FilmRecord, CatalogError>;

    /// Keyword search, 1-based `page`.
    async fn search(&self, keyword: &str, page: u32) -> Result<SearchPage, CatalogError>;

    /// One page of a curated collection.
    async fn collection(&self, kind: CollectionKind, page: u32)
    -> Result<CollectionPage, CatalogError>;

    /// Premieres for a calendar month.
    async fn premieres(&self, year: i32, month: Month) -> Result<FilmList, CatalogError>;

    /// Films the catalog considers similar to `catalog_id`.
    ///
    /// # Errors
    /// - `CatalogError::FilmNotFound` - No film with this id
    async fn similar(&self, catalog_id: CatalogId) -> Result<FilmList, CatalogError>;

    async fn popular(&self, page: u32) -> Result<CollectionPage, CatalogError> {
        self.collection(CollectionKind::Popular, page).await
    }

    async fn top(&self, page: u32) -> Result<CollectionPage, CatalogError> {
        self.collection(CollectionKind::Top250, page).await
    }

    /// Premieres for the current local month.
    async fn premieres_this_month(&self) -> Result<FilmList, CatalogError> {
        let (year, month) = current_month();
        self.premieres(year, month).await
    }
}

/// Year and month of the local clock.
pub fn current_month() -> (i32, Month) {
    let today = chrono::Local::now().date_naive();
    let month = u8::try_from(today.month())
        .ok()
        .and_then(|number| Month::try_from(number).ok())
        .unwrap_or(Month::January);
    (today.year(), month)
}

/// Query value the catalog expects for a month (`"MARCH"`).
pub fn month_query(month: Month) -> String {
    month.name().to_uppercase()
}

/// HTTP client for the Kinopoisk unofficial API.
#[derive(Debug, Clone)]
pub struct KinopoiskClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl KinopoiskClient {
    /// Creates a client from catalog configuration.
    ///
    /// # Errors
    /// - `CatalogError::MissingApiKey` - No API key configured
    /// - `CatalogError::Network` - HTTP client could not be constructed
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or(CatalogError::MissingApiKey)?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent("kinoplay/0.1.0")
            .redirect(reqwest::redirect::Policy::limited(3))
            .build()
            .map_err(|e| CatalogError::Network {
                reason: format!("HTTP client creation failed: {e}"),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            timeout: config.timeout,
        })
    }

    fn endpoint(&self, path: &str, query: &[(&str, String)]) -> Result<Url, CatalogError> {
        let mut url =
            Url::parse(&format!("{}{path}", self.base_url)).map_err(|e| CatalogError::Network {
                reason: format!("Invalid catalog URL {}{path}: {e}", self.base_url),
            })?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(key, value)| (*key, value.as_str())));
        }
        Ok(url)
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, CatalogError> {
        let url = self.endpoint(path, query)?;
        tracing::debug!(%url, "Catalog request");

        let response = self
            .client
            .get(url.as_str())
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| CatalogError::Network {
                reason: if e.is_timeout() {
                    format!("request timed out after {:?}", self.timeout)
                } else {
                    e.to_string()
                },
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| CatalogError::Network {
            reason: format!("Failed to read response body: {e}"),
        })?;

        serde_json::from_slice(&body).map_err(|e| CatalogError::Parse {
            reason: e.to_string(),
        })
    }
}

/// 404 on a per-film endpoint means the film does not exist.
fn film_not_found(catalog_id: CatalogId) -> impl FnOnce(CatalogError) -> CatalogError {
    move |error| match error {
        CatalogError::HttpStatus { status: 404 } => CatalogError::FilmNotFound { catalog_id },
        other => other,
    }
}

#[async_trait]
impl FilmCatalog for KinopoiskClient {
    async fn get_film(&self, catalog_id: CatalogId) -> Result<FilmRecord, CatalogError> {
        self.fetch(&format!("/v2.2/films/{catalog_id}"), &[])
            .await
            .map_err(film_not_found(catalog_id))
    }

    async fn search(&self, keyword: &str, page: u32) -> Result<SearchPage, CatalogError> {
        self.fetch(
            "/v2.1/films/search-by-keyword",
            &[("keyword", keyword.to_string()), ("page", page.max(1).to_string())],
        )
        .await
    }

    async fn collection(
        &self,
        kind: CollectionKind,
        page: u32,
    ) -> Result<CollectionPage, CatalogError> {
        self.fetch(
            "/v2.2/films/collections",
            &[
                ("type", kind.as_query().to_string()),
                ("page", page.max(1).to_string()),
            ],
        )
        .await
    }

    async fn premieres(&self, year: i32, month: Month) -> Result<FilmList, CatalogError> {
        self.fetch(
            "/v2.2/films/premieres",
            &[("year", year.to_string()), ("month", month_query(month))],
        )
        .await
    }

    async fn similar(&self, catalog_id: CatalogId) -> Result<FilmList, CatalogError> {
        self.fetch(&format!("/v2.2/films/{catalog_id}/similars"), &[])
            .await
            .map_err(film_not_found(catalog_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key: Option<&str>) -> CatalogConfig {
        CatalogConfig {
            base_url: "https://catalog.example/api/".to_string(),
            api_key: api_key.map(str::to_string),
            timeout: Duration::from_secs(1),
        }
    }

    #[test]
    fn test_missing_api_key_is_rejected() {
        assert!(matches!(
            KinopoiskClient::new(&config(None)),
            Err(CatalogError::MissingApiKey)
        ));
        assert!(matches!(
            KinopoiskClient::new(&config(Some("  "))),
            Err(CatalogError::MissingApiKey)
        ));
    }

    #[test]
    fn test_endpoint_joins_base_and_encodes_query() {
        let client = KinopoiskClient::new(&config(Some("key"))).unwrap();

        let url = client
            .endpoint(
                "/v2.1/films/search-by-keyword",
                &[("keyword", "брат 2".to_string()), ("page", "1".to_string())],
            )
            .unwrap();

        assert_eq!(url.path(), "/api/v2.1/films/search-by-keyword");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("keyword".to_string(), "брат 2".to_string()),
                ("page".to_string(), "1".to_string()),
            ]
        );
    }

    #[test]
    fn test_month_query_is_upper_case_english() {
        assert_eq!(month_query(Month::March), "MARCH");
        assert_eq!(month_query(Month::December), "DECEMBER");
    }

    #[test]
    fn test_not_found_mapping_only_touches_404() {
        let id = CatalogId::new(7).unwrap();

        let mapped = film_not_found(id)(CatalogError::HttpStatus { status: 404 });
        assert!(matches!(mapped, CatalogError::FilmNotFound { catalog_id } if catalog_id == id));

        let kept = film_not_found(id)(CatalogError::HttpStatus { status: 500 });
        assert!(matches!(kept, CatalogError::HttpStatus { status: 500 }));
    }

    #[test]
    fn test_current_month_is_plausible() {
        let (year, _month) = current_month();
        assert!(year >= 2024);
    }
}
