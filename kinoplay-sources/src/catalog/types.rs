//! Catalog response envelopes.

use kinoplay_core::FilmRecord;
use serde::{Deserialize, Serialize};

/// One page of keyword search results.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    #[serde(default)]
    pub keyword: String,
    #[serde(default)]
    pub pages_count: u32,
    /// Total matches across all pages
    #[serde(default)]
    pub search_films_count_result: u32,
    #[serde(default)]
    pub films: Vec<FilmRecord>,
}

/// One page of a curated collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionPage {
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub items: Vec<FilmRecord>,
}

/// Unpaged film list (premieres, similar films).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilmList {
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub items: Vec<FilmRecord>,
}

/// Curated collections the catalog exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionKind {
    Popular,
    Top250,
}

impl CollectionKind {
    pub fn as_query(&self) -> &'static str {
        match self {
            CollectionKind::Popular => "TOP_POPULAR_ALL",
            CollectionKind::Top250 => "TOP_250_MOVIES",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_page_accepts_search_shaped_films() {
        let json = r#"{
            "keyword": "matrix",
            "pagesCount": 2,
            "searchFilmsCountResult": 27,
            "films": [
                {"filmId": 301, "nameRu": "Матрица", "year": "1999", "filmLength": "2:16", "rating": "8.5"}
            ]
        }"#;

        let page: SearchPage = serde_json::from_str(json).unwrap();

        assert_eq!(page.pages_count, 2);
        assert_eq!(page.search_films_count_result, 27);
        assert_eq!(page.films[0].catalog_id.get(), 301);
        assert_eq!(page.films[0].year, Some(1999));
    }

    #[test]
    fn test_collection_page_defaults_missing_fields() {
        let page: CollectionPage = serde_json::from_str(r#"{"items": []}"#).unwrap();

        assert_eq!(page.total, 0);
        assert_eq!(page.total_pages, 0);
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_collection_kind_query_values() {
        assert_eq!(CollectionKind::Popular.as_query(), "TOP_POPULAR_ALL");
        assert_eq!(CollectionKind::Top250.as_query(), "TOP_250_MOVIES");
    }
}
