//! Film record model as supplied by the catalog (Kinopoisk unofficial API).

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::identifiers::CatalogId;

/// Genre entry as returned by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub genre: String,
}

/// Country entry as returned by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    pub country: String,
}

/// Film running time. Detail endpoints report minutes, search reports `"2:16"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilmLength {
    Minutes(u32),
    Text(String),
}

impl fmt::Display for FilmLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilmLength::Minutes(minutes) => write!(f, "{minutes} min"),
            FilmLength::Text(text) => f.write_str(text),
        }
    }
}

/// A film as loaded from the catalog.
///
/// Only `catalog_id` and `imdb_id` matter to playback resolution; the rest is
/// carried for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilmRecord {
    #[serde(rename = "kinopoiskId", alias = "filmId")]
    pub catalog_id: CatalogId,
    #[serde(default)]
    pub imdb_id: Option<String>,
    #[serde(default)]
    pub name_ru: Option<String>,
    #[serde(default)]
    pub name_en: Option<String>,
    #[serde(default)]
    pub name_original: Option<String>,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub poster_url_preview: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_year")]
    pub year: Option<u16>,
    #[serde(default)]
    pub film_length: Option<FilmLength>,
    #[serde(default)]
    pub rating_kinopoisk: Option<f32>,
    #[serde(default)]
    pub rating_imdb: Option<f32>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub countries: Vec<Country>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default, rename = "type")]
    pub film_type: Option<String>,
    #[serde(default)]
    pub slogan: Option<String>,
    #[serde(default)]
    pub web_url: Option<String>,
    #[serde(default)]
    pub rating_age_limits: Option<String>,
}

impl FilmRecord {
    /// Creates a record carrying only its catalog id.
    pub fn new(catalog_id: CatalogId) -> Self {
        Self {
            catalog_id,
            imdb_id: None,
            name_ru: None,
            name_en: None,
            name_original: None,
            poster_url: None,
            poster_url_preview: None,
            year: None,
            film_length: None,
            rating_kinopoisk: None,
            rating_imdb: None,
            genres: Vec::new(),
            countries: Vec::new(),
            description: None,
            short_description: None,
            film_type: None,
            slogan: None,
            web_url: None,
            rating_age_limits: None,
        }
    }

    /// Title to show: Russian, then original, then English.
    pub fn display_title(&self) -> &str {
        [&self.name_ru, &self.name_original, &self.name_en]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|name| !name.trim().is_empty())
            .unwrap_or("Untitled")
    }

    /// Original title, only when it differs from the displayed one.
    pub fn original_title_if_distinct(&self) -> Option<&str> {
        self.name_original
            .as_deref()
            .filter(|original| *original != self.display_title())
    }

    /// Catalog rating, falling back to IMDb.
    pub fn rating(&self) -> Option<f32> {
        self.rating_kinopoisk
            .filter(|rating| *rating > 0.0)
            .or(self.rating_imdb)
    }

    /// Full-size poster, falling back to the preview.
    pub fn poster(&self) -> Option<&str> {
        self.poster_url
            .as_deref()
            .or(self.poster_url_preview.as_deref())
    }

    pub fn genre_names(&self) -> Vec<&str> {
        self.genres.iter().map(|g| g.genre.as_str()).collect()
    }

    pub fn country_names(&self) -> Vec<&str> {
        self.countries.iter().map(|c| c.country.as_str()).collect()
    }
}

/// Accepts `1999`, `"1999"`, `null` and placeholder strings like `"null"`.
fn deserialize_lenient_year<'de, D>(deserializer: D) -> Result<Option<u16>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawYear {
        Number(u16),
        Text(String),
    }

    let raw = Option::<RawYear>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawYear::Number(year)) => Some(year),
        Some(RawYear::Text(text)) => text.trim().parse().ok(),
        None => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DETAILS_JSON: &str = r#"{
        "kinopoiskId": 301,
        "imdbId": "tt0133093",
        "nameRu": "Матрица",
        "nameEn": null,
        "nameOriginal": "The Matrix",
        "posterUrl": "https://kinopoiskapiunofficial.tech/images/posters/kp/301.jpg",
        "posterUrlPreview": "https://kinopoiskapiunofficial.tech/images/posters/kp_small/301.jpg",
        "ratingKinopoisk": 8.5,
        "ratingImdb": 8.7,
        "year": 1999,
        "filmLength": 136,
        "description": "Жизнь Томаса Андерсона разделена на две части",
        "type": "FILM",
        "genres": [{"genre": "фантастика"}, {"genre": "боевик"}],
        "countries": [{"country": "США"}]
    }"#;

    #[test]
    fn test_deserialize_film_details() {
        let film: FilmRecord = serde_json::from_str(DETAILS_JSON).unwrap();

        assert_eq!(film.catalog_id.get(), 301);
        assert_eq!(film.imdb_id.as_deref(), Some("tt0133093"));
        assert_eq!(film.year, Some(1999));
        assert_eq!(film.film_length, Some(FilmLength::Minutes(136)));
        assert_eq!(film.film_type.as_deref(), Some("FILM"));
        assert_eq!(film.genre_names(), vec!["фантастика", "боевик"]);
        assert_eq!(film.country_names(), vec!["США"]);
    }

    #[test]
    fn test_deserialize_search_entry_with_film_id() {
        let json = r#"{"filmId": 435, "nameRu": "Зеленая миля", "year": "1999", "filmLength": "3:09"}"#;
        let film: FilmRecord = serde_json::from_str(json).unwrap();

        assert_eq!(film.catalog_id.get(), 435);
        assert_eq!(film.year, Some(1999));
        assert_eq!(film.film_length, Some(FilmLength::Text("3:09".to_string())));
        assert!(film.imdb_id.is_none());
        assert!(film.genres.is_empty());
    }

    #[test]
    fn test_placeholder_year_is_absent() {
        let json = r#"{"kinopoiskId": 1, "year": "null"}"#;
        let film: FilmRecord = serde_json::from_str(json).unwrap();
        assert_eq!(film.year, None);
    }

    #[test]
    fn test_missing_catalog_id_is_rejected() {
        assert!(serde_json::from_str::<FilmRecord>(r#"{"nameRu": "x"}"#).is_err());
        assert!(serde_json::from_str::<FilmRecord>(r#"{"kinopoiskId": 0}"#).is_err());
    }

    #[test]
    fn test_display_helpers() {
        let film: FilmRecord = serde_json::from_str(DETAILS_JSON).unwrap();

        assert_eq!(film.display_title(), "Матрица");
        assert_eq!(film.original_title_if_distinct(), Some("The Matrix"));
        assert_eq!(film.rating(), Some(8.5));
        assert_eq!(
            film.poster(),
            Some("https://kinopoiskapiunofficial.tech/images/posters/kp/301.jpg")
        );
    }

    #[test]
    fn test_display_fallbacks() {
        let mut film = FilmRecord::new(CatalogId::new(7).unwrap());
        assert_eq!(film.display_title(), "Untitled");
        assert_eq!(film.rating(), None);
        assert_eq!(film.poster(), None);

        film.name_en = Some("Heat".to_string());
        film.rating_imdb = Some(8.3);
        film.poster_url_preview = Some("small.jpg".to_string());

        assert_eq!(film.display_title(), "Heat");
        assert_eq!(film.original_title_if_distinct(), None);
        assert_eq!(film.rating(), Some(8.3));
        assert_eq!(film.poster(), Some("small.jpg"));
    }
}
