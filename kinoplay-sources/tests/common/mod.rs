//! Local HTTP fixture standing in for the discovery provider and the catalog.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

use axum::extract::{Path, Query};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub const API_KEY: &str = "fixture-key";

/// How long the `slow` discovery scenario waits before answering.
pub const SLOW_RESPONSE: Duration = Duration::from_secs(3);

/// Fixture server bound to an ephemeral localhost port.
pub struct FixtureServer {
    pub address: SocketAddr,
    task: JoinHandle<()>,
}

impl FixtureServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fixture server");
        let address = listener.local_addr().expect("fixture address");

        let task = tokio::spawn(async move {
            axum::serve(listener, router())
                .await
                .expect("fixture server");
        });

        Self { address, task }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.address)
    }

    /// Discovery endpoint template for one of the scripted scenarios.
    pub fn discovery_endpoint(&self, scenario: &str) -> String {
        self.url(&format!("/players/{scenario}?kinopoisk={{catalog_id}}"))
    }

    pub fn catalog_base(&self) -> String {
        self.url("/api")
    }
}

impl Drop for FixtureServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Address nothing listens on.
pub async fn closed_address() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind probe");
    listener.local_addr().expect("probe address")
}

fn router() -> Router {
    Router::new()
        .route("/players/{scenario}", get(players))
        .route("/api/v2.2/films/collections", get(collections))
        .route("/api/v2.2/films/premieres", get(premieres))
        .route("/api/v2.2/films/{id}", get(film))
        .route("/api/v2.2/films/{id}/similars", get(similars))
        .route("/api/v2.1/films/search-by-keyword", get(search))
}

async fn players(
    Path(scenario): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let id = params.get("kinopoisk").cloned().unwrap_or_default();

    match scenario.as_str() {
        "ok" => Json(json!([
            {"source": "Alloha", "iframeUrl": format!("https://alloha.example/film/{id}"), "quality": "1080p"},
            {"source": "", "iframeUrl": "https://blank-name.example/"},
            {"source": "Kodik", "iframeUrl": format!("//kodik.example/film/{id}")},
            {"iframeUrl": "https://nameless.example/"},
            {"source": "Broken", "iframeUrl": "not a url"},
        ]))
        .into_response(),
        "empty" => Json(json!([])).into_response(),
        "error" => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        "malformed" => (StatusCode::OK, "<html>players</html>").into_response(),
        "object" => Json(json!({"players": []})).into_response(),
        "slow" => {
            tokio::time::sleep(SLOW_RESPONSE).await;
            Json(json!([])).into_response()
        }
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("X-API-KEY")
        .and_then(|value| value.to_str().ok())
        .is_some_and(|key| key == API_KEY)
}

pub fn matrix_json() -> Value {
    json!({
        "kinopoiskId": 301,
        "imdbId": "tt0133093",
        "nameRu": "Матрица",
        "nameOriginal": "The Matrix",
        "posterUrl": "https://posters.example/301.jpg",
        "year": 1999,
        "filmLength": 136,
        "ratingKinopoisk": 8.5,
        "ratingImdb": 8.7,
        "genres": [{"genre": "фантастика"}, {"genre": "боевик"}],
        "countries": [{"country": "США"}],
        "type": "FILM",
        "slogan": "Добро пожаловать в реальный мир",
        "webUrl": "https://www.kinopoisk.ru/film/301/",
        "ratingAgeLimits": "age16"
    })
}

async fn film(Path(id): Path<String>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    match id.as_str() {
        "301" => Json(matrix_json()).into_response(),
        "999" => (StatusCode::OK, "{\"kinopoiskId\": ").into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn similars(Path(id): Path<String>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if id != "301" {
        return StatusCode::NOT_FOUND.into_response();
    }
    Json(json!({
        "total": 2,
        "items": [
            {"filmId": 10, "nameRu": "Матрица: Перезагрузка", "relationType": "SEQUEL"},
            {"filmId": 11, "nameRu": "Матрица: Революция", "relationType": "SEQUEL"}
        ]
    }))
    .into_response()
}

async fn search(Query(params): Query<HashMap<String, String>>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let keyword = params.get("keyword").cloned().unwrap_or_default();
    let page = params.get("page").cloned().unwrap_or_default();
    Json(json!({
        "keyword": keyword,
        "pagesCount": 3,
        "searchFilmsCountResult": 41,
        "films": [
            {"filmId": 301, "nameRu": format!("{keyword} p{page}"), "year": "1999", "filmLength": "2:16"}
        ]
    }))
    .into_response()
}

async fn collections(
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let total = match params.get("type").map(String::as_str) {
        Some("TOP_250_MOVIES") => 250,
        Some("TOP_POPULAR_ALL") => 100,
        _ => return StatusCode::BAD_REQUEST.into_response(),
    };
    Json(json!({
        "total": total,
        "totalPages": total / 20,
        "items": [matrix_json()]
    }))
    .into_response()
}

async fn premieres(
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let (Some(year), Some(month)) = (params.get("year"), params.get("month")) else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    Json(json!({
        "total": 1,
        "items": [
            {"kinopoiskId": 5000, "nameRu": format!("{month} {year}"), "year": 2024, "premiereRu": "2024-03-07"}
        ]
    }))
    .into_response()
}
