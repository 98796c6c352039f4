//! Plain-text rendering of catalog records and playback state.

use std::fmt::Write;

use kinoplay_core::{CandidateOrigin, FilmRecord, PlaybackCandidate, PlaybackSnapshot, PlaybackState};

/// One-line listing entry: id, title, year and rating.
pub fn film_line(film: &FilmRecord) -> String {
    let mut line = format!("{:>9}  {}", film.catalog_id.get(), film.display_title());
    if let Some(year) = film.year {
        let _ = write!(line, " ({year})");
    }
    if let Some(rating) = film.rating() {
        let _ = write!(line, "  {rating:.1}");
    }
    line
}

/// Multi-line detail view of a single film.
pub fn film_details(film: &FilmRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", film.display_title());
    if let Some(original) = film.original_title_if_distinct() {
        let _ = writeln!(out, "  Original: {original}");
    }

    let mut facts = Vec::new();
    if let Some(year) = film.year {
        facts.push(year.to_string());
    }
    if let Some(length) = &film.film_length {
        facts.push(length.to_string());
    }
    if let Some(limit) = &film.rating_age_limits {
        facts.push(limit.trim_start_matches("age").to_string() + "+");
    }
    if !facts.is_empty() {
        let _ = writeln!(out, "  {}", facts.join(" | "));
    }

    if let Some(rating) = film.rating_kinopoisk {
        let _ = writeln!(out, "  Kinopoisk: {rating:.1}");
    }
    if let Some(rating) = film.rating_imdb {
        let _ = writeln!(out, "  IMDb: {rating:.1}");
    }

    let genres = film.genre_names();
    if !genres.is_empty() {
        let _ = writeln!(out, "  Genres: {}", genres.join(", "));
    }
    let countries = film.country_names();
    if !countries.is_empty() {
        let _ = writeln!(out, "  Countries: {}", countries.join(", "));
    }
    if let Some(slogan) = &film.slogan {
        let _ = writeln!(out, "  \"{slogan}\"");
    }
    if let Some(description) = film.description.as_ref().or(film.short_description.as_ref()) {
        let _ = writeln!(out, "\n{description}");
    }
    if let Some(poster) = film.poster() {
        let _ = writeln!(out, "\nPoster: {poster}");
    }

    out
}

/// Numbered candidate entry, marked when active.
pub fn candidate_line(index: usize, candidate: &PlaybackCandidate, active: bool) -> String {
    let marker = if active { '>' } else { ' ' };
    let origin = match candidate.origin() {
        CandidateOrigin::Static => "built-in",
        CandidateOrigin::Discovered => "discovered",
    };
    format!(
        "{marker} {}. {}  [{origin}]  {}",
        index + 1,
        candidate.label(),
        candidate.url()
    )
}

/// Session state as shown in the interactive watcher.
pub fn snapshot_summary(snapshot: &PlaybackSnapshot) -> String {
    match snapshot.state {
        PlaybackState::Idle => "Stopped. Press r to resolve players.".to_string(),
        PlaybackState::Resolving => "Looking for players...".to_string(),
        PlaybackState::Exhausted => snapshot
            .message
            .clone()
            .unwrap_or_else(|| "No players left".to_string()),
        PlaybackState::Ready => snapshot
            .candidates
            .iter()
            .enumerate()
            .map(|(index, candidate)| {
                candidate_line(index, candidate, snapshot.active_index == Some(index))
            })
            .collect::<Vec<_>>()
            .join("\n"),
    }
}
