//! CLI command implementations

use anyhow::{Context, Result};
use chrono::Month;
use clap::Subcommand;
use kinoplay_core::playback::iframe_markup;
use kinoplay_core::{
    CatalogId, ExternalId, FilmIdentifiers, FilmRecord, KinoplayConfig, KinoplayError,
    PlaybackError, ResolutionMode,
};
use kinoplay_sources::catalog::current_month;
use kinoplay_sources::{
    CatalogError, FilmCatalog, KinopoiskClient, PlaybackHandle, SourceResolver,
    spawn_playback_session,
};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::output;
use crate::terminal::TerminalEmbed;

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Show catalog details for a film
    Film {
        /// Kinopoisk film id
        catalog_id: CatalogId,
    },
    /// List playback candidates for a film
    Resolve {
        /// Kinopoisk film id
        catalog_id: CatalogId,
        /// IMDb id; looked up in the catalog when omitted
        #[arg(long)]
        imdb: Option<String>,
        /// Skip the discovery provider
        #[arg(long)]
        static_only: bool,
        /// Print iframe markup for every candidate
        #[arg(long)]
        html: bool,
    },
    /// Interactively play a film, switching players on demand
    Watch {
        /// Kinopoisk film id
        catalog_id: CatalogId,
        /// IMDb id; looked up in the catalog when omitted
        #[arg(long)]
        imdb: Option<String>,
        /// Skip the discovery provider
        #[arg(long)]
        static_only: bool,
    },
    /// Search films by keyword
    Search {
        keyword: String,
        #[arg(short, long, default_value = "1")]
        page: u32,
    },
    /// Top 250 films
    Top {
        #[arg(short, long, default_value = "1")]
        page: u32,
    },
    /// Currently popular films
    Popular {
        #[arg(short, long, default_value = "1")]
        page: u32,
    },
    /// Premieres for a month (current month by default)
    Premieres {
        #[arg(long)]
        year: Option<i32>,
        /// Month name, e.g. "march"
        #[arg(long, value_parser = parse_month)]
        month: Option<Month>,
    },
    /// Films similar to the given one
    Similar {
        /// Kinopoisk film id
        catalog_id: CatalogId,
    },
}

fn parse_month(raw: &str) -> std::result::Result<Month, String> {
    raw.trim()
        .parse::<Month>()
        .map_err(|_| format!("Invalid month: {raw}"))
}

/// Handle the CLI command
///
/// # Errors
/// Returns appropriate error based on the command that fails
pub async fn handle_command(command: Commands) -> Result<()> {
    let config = KinoplayConfig::from_env();

    match command {
        Commands::Film { catalog_id } => show_film(&config, catalog_id).await,
        Commands::Resolve {
            catalog_id,
            imdb,
            static_only,
            html,
        } => resolve(&config, catalog_id, imdb, static_only, html).await,
        Commands::Watch {
            catalog_id,
            imdb,
            static_only,
        } => watch(&config, catalog_id, imdb, static_only).await,
        Commands::Search { keyword, page } => search(&config, &keyword, page).await,
        Commands::Top { page } => {
            let page = catalog(&config)?.top(page).await?;
            print_films(&page.items);
            println!("{} pages, {} films", page.total_pages, page.total);
            Ok(())
        }
        Commands::Popular { page } => {
            let page = catalog(&config)?.popular(page).await?;
            print_films(&page.items);
            println!("{} pages, {} films", page.total_pages, page.total);
            Ok(())
        }
        Commands::Premieres { year, month } => premieres(&config, year, month).await,
        Commands::Similar { catalog_id } => {
            let similar = catalog(&config)?
                .similar(catalog_id)
                .await
                .with_context(|| format!("Loading films similar to {catalog_id}"))?;
            print_films(&similar.items);
            Ok(())
        }
    }
}

fn catalog(config: &KinoplayConfig) -> Result<KinopoiskClient> {
    KinopoiskClient::new(&config.catalog).map_err(|e| match e {
        CatalogError::MissingApiKey => KinoplayError::Configuration {
            reason: CatalogError::MissingApiKey.to_string(),
        }
        .into(),
        other => other.into(),
    })
}

fn resolver(config: &KinoplayConfig) -> Result<SourceResolver> {
    SourceResolver::from_config(config).map_err(|e| {
        KinoplayError::Configuration {
            reason: e.to_string(),
        }
        .into()
    })
}

fn resolution_mode(config: &KinoplayConfig, static_only: bool) -> ResolutionMode {
    if static_only {
        ResolutionMode::StaticOnly
    } else {
        config.playback.mode
    }
}

fn print_films(films: &[FilmRecord]) {
    if films.is_empty() {
        println!("No films found");
    }
    for film in films {
        println!("{}", output::film_line(film));
    }
}

/// Identifiers for playback. The catalog is consulted only for the IMDb id,
/// and any failure there falls back to the catalog id alone.
async fn film_identifiers(
    config: &KinoplayConfig,
    catalog_id: CatalogId,
    imdb: Option<String>,
) -> FilmIdentifiers {
    if let Some(raw) = imdb {
        return FilmIdentifiers::new(catalog_id, ExternalId::parse(&raw));
    }

    let client = match KinopoiskClient::new(&config.catalog) {
        Ok(client) => client,
        Err(e) => {
            tracing::debug!(%catalog_id, "Catalog unavailable, resolving by catalog id only: {e}");
            return FilmIdentifiers::new(catalog_id, None);
        }
    };

    match client.get_film(catalog_id).await {
        Ok(film) => {
            println!("{}", output::film_line(&film));
            FilmIdentifiers::extract(&film)
        }
        Err(e) => {
            tracing::warn!(%catalog_id, "Film lookup failed, resolving by catalog id only: {e}");
            FilmIdentifiers::new(catalog_id, None)
        }
    }
}

async fn show_film(config: &KinoplayConfig, catalog_id: CatalogId) -> Result<()> {
    let film = catalog(config)?
        .get_film(catalog_id)
        .await
        .with_context(|| format!("Loading film {catalog_id}"))?;

    print!("{}", output::film_details(&film));
    Ok(())
}

async fn resolve(
    config: &KinoplayConfig,
    catalog_id: CatalogId,
    imdb: Option<String>,
    static_only: bool,
    html: bool,
) -> Result<()> {
    let identifiers = film_identifiers(config, catalog_id, imdb).await;
    let candidates = resolver(config)?
        .resolve(&identifiers, resolution_mode(config, static_only))
        .await;

    if candidates.is_empty() {
        println!("{}", PlaybackError::NoCandidates.user_message());
        return Ok(());
    }

    for (index, candidate) in candidates.iter().enumerate() {
        println!("{}", output::candidate_line(index, candidate, false));
        if html {
            println!("{}\n", iframe_markup(candidate));
        }
    }
    Ok(())
}

async fn search(config: &KinoplayConfig, keyword: &str, page: u32) -> Result<()> {
    let results = catalog(config)?
        .search(keyword, page)
        .await
        .with_context(|| format!("Searching for {keyword:?}"))?;

    print_films(&results.films);
    println!(
        "Page {page} of {} ({} matches)",
        results.pages_count, results.search_films_count_result
    );
    Ok(())
}

async fn premieres(config: &KinoplayConfig, year: Option<i32>, month: Option<Month>) -> Result<()> {
    let client = catalog(config)?;
    let list = match (year, month) {
        (None, None) => client.premieres_this_month().await?,
        (year, month) => {
            let (this_year, this_month) = current_month();
            client
                .premieres(year.unwrap_or(this_year), month.unwrap_or(this_month))
                .await?
        }
    };

    print_films(&list.items);
    Ok(())
}

async fn watch(
    config: &KinoplayConfig,
    catalog_id: CatalogId,
    imdb: Option<String>,
    static_only: bool,
) -> Result<()> {
    let identifiers = film_identifiers(config, catalog_id, imdb).await;
    let handle = spawn_playback_session(
        resolver(config)?,
        identifiers,
        resolution_mode(config, static_only),
        TerminalEmbed,
        config.playback.command_buffer,
    );

    println!("Commands: <number> switch player, f player failed, r resolve again, s stop, q quit");
    handle.start().await?;
    print_settled(&handle).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.map_err(KinoplayError::from)? {
        match line.trim() {
            "" => {}
            "q" | "quit" => break,
            "r" => {
                handle.start().await?;
                print_settled(&handle).await?;
            }
            "s" => {
                handle.stop().await?;
                println!("{}", output::snapshot_summary(&handle.snapshot().await?));
            }
            "f" => report_failure(&handle).await?,
            other => match other.parse::<usize>() {
                Ok(number) if number > 0 => match handle.switch_to(number - 1).await {
                    Ok(()) => {}
                    Err(e @ PlaybackError::InvalidCandidateIndex { .. }) => {
                        println!("{}", e.user_message());
                    }
                    Err(e) => return Err(e.into()),
                },
                _ => println!("Unknown command: {other}"),
            },
        }
    }

    handle.shutdown().await?;
    Ok(())
}

async fn print_settled(handle: &PlaybackHandle) -> Result<()> {
    let snapshot = handle.wait_until_settled().await?;
    println!("{}", output::snapshot_summary(&snapshot));
    Ok(())
}

async fn report_failure(handle: &PlaybackHandle) -> Result<()> {
    let snapshot = handle.snapshot().await?;
    let Some(index) = snapshot.active_index else {
        println!("No player is active");
        return Ok(());
    };

    if let Some(candidate) = snapshot.active_candidate() {
        let failure = PlaybackError::EmbedPlaybackFailed {
            provider: candidate.label(),
        };
        tracing::info!("{failure}");
        println!("{}", failure.user_message());
    }

    handle.report_embed_failure(index).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_month_accepts_names() {
        assert_eq!(parse_month("march"), Ok(Month::March));
        assert_eq!(parse_month(" Dec "), Ok(Month::December));
        assert!(parse_month("thirteenth").is_err());
    }

    #[test]
    fn test_static_only_flag_overrides_config() {
        let config = KinoplayConfig::for_testing();

        assert_eq!(resolution_mode(&config, true), ResolutionMode::StaticOnly);
        assert_eq!(resolution_mode(&config, false), config.playback.mode);
    }

    #[test]
    fn test_missing_api_key_is_configuration_error() {
        let config = KinoplayConfig::for_testing();

        let err = catalog(&config).unwrap_err();
        let kinoplay = err.downcast_ref::<KinoplayError>();
        assert!(matches!(kinoplay, Some(KinoplayError::Configuration { .. })));
        assert!(kinoplay.is_some_and(KinoplayError::is_user_error));
    }

    #[tokio::test]
    async fn test_explicit_imdb_skips_catalog() {
        let config = KinoplayConfig::for_testing();
        let id = CatalogId::new(301).unwrap();

        let identifiers = film_identifiers(&config, id, Some("tt0133093".to_string())).await;

        assert_eq!(
            identifiers.external_id.as_ref().map(ExternalId::as_str),
            Some("tt0133093")
        );
    }

    #[tokio::test]
    async fn test_missing_catalog_falls_back_to_catalog_id() {
        let config = KinoplayConfig::for_testing();
        let id = CatalogId::new(301).unwrap();

        let identifiers = film_identifiers(&config, id, None).await;

        assert_eq!(identifiers.catalog_id, id);
        assert!(identifiers.external_id.is_none());
    }
}
