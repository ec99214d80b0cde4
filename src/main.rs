//! Command-line front end
//!
//! Every subcommand runs one workflow and prints the JSON envelope on
//! stdout. Logs go to stderr.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use gomunime_scraper_lib::application::dto::{
    self, AnimeTerbaruItem, MovieItem, SearchResultItem,
};
use gomunime_scraper_lib::infrastructure::init_logging_with_config;
use gomunime_scraper_lib::{AnimeScraper, ApiResponse, AppConfig};

#[derive(Debug, Parser)]
#[command(name = "gomunime-scraper", version, about = "Anime metadata from gomunime.co as JSON")]
struct Cli {
    /// Configuration file (toml, yaml or json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Top list, new episodes, movies and release schedule
    Home,
    /// Latest releases
    Latest {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Latest releases shaped as movie entries
    Movies {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Weekly release schedule, optionally for a single day
    Schedule {
        #[arg(long)]
        day: Option<String>,
    },
    /// Anime series detail by slug
    Anime { slug: String },
    /// Episode detail by URL
    Episode { url: String },
    /// Search by title
    Search { query: String },
    /// Weekly, monthly and all-time rankings
    Popular,
    /// Titles in a genre
    Genre {
        slug: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    init_logging_with_config(&config.logging)?;
    info!("Configuration loaded (base: {})", config.site.base_url);

    let label = config.site.source_label.clone();
    let scraper = AnimeScraper::from_config(config)?;

    let output = match cli.command {
        Command::Home => {
            let sources = scraper.home_sources().await?;
            render(&dto::home(&sources, &label), cli.pretty)?
        }
        Command::Latest { page } => {
            let latest = scraper.latest_releases(page).await?;
            render(&dto::listing::<AnimeTerbaruItem>(&latest.data, &label), cli.pretty)?
        }
        Command::Movies { page } => {
            let latest = scraper.latest_releases(page).await?;
            render(&dto::listing::<MovieItem>(&latest.data, &label), cli.pretty)?
        }
        Command::Schedule { day: None } => {
            let schedule = scraper.schedule().await?;
            render(&dto::schedule(&schedule.data, &label), cli.pretty)?
        }
        Command::Schedule { day: Some(day) } => {
            let schedule = scraper.schedule().await?;
            render(&dto::schedule_for_day(&schedule.data, &day, &label)?, cli.pretty)?
        }
        Command::Anime { slug } => {
            let record = scraper.anime_detail_with_recovery(&slug).await?;
            render(&dto::anime_detail(&record.data, &label), cli.pretty)?
        }
        Command::Episode { url } => {
            let record = scraper.episode_detail(&url).await?;
            render(&dto::episode_detail(&record.data, &label)?, cli.pretty)?
        }
        Command::Search { query } => {
            let results = scraper.search(&query).await?;
            render(&dto::listing::<SearchResultItem>(&results.data, &label), cli.pretty)?
        }
        Command::Popular => {
            let rankings = scraper.popular().await?;
            render(&ApiResponse::from_aggregate(rankings, &label), cli.pretty)?
        }
        Command::Genre { slug, page } => {
            let genre = scraper.genre(&slug, page).await?;
            render(&ApiResponse::from_aggregate(genre, &label), cli.pretty)?
        }
    };

    println!("{output}");
    Ok(())
}

fn render<T: Serialize>(response: &ApiResponse<T>, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(response)
    } else {
        serde_json::to_string(response)
    };
    json.context("Failed to serialize response")
}
