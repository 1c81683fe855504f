//! # Crypto News Scraper
//!
//! Discovers the latest articles on the [crypto.news](https://crypto.news)
//! homepage, extracts each article's title, body, summary and publication
//! date, and serves the result as JSON.
//!
//! ## Usage
//!
//! ```sh
//! crypto_news_scraper --port 8001
//! curl 'http://localhost:8001/crypto-news?limit=5'
//! ```
//!
//! ## Architecture
//!
//! 1. **Indexing**: locate the homepage's "latest" listing and collect article URLs
//! 2. **Fetching**: download and extract each article (one degraded record per failure)
//! 3. **Serving**: wrap the records in a JSON envelope (`/crypto-news`)

use clap::Parser;
use std::error::Error;
use std::sync::Arc;
use tracing::{debug, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod config;
mod error;
mod models;
mod scrapers;
mod utils;

use api::{AppState, router};
use cli::Cli;
use config::ScraperConfig;
use models::ScrapeResponse;
use scrapers::http::HttpFetcher;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let config = match args.config.as_deref() {
        Some(path) => ScraperConfig::load(path)?,
        None => ScraperConfig::default(),
    };
    let fetcher = HttpFetcher::new(&config.http)?;

    if let Some(limit) = args.scrape {
        return scrape_once(&fetcher, &config, usize::from(limit)).await;
    }

    let state = Arc::new(AppState { fetcher, config });
    let app = router(state);

    let addr = args.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "Crypto News Scraper API listening");
    axum::serve(listener, app).await?;

    Ok(())
}

/// Run the pipeline once and print the response envelope to stdout.
#[instrument(level = "info", skip(fetcher, config))]
async fn scrape_once(
    fetcher: &HttpFetcher,
    config: &ScraperConfig,
    limit: usize,
) -> Result<(), Box<dyn Error>> {
    let start_time = std::time::Instant::now();
    let articles = scrapers::crypto_news::scrape(fetcher, config, limit).await?;
    let response = ScrapeResponse::from_articles(articles);
    println!("{}", serde_json::to_string_pretty(&response)?);

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        count = response.count,
        "Scrape complete"
    );
    Ok(())
}
