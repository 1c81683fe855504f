//! Command-line interface definitions for the crypto news scraper.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Host and port can also be provided via environment variables.

use clap::Parser;

/// Command-line arguments for the crypto news scraper.
///
/// By default the binary serves the HTTP API. With `--scrape N` it runs the
/// pipeline once, prints the result envelope as JSON and exits.
///
/// # Examples
///
/// ```sh
/// # Serve on the default address (0.0.0.0:8001)
/// crypto_news_scraper
///
/// # Serve with a site profile override
/// crypto_news_scraper --port 9000 --config ./scraper.yaml
///
/// # One-off scrape of the five latest articles
/// crypto_news_scraper --scrape 5
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Address to bind the HTTP API to
    #[arg(long, env = "CRYPTO_NEWS_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to bind the HTTP API to
    #[arg(short, long, env = "CRYPTO_NEWS_PORT", default_value_t = 8001)]
    pub port: u16,

    /// Optional path to a YAML scraper configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Scrape this many articles once, print JSON to stdout and exit
    #[arg(long, value_name = "LIMIT", value_parser = clap::value_parser!(u16).range(1..=20))]
    pub scrape: Option<u16>,
}

impl Cli {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
