//! crypto.news scraping pipeline.
//!
//! The run has two phases:
//!
//! 1. **Indexing**: fetch the homepage and [`discover`] article URLs in its
//!    "latest" listing
//! 2. **Fetching**: fetch each article page and [`extract`] it
//!
//! Indexing failures abort the run. Fetching never does: a page that cannot
//! be downloaded becomes a degraded record, so the result always holds one
//! [`Article`] per discovered URL, in discovery order.

use crate::config::ScraperConfig;
use crate::error::{FetchError, ScrapeError};
use crate::models::Article;
use crate::scrapers::discovery::discover;
use crate::scrapers::extractor::extract;
use crate::scrapers::http::FetchPage;
use futures::stream::{self, StreamExt};
use tracing::{debug, error, info, instrument, warn};

/// Fetch the homepage and discover up to `limit` article URLs.
///
/// # Errors
///
/// - [`ScrapeError::Network`] if the homepage cannot be fetched
/// - [`ScrapeError::Discovery`] if no article URLs can be found
#[instrument(level = "info", skip(fetcher, config), fields(base_url = %config.base_url))]
pub async fn index_articles<F: FetchPage>(
    fetcher: &F,
    config: &ScraperConfig,
    limit: usize,
) -> Result<Vec<String>, ScrapeError> {
    let html = fetcher.fetch(&config.base_url).await.map_err(|e| {
        error!(error = %e, url = e.url(), "Homepage fetch failed");
        e
    })?;

    let urls = discover(&html, &config.base_url, limit, &config.discovery)?;
    info!(count = urls.len(), "Indexed crypto.news article URLs");
    Ok(urls)
}

/// Fetch and extract every article in `urls`.
///
/// Up to `config.concurrency()` pages are in flight at once. Output order
/// always matches `urls`, and a failed page only degrades its own record.
#[instrument(level = "info", skip_all, fields(count = urls.len()))]
pub async fn fetch_articles<F: FetchPage>(
    fetcher: &F,
    config: &ScraperConfig,
    urls: Vec<String>,
) -> Vec<Article> {
    let articles: Vec<Article> = stream::iter(urls)
        .map(|url| async move {
            match fetch_article(fetcher, config, &url).await {
                Ok(article) => {
                    debug!(%url, "Fetched crypto.news article");
                    article
                }
                Err(e) => {
                    warn!(error = %e, %url, "Article fetch failed; recording degraded article");
                    Article::degraded(&url, &e, config.extraction.error_excerpt_chars)
                }
            }
        })
        .buffered(config.concurrency())
        .collect()
        .await;

    let degraded = articles.iter().filter(|a| a.is_degraded()).count();
    info!(
        count = articles.len(),
        degraded, "Fetched crypto.news article contents"
    );
    articles
}

/// Fetch a single article page
#[instrument(level = "debug", skip(fetcher, config))]
async fn fetch_article<F: FetchPage>(
    fetcher: &F,
    config: &ScraperConfig,
    url: &str,
) -> Result<Article, FetchError> {
    let body = fetcher.fetch(url).await?;
    Ok(extract(&body, url, &config.extraction))
}

/// Run the full pipeline: index the homepage, then fetch every article.
///
/// # Errors
///
/// Fails if indexing fails, or with [`ScrapeError::EmptyResult`] if no
/// article record was produced.
#[instrument(level = "info", skip(fetcher, config))]
pub async fn scrape<F: FetchPage>(
    fetcher: &F,
    config: &ScraperConfig,
    limit: usize,
) -> Result<Vec<Article>, ScrapeError> {
    let urls = index_articles(fetcher, config, limit).await?;
    let articles = fetch_articles(fetcher, config, urls).await;

    if articles.is_empty() {
        error!("No articles were scraped");
        return Err(ScrapeError::EmptyResult);
    }
    Ok(articles)
}
