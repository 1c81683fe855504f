//! Error taxonomy for the scraping pipeline.
//!
//! Each stage owns one error type:
//! - [`FetchError`]: a page could not be downloaded
//! - [`DiscoveryError`]: the homepage yielded no usable article URLs
//! - [`ExtractionError`]: an article page could not be turned into an [`Article`](crate::models::Article)
//! - [`ScrapeError`]: the failures that abort a whole run
//!
//! Only [`ScrapeError`] ever reaches the request-serving layer. Per-article
//! fetch and extraction failures are folded into degraded records instead.

use reqwest::StatusCode;
use thiserror::Error;

/// A page fetch failed at the transport or HTTP level.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("request failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} responded with HTTP {status}")]
    Status { url: String, status: StatusCode },
}

impl FetchError {
    /// The URL whose fetch failed.
    pub fn url(&self) -> &str {
        match self {
            FetchError::Timeout { url }
            | FetchError::Request { url, .. }
            | FetchError::Status { url, .. } => url,
        }
    }

    /// Classify a `reqwest` error raised while fetching `url`.
    pub fn from_reqwest(url: &str, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
            }
        } else {
            FetchError::Request {
                url: url.to_string(),
                source,
            }
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiscoveryError {
    #[error("invalid base url {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("no latest section found")]
    NoLatestSection,

    #[error("no articles found")]
    NoArticles,
}

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("invalid selector `{selector}`: {reason}")]
    Selector { selector: String, reason: String },
}

/// Failures that abort a whole scrape run.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Network error: {0}")]
    Network(#[from] FetchError),

    #[error("Could not find articles: {0}")]
    Discovery(#[from] DiscoveryError),

    #[error("no articles scraped")]
    EmptyResult,
}
