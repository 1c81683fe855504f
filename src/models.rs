//! Data models for scraped articles and the API envelopes around them.
//!
//! - [`Article`]: one extracted (or degraded) article page
//! - [`ScrapeResponse`]: success envelope returned by `/crypto-news`
//! - [`ErrorResponse`]: structured body for failed requests

use crate::utils::{now_iso, truncate_chars};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Title placed on records whose page could not be fetched or parsed.
pub const DEGRADED_TITLE: &str = "Error fetching article";

/// A single article as extracted from its page.
///
/// `url` and `scraped_at` are always populated. Every other field is
/// best-effort and may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Article {
    pub url: String,
    pub title: String,
    /// Contents of the page's description meta tag.
    #[serde(default)]
    pub summary: String,
    /// Body paragraphs separated by blank lines.
    pub content: String,
    /// Publication date as written in the page (usually ISO-8601).
    #[serde(default)]
    pub date: String,
    pub scraped_at: String,
}

impl Article {
    /// Build the placeholder record for an article that failed.
    ///
    /// `content` carries `"Error: "` followed by at most `max_chars`
    /// characters of the failure description.
    pub fn degraded(url: &str, error: &dyn Display, max_chars: usize) -> Self {
        Self {
            url: url.to_string(),
            title: DEGRADED_TITLE.to_string(),
            summary: String::new(),
            content: format!("Error: {}", truncate_chars(&error.to_string(), max_chars)),
            date: String::new(),
            scraped_at: now_iso(),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.title == DEGRADED_TITLE && self.content.starts_with("Error: ")
    }
}

/// Success envelope for a scrape run.
#[derive(Debug, Deserialize, Serialize)]
pub struct ScrapeResponse {
    pub success: bool,
    pub articles: Vec<Article>,
    pub count: usize,
    pub scraped_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ScrapeResponse {
    pub fn from_articles(articles: Vec<Article>) -> Self {
        let count = articles.len();
        Self {
            success: true,
            articles,
            count,
            scraped_at: now_iso(),
            message: Some(format!("Successfully scraped {count} article(s)")),
        }
    }
}

/// Body of every non-2xx response.
#[derive(Debug, Deserialize, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            message: message.into(),
        }
    }
}
