//! Runtime configuration for the scraper.
//!
//! Every site-specific constant lives here rather than in the pipeline code,
//! so markup drift on the target site can be patched from a YAML file. All
//! fields are optional in the file; missing ones fall back to the defaults
//! tuned for `https://crypto.news`.
//!
//! ```yaml
//! base_url: https://crypto.news
//! concurrency: 4
//! http:
//!   timeout_secs: 10
//! discovery:
//!   strategies: [class_name, exact_heading]
//!   min_slashes: 5
//! extraction:
//!   min_paragraph_chars: 80
//! ```

use crate::scrapers::discovery::RegionStrategy;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::time::Duration;
use tracing::{info, instrument};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Origin of the target site. Used for the homepage fetch, relative link
    /// resolution and the same-origin check.
    pub base_url: String,
    /// Maximum number of article pages fetched at once. `1` keeps the
    /// pipeline strictly sequential.
    pub concurrency: usize,
    pub http: HttpConfig,
    pub discovery: DiscoveryConfig,
    pub extraction: ExtractionConfig,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: "https://crypto.news".to_string(),
            concurrency: 1,
            http: HttpConfig::default(),
            discovery: DiscoveryConfig::default(),
            extraction: ExtractionConfig::default(),
        }
    }
}

impl ScraperConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid YAML for
    /// this schema.
    #[instrument(level = "info")]
    pub fn load(path: &str) -> Result<Self, Box<dyn Error>> {
        let raw = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&raw)?;
        info!(
            base_url = %config.base_url,
            concurrency = config.concurrency,
            "Loaded scraper configuration"
        );
        Ok(config)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(raw)
    }

    /// Effective fetch concurrency, never below one.
    pub fn concurrency(&self) -> usize {
        self.concurrency.max(1)
    }
}

/// Settings for the shared HTTP client.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    pub user_agent: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36"
                .to_string(),
            timeout_secs: 15,
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Heuristics used to find the "latest" listing and filter its links.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Label of the listing, matched case-insensitively.
    pub keyword: String,
    /// Region strategies, tried in order until one matches.
    pub strategies: Vec<RegionStrategy>,
    /// Minimum number of `/` in an absolute URL for it to count as an
    /// article rather than a listing page.
    pub min_slashes: usize,
    /// URLs containing any of these substrings are rejected.
    pub excluded_patterns: Vec<String>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            keyword: "latest".to_string(),
            strategies: RegionStrategy::ALL.to_vec(),
            min_slashes: 4,
            excluded_patterns: [
                "/category/",
                "/tag/",
                "/author/",
                "#",
                "/buy-crypto/",
                "/events/",
                "/meme-coins/",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

/// CSS selectors and thresholds for article pages.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub title_selector: String,
    /// Container holding the article body. Only the first match is used.
    pub content_selector: String,
    /// Paragraph elements inside the content container.
    pub paragraph_selector: String,
    pub summary_selector: String,
    pub date_selector: String,
    /// Paragraphs must be strictly longer than this many characters.
    pub min_paragraph_chars: usize,
    pub paragraph_separator: String,
    /// Length cap for the error description stored in degraded records.
    pub error_excerpt_chars: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            title_selector: "h1".to_string(),
            content_selector: "article".to_string(),
            paragraph_selector: "p".to_string(),
            summary_selector: r#"meta[name="description"]"#.to_string(),
            date_selector: "time".to_string(),
            min_paragraph_chars: 50,
            paragraph_separator: "\n\n".to_string(),
            error_excerpt_chars: 200,
        }
    }
}
