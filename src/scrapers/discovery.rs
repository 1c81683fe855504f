//! Article discovery on the homepage.
//!
//! The homepage has no stable markup for its "latest" listing, so the
//! listing ("region") is located with an ordered chain of
//! [`RegionStrategy`] heuristics. The first strategy that yields a region
//! wins. Anchors inside that region are then resolved, filtered and
//! deduplicated into at most `limit` article URLs.
//!
//! # URL Rules
//!
//! A candidate URL is accepted when it:
//! - contains the site's base URL (same origin)
//! - contains at least `min_slashes` `/` characters
//! - contains none of the excluded patterns (`/category/`, `/tag/`, ...)
//! - has not been accepted already in this run

use crate::config::DiscoveryConfig;
use crate::error::DiscoveryError;
use crate::utils::{normalize_text, truncate_for_log};
use itertools::Itertools;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use url::Url;

static LABEL_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("h1, h2, h3, div").unwrap());
static HEADING_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("h1, h2, h3").unwrap());
static BLOCK_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("section, div").unwrap());
static LINK_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());

/// Element names that may hold the listing after a "latest" heading.
const PROXIMITY_TAGS: [&str; 3] = ["section", "div", "article"];

/// One way of locating the "latest" listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionStrategy {
    /// A heading (or `div`) whose whole text is the keyword; the region is
    /// its parent.
    ExactHeading,
    /// The first `section`/`div` whose class attribute contains the keyword.
    ClassName,
    /// The first `section`/`div`/`article` following a heading that merely
    /// mentions the keyword.
    HeadingProximity,
}

impl RegionStrategy {
    pub const ALL: [RegionStrategy; 3] = [
        RegionStrategy::ExactHeading,
        RegionStrategy::ClassName,
        RegionStrategy::HeadingProximity,
    ];

    /// Try to locate the region in `document`.
    ///
    /// `keyword` must already be lower-cased.
    pub fn locate<'a>(self, document: &'a Html, keyword: &str) -> Option<ElementRef<'a>> {
        match self {
            RegionStrategy::ExactHeading => document
                .select(&LABEL_SELECTOR)
                .find(|el| element_text(el) == keyword)
                .and_then(|label| label.parent())
                .and_then(ElementRef::wrap),
            RegionStrategy::ClassName => document.select(&BLOCK_SELECTOR).find(|el| {
                el.value()
                    .attr("class")
                    .is_some_and(|class| class.to_lowercase().contains(keyword))
            }),
            RegionStrategy::HeadingProximity => {
                let heading = document
                    .select(&HEADING_SELECTOR)
                    .find(|el| element_text(el).contains(keyword))?;
                next_block_after(document, heading)
            }
        }
    }
}

/// Lower-cased, whitespace-normalised text of an element.
fn element_text(el: &ElementRef<'_>) -> String {
    normalize_text(el.text()).to_lowercase()
}

/// The first region-like element after `heading` in document order,
/// including the heading's own descendants.
fn next_block_after<'a>(document: &'a Html, heading: ElementRef<'a>) -> Option<ElementRef<'a>> {
    document
        .root_element()
        .descendants()
        .skip_while(|node| node.id() != heading.id())
        .skip(1)
        .filter_map(ElementRef::wrap)
        .find(|el| PROXIMITY_TAGS.contains(&el.value().name()))
}

/// Run the configured strategies in order and return the first region found.
fn locate_region<'a>(
    document: &'a Html,
    config: &DiscoveryConfig,
) -> Option<(RegionStrategy, ElementRef<'a>)> {
    let keyword = config.keyword.trim().to_lowercase();
    config.strategies.iter().find_map(|strategy| {
        let region = strategy.locate(document, &keyword);
        debug!(?strategy, found = region.is_some(), "Tried region strategy");
        region.map(|region| (*strategy, region))
    })
}

/// Accept/reject rules for candidate article URLs.
#[derive(Debug)]
pub struct UrlFilter<'c> {
    origin: &'c str,
    config: &'c DiscoveryConfig,
}

impl<'c> UrlFilter<'c> {
    pub fn new(base_url: &'c str, config: &'c DiscoveryConfig) -> Result<Self, DiscoveryError> {
        Url::parse(base_url).map_err(|e| DiscoveryError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            origin: base_url.trim_end_matches('/'),
            config,
        })
    }

    /// Turn an `href` into an absolute URL. Root-relative links are
    /// prefixed with the origin verbatim (no percent-encoding or dot-segment
    /// normalisation), so they compare equal to the same link written out
    /// in full. Anything else is taken as written.
    pub fn resolve(&self, href: &str) -> String {
        if href.starts_with('/') && !href.starts_with("//") {
            format!("{}{}", self.origin, href)
        } else {
            href.to_string()
        }
    }

    /// Whether an absolute URL looks like an article on this site.
    pub fn accepts(&self, url: &str) -> bool {
        url.contains(self.origin)
            && url.matches('/').count() >= self.config.min_slashes
            && !self
                .config
                .excluded_patterns
                .iter()
                .any(|pattern| url.contains(pattern.as_str()))
    }
}

/// Resolve, filter and deduplicate `hrefs`, stopping as soon as `limit`
/// URLs have been accepted.
///
/// `hrefs` is consumed lazily; nothing past the `limit`-th accepted URL is
/// pulled from it.
pub fn select_article_urls<'h, I>(hrefs: I, filter: &UrlFilter<'_>, limit: usize) -> Vec<String>
where
    I: IntoIterator<Item = &'h str>,
{
    hrefs
        .into_iter()
        .map(|href| filter.resolve(href))
        .filter(|url| filter.accepts(url))
        .unique()
        .take(limit)
        .collect()
}

/// Discover up to `limit` article URLs in the homepage's "latest" listing.
///
/// # Arguments
///
/// * `homepage_html` - Raw HTML of the homepage
/// * `base_url` - Site origin, e.g. `https://crypto.news`
/// * `limit` - Upper bound on the number of URLs returned
/// * `config` - Region strategies and URL filter settings
///
/// # Returns
///
/// Absolute article URLs in document order, without duplicates.
///
/// # Errors
///
/// - [`DiscoveryError::NoLatestSection`] if no strategy finds a region
/// - [`DiscoveryError::NoArticles`] if the region holds no acceptable link
/// - [`DiscoveryError::InvalidBaseUrl`] if `base_url` does not parse
#[instrument(level = "info", skip(homepage_html, config), fields(bytes = homepage_html.len()))]
pub fn discover(
    homepage_html: &str,
    base_url: &str,
    limit: usize,
    config: &DiscoveryConfig,
) -> Result<Vec<String>, DiscoveryError> {
    let filter = UrlFilter::new(base_url, config)?;
    let document = Html::parse_document(homepage_html);

    let Some((strategy, region)) = locate_region(&document, config) else {
        warn!("No latest section found; homepage markup may have changed");
        debug!(preview = %truncate_for_log(homepage_html, 500), "Homepage preview");
        return Err(DiscoveryError::NoLatestSection);
    };
    info!(?strategy, tag = region.value().name(), "Located latest section");

    let hrefs = region
        .select(&LINK_SELECTOR)
        .filter_map(|link| link.value().attr("href"));
    let urls = select_article_urls(hrefs, &filter, limit);

    if urls.is_empty() {
        warn!(?strategy, "Latest section contained no article links");
        return Err(DiscoveryError::NoArticles);
    }

    info!(count = urls.len(), "Discovered article URLs");
    debug!(?urls, "Article URLs");
    Ok(urls)
}
