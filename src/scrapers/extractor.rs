//! Field extraction from a single article page.
//!
//! Each field is best-effort and independent of the others: a page with a
//! headline but no body still yields its title. [`extract`] never fails.
//! Anything that prevents building the record at all comes back as a
//! degraded [`Article`] instead.

use crate::config::ExtractionConfig;
use crate::error::ExtractionError;
use crate::models::Article;
use crate::utils::{normalize_text, now_iso};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument, warn};

/// Selectors compiled from an [`ExtractionConfig`].
struct FieldSelectors {
    title: Selector,
    content: Selector,
    paragraph: Selector,
    summary: Selector,
    date: Selector,
}

impl FieldSelectors {
    fn compile(config: &ExtractionConfig) -> Result<Self, ExtractionError> {
        Ok(Self {
            title: compile(&config.title_selector)?,
            content: compile(&config.content_selector)?,
            paragraph: compile(&config.paragraph_selector)?,
            summary: compile(&config.summary_selector)?,
            date: compile(&config.date_selector)?,
        })
    }
}

fn compile(selector: &str) -> Result<Selector, ExtractionError> {
    Selector::parse(selector).map_err(|e| ExtractionError::Selector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

/// Parse an article page into an [`Article`].
///
/// # Arguments
///
/// * `article_html` - Raw HTML of the article page
/// * `url` - The page's URL, copied into the record
/// * `config` - Selectors and thresholds
///
/// # Returns
///
/// The extracted record, or a degraded one if extraction could not run.
#[instrument(level = "debug", skip(article_html, config), fields(bytes = article_html.len()))]
pub fn extract(article_html: &str, url: &str, config: &ExtractionConfig) -> Article {
    match try_extract(article_html, url, config) {
        Ok(article) => article,
        Err(e) => {
            warn!(error = %e, "Extraction failed; recording degraded article");
            Article::degraded(url, &e, config.error_excerpt_chars)
        }
    }
}

/// Fallible core of [`extract`].
///
/// # Errors
///
/// Returns [`ExtractionError::Selector`] when a configured selector does not
/// parse.
pub fn try_extract(
    article_html: &str,
    url: &str,
    config: &ExtractionConfig,
) -> Result<Article, ExtractionError> {
    let selectors = FieldSelectors::compile(config)?;
    let document = Html::parse_document(article_html);

    let title = document
        .select(&selectors.title)
        .next()
        .map(|h1| normalize_text(h1.text()))
        .unwrap_or_default();

    let content = document
        .select(&selectors.content)
        .next()
        .map(|container| body_text(container, &selectors.paragraph, config))
        .unwrap_or_default();

    let summary = document
        .select(&selectors.summary)
        .next()
        .and_then(|meta| meta.value().attr("content"))
        .unwrap_or_default()
        .to_string();

    let date = document
        .select(&selectors.date)
        .next()
        .map(time_value)
        .unwrap_or_default();

    debug!(
        title_chars = title.chars().count(),
        content_chars = content.chars().count(),
        has_summary = !summary.is_empty(),
        has_date = !date.is_empty(),
        "Extracted article fields"
    );

    Ok(Article {
        url: url.to_string(),
        title,
        summary,
        content,
        date,
        scraped_at: now_iso(),
    })
}

/// Paragraphs inside `container` longer than the noise threshold, joined in
/// document order.
fn body_text(container: ElementRef<'_>, paragraph: &Selector, config: &ExtractionConfig) -> String {
    container
        .select(paragraph)
        .map(|p| normalize_text(p.text()))
        .filter(|text| text.chars().count() > config.min_paragraph_chars)
        .collect::<Vec<_>>()
        .join(&config.paragraph_separator)
}

/// Machine-readable `datetime` attribute, falling back to the visible text.
fn time_value(time: ElementRef<'_>) -> String {
    match time.value().attr("datetime").map(str::trim) {
        Some(datetime) if !datetime.is_empty() => datetime.to_string(),
        _ => normalize_text(time.text()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DEGRADED_TITLE;

    const URL: &str = "https://crypto.news/news/bitcoin-hits-100k/";

    fn long_paragraph(n: usize) -> String {
        format!("Paragraph {n} talks at length about the market, liquidity and ETF flows.")
    }

    #[test]
    fn test_title_without_article_container() {
        let html = "<html><body><h1>Bitcoin Hits $100K</h1><p>Short.</p></body></html>";
        let article = extract(html, URL, &ExtractionConfig::default());

        assert_eq!(article.url, URL);
        assert_eq!(article.title, "Bitcoin Hits $100K");
        assert_eq!(article.content, "");
        assert_eq!(article.summary, "");
        assert_eq!(article.date, "");
        assert!(!article.scraped_at.is_empty());
    }

    #[test]
    fn test_full_article() {
        let html = format!(
            r#"<html>
              <head><meta name="description" content="BTC crosses six figures."></head>
              <body>
                <h1>
                  Bitcoin Hits $100K
                </h1>
                <article>
                  <time datetime="2025-05-06T14:30:00+00:00">May 6, 2025</time>
                  <p>{}</p>
                  <p>Photo: Reuters</p>
                  <p>{}</p>
                </article>
              </body>
            </html>"#,
            long_paragraph(1),
            long_paragraph(2)
        );

        let article = extract(&html, URL, &ExtractionConfig::default());
        assert_eq!(article.title, "Bitcoin Hits $100K");
        assert_eq!(article.summary, "BTC crosses six figures.");
        assert_eq!(article.date, "2025-05-06T14:30:00+00:00");
        assert_eq!(
            article.content,
            format!("{}\n\n{}", long_paragraph(1), long_paragraph(2))
        );
        assert!(!article.is_degraded());
    }

    #[test]
    fn test_paragraph_threshold_is_strict() {
        let exactly_fifty = "a".repeat(50);
        let fifty_one = "b".repeat(51);
        let html = format!("<article><p>{exactly_fifty}</p><p>{fifty_one}</p></article>");

        let article = extract(&html, URL, &ExtractionConfig::default());
        assert_eq!(article.content, fifty_one);
    }

    #[test]
    fn test_only_first_article_container_is_used() {
        let html = format!(
            "<article><p>{}</p></article><article><p>{}</p></article>",
            long_paragraph(1),
            long_paragraph(2)
        );

        let article = extract(&html, URL, &ExtractionConfig::default());
        assert_eq!(article.content, long_paragraph(1));
    }

    #[test]
    fn test_date_falls_back_to_visible_text() {
        let html = r#"<body><time datetime="  ">  6 May 2025 </time></body>"#;
        let article = extract(html, URL, &ExtractionConfig::default());
        assert_eq!(article.date, "6 May 2025");

        let html = r#"<body><time>Yesterday</time><time datetime="2025-05-06">x</time></body>"#;
        let article = extract(html, URL, &ExtractionConfig::default());
        assert_eq!(article.date, "Yesterday");
    }

    #[test]
    fn test_meta_without_content_gives_empty_summary() {
        let html = r#"<head><meta name="description"></head><body><h1>T</h1></body>"#;
        let article = extract(html, URL, &ExtractionConfig::default());
        assert_eq!(article.summary, "");
        assert_eq!(article.title, "T");
    }

    #[test]
    fn test_custom_selectors() {
        let config = ExtractionConfig {
            title_selector: "h2.headline".to_string(),
            content_selector: "div.post-body".to_string(),
            min_paragraph_chars: 5,
            ..ExtractionConfig::default()
        };
        let html = r#"
            <h1>Site name</h1>
            <h2 class="headline">Real headline</h2>
            <div class="post-body"><p>Long enough</p><p>tiny</p></div>"#;

        let article = extract(html, URL, &config);
        assert_eq!(article.title, "Real headline");
        assert_eq!(article.content, "Long enough");
    }

    #[test]
    fn test_invalid_selector_degrades() {
        let config = ExtractionConfig {
            content_selector: "article[[".to_string(),
            ..ExtractionConfig::default()
        };

        assert!(matches!(
            try_extract("<h1>T</h1>", URL, &config),
            Err(ExtractionError::Selector { .. })
        ));

        let article = extract("<h1>T</h1>", URL, &config);
        assert_eq!(article.url, URL);
        assert_eq!(article.title, DEGRADED_TITLE);
        assert!(article.content.starts_with("Error: invalid selector"));
        assert!(article.is_degraded());
    }

    #[test]
    fn test_malformed_markup_still_extracts() {
        let html = "<h1>Unclosed <b>title<article><p>".to_string() + &long_paragraph(7);
        let article = extract(&html, URL, &ExtractionConfig::default());
        assert!(article.title.starts_with("Unclosed title"));
        assert!(!article.is_degraded());
    }
}
