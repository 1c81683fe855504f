//! HTTP API exposing the scraper.
//!
//! # Endpoints
//!
//! | Route | Description |
//! |-------|-------------|
//! | `GET /` | Service name, version and endpoint list |
//! | `GET /api-status` | Liveness check |
//! | `GET /crypto-news?limit=N` | Scrape `N` (1-20, default 3) latest articles |
//!
//! Invalid `limit` values are rejected with `422` before the pipeline runs.
//! Pipeline failures map to `500` with an [`ErrorResponse`] body.

use crate::config::ScraperConfig;
use crate::models::{ErrorResponse, ScrapeResponse};
use crate::scrapers::crypto_news;
use crate::scrapers::http::FetchPage;
use crate::utils::now_iso;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info, instrument};

pub const DEFAULT_LIMIT: usize = 3;
pub const MIN_LIMIT: usize = 1;
pub const MAX_LIMIT: usize = 20;

const SERVICE_NAME: &str = "Crypto News Scraper API";
const SCRAPE_FAILED: &str = "Failed to scrape articles. Check if the website is accessible.";
const INVALID_REQUEST: &str = "Invalid request parameters.";

/// Shared state handed to every handler.
#[derive(Debug)]
pub struct AppState<F> {
    pub fetcher: F,
    pub config: ScraperConfig,
}

/// Query string of `/crypto-news`.
///
/// `limit` is taken as text so malformed values get the same structured
/// error body as out-of-range ones.
#[derive(Debug, Deserialize)]
pub struct CryptoNewsQuery {
    limit: Option<String>,
}

/// Validate the `limit` parameter.
pub fn parse_limit(raw: Option<&str>) -> Result<usize, String> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_LIMIT);
    };
    match raw.trim().parse::<usize>() {
        Ok(limit) if (MIN_LIMIT..=MAX_LIMIT).contains(&limit) => Ok(limit),
        _ => Err(format!(
            "limit must be an integer between {MIN_LIMIT} and {MAX_LIMIT}, got `{raw}`"
        )),
    }
}

/// Build the application router.
pub fn router<F>(state: Arc<AppState<F>>) -> Router
where
    F: FetchPage + 'static,
{
    Router::new()
        .route("/", get(root))
        .route("/api-status", get(api_status))
        .route("/crypto-news", get(get_crypto_news::<F>))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "name": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "/crypto-news": format!("GET - Fetch crypto news articles (param: limit={MIN_LIMIT}-{MAX_LIMIT})"),
            "/api-status": "GET - Check API status",
        }
    }))
}

async fn api_status() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": now_iso(),
        "service": "Crypto News Scraper",
    }))
}

#[instrument(level = "info", skip_all)]
async fn get_crypto_news<F>(
    State(state): State<Arc<AppState<F>>>,
    Query(params): Query<CryptoNewsQuery>,
) -> Response
where
    F: FetchPage + 'static,
{
    let limit = match parse_limit(params.limit.as_deref()) {
        Ok(limit) => limit,
        Err(reason) => {
            info!(%reason, "Rejected crypto-news request");
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorResponse::new(reason, INVALID_REQUEST)),
            )
                .into_response();
        }
    };

    match crypto_news::scrape(&state.fetcher, &state.config, limit).await {
        Ok(articles) => {
            info!(count = articles.len(), "Serving scraped articles");
            Json(ScrapeResponse::from_articles(articles)).into_response()
        }
        Err(e) => {
            error!(error = %e, "Scrape failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(e.to_string(), SCRAPE_FAILED)),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DEGRADED_TITLE;
    use crate::scrapers::http::testing::StaticFetcher;
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    const HOME: &str = "https://crypto.news";

    fn app(fetcher: StaticFetcher) -> Router {
        router(Arc::new(AppState {
            fetcher,
            config: ScraperConfig::default(),
        }))
    }

    fn latest_homepage() -> &'static str {
        r#"<html><body>
             <section><h2>Latest</h2>
               <a href="/news/one/">One</a>
               <a href="/news/two/">Two</a>
               <a href="/news/three/">Three</a>
               <a href="/news/four/">Four</a>
             </section>
           </body></html>"#
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_parse_limit() {
        assert_eq!(parse_limit(None), Ok(DEFAULT_LIMIT));
        assert_eq!(parse_limit(Some("1")), Ok(1));
        assert_eq!(parse_limit(Some("20")), Ok(20));
        assert!(parse_limit(Some("0")).is_err());
        assert!(parse_limit(Some("21")).is_err());
        assert!(parse_limit(Some("-3")).is_err());
        assert!(parse_limit(Some("five")).is_err());
        assert!(parse_limit(Some("2.5")).is_err());
    }

    #[tokio::test]
    async fn test_root_lists_endpoints() {
        let (status, body) = get_json(app(StaticFetcher::new()), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], SERVICE_NAME);
        assert!(body["endpoints"]["/crypto-news"].is_string());
    }

    #[tokio::test]
    async fn test_api_status() {
        let (status, body) = get_json(app(StaticFetcher::new()), "/api-status").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_crypto_news_success_envelope() {
        let fetcher = StaticFetcher::new()
            .with_page(HOME, latest_homepage())
            .with_page(
                "https://crypto.news/news/one/",
                "<html><body><h1>Bitcoin Hits $100K</h1></body></html>",
            );

        let (status, body) = get_json(app(fetcher), "/crypto-news?limit=2").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["count"], 2);
        assert_eq!(body["message"], "Successfully scraped 2 article(s)");
        assert_eq!(body["articles"][0]["title"], "Bitcoin Hits $100K");
        assert_eq!(body["articles"][0]["content"], "");
        assert_eq!(body["articles"][1]["title"], DEGRADED_TITLE);
    }

    #[tokio::test]
    async fn test_crypto_news_default_limit() {
        let fetcher = StaticFetcher::new().with_page(HOME, latest_homepage());
        let (status, body) = get_json(app(fetcher), "/crypto-news").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], DEFAULT_LIMIT);
    }

    #[tokio::test]
    async fn test_crypto_news_rejects_bad_limit() {
        for uri in [
            "/crypto-news?limit=0",
            "/crypto-news?limit=21",
            "/crypto-news?limit=abc",
        ] {
            let fetcher = StaticFetcher::new().with_page(HOME, latest_homepage());
            let (status, body) = get_json(app(fetcher), uri).await;

            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{uri}");
            assert_eq!(body["success"], false);
            assert_eq!(body["message"], INVALID_REQUEST);
        }
    }

    #[tokio::test]
    async fn test_crypto_news_discovery_failure() {
        let fetcher = StaticFetcher::new()
            .with_page(HOME, "<html><body><h2>Markets</h2></body></html>");
        let (status, body) = get_json(app(fetcher), "/crypto-news?limit=3").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
        assert!(
            body["error"]
                .as_str()
                .unwrap()
                .contains("no latest section found")
        );
        assert_eq!(body["message"], SCRAPE_FAILED);
    }
}
