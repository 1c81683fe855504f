//! Scraping pipeline for crypto.news.
//!
//! The pipeline follows a two-phase pattern:
//!
//! 1. **Indexing**: discover article URLs in the homepage's "latest" listing
//! 2. **Fetching**: download each article and extract its fields
//!
//! # Submodules
//!
//! | Module | Role |
//! |--------|------|
//! | [`http`] | [`FetchPage`](http::FetchPage) seam and the `reqwest` fetcher |
//! | [`discovery`] | Region heuristics and URL filtering for the homepage |
//! | [`extractor`] | Title, body, summary and date extraction for one page |
//! | [`crypto_news`] | Orchestration of both phases |
//!
//! Failures while fetching an individual article are logged and turned into
//! degraded records; only homepage and discovery failures abort a run.

pub mod crypto_news;
pub mod discovery;
pub mod extractor;
pub mod http;
