//! Page fetching.
//!
//! [`FetchPage`] is the seam between the pipeline and the network: the
//! orchestrator only ever asks for "the HTML at this URL". [`HttpFetcher`]
//! is the production implementation on top of a single `reqwest::Client`
//! whose headers and timeout come from [`HttpConfig`].

use crate::config::HttpConfig;
use crate::error::FetchError;
use std::future::Future;
use std::time::Instant;
use tracing::{debug, instrument, warn};

/// Download the raw HTML of a page.
pub trait FetchPage: Send + Sync {
    /// Fetch `url` and return its body as text.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] on timeouts, transport failures, and non-2xx
    /// responses.
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// [`FetchPage`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build the shared client.
    ///
    /// # Errors
    ///
    /// Fails if the TLS backend cannot be initialised.
    pub fn new(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout())
            .build()?;
        Ok(Self { client })
    }
}

impl FetchPage for HttpFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let t0 = Instant::now();
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "Non-success response");
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;
        debug!(
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched page"
        );
        Ok(body)
    }
}
