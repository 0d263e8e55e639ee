//! The fetch module retrieves raw sitemap documents from the legacy origin.

use std::time::Duration;

use anyhow::{Context, Result};
use log::debug;
use url::Url;

use crate::constants::{FETCH_TIMEOUT_SECS, USER_AGENT};

/// Anything able to hand back the raw body of a sitemap document.
///
/// The pipeline only talks to this trait, so a run can be driven by the HTTP
/// client below or by an in-memory stub.
pub trait SitemapSource {
    /// Fetches the document at `url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is unavailable for any reason.
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<String>> + Send;
}

/// Fetches sitemaps over HTTP with a single attempt per URL.
pub struct HttpSitemapSource {
    client: reqwest::Client,
}

impl HttpSitemapSource {
    /// Builds a client with the bot-friendly user agent and the fixed timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
    }

    /// Same as [`HttpSitemapSource::new`] with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .context("Unable to build HTTP client")?;

        Ok(Self { client })
    }
}

impl SitemapSource for HttpSitemapSource {
    async fn fetch(&self, url: &Url) -> Result<String> {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .with_context(|| format!("Request to {url} failed"))?
            .error_for_status()
            .with_context(|| format!("Unexpected status from {url}"))?;

        debug!("Fetched {url} with {}", response.status());

        response
            .text()
            .await
            .with_context(|| format!("Unable to read body of {url}"))
    }
}
