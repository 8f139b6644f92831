//! HTTP session shared by the site adapters.
//!
//! Requests are issued one at a time. A throttled fetcher sleeps for a fixed
//! delay before every request; an unthrottled one only enforces the timeout.

use std::time::Duration;

use reqwest::{Client, Response};
use tracing::debug;
use url::Url;

use gleaner_shared::{GleanerError, Result, ScrapeConfig};

/// HTTP client with a fixed timeout and an optional pre-request delay.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    delay: Duration,
}

impl Fetcher {
    /// Build a throttled fetcher from the scrape configuration.
    pub fn new(config: &ScrapeConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .redirect(reqwest::redirect::Policy::limited(5))
            .timeout(config.timeout)
            .build()
            .map_err(|e| GleanerError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            delay: config.request_delay,
        })
    }

    /// Same connection pool and timeout, no pre-request delay.
    pub fn unthrottled(&self) -> Self {
        Self {
            client: self.client.clone(),
            delay: Duration::ZERO,
        }
    }

    /// Delay applied before each request.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// GET `url` and return the body as text.
    pub async fn get_text(&self, url: &Url) -> Result<String> {
        let response = self.send(url).await?;
        response
            .text()
            .await
            .map_err(|e| GleanerError::Network(format!("{url}: body read failed: {e}")))
    }

    /// GET `url` and return the raw body.
    pub async fn get_bytes(&self, url: &Url) -> Result<Vec<u8>> {
        let response = self.send(url).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| GleanerError::Network(format!("{url}: body read failed: {e}")))?;
        Ok(bytes.to_vec())
    }

    async fn send(&self, url: &Url) -> Result<Response> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        debug!(%url, "fetching");

        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| GleanerError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GleanerError::Network(format!("{url}: HTTP {status}")));
        }

        Ok(response)
    }
}
