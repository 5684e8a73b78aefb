//! Remote card checks through the proxy endpoint.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use url::Url;

/// Failures ProxyValidator can hit on its own; everything else a
/// validator might fail with travels as a plain [`anyhow::Error`].
#[derive(Debug, Error)]
pub enum ValidateError {
    #[error("invalid check endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
    #[error("card check request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Seam for the remote membership check. Implementations return the raw
/// response body; deciding what the body means is the caller's job.
#[async_trait]
pub trait CardValidator: Send + Sync {
    async fn fetch_check(&self, payload: &str) -> Result<String>;
}

/// Checks cards by asking the site's proxy endpoint, passing the decoded
/// payload along as the `url` query parameter.
#[derive(Debug)]
pub struct ProxyValidator {
    client: Client,
    endpoint: Url,
}

impl ProxyValidator {
    pub fn new(endpoint: &str) -> Result<Self, ValidateError> {
        Ok(Self {
            client: Client::new(),
            endpoint: Url::parse(endpoint)?,
        })
    }

    fn check_url(&self, payload: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("url", payload);
        url
    }
}

#[async_trait]
impl CardValidator for ProxyValidator {
    /// One GET, no retries and no client-side timeout. The status code is
    /// deliberately not consulted: validity is read off the body text by
    /// the caller, and a proxy error page simply fails that test.
    async fn fetch_check(&self, payload: &str) -> Result<String> {
        let response = self
            .client
            .get(self.check_url(payload))
            .send()
            .await
            .map_err(ValidateError::Transport)?;
        let body = response.text().await.map_err(ValidateError::Transport)?;
        Ok(body)
    }
}
