//! HTTP retrieval of filter-list text, with per-request timeout and bounded
//! retries.

use std::time::Duration;

use thiserror::Error;

use crate::config::HttpConfig;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("HTTP {status} fetching {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },
    #[error("failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: Box<FetchError>,
    },
}

/// Downloads filter lists. Holds a single pooled client for the whole run.
pub struct Fetcher {
    client: reqwest::Client,
    retries: u32,
}

impl Fetcher {
    pub fn new(cfg: &HttpConfig) -> Result<Fetcher, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .user_agent(concat!("webkit-filters/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Fetcher {
            client,
            retries: cfg.retries.max(1),
        })
    }

    /// Fetch `url`, retrying with linear backoff (attempt `n` waits `n`
    /// seconds) until the configured attempt budget is exhausted.
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let mut attempt = 0;
        loop {
            if attempt > 0 {
                tokio::time::sleep(Duration::from_secs(u64::from(attempt))).await;
            }
            match self.fetch_once(url).await {
                Ok(bytes) => return Ok(bytes),
                Err(err) => {
                    attempt += 1;
                    if attempt >= self.retries {
                        return Err(FetchError::RetriesExhausted {
                            attempts: attempt,
                            source: Box::new(err),
                        });
                    }
                    tracing::warn!(url, attempt, error = %err, "fetch attempt failed, retrying");
                }
            }
        }
    }

    async fn fetch_once(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                url: url.to_string(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}
