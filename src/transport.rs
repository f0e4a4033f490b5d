//! Shared HTTP transport with timeout and exponential-backoff retry.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::config::TransportSettings;
use crate::error::{ProviderError, Result};

/// Upper bound on a single retry delay
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// HTTP client wrapper used by every adapter
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    max_attempts: u32,
    base_delay: Duration,
}

impl HttpTransport {
    pub fn new(settings: &TransportSettings) -> Result<Self> {
        let client = Client::builder()
            .user_agent(settings.user_agent.as_str())
            .timeout(Duration::from_secs(settings.timeout_secs))
            .gzip(true)
            .build()?;

        Ok(Self {
            client,
            max_attempts: settings.max_attempts.max(1),
            base_delay: Duration::from_millis(settings.backoff_ms),
        })
    }

    /// GET `url` and decode the JSON body
    pub async fn get_json<T: DeserializeOwned>(&self, service: &'static str, url: Url) -> Result<T> {
        self.send_with_retry(service, || self.client.get(url.clone()))
            .await
    }

    async fn send_with_retry<T, F>(&self, service: &'static str, build: F) -> Result<T>
    where
        T: DeserializeOwned,
        F: Fn() -> reqwest::RequestBuilder,
    {
        let mut attempt = 0;

        loop {
            attempt += 1;

            match self.send_once(service, build()).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < self.max_attempts => {
                    let delay = self.backoff(attempt);
                    warn!(
                        "{} request failed (attempt {}/{}), retrying in {:?}: {}",
                        service, attempt, self.max_attempts, delay, e
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn send_once<T: DeserializeOwned>(
        &self,
        service: &'static str,
        request: reqwest::RequestBuilder,
    ) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                service,
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        debug!("{} responded with {} bytes", service, bytes.len());

        serde_json::from_slice(&bytes).map_err(|source| ProviderError::Decode { service, source })
    }

    /// Delay before the retry following `attempt` (1-based)
    fn backoff(&self, attempt: u32) -> Duration {
        2u32.checked_pow(attempt.saturating_sub(1))
            .and_then(|factor| self.base_delay.checked_mul(factor))
            .map_or(MAX_BACKOFF, |delay| delay.min(MAX_BACKOFF))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles() {
        let settings = TransportSettings {
            backoff_ms: 250,
            ..TransportSettings::default()
        };
        let transport = HttpTransport::new(&settings).unwrap();
        assert_eq!(transport.backoff(1), Duration::from_millis(250));
        assert_eq!(transport.backoff(2), Duration::from_millis(500));
        assert_eq!(transport.backoff(3), Duration::from_millis(1000));
    }

    #[test]
    fn test_backoff_is_capped_for_large_settings() {
        let settings = TransportSettings {
            backoff_ms: u64::MAX / 2,
            max_attempts: 64,
            ..TransportSettings::default()
        };
        let transport = HttpTransport::new(&settings).unwrap();
        assert_eq!(transport.backoff(2), MAX_BACKOFF);
        assert_eq!(transport.backoff(40), MAX_BACKOFF);
    }

    #[test]
    fn test_status_retryability() {
        let server_error = ProviderError::Status {
            service: "test",
            status: 503,
            body: String::new(),
        };
        let rate_limited = ProviderError::Status {
            service: "test",
            status: 429,
            body: String::new(),
        };
        let not_found = ProviderError::Status {
            service: "test",
            status: 404,
            body: String::new(),
        };
        assert!(server_error.is_retryable());
        assert!(rate_limited.is_retryable());
        assert!(!not_found.is_retryable());
    }
}
