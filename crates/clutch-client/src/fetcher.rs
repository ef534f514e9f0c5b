use std::time::Duration;

use clutch_core::config::Settings;
use clutch_core::error::AppError;
use clutch_core::traits::Fetcher;
use reqwest::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CONNECTION, HeaderMap, HeaderValue};

/// Maximum random jitter added to each retry backoff.
const BACKOFF_JITTER_MS: u64 = 500;

/// HTTP fetcher using reqwest.
///
/// Sends static browser headers with a configurable User-Agent and
/// per-request timeout, and retries failed requests with exponential
/// backoff plus jitter. An HTTP 4xx on the first attempt is terminal —
/// no retries are spent on it.
#[derive(Clone)]
pub struct ReqwestFetcher {
    client: Client,
    timeout_secs: u64,
    max_retries: u32,
    backoff_base: Duration,
}

impl ReqwestFetcher {
    /// Build a fetcher from settings. Fails only if the underlying client
    /// cannot be constructed.
    pub fn from_settings(settings: &Settings) -> Result<Self, AppError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;\
                 q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));

        let client = Client::builder()
            .user_agent(&settings.user_agent)
            .default_headers(headers)
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()
            .map_err(|e| AppError::HttpError(e.to_string()))?;

        Ok(Self {
            client,
            timeout_secs: settings.timeout_seconds,
            max_retries: settings.max_retries.max(1),
            backoff_base: Duration::from_secs_f64(settings.retry_backoff_seconds.max(0.0)),
        })
    }

    async fn try_fetch(&self, url: &str) -> Result<String, AppError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                AppError::Timeout(self.timeout_secs)
            } else if e.is_connect() {
                AppError::NetworkError(format!("Connection failed: {e}"))
            } else {
                AppError::HttpError(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| AppError::HttpError(format!("Failed to read response body: {e}")))
    }
}

impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str) -> Result<String, AppError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.try_fetch(url).await {
                Ok(body) => return Ok(body),
                Err(e) => {
                    tracing::warn!(
                        "Error fetching {} on attempt {}/{}: {}",
                        url,
                        attempt,
                        self.max_retries,
                        e
                    );
                    if attempt == 1 && e.is_client_error() {
                        return Err(e);
                    }
                    if attempt >= self.max_retries {
                        tracing::error!("Giving up on {} after {} attempts", url, attempt);
                        return Err(e);
                    }

                    let delay = backoff_delay(self.backoff_base, attempt);
                    tracing::debug!("Sleeping {:.2}s before retry", delay.as_secs_f64());
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}

/// Exponential backoff with jitter: `base * 2^(attempt - 1)` plus a uniform
/// 0–500 ms.
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    let exponential = base.saturating_mul(1u32 << (attempt - 1).min(16));
    exponential + Duration::from_millis(jitter_ms(BACKOFF_JITTER_MS))
}

// Clock-seeded xorshift — good enough for backoff jitter, not crypto, and
// avoids pulling in the `rand` crate.
fn jitter_ms(max_ms: u64) -> u64 {
    if max_ms == 0 {
        return 0;
    }
    let mut x = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as u64;
    x ^= x << 13;
    x ^= x >> 7;
    x ^= x << 17;
    x % max_ms
}
