//! Inter-request pacing for polite fetching.
//!
//! Wraps a [`Fetcher`] with a minimum delay between consecutive requests to
//! the same host. The CLI only applies it when a non-zero `rateLimitSeconds`
//! is configured, which makes it the pause between result pages of one
//! search URL; rate limiting is off by default.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use url::Url;

use crate::error::AppError;
use crate::traits::Fetcher;

/// A [`Fetcher`] decorator that spaces out requests per host.
#[derive(Clone)]
pub struct ThrottledFetcher<F> {
    inner: F,
    delay: Duration,
    /// Last request time per host key.
    last_request: Arc<Mutex<HashMap<String, Instant>>>,
}

impl<F: Fetcher> ThrottledFetcher<F> {
    pub fn new(inner: F, delay: Duration) -> Self {
        Self {
            inner,
            delay,
            last_request: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Host key: scheme + host + port.
    fn host_key(url: &str) -> Option<String> {
        let url = Url::parse(url).ok()?;
        let host = url.host_str()?;
        let port = url
            .port_or_known_default()
            .map(|p| format!(":{p}"))
            .unwrap_or_default();
        Some(format!("{}://{}{}", url.scheme(), host, port))
    }

    async fn pause_for(&self, key: &str) {
        let wait = {
            let map = self.last_request.lock().await;
            map.get(key)
                .and_then(|last| self.delay.checked_sub(last.elapsed()))
        };
        if let Some(wait) = wait {
            if !wait.is_zero() {
                tracing::debug!(
                    host = %key,
                    sleep_ms = %wait.as_millis(),
                    "Rate limiting request"
                );
                tokio::time::sleep(wait).await;
            }
        }
        self.last_request
            .lock()
            .await
            .insert(key.to_string(), Instant::now());
    }
}

impl<F: Fetcher> Fetcher for ThrottledFetcher<F> {
    async fn fetch(&self, url: &str) -> Result<String, AppError> {
        if !self.delay.is_zero() {
            if let Some(key) = Self::host_key(url) {
                self.pause_for(&key).await;
            }
        }
        self.inner.fetch(url).await
    }
}
