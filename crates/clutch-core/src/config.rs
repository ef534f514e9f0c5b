use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Default request User-Agent: a plain desktop Chrome string.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/127.0.0.1 Safari/537.36";

/// Scraper settings, loaded from a JSON file with camelCase keys.
///
/// Loading never fails the run: a missing or malformed file falls back to
/// defaults, and a partial file keeps defaults for the keys it omits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// User-Agent header sent with every request.
    pub user_agent: String,
    /// Per-request timeout.
    pub timeout_seconds: u64,
    /// Total fetch attempts per page (first try included).
    pub max_retries: u32,
    /// Base delay for exponential retry backoff.
    pub retry_backoff_seconds: f64,
    /// Pagination cap per search URL.
    pub max_pages_per_url: u32,
    /// Minimum delay between page fetches; 0 disables rate limiting.
    pub rate_limit_seconds: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_seconds: 20,
            max_retries: 3,
            retry_backoff_seconds: 2.0,
            max_pages_per_url: 1,
            rate_limit_seconds: 0.0,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file, falling back to defaults on any
    /// problem.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            tracing::warn!(
                "Settings file not found at {}; using default settings",
                path.display()
            );
            return Self::default();
        }

        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(
                    "Failed to read settings from {}: {e}; using default settings",
                    path.display()
                );
                return Self::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(settings) => {
                tracing::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to parse settings from {}: {e}; using default settings",
                    path.display()
                );
                Self::default()
            }
        }
    }
}

/// Run input: the search URLs to scrape plus optional per-run overrides.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputConfig {
    pub search_urls: Vec<String>,
    /// Optional override for [`Settings::max_pages_per_url`]. Accepts a
    /// JSON number or a numeric string; anything else logs a warning and
    /// falls back to the settings value.
    #[serde(default)]
    pub max_pages_per_url: Option<serde_json::Value>,
}

impl InputConfig {
    /// Load and validate the input file. Unlike settings, a missing or
    /// malformed input file is fatal.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        if !path.exists() {
            return Err(AppError::ConfigError(format!(
                "Input file not found: {}",
                path.display()
            )));
        }

        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|e| {
            AppError::ConfigError(format!(
                "Input JSON must contain a 'searchUrls' array ({}): {e}",
                path.display()
            ))
        })
    }

    /// Resolve the effective page cap: a valid non-zero override wins,
    /// everything else falls back to the settings value.
    pub fn effective_max_pages(&self, settings: &Settings) -> u32 {
        let Some(value) = &self.max_pages_per_url else {
            return settings.max_pages_per_url;
        };
        match coerce_page_count(value) {
            Some(0) => settings.max_pages_per_url,
            Some(pages) => pages,
            None => {
                tracing::warn!(
                    "Invalid 'maxPagesPerUrl' in input config; falling back to settings"
                );
                settings.max_pages_per_url
            }
        }
    }
}

fn coerce_page_count(value: &serde_json::Value) -> Option<u32> {
    match value {
        serde_json::Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn default_settings_are_sensible() {
        let settings = Settings::default();
        assert_eq!(settings.timeout_seconds, 20);
        assert_eq!(settings.max_retries, 3);
        assert_eq!(settings.retry_backoff_seconds, 2.0);
        assert_eq!(settings.max_pages_per_url, 1);
        assert_eq!(settings.rate_limit_seconds, 0.0);
        assert!(settings.user_agent.contains("Mozilla/5.0"));
    }

    #[test]
    fn settings_missing_file_falls_back_to_defaults() {
        let settings = Settings::load(Path::new("/nonexistent/settings.json"));
        assert_eq!(settings.max_retries, Settings::default().max_retries);
    }

    #[test]
    fn settings_partial_file_keeps_defaults_for_missing_keys() {
        let file = write_temp(r#"{"maxRetries": 5, "rateLimitSeconds": 1.5}"#);
        let settings = Settings::load(file.path());
        assert_eq!(settings.max_retries, 5);
        assert_eq!(settings.rate_limit_seconds, 1.5);
        assert_eq!(settings.timeout_seconds, 20);
        assert_eq!(settings.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn settings_malformed_file_falls_back_to_defaults() {
        let file = write_temp("{not valid json");
        let settings = Settings::load(file.path());
        assert_eq!(settings.max_pages_per_url, 1);
    }

    #[test]
    fn input_missing_file_is_fatal() {
        let err = InputConfig::load(Path::new("/nonexistent/inputs.json")).unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
    }

    #[test]
    fn input_without_search_urls_is_fatal() {
        let file = write_temp(r#"{"maxPagesPerUrl": 3}"#);
        let err = InputConfig::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("searchUrls"));
    }

    #[test]
    fn input_parses_search_urls() {
        let file = write_temp(r#"{"searchUrls": ["https://clutch.co/web-developers"]}"#);
        let input = InputConfig::load(file.path()).unwrap();
        assert_eq!(input.search_urls.len(), 1);
        assert!(input.max_pages_per_url.is_none());
    }

    #[test]
    fn max_pages_override_accepts_number_and_numeric_string() {
        let settings = Settings::default();

        let input = InputConfig {
            search_urls: vec![],
            max_pages_per_url: Some(serde_json::json!(4)),
        };
        assert_eq!(input.effective_max_pages(&settings), 4);

        let input = InputConfig {
            search_urls: vec![],
            max_pages_per_url: Some(serde_json::json!("7")),
        };
        assert_eq!(input.effective_max_pages(&settings), 7);
    }

    #[test]
    fn max_pages_override_invalid_falls_back_to_settings() {
        let settings = Settings {
            max_pages_per_url: 2,
            ..Settings::default()
        };

        let input = InputConfig {
            search_urls: vec![],
            max_pages_per_url: Some(serde_json::json!("plenty")),
        };
        assert_eq!(input.effective_max_pages(&settings), 2);

        let input = InputConfig {
            search_urls: vec![],
            max_pages_per_url: Some(serde_json::json!(["3"])),
        };
        assert_eq!(input.effective_max_pages(&settings), 2);
    }

    #[test]
    fn max_pages_override_zero_falls_back_to_settings() {
        let settings = Settings {
            max_pages_per_url: 2,
            ..Settings::default()
        };
        let input = InputConfig {
            search_urls: vec![],
            max_pages_per_url: Some(serde_json::json!(0)),
        };
        assert_eq!(input.effective_max_pages(&settings), 2);
    }
}
