//! Run configuration for the harness.
//!
//! A [`Config`] is built once per run and handed to every component that
//! talks to the store; nothing reads process-wide endpoint settings.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Url;

use crate::error::{Error, Result};

/// Default address of the message store.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Default size of the concurrent worker pool.
pub const DEFAULT_WORKERS: usize = 5;

/// Default location of the report file.
pub const DEFAULT_REPORT_PATH: &str = "loading_test_output.txt";

/// Harness configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the store, without the `/messages` suffix.
    ///
    /// Default: `http://localhost:8080`
    pub base_url: String,

    /// Headers sent with every request.
    ///
    /// Default: `Content-Type: application/json`
    pub headers: Vec<(String, String)>,

    /// Maximum number of posts in flight in concurrent scenarios.
    ///
    /// Default: 5
    pub workers: usize,

    /// Per-request timeout.
    ///
    /// If `None`, requests wait as long as the HTTP client allows.
    /// Default: None
    pub request_timeout: Option<Duration>,

    /// Where the report table is written. Overwritten on every run.
    ///
    /// Default: `loading_test_output.txt`
    pub report_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            workers: DEFAULT_WORKERS,
            request_timeout: None,
            report_path: PathBuf::from(DEFAULT_REPORT_PATH),
        }
    }
}

impl Config {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL of the store.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Add a header sent with every request, replacing one of the same name.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
        self
    }

    /// Set the worker pool size.
    #[must_use]
    pub const fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Set the per-request timeout.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Set the report location.
    #[must_use]
    pub fn with_report_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.report_path = path.into();
        self
    }

    /// Parsed base URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `base_url` is not an absolute http(s) URL.
    pub fn url(&self) -> Result<Url> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| Error::Config(format!("invalid base URL {:?}: {e}", self.base_url)))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(Error::Config(format!(
                "unsupported URL scheme {other:?} in {:?}",
                self.base_url
            ))),
        }
    }

    /// Headers as a [`HeaderMap`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a header name or value is not valid HTTP.
    pub fn header_map(&self) -> Result<HeaderMap> {
        let mut map = HeaderMap::with_capacity(self.headers.len());
        for (name, value) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| Error::Config(format!("invalid header name {name:?}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| Error::Config(format!("invalid value for header {name}: {e}")))?;
            map.insert(name, value);
        }
        Ok(map)
    }

    /// Check the whole configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for a zero-sized worker pool, a zero request
    /// timeout, a bad base URL or a bad header.
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(Error::Config("worker pool size must be at least 1".into()));
        }
        if self.request_timeout.is_some_and(|t| t.is_zero()) {
            return Err(Error::Config("request timeout must be greater than zero".into()));
        }
        self.url()?;
        self.header_map()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.workers, 5);
        assert_eq!(config.report_path, PathBuf::from("loading_test_output.txt"));
        assert!(config.request_timeout.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_headers() {
        let map = Config::default().header_map().unwrap();
        assert_eq!(map.get("content-type").unwrap(), "application/json");
    }

    #[test]
    fn test_config_builder() {
        let config = Config::new()
            .with_base_url("http://127.0.0.1:9000")
            .with_workers(8)
            .with_request_timeout(Duration::from_secs(3))
            .with_report_path("out/report.txt");

        assert_eq!(config.base_url, "http://127.0.0.1:9000");
        assert_eq!(config.workers, 8);
        assert_eq!(config.request_timeout, Some(Duration::from_secs(3)));
        assert_eq!(config.report_path, PathBuf::from("out/report.txt"));
    }

    #[test]
    fn test_with_header_replaces_case_insensitively() {
        let config = Config::new()
            .with_header("content-type", "application/json; charset=utf-8")
            .with_header("X-Run", "1");
        assert_eq!(config.headers.len(), 2);
        let map = config.header_map().unwrap();
        assert_eq!(
            map.get("content-type").unwrap(),
            "application/json; charset=utf-8"
        );
        assert_eq!(map.get("x-run").unwrap(), "1");
    }

    #[test]
    fn test_zero_workers_rejected() {
        let err = Config::new().with_workers(0).validate().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = Config::new()
            .with_request_timeout(Duration::ZERO)
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(
            Config::new()
                .with_request_timeout(Duration::from_millis(1))
                .validate()
                .is_ok()
        );
    }

    #[test]
    fn test_bad_base_url_rejected() {
        assert!(Config::new().with_base_url("not a url").validate().is_err());
        assert!(Config::new().with_base_url("ftp://host").validate().is_err());
        assert!(Config::new().with_base_url("https://host:8443").validate().is_ok());
    }

    #[test]
    fn test_bad_header_rejected() {
        let config = Config::new().with_header("bad header", "x");
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let config = Config::new().with_header("X-Ok", "line\nbreak");
        assert!(config.validate().is_err());
    }
}
