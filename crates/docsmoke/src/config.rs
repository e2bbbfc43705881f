//! Run configuration for the smoke scenario.
//!
//! Defaults target the live documentation deployment; every knob can be
//! overridden programmatically (`with_*` builders) or through the
//! environment (`DOCSMOKE_*`, `CHROMIUM_PATH`).

use crate::result::{SmokeError, SmokeResult};

/// Default base URL of the site under test
pub const DEFAULT_BASE_URL: &str = "https://docs.launchdarkly.com";

/// Fixed desktop viewport width (the "macbook-16" preset)
pub const VIEWPORT_WIDTH: u32 = 1536;

/// Fixed desktop viewport height (the "macbook-16" preset)
pub const VIEWPORT_HEIGHT: u32 = 960;

/// Default locator polling window (10 seconds)
pub const DEFAULT_LOCATOR_TIMEOUT_MS: u64 = 10_000;

/// Default window for the result-list settle wait (5 seconds)
pub const DEFAULT_SETTLE_TIMEOUT_MS: u64 = 5_000;

/// Configuration for a smoke run
#[derive(Debug, Clone)]
pub struct SmokeConfig {
    /// Base URL of the site under test
    pub base_url: String,
    /// Preview-deployment PR number, if the run targets a PR preview.
    /// Used to strip the preview path prefix from asset URLs before the
    /// direct reachability fetch.
    pub pr_number: Option<String>,
    /// Run the browser headless
    pub headless: bool,
    /// Path to a chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Polling window for element queries, in milliseconds
    pub locator_timeout_ms: u64,
    /// Window for the result-list settle wait, in milliseconds
    pub settle_timeout_ms: u64,
}

impl Default for SmokeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            pr_number: None,
            headless: true,
            chromium_path: None,
            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,
            locator_timeout_ms: DEFAULT_LOCATOR_TIMEOUT_MS,
            settle_timeout_ms: DEFAULT_SETTLE_TIMEOUT_MS,
        }
    }
}

impl SmokeConfig {
    /// Create a config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Layer environment variables over defaults.
    ///
    /// Recognized: `DOCSMOKE_BASE_URL`, `DOCSMOKE_PR_NUMBER`,
    /// `DOCSMOKE_HEADLESS` (`0`/`false` to disable), `CHROMIUM_PATH`,
    /// `DOCSMOKE_LOCATOR_TIMEOUT_MS`.
    pub fn from_env() -> SmokeResult<Self> {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("DOCSMOKE_BASE_URL") {
            if url.trim().is_empty() {
                return Err(SmokeError::Config {
                    message: "DOCSMOKE_BASE_URL is empty".to_string(),
                });
            }
            config.base_url = url;
        }
        if let Ok(pr) = std::env::var("DOCSMOKE_PR_NUMBER") {
            if !pr.trim().is_empty() {
                config.pr_number = Some(pr);
            }
        }
        if let Ok(headless) = std::env::var("DOCSMOKE_HEADLESS") {
            config.headless = !matches!(headless.as_str(), "0" | "false" | "no");
        }
        if let Ok(path) = std::env::var("CHROMIUM_PATH") {
            config.chromium_path = Some(path);
        }
        if let Ok(ms) = std::env::var("DOCSMOKE_LOCATOR_TIMEOUT_MS") {
            config.locator_timeout_ms = ms.parse().map_err(|_| SmokeError::Config {
                message: format!("DOCSMOKE_LOCATOR_TIMEOUT_MS is not a number: {ms:?}"),
            })?;
        }

        Ok(config)
    }

    /// Set the base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the preview-deployment PR number
    #[must_use]
    pub fn with_pr_number(mut self, pr: impl Into<String>) -> Self {
        self.pr_number = Some(pr.into());
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set the chromium binary path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Set the element polling window
    #[must_use]
    pub const fn with_locator_timeout_ms(mut self, ms: u64) -> Self {
        self.locator_timeout_ms = ms;
        self
    }

    /// Resolve a site-relative path against the base URL
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        if path.is_empty() || path == "/" {
            format!("{base}/")
        } else {
            format!("{base}/{}", path.trim_start_matches('/'))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SmokeConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.headless);
        assert!(config.pr_number.is_none());
        assert_eq!(config.viewport_width, 1536);
        assert_eq!(config.viewport_height, 960);
    }

    #[test]
    fn test_builder_chain() {
        let config = SmokeConfig::new()
            .with_base_url("https://preview.example.com")
            .with_pr_number("1234")
            .with_headless(false)
            .with_locator_timeout_ms(2000);
        assert_eq!(config.base_url, "https://preview.example.com");
        assert_eq!(config.pr_number.as_deref(), Some("1234"));
        assert!(!config.headless);
        assert_eq!(config.locator_timeout_ms, 2000);
    }

    // env handling stays in one test; the variables are process-global and
    // parallel tests touching them would race
    #[test]
    fn test_env_layering_and_validation() {
        std::env::set_var("DOCSMOKE_BASE_URL", "https://preview.example.com");
        std::env::set_var("DOCSMOKE_PR_NUMBER", "1234");
        std::env::set_var("DOCSMOKE_HEADLESS", "0");
        std::env::set_var("DOCSMOKE_LOCATOR_TIMEOUT_MS", "2500");
        let config = SmokeConfig::from_env();
        std::env::remove_var("DOCSMOKE_BASE_URL");
        std::env::remove_var("DOCSMOKE_PR_NUMBER");
        std::env::remove_var("DOCSMOKE_HEADLESS");

        let config = config.unwrap();
        assert_eq!(config.base_url, "https://preview.example.com");
        assert_eq!(config.pr_number.as_deref(), Some("1234"));
        assert!(!config.headless);
        assert_eq!(config.locator_timeout_ms, 2500);

        std::env::set_var("DOCSMOKE_LOCATOR_TIMEOUT_MS", "soon");
        let result = SmokeConfig::from_env();
        std::env::remove_var("DOCSMOKE_LOCATOR_TIMEOUT_MS");
        assert!(matches!(result, Err(SmokeError::Config { .. })));
    }

    #[test]
    fn test_url_for_root() {
        let config = SmokeConfig::new().with_base_url("https://docs.example.com");
        assert_eq!(config.url_for("/"), "https://docs.example.com/");
        assert_eq!(config.url_for(""), "https://docs.example.com/");
    }

    #[test]
    fn test_url_for_path_normalizes_slashes() {
        let config = SmokeConfig::new().with_base_url("https://docs.example.com/");
        assert_eq!(
            config.url_for("/home/getting-started"),
            "https://docs.example.com/home/getting-started"
        );
        assert_eq!(
            config.url_for("home/getting-started"),
            "https://docs.example.com/home/getting-started"
        );
    }
}
