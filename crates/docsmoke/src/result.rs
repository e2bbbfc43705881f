//! Result and error types for docsmoke.

use thiserror::Error;

/// Result type for docsmoke operations
pub type SmokeResult<T> = Result<T, SmokeError>;

/// Errors that can occur while running the smoke scenario
#[derive(Debug, Error)]
pub enum SmokeError {
    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// JavaScript evaluation error
    #[error("Page evaluation failed: {message}")]
    Eval {
        /// Error message
        message: String,
    },

    /// Element query never resolved within the polling window
    #[error("Element not found: {selector} (waited {timeout_ms}ms)")]
    ElementNotFound {
        /// Selector description
        selector: String,
        /// Polling window in milliseconds
        timeout_ms: u64,
    },

    /// Assertion mismatch: the scenario observed a value it did not expect
    #[error("Assertion failed at '{step}': expected {expected:?}, got {actual:?}")]
    Assertion {
        /// Step label where the mismatch occurred
        step: String,
        /// Expected value
        expected: String,
        /// Observed value
        actual: String,
    },

    /// Direct asset fetch did not return a success status
    #[error("Asset unreachable: {url} returned HTTP {status}")]
    AssetUnreachable {
        /// Asset URL
        url: String,
        /// HTTP status observed
        status: u16,
    },

    /// Operation timed out
    #[error("Operation timed out after {ms}ms")]
    Timeout {
        /// Timeout in milliseconds
        ms: u64,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SmokeError {
    /// Build an assertion mismatch error with step context
    pub fn assertion(
        step: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::Assertion {
            step: step.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Whether this error is an assertion mismatch (as opposed to an
    /// element-not-found timeout or session plumbing failure)
    #[must_use]
    pub const fn is_assertion(&self) -> bool {
        matches!(self, Self::Assertion { .. })
    }
}
