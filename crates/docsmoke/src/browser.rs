//! Browser session control.
//!
//! With the `browser` feature enabled this drives a real Chromium via the
//! Chrome DevTools Protocol (chromiumoxide). Without the feature a mock
//! implementation keeps the surrounding machinery unit-testable with no
//! browser present.

use crate::config::SmokeConfig;
use crate::result::{SmokeError, SmokeResult};

// ============================================================================
// Real CDP Implementation (when `browser` feature is enabled)
// ============================================================================

#[cfg(feature = "browser")]
mod cdp {
    use super::{SmokeConfig, SmokeError, SmokeResult};
    use crate::locator::Selector;
    use crate::wait::{Deadline, FailureStreak, PollConfig, Settle};
    use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
    use chromiumoxide::page::Page as CdpPage;
    use futures::StreamExt;
    use tracing::debug;

    /// Consecutive eval failures tolerated before a polling loop gives up
    /// on the session and propagates the error
    const EVAL_FAILURE_TOLERANCE: usize = 3;

    /// Browser instance with a live CDP connection
    #[derive(Debug)]
    pub struct Browser {
        inner: CdpBrowser,
        #[allow(dead_code)]
        handle: tokio::task::JoinHandle<()>,
        locator_poll: PollConfig,
        settle_poll: PollConfig,
    }

    impl Browser {
        /// Launch a browser sized to the configured desktop viewport
        pub async fn launch(config: &SmokeConfig) -> SmokeResult<Self> {
            let mut builder = CdpConfig::builder()
                .window_size(config.viewport_width, config.viewport_height);

            if !config.headless {
                builder = builder.with_head();
            }
            if let Some(ref path) = config.chromium_path {
                builder = builder.chrome_executable(path);
            }

            let cdp_config = builder.build().map_err(|e| SmokeError::BrowserLaunch {
                message: e.to_string(),
            })?;

            let (browser, mut handler) =
                CdpBrowser::launch(cdp_config)
                    .await
                    .map_err(|e| SmokeError::BrowserLaunch {
                        message: e.to_string(),
                    })?;

            // The handler stream must be pumped for the connection to work
            let handle = tokio::spawn(async move {
                while let Some(h) = handler.next().await {
                    if h.is_err() {
                        break;
                    }
                }
            });

            Ok(Self {
                inner: browser,
                handle,
                locator_poll: PollConfig::new(config.locator_timeout_ms),
                settle_poll: PollConfig::new(config.settle_timeout_ms),
            })
        }

        /// Open the scenario's page
        pub async fn new_page(&self) -> SmokeResult<Page> {
            let cdp_page =
                self.inner
                    .new_page("about:blank")
                    .await
                    .map_err(|e| SmokeError::Eval {
                        message: e.to_string(),
                    })?;
            Ok(Page {
                inner: cdp_page,
                url: String::from("about:blank"),
                locator_poll: self.locator_poll,
                settle_poll: self.settle_poll,
            })
        }

        /// Close the browser
        pub async fn close(mut self) -> SmokeResult<()> {
            self.inner
                .close()
                .await
                .map_err(|e| SmokeError::BrowserLaunch {
                    message: e.to_string(),
                })?;
            Ok(())
        }
    }

    /// The single page under test
    #[derive(Debug)]
    pub struct Page {
        inner: CdpPage,
        url: String,
        locator_poll: PollConfig,
        settle_poll: PollConfig,
    }

    impl Page {
        /// Navigate and wait for the load event
        pub async fn goto(&mut self, url: &str) -> SmokeResult<()> {
            debug!(url, "navigating");
            self.inner
                .goto(url)
                .await
                .map_err(|e| SmokeError::Navigation {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;
            self.inner
                .wait_for_navigation()
                .await
                .map_err(|e| SmokeError::Navigation {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;
            self.url = url.to_string();
            Ok(())
        }

        /// Last URL passed to `goto`
        #[must_use]
        pub fn current_url(&self) -> &str {
            &self.url
        }

        /// Evaluate a JavaScript expression into a deserialized value
        pub async fn eval<T: serde::de::DeserializeOwned>(&self, expr: &str) -> SmokeResult<T> {
            let result = self.inner.evaluate(expr).await.map_err(|e| SmokeError::Eval {
                message: e.to_string(),
            })?;
            result.into_value().map_err(|e| SmokeError::Eval {
                message: e.to_string(),
            })
        }

        /// Document title
        pub async fn title(&self) -> SmokeResult<String> {
            self.eval("document.title").await
        }

        /// Current `location.hash`
        pub async fn location_hash(&self) -> SmokeResult<String> {
            self.eval("location.hash").await
        }

        /// Current `location.search`
        pub async fn location_search(&self) -> SmokeResult<String> {
            self.eval("location.search").await
        }

        /// Poll a find/action expression until it reports true.
        ///
        /// An eval can fail transiently mid-navigation, so a lone failure
        /// keeps polling; a streak of them means the session is gone and
        /// the underlying error propagates instead of burning the window.
        async fn poll_true(&self, expr: &str, selector: &Selector) -> SmokeResult<()> {
            let deadline = Deadline::start(self.locator_poll.timeout_ms);
            let mut streak = FailureStreak::new(EVAL_FAILURE_TOLERANCE);
            loop {
                match self.eval::<bool>(expr).await {
                    Ok(true) => return Ok(()),
                    Ok(false) => streak.succeeded(),
                    Err(e) => {
                        if streak.failed() {
                            return Err(e);
                        }
                    }
                }
                if deadline.expired() {
                    return Err(SmokeError::ElementNotFound {
                        selector: selector.describe(),
                        timeout_ms: self.locator_poll.timeout_ms,
                    });
                }
                tokio::time::sleep(self.locator_poll.interval()).await;
            }
        }

        /// Poll until the selector resolves
        pub async fn wait_for(&self, selector: &Selector) -> SmokeResult<()> {
            self.poll_true(&selector.exists_expr(), selector).await
        }

        /// Poll until the selector resolves, then click it
        pub async fn click(&self, selector: &Selector) -> SmokeResult<()> {
            debug!(target = %selector.describe(), "click");
            self.poll_true(&selector.click_expr(), selector).await
        }

        /// Poll until the selector resolves, then fill it as an input
        pub async fn fill(&self, selector: &Selector, value: &str) -> SmokeResult<()> {
            debug!(target = %selector.describe(), value, "fill");
            self.poll_true(&selector.fill_expr(value), selector).await
        }

        /// Trimmed text content of the selector's element
        pub async fn text_of(&self, selector: &Selector) -> SmokeResult<String> {
            self.wait_for(selector).await?;
            let text: Option<String> = self.eval(&selector.text_expr()).await?;
            text.ok_or_else(|| SmokeError::ElementNotFound {
                selector: selector.describe(),
                timeout_ms: self.locator_poll.timeout_ms,
            })
        }

        /// Attribute value of the selector's element. `Ok(None)` means the
        /// element exists but carries no such attribute.
        pub async fn attr_of(
            &self,
            selector: &Selector,
            name: &str,
        ) -> SmokeResult<Option<String>> {
            self.wait_for(selector).await?;
            self.eval(&selector.attr_expr(name)).await
        }

        /// Computed style property of the selector's element
        pub async fn style_of(&self, selector: &Selector, property: &str) -> SmokeResult<String> {
            self.wait_for(selector).await?;
            let value: Option<String> = self.eval(&selector.style_expr(property)).await?;
            value.ok_or_else(|| SmokeError::ElementNotFound {
                selector: selector.describe(),
                timeout_ms: self.locator_poll.timeout_ms,
            })
        }

        /// Wait until a DOM fragment stops re-rendering: snapshot the
        /// expression each probe and proceed once consecutive snapshots are
        /// identical. Times out with `Ok` rather than failing the run; a
        /// still-churning list is the pre-existing condition the next click
        /// has always had to tolerate.
        pub async fn settle_on(&self, snapshot_expr: &str) -> SmokeResult<()> {
            let mut settle = Settle::new();
            let deadline = Deadline::start(self.settle_poll.timeout_ms);
            loop {
                // a failed snapshot is a non-observation, not a stable one
                let probe = self.eval::<Option<String>>(snapshot_expr).await;
                if settle.observe_probe(probe) {
                    return Ok(());
                }
                if deadline.expired() {
                    debug!(ms = self.settle_poll.timeout_ms, "settle window elapsed");
                    return Ok(());
                }
                tokio::time::sleep(self.settle_poll.interval()).await;
            }
        }
    }
}

// ============================================================================
// Mock Implementation (when `browser` feature is NOT enabled)
// ============================================================================

#[cfg(not(feature = "browser"))]
mod mock {
    use super::{SmokeConfig, SmokeError, SmokeResult};

    /// Browser instance (mock when `browser` feature disabled)
    #[derive(Debug)]
    pub struct Browser {
        viewport: (u32, u32),
    }

    impl Browser {
        /// Launch a mock browser
        pub fn launch(config: &SmokeConfig) -> SmokeResult<Self> {
            Ok(Self {
                viewport: (config.viewport_width, config.viewport_height),
            })
        }

        /// Open a mock page
        pub fn new_page(&self) -> SmokeResult<Page> {
            Ok(Page {
                viewport: self.viewport,
                url: String::from("about:blank"),
            })
        }
    }

    /// A page (mock when `browser` feature disabled)
    #[derive(Debug)]
    pub struct Page {
        /// Viewport dimensions
        pub viewport: (u32, u32),
        url: String,
    }

    impl Page {
        /// Record a navigation
        pub fn goto(&mut self, url: &str) -> SmokeResult<()> {
            self.url = url.to_string();
            Ok(())
        }

        /// Last URL passed to `goto`
        #[must_use]
        pub fn current_url(&self) -> &str {
            &self.url
        }

        /// Evaluation always fails without a live session
        pub fn eval<T: serde::de::DeserializeOwned>(&self, _expr: &str) -> SmokeResult<T> {
            Err(SmokeError::Eval {
                message: "Browser feature not enabled. Enable 'browser' for live runs."
                    .to_string(),
            })
        }
    }
}

// Re-export based on feature
#[cfg(feature = "browser")]
pub use cdp::{Browser, Page};

#[cfg(not(feature = "browser"))]
pub use mock::{Browser, Page};
