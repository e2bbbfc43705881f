//! docsmoke: browser smoke scenario runner for documentation websites.
//!
//! Drives a headless Chromium session through a fixed tour of a live
//! documentation site (navigation, table-of-contents anchors,
//! selected-state nav styling, figure asset reachability, site search)
//! and fails loudly on the first violated expectation, reporting the
//! failing step with its expected and actual values.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  scenario (fixed tour)                                       │
//! │     │ locator (region + text queries, generated JS)          │
//! │     │ assertion (expected/actual validators)                 │
//! │     │ wait (bounded polling, settle detection)               │
//! │     ▼                                                        │
//! │  browser (CDP session via chromiumoxide, `browser` feature)  │
//! │     │ asset (PR-prefix rewrite, direct HTTP reachability)    │
//! │     ▼                                                        │
//! │  report (per-step records, JSON or human summary)            │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Without the `browser` feature the crate still compiles: all query
//! generation, validation, and planning logic is pure and unit testable.

#![warn(missing_docs)]

/// Expected/actual validation
pub mod assertion;
/// Figure asset reachability
pub mod asset;
/// Browser session control
pub mod browser;
/// Run configuration
pub mod config;
/// Region-scoped element queries
pub mod locator;
/// Step reporting
pub mod report;
/// Result and error types
pub mod result;
/// The smoke tour
pub mod scenario;
/// Bounded polling
pub mod wait;

/// Common imports for running the smoke scenario
pub mod prelude {
    pub use crate::assertion::{SelectedStyle, BRAND_BLUE, FONT_WEIGHT_BOLD};
    pub use crate::browser::{Browser, Page};
    pub use crate::config::SmokeConfig;
    pub use crate::locator::{slugify, Region, Selector};
    pub use crate::report::{RunReport, StepRecord, StepStatus};
    pub use crate::result::{SmokeError, SmokeResult};
    pub use crate::scenario;
    pub use crate::wait::{Deadline, PollConfig, Settle};

    #[cfg(feature = "browser")]
    pub use crate::scenario::run;
}
