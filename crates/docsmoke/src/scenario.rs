//! The smoke tour.
//!
//! A fixed, totally ordered sequence of navigation and verification steps
//! against the documentation site: root title, main-content navigation,
//! selected-state styling in the primary nav, a table-of-contents anchor,
//! a second navigation path, the first figure (caption, new-context link,
//! asset reachability), and site search. The first violated expectation
//! aborts the run; each step's outcome lands in the [`RunReport`].
//!
//! The step labels in [`plan`] and the execution order in `tour` are
//! one-to-one: after a failure, the unexecuted tail of the plan is
//! recorded as skipped.

use crate::locator::{slugify, Region, Selector};
#[cfg(feature = "browser")]
use crate::report::RunReport;

/// Expected title on the site root
pub const ROOT_TITLE: &str = "Welcome to LaunchDarkly docs";

/// First navigation target, reached from main content and the primary nav
pub const GETTING_STARTED: &str = "Getting started";

/// Sibling nav entry expected next to the first target
pub const SIBLING_ENTRY: &str = "Setting up an SDK";

/// Table-of-contents entry activated in the aside
pub const TOC_ENTRY: &str = "Additional resources";

/// Second navigation path, first entry
pub const SECOND_NAV_ENTRY: &str = "Organizing your flags";

/// Second navigation path, second entry
pub const THIRD_NAV_ENTRY: &str = "The flags dashboard";

/// Exact caption of the first figure in main content
pub const FIGURE_CAPTION: &str = "The Feature flags dashboard.";

/// Indicator rendered when a figure's image is absent
pub const MISSING_IMAGE_TEXT: &str = "Image is missing";

/// Expected placeholder on the header search input
pub const SEARCH_PLACEHOLDER: &str = "Search";

/// Term typed into site search
pub const SEARCH_TERM: &str = "experimentation";

/// Search result entry clicked in the header
pub const SEARCH_RESULT_ENTRY: &str = "Experimentation";

/// Final header entry, with matching title and top-level heading
pub const FINAL_ENTRY: &str = "Integrations";

/// Anchor expected in `location.hash` after activating the TOC entry
#[must_use]
pub fn toc_anchor() -> String {
    format!("#{}", slugify(TOC_ENTRY))
}

/// Selector for a part of the first figure in main content. Later figures
/// never stand in for it; if the first figure lacks the part, the query
/// resolves to nothing.
#[must_use]
pub fn first_figure(inner: &str) -> Selector {
    Selector::css(Region::Main, format!("figure:first-of-type {inner}"))
}

/// Ordered step labels of the tour
#[must_use]
pub fn plan() -> Vec<&'static str> {
    vec![
        "visit root",
        "root title",
        "main: click 'Getting started'",
        "getting started title",
        "nav: 'Getting started' selected styling",
        "nav: click 'Getting started'",
        "nav: selected styling persists after activation",
        "nav: sibling 'Setting up an SDK' present",
        "aside: click 'Additional resources'",
        "toc anchor in location hash",
        "main: matching h2 present",
        "nav: click 'Organizing your flags'",
        "organizing flags title",
        "nav: 'Organizing your flags' selected styling",
        "nav: click 'The flags dashboard'",
        "flags dashboard title",
        "nav: 'The flags dashboard' selected styling",
        "figure caption text",
        "figure link opens a new browsing context",
        "figure image reachable",
        "header: search placeholder",
        "type search term",
        "results indicator",
        "settle result list",
        "header: click search result",
        "url query matches search term",
        "settle header",
        "header: click 'Integrations'",
        "integrations title",
        "integrations heading",
    ]
}

#[cfg(feature = "browser")]
mod run {
    use super::*;
    use crate::assertion::{
        expect_eq, expect_results_indicator, expect_some_eq, SelectedStyle,
    };
    use crate::browser::{Browser, Page};
    use crate::config::SmokeConfig;
    use crate::locator::{Region, Selector};
    use crate::report::StepRecord;
    use crate::result::{SmokeError, SmokeResult};
    use crate::wait::{Deadline, PollConfig};
    use crate::asset;
    use std::time::Instant;
    use tracing::info;

    macro_rules! check {
        ($report:expr, $label:expr, $body:expr) => {{
            info!(step = $label, "running");
            let started = Instant::now();
            match $body {
                Ok(value) => {
                    $report.push(StepRecord::passed($label, started.elapsed()));
                    value
                }
                Err(e) => {
                    $report.push(StepRecord::failed($label, started.elapsed(), &e));
                    return Err(e);
                }
            }
        }};
    }

    /// Run the full tour. Browser/session plumbing failures are `Err`;
    /// a violated expectation is recorded in the returned report with the
    /// remaining steps marked skipped.
    pub async fn run(config: &SmokeConfig) -> SmokeResult<RunReport> {
        let started = Instant::now();
        let browser = Browser::launch(config).await?;
        let mut page = browser.new_page().await?;
        let mut report = RunReport::new(&config.base_url);

        let outcome = tour(&mut page, config, &mut report).await;
        if outcome.is_err() {
            for label in plan().iter().skip(report.steps.len()) {
                report.push(StepRecord::skipped(*label));
            }
        }
        report.set_duration(started.elapsed());

        // Best-effort teardown; the report already tells the story
        let _ = browser.close().await;
        Ok(report)
    }

    async fn tour(
        page: &mut Page,
        config: &SmokeConfig,
        report: &mut RunReport,
    ) -> SmokeResult<()> {
        let timeout_ms = config.locator_timeout_ms;
        let style = SelectedStyle::default();

        // Root: fixed desktop viewport is set at browser launch
        check!(report, "visit root", page.goto(&config.url_for("/")).await);
        check!(
            report,
            "root title",
            expect_title(page, "root title", ROOT_TITLE, timeout_ms).await
        );

        // Navigate to a page from main content
        check!(
            report,
            "main: click 'Getting started'",
            page.click(&Selector::contains(Region::Main, GETTING_STARTED)).await
        );
        check!(
            report,
            "getting started title",
            expect_title(page, "getting started title", GETTING_STARTED, timeout_ms).await
        );

        // The nav entry for the current page carries the selected treatment,
        // both before and after direct activation
        let nav_entry = Selector::contains(Region::Nav, GETTING_STARTED);
        check!(
            report,
            "nav: 'Getting started' selected styling",
            expect_selected(page, "nav: 'Getting started' selected styling", &nav_entry, &style)
                .await
        );
        check!(report, "nav: click 'Getting started'", page.click(&nav_entry).await);
        check!(
            report,
            "nav: selected styling persists after activation",
            expect_selected(
                page,
                "nav: selected styling persists after activation",
                &nav_entry,
                &style
            )
            .await
        );
        check!(
            report,
            "nav: sibling 'Setting up an SDK' present",
            page.wait_for(&Selector::contains(Region::Nav, SIBLING_ENTRY)).await
        );

        // Table of contents: activation updates the hash and a matching
        // heading exists in main content
        check!(
            report,
            "aside: click 'Additional resources'",
            page.click(&Selector::contains(Region::Aside, TOC_ENTRY)).await
        );
        check!(
            report,
            "toc anchor in location hash",
            expect_hash(page, "toc anchor in location hash", &toc_anchor(), timeout_ms).await
        );
        check!(
            report,
            "main: matching h2 present",
            page.wait_for(&Selector::css(Region::Main, "h2").with_text(TOC_ENTRY)).await
        );

        // Second navigation path: two sequential nav entries, title and
        // selected styling for each
        for (click_label, title_label, style_label, entry) in [
            (
                "nav: click 'Organizing your flags'",
                "organizing flags title",
                "nav: 'Organizing your flags' selected styling",
                SECOND_NAV_ENTRY,
            ),
            (
                "nav: click 'The flags dashboard'",
                "flags dashboard title",
                "nav: 'The flags dashboard' selected styling",
                THIRD_NAV_ENTRY,
            ),
        ] {
            let selector = Selector::contains(Region::Nav, entry);
            check!(report, click_label, page.click(&selector).await);
            check!(
                report,
                title_label,
                expect_title(page, title_label, entry, timeout_ms).await
            );
            check!(
                report,
                style_label,
                expect_selected(page, style_label, &selector, &style).await
            );
        }

        // First figure in main content
        check!(report, "figure caption text", {
            let caption = page.text_of(&first_figure("figcaption")).await;
            caption.and_then(|actual| expect_eq("figure caption text", FIGURE_CAPTION, &actual))
        });
        check!(report, "figure link opens a new browsing context", {
            let target = page.attr_of(&first_figure("a"), "target").await;
            target.and_then(|actual| {
                expect_some_eq(
                    "figure link opens a new browsing context",
                    "_blank",
                    actual.as_deref(),
                )
            })
        });
        check!(
            report,
            "figure image reachable",
            check_figure_image(page, config).await
        );

        // Site search in the header
        let search_input = Selector::css(Region::Header, "input");
        check!(report, "header: search placeholder", {
            let placeholder = page.attr_of(&search_input, "placeholder").await;
            placeholder.and_then(|actual| {
                expect_some_eq(
                    "header: search placeholder",
                    SEARCH_PLACEHOLDER,
                    actual.as_deref(),
                )
            })
        });
        check!(report, "type search term", page.fill(&search_input, SEARCH_TERM).await);
        check!(report, "results indicator", {
            let indicator = Selector::contains(Region::Document, "Results (");
            match page.text_of(&indicator).await {
                Ok(text) => expect_results_indicator("results indicator", &text).map(|_| ()),
                Err(e) => Err(e),
            }
        });

        // The result list detaches during re-render; a too-fast click
        // misses the stale node
        let header_snapshot = Selector::css(Region::Document, "header").text_expr();
        check!(report, "settle result list", page.settle_on(&header_snapshot).await);
        check!(
            report,
            "header: click search result",
            page.click(&Selector::contains(Region::Header, SEARCH_RESULT_ENTRY)).await
        );
        check!(
            report,
            "url query matches search term",
            expect_search(
                page,
                "url query matches search term",
                &format!("?q={SEARCH_TERM}"),
                timeout_ms
            )
            .await
        );

        // A second, unrelated header entry
        check!(report, "settle header", page.settle_on(&header_snapshot).await);
        check!(
            report,
            "header: click 'Integrations'",
            page.click(&Selector::contains(Region::Header, FINAL_ENTRY)).await
        );
        check!(
            report,
            "integrations title",
            expect_title(page, "integrations title", FINAL_ENTRY, timeout_ms).await
        );
        check!(
            report,
            "integrations heading",
            page.wait_for(&Selector::css(Region::Document, "h1").with_text(FINAL_ENTRY)).await
        );

        Ok(())
    }

    /// Figure image: if a `src` is present the asset must fetch with
    /// HTTP 200 (after the optional PR-prefix strip); if absent, the page
    /// must not render a missing-image indicator.
    async fn check_figure_image(page: &Page, config: &SmokeConfig) -> SmokeResult<()> {
        let src = page.attr_of(&first_figure("img"), "src").await?;
        match src {
            Some(src) => {
                let mut url = asset::resolve_asset_url(&config.base_url, &src);
                if let Some(ref pr) = config.pr_number {
                    url = asset::strip_pr_prefix(&url, pr);
                }
                asset::check_reachable(&url).await
            }
            None => {
                let indicator = Selector::contains(Region::Document, MISSING_IMAGE_TEXT);
                let shown: bool = page.eval(&indicator.exists_expr()).await?;
                if shown {
                    Err(SmokeError::assertion(
                        "figure image reachable",
                        "no missing-image indicator",
                        MISSING_IMAGE_TEXT,
                    ))
                } else {
                    Ok(())
                }
            }
        }
    }

    /// Poll until the document title equals `expected`; on timeout, fail
    /// with the last observed title
    async fn expect_title(
        page: &Page,
        step: &str,
        expected: &str,
        timeout_ms: u64,
    ) -> SmokeResult<()> {
        let poll = PollConfig::new(timeout_ms);
        let deadline = Deadline::start(timeout_ms);
        loop {
            let actual = page.title().await?;
            if actual == expected {
                return Ok(());
            }
            if deadline.expired() {
                return expect_eq(step, expected, &actual);
            }
            tokio::time::sleep(poll.interval()).await;
        }
    }

    /// Poll `location.hash`
    async fn expect_hash(
        page: &Page,
        step: &str,
        expected: &str,
        timeout_ms: u64,
    ) -> SmokeResult<()> {
        let poll = PollConfig::new(timeout_ms);
        let deadline = Deadline::start(timeout_ms);
        loop {
            let actual = page.location_hash().await?;
            if actual == expected {
                return Ok(());
            }
            if deadline.expired() {
                return expect_eq(step, expected, &actual);
            }
            tokio::time::sleep(poll.interval()).await;
        }
    }

    /// Poll `location.search`
    async fn expect_search(
        page: &Page,
        step: &str,
        expected: &str,
        timeout_ms: u64,
    ) -> SmokeResult<()> {
        let poll = PollConfig::new(timeout_ms);
        let deadline = Deadline::start(timeout_ms);
        loop {
            let actual = page.location_search().await?;
            if actual == expected {
                return Ok(());
            }
            if deadline.expired() {
                return expect_eq(step, expected, &actual);
            }
            tokio::time::sleep(poll.interval()).await;
        }
    }

    /// Both selected-state properties, read from the entry's computed style
    async fn expect_selected(
        page: &Page,
        step: &str,
        selector: &Selector,
        style: &SelectedStyle,
    ) -> SmokeResult<()> {
        let font_weight = page.style_of(selector, "font-weight").await?;
        let color = page.style_of(selector, "color").await?;
        style.validate(step, &font_weight, &color)
    }
}

#[cfg(feature = "browser")]
pub use run::run;

#[cfg(test)]
mod tests {
    use super::*;

    mod plan_tests {
        use super::*;

        #[test]
        fn test_plan_starts_with_root_visit_and_title() {
            let plan = plan();
            assert_eq!(plan[0], "visit root");
            assert_eq!(plan[1], "root title");
        }

        #[test]
        fn test_plan_labels_are_unique() {
            let plan = plan();
            let mut seen = std::collections::HashSet::new();
            for label in &plan {
                assert!(seen.insert(*label), "duplicate step label: {label}");
            }
        }

        #[test]
        fn test_plan_has_exactly_two_settle_points() {
            let settles: Vec<_> = plan()
                .iter()
                .filter(|l| l.starts_with("settle"))
                .copied()
                .collect();
            assert_eq!(settles, vec!["settle result list", "settle header"]);
        }

        #[test]
        fn test_every_click_precedes_its_assertion() {
            let plan = plan();
            let click = |label: &str| plan.iter().position(|l| *l == label).unwrap();
            assert!(click("main: click 'Getting started'") < click("getting started title"));
            assert!(click("aside: click 'Additional resources'") < click("toc anchor in location hash"));
            assert!(click("nav: click 'Organizing your flags'") < click("organizing flags title"));
            assert!(click("nav: click 'The flags dashboard'") < click("flags dashboard title"));
            assert!(click("header: click search result") < click("url query matches search term"));
            assert!(click("header: click 'Integrations'") < click("integrations title"));
        }

        #[test]
        fn test_search_comes_after_figure_verification() {
            let plan = plan();
            let pos = |label: &str| plan.iter().position(|l| *l == label).unwrap();
            assert!(pos("figure image reachable") < pos("header: search placeholder"));
        }

        #[test]
        fn test_styling_checked_before_and_after_activation() {
            let plan = plan();
            let pos = |label: &str| plan.iter().position(|l| *l == label).unwrap();
            assert!(
                pos("nav: 'Getting started' selected styling")
                    < pos("nav: click 'Getting started'")
            );
            assert!(
                pos("nav: click 'Getting started'")
                    < pos("nav: selected styling persists after activation")
            );
        }
    }

    mod figure_tests {
        use super::*;

        #[test]
        fn test_figure_queries_scope_to_first_figure() {
            // a page can carry several figures; caption, link, and image
            // queries must all resolve inside the first one
            for part in ["figcaption", "a", "img"] {
                let expr = first_figure(part).find_expr();
                assert!(expr.contains(&format!("main figure:first-of-type {part}")));
            }
        }

        #[test]
        fn test_first_figure_describe_names_the_scope() {
            assert_eq!(
                first_figure("img").describe(),
                "main figure:first-of-type img"
            );
        }
    }

    mod literal_tests {
        use super::*;

        #[test]
        fn test_root_title_literal() {
            assert_eq!(ROOT_TITLE, "Welcome to LaunchDarkly docs");
        }

        #[test]
        fn test_toc_anchor_is_kebab_cased_entry() {
            assert_eq!(toc_anchor(), "#additional-resources");
        }

        #[test]
        fn test_search_term_and_result_entry() {
            assert_eq!(SEARCH_TERM, "experimentation");
            assert_eq!(SEARCH_RESULT_ENTRY, "Experimentation");
        }

        #[test]
        fn test_figure_caption_is_exact() {
            assert_eq!(FIGURE_CAPTION, "The Feature flags dashboard.");
        }
    }
}
