//! Expected/actual validation.
//!
//! Every scenario expectation funnels through these validators so that a
//! mismatch always surfaces the step label, the expected value, and the
//! observed value.

use regex::Regex;
use std::sync::OnceLock;

use crate::result::{SmokeError, SmokeResult};

/// Font weight carried by the selected navigation entry
pub const FONT_WEIGHT_BOLD: &str = "600";

/// Brand color carried by the selected navigation entry
pub const BRAND_BLUE: &str = "rgb(64, 91, 255)";

/// Assert exact string equality
pub fn expect_eq(step: &str, expected: &str, actual: &str) -> SmokeResult<()> {
    if actual == expected {
        Ok(())
    } else {
        Err(SmokeError::assertion(step, expected, actual))
    }
}

/// Assert an optional observed value is present and equals `expected`
pub fn expect_some_eq(step: &str, expected: &str, actual: Option<&str>) -> SmokeResult<()> {
    match actual {
        Some(actual) => expect_eq(step, expected, actual),
        None => Err(SmokeError::assertion(step, expected, "<absent>")),
    }
}

/// The selected-state visual treatment: bold weight and brand color,
/// both at once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedStyle {
    /// Expected `font-weight`
    pub font_weight: String,
    /// Expected `color`
    pub color: String,
}

impl Default for SelectedStyle {
    fn default() -> Self {
        Self {
            font_weight: FONT_WEIGHT_BOLD.to_string(),
            color: BRAND_BLUE.to_string(),
        }
    }
}

impl SelectedStyle {
    /// Validate observed computed style values against the treatment
    pub fn validate(&self, step: &str, font_weight: &str, color: &str) -> SmokeResult<()> {
        if font_weight != self.font_weight {
            return Err(SmokeError::assertion(
                format!("{step} (font-weight)"),
                &self.font_weight,
                font_weight,
            ));
        }
        if color != self.color {
            return Err(SmokeError::assertion(
                format!("{step} (color)"),
                &self.color,
                color,
            ));
        }
        Ok(())
    }
}

fn results_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"Results \((\d+)\)").unwrap())
}

/// Parse the search "Results (N)" indicator out of text, if present.
/// N is any non-negative integer; the exact value is never asserted.
#[must_use]
pub fn results_count(text: &str) -> Option<u64> {
    results_pattern()
        .captures(text)?
        .get(1)?
        .as_str()
        .parse()
        .ok()
}

/// Assert that text carries a "Results (N)" indicator
pub fn expect_results_indicator(step: &str, text: &str) -> SmokeResult<u64> {
    results_count(text).ok_or_else(|| SmokeError::assertion(step, r"Results (\d+)", text))
}

#[cfg(test)]
mod tests {
    use super::*;

    mod expect_eq_tests {
        use super::*;

        #[test]
        fn test_match_passes() {
            assert!(expect_eq("root title", "Getting started", "Getting started").is_ok());
        }

        #[test]
        fn test_mismatch_carries_both_sides() {
            let err = expect_eq("root title", "Getting started", "404").unwrap_err();
            match err {
                SmokeError::Assertion {
                    step,
                    expected,
                    actual,
                } => {
                    assert_eq!(step, "root title");
                    assert_eq!(expected, "Getting started");
                    assert_eq!(actual, "404");
                }
                other => panic!("unexpected variant: {other:?}"),
            }
        }

        #[test]
        fn test_absent_value_fails() {
            let err = expect_some_eq("search placeholder", "Search", None).unwrap_err();
            assert!(err.to_string().contains("<absent>"));
        }

        #[test]
        fn test_present_value_compares() {
            assert!(expect_some_eq("search placeholder", "Search", Some("Search")).is_ok());
            assert!(expect_some_eq("search placeholder", "Search", Some("Find")).is_err());
        }
    }

    mod selected_style_tests {
        use super::*;

        #[test]
        fn test_defaults_match_theme() {
            let style = SelectedStyle::default();
            assert_eq!(style.font_weight, "600");
            assert_eq!(style.color, "rgb(64, 91, 255)");
        }

        #[test]
        fn test_both_properties_pass() {
            let style = SelectedStyle::default();
            assert!(style
                .validate("nav selected", "600", "rgb(64, 91, 255)")
                .is_ok());
        }

        #[test]
        fn test_wrong_weight_fails() {
            let style = SelectedStyle::default();
            let err = style
                .validate("nav selected", "400", "rgb(64, 91, 255)")
                .unwrap_err();
            assert!(err.to_string().contains("font-weight"));
        }

        #[test]
        fn test_wrong_color_fails() {
            let style = SelectedStyle::default();
            let err = style
                .validate("nav selected", "600", "rgb(0, 0, 0)")
                .unwrap_err();
            assert!(err.to_string().contains("color"));
        }
    }

    mod results_indicator_tests {
        use super::*;

        #[test]
        fn test_parses_count() {
            assert_eq!(results_count("Results (42)"), Some(42));
            assert_eq!(results_count("Results (0)"), Some(0));
        }

        #[test]
        fn test_matches_within_surrounding_text() {
            assert_eq!(results_count("Search — Results (7) shown"), Some(7));
        }

        #[test]
        fn test_rejects_malformed() {
            assert_eq!(results_count("Results ()"), None);
            assert_eq!(results_count("Results (many)"), None);
            assert_eq!(results_count("No results"), None);
        }

        #[test]
        fn test_expect_indicator() {
            assert_eq!(
                expect_results_indicator("search results", "Results (3)").unwrap(),
                3
            );
            let err = expect_results_indicator("search results", "Searching...").unwrap_err();
            assert!(err.is_assertion());
        }
    }
}
