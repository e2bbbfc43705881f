//! Region-scoped element queries.
//!
//! The scenario addresses elements by visible text inside a named page
//! region (main content, primary nav, table-of-contents aside, header).
//! A [`Selector`] carries that description and generates the JavaScript
//! expressions that are actually evaluated in the page: find, existence,
//! click, text content, attribute read, computed style read, input fill.
//!
//! Text matching follows the deepest-match rule: among elements in the
//! region whose text contains the needle, pick the first that has no
//! descendant also matching, so clicks and style reads land on the link
//! itself rather than a wrapping container.

/// A named page region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    /// Main content region (`main`)
    Main,
    /// Primary navigation (`nav`)
    Nav,
    /// Table-of-contents sidebar (`aside`)
    Aside,
    /// Site header (`header`)
    Header,
    /// The whole document
    Document,
}

impl Region {
    /// CSS scope for this region
    #[must_use]
    pub const fn css_scope(&self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Nav => "nav",
            Self::Aside => "aside",
            Self::Header => "header",
            Self::Document => "body",
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.css_scope())
    }
}

/// A selector for one element: region scope, optional CSS refinement,
/// optional visible-text filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    region: Region,
    inner_css: Option<String>,
    text: Option<String>,
}

impl Selector {
    /// Element in `region` whose visible text contains `text`
    #[must_use]
    pub fn contains(region: Region, text: impl Into<String>) -> Self {
        Self {
            region,
            inner_css: None,
            text: Some(text.into()),
        }
    }

    /// Element in `region` matching a CSS selector
    #[must_use]
    pub fn css(region: Region, css: impl Into<String>) -> Self {
        Self {
            region,
            inner_css: Some(css.into()),
            text: None,
        }
    }

    /// Restrict a CSS selector to elements whose text contains `text`
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Human-readable description, used in element-not-found errors
    #[must_use]
    pub fn describe(&self) -> String {
        match (&self.inner_css, &self.text) {
            (Some(css), Some(text)) => {
                format!("{} {css} containing {text:?}", self.region)
            }
            (Some(css), None) => format!("{} {css}", self.region),
            (None, Some(text)) => format!("{} containing {text:?}", self.region),
            (None, None) => self.region.to_string(),
        }
    }

    /// JavaScript expression evaluating to the matched element or `null`
    #[must_use]
    pub fn find_expr(&self) -> String {
        let scope = self.region.css_scope();
        let candidates = match &self.inner_css {
            Some(css) => format!("scope.querySelectorAll({:?})", format!("{scope} {css}")),
            None => format!("scope.querySelectorAll({:?})", format!("{scope} *")),
        };
        match &self.text {
            Some(text) => format!(
                "(() => {{ \
                 const scope = document; \
                 const hits = Array.from({candidates})\
                 .filter(el => el.textContent.includes({text:?})); \
                 return hits.find(el => !hits.some(o => o !== el && el.contains(o))) || null; \
                 }})()"
            ),
            None => format!(
                "(() => {{ const scope = document; return {candidates}[0] || null; }})()"
            ),
        }
    }

    /// Expression evaluating to `true` when the element is present
    #[must_use]
    pub fn exists_expr(&self) -> String {
        format!("!!{}", self.find_expr())
    }

    /// Expression that clicks the element, returning whether it was found
    #[must_use]
    pub fn click_expr(&self) -> String {
        format!(
            "(() => {{ const el = {}; if (!el) return false; el.click(); return true; }})()",
            self.find_expr()
        )
    }

    /// Expression evaluating to the element's trimmed text, or `null`
    #[must_use]
    pub fn text_expr(&self) -> String {
        format!(
            "(el => el ? el.textContent.trim() : null)({})",
            self.find_expr()
        )
    }

    /// Expression evaluating to an attribute value, or `null`
    #[must_use]
    pub fn attr_expr(&self, name: &str) -> String {
        format!(
            "(el => el ? el.getAttribute({name:?}) : null)({})",
            self.find_expr()
        )
    }

    /// Expression evaluating to a computed style property, or `null`
    #[must_use]
    pub fn style_expr(&self, property: &str) -> String {
        format!(
            "(el => el ? getComputedStyle(el).getPropertyValue({property:?}).trim() : null)({})",
            self.find_expr()
        )
    }

    /// Expression that fills an input with `value` and fires a bubbling
    /// `input` event so client-side search handlers run
    #[must_use]
    pub fn fill_expr(&self, value: &str) -> String {
        format!(
            "(() => {{ const el = {}; if (!el) return false; \
             el.focus(); el.value = {value:?}; \
             el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
             return true; }})()",
            self.find_expr()
        )
    }
}

/// Kebab-case a heading text into its anchor slug
/// (`"Additional resources"` -> `"additional-resources"`)
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for ch in text.chars() {
        if ch.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            for lower in ch.to_lowercase() {
                slug.push(lower);
            }
        } else {
            pending_dash = true;
        }
    }
    slug
}
