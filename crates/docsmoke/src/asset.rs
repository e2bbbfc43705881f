//! Figure asset reachability.
//!
//! Preview deployments for a pull request serve the site under an extra
//! `/<pr>` path segment; the canonical asset host does not. Before the
//! direct fetch, the image URL has that segment stripped so it resolves
//! against its canonical path.

use crate::result::{SmokeError, SmokeResult};

/// Remove the preview-deployment `/<pr>` path segment from a URL.
///
/// Only a standalone path segment exactly equal to the PR number is
/// stripped, and only its first occurrence. A coincidental match embedded
/// in a longer segment (an asset hash, say) is left alone.
#[must_use]
pub fn strip_pr_prefix(url: &str, pr: &str) -> String {
    if pr.is_empty() {
        return url.to_string();
    }

    // The path begins at the first '/' after the scheme/host, or at the
    // start of a relative URL.
    let path_start = url
        .find("://")
        .map_or(0, |scheme| url[scheme + 3..].find('/').map_or(url.len(), |p| scheme + 3 + p));

    let needle = format!("/{pr}");
    let mut search_from = path_start;
    while let Some(rel) = url[search_from..].find(&needle) {
        let at = search_from + rel;
        let end = at + needle.len();
        let boundary = url[end..]
            .chars()
            .next()
            .map_or(true, |c| matches!(c, '/' | '?' | '#'));
        if boundary {
            let mut out = String::with_capacity(url.len() - needle.len());
            out.push_str(&url[..at]);
            out.push_str(&url[end..]);
            return out;
        }
        search_from = end;
    }

    url.to_string()
}

/// Resolve a possibly-relative asset URL against the site base
#[must_use]
pub fn resolve_asset_url(base_url: &str, src: &str) -> String {
    if src.starts_with("http://") || src.starts_with("https://") {
        src.to_string()
    } else {
        format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            src.trim_start_matches('/')
        )
    }
}

/// Fetch the asset directly and require a success status.
///
/// This is the one assertion that reaches outside the rendered page.
#[cfg(feature = "browser")]
pub async fn check_reachable(url: &str) -> SmokeResult<()> {
    let response = reqwest::get(url).await.map_err(|e| SmokeError::Navigation {
        url: url.to_string(),
        message: e.to_string(),
    })?;
    let status = response.status().as_u16();
    if status == 200 {
        Ok(())
    } else {
        Err(SmokeError::AssetUnreachable {
            url: url.to_string(),
            status,
        })
    }
}
