//! Subscription URL intake.
//!
//! Links are pulled out of free text (chat messages, `.txt` uploads,
//! stdin), de-duplicated in first-seen order, and checked for a usable
//! scheme and host before any request goes out.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::error::CoreError;

/// Pattern for an `http(s)://` link running up to the next whitespace.
static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[^\s]+").expect("Invalid regex"));

/// Extracts every `http(s)://` link from free text, in order of appearance.
pub fn extract_urls(text: &str) -> Vec<String> {
    URL_RE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Removes duplicate URLs, keeping the first occurrence of each.
pub fn dedupe_urls<I, S>(urls: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut seen = HashSet::new();
    urls.into_iter()
        .map(Into::into)
        .filter(|url| seen.insert(url.clone()))
        .collect()
}

/// Checks that a subscription URL is absolute and has a host.
///
/// # Errors
///
/// Returns `CoreError::InvalidUrl` when the string does not parse or has no
/// host component.
pub fn validate_url(raw: &str) -> Result<Url, CoreError> {
    let parsed = Url::parse(raw).map_err(|e| CoreError::InvalidUrl(e.to_string()))?;
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(CoreError::InvalidUrl("no host in URL".to_string()));
    }
    Ok(parsed)
}
