//! Path utilities for normalization and query handling
//!
//! All functions are **pure**: given same input, always produce same output with no side effects.

use std::borrow::Cow;
use std::collections::HashMap;

pub mod query;
pub use query::{parse_query, QueryParams};

/// Validates if a path is in canonical form
///
/// # Rules
///
/// - Must start with `/`
/// - Must not contain `//`
/// - Must not end with `/` (except root `/`)
/// - Must not be empty
///
/// # Examples
///
/// ```
/// use pathway_router::path::is_valid_path;
///
/// assert!(is_valid_path("/"));
/// assert!(is_valid_path("/info/42"));
///
/// assert!(!is_valid_path(""));
/// assert!(!is_valid_path("about")); // Missing leading /
/// assert!(!is_valid_path("/about/")); // Trailing /
/// assert!(!is_valid_path("/about//page")); // Double //
/// ```
pub fn is_valid_path(path: &str) -> bool {
    if path.is_empty() || !path.starts_with('/') {
        return false;
    }

    if path.contains("//") {
        return false;
    }

    path == "/" || !path.ends_with('/')
}

/// Normalize a path to canonical absolute form
///
/// Returns `Cow::Borrowed` when input is already valid (zero allocations).
///
/// - Trailing slashes: `/path/` → `/path`
/// - Double slashes: `/path//to` → `/path/to`
/// - Relative: `info/42` → `/info/42`
/// - Empty: `` → `/`
///
/// # Examples
///
/// ```
/// use pathway_router::path::normalize_path;
/// use std::borrow::Cow;
///
/// assert!(matches!(normalize_path("/about"), Cow::Borrowed("/about")));
/// assert_eq!(normalize_path("/about/"), "/about");
/// assert_eq!(normalize_path("info//42/"), "/info/42");
/// ```
pub fn normalize_path(path: &str) -> Cow<'_, str> {
    if is_valid_path(path) {
        return Cow::Borrowed(path);
    }

    let normalized = segments(path).collect::<Vec<_>>().join("/");

    if normalized.is_empty() {
        Cow::Borrowed("/")
    } else {
        Cow::Owned(format!("/{}", normalized))
    }
}

/// Non-empty `/`-delimited segments of a path
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Splits a navigable path into its path part and its query string
///
/// The fragment (if any) is dropped, and the `?` is not part of the returned query.
///
/// ```
/// use pathway_router::path::split_path_query;
///
/// assert_eq!(split_path_query("/info/42?x=y"), ("/info/42", "x=y"));
/// assert_eq!(split_path_query("/about#top"), ("/about", ""));
/// assert_eq!(split_path_query("/"), ("/", ""));
/// ```
pub fn split_path_query(path: &str) -> (&str, &str) {
    let without_fragment = path.split_once('#').map(|(p, _)| p).unwrap_or(path);

    without_fragment
        .split_once('?')
        .unwrap_or((without_fragment, ""))
}

/// Percent-decodes one path component, keeping the raw text if it does not decode to UTF-8
pub fn decode_component(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| raw.to_string())
}

/// Bound route parameters (name → decoded segment text)
pub type Params = HashMap<String, String>;
