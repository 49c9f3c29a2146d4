//! Query-string parsing
//!
//! Follows form-urlencoded rules: `&`-separated pairs, `+` is a space,
//! percent escapes are decoded, and a repeated key keeps its last value.

use std::collections::HashMap;

use super::decode_component;

/// Parsed query parameters (key → last value seen)
pub type QueryParams = HashMap<String, String>;

/// Parses a query string (with or without its leading `?`)
///
/// # Examples
///
/// ```
/// use pathway_router::path::parse_query;
///
/// let query = parse_query("?x=y&x=z&flag&name=a+b");
/// assert_eq!(query.get("x").map(String::as_str), Some("z"));
/// assert_eq!(query.get("flag").map(String::as_str), Some(""));
/// assert_eq!(query.get("name").map(String::as_str), Some("a b"));
/// ```
pub fn parse_query(query: &str) -> QueryParams {
    query
        .trim_start_matches('?')
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_form(key), decode_form(value))
        })
        .collect()
}

fn decode_form(raw: &str) -> String {
    decode_component(&raw.replace('+', " "))
}
