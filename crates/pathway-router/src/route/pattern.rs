//! Pattern compilation and matching for route paths
//!
//! A pattern like `/info/:id` or `/docs/*rest` is compiled once into typed
//! segments. Matching walks pattern and path segments in lockstep with no
//! backtracking. All functions are **pure**: same input → same output.

use std::collections::HashSet;

use crate::error::PatternError;
use crate::path::{decode_component, segments, Params};

/// Represents the different kinds of pattern segments
///
/// # Examples
///
/// ```
/// use pathway_router::route::pattern::{classify_segment, Segment};
///
/// assert!(matches!(classify_segment("about"), Segment::Static(_)));
/// assert!(matches!(classify_segment(":id"), Segment::Param(_)));
/// assert!(matches!(classify_segment("*rest"), Segment::Wildcard(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text, matched by exact (case-sensitive) equality
    Static(String),
    /// `:name` - binds exactly one path segment
    Param(String),
    /// `*name` (or bare `*`) - binds every remaining segment, joined with `/`
    Wildcard(String),
}

/// Classifies one raw pattern segment (pure function)
pub fn classify_segment(segment: &str) -> Segment {
    match segment.chars().next() {
        Some(':') => Segment::Param(segment[1..].to_string()),
        Some('*') if segment.len() == 1 => Segment::Wildcard("*".to_string()),
        Some('*') => Segment::Wildcard(segment[1..].to_string()),
        _ => Segment::Static(segment.to_string()),
    }
}

/// A compiled route pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    source: String,
    segments: Vec<Segment>,
}

impl Pattern {
    /// Compiles a pattern string into typed segments
    ///
    /// Fails when a parameter name repeats, a `:` has no name, or a wildcard
    /// is followed by more segments.
    ///
    /// ```
    /// use pathway_router::route::pattern::Pattern;
    ///
    /// let pattern = Pattern::compile("/info/:id").unwrap();
    /// let params = pattern.match_path("/info/42").unwrap();
    /// assert_eq!(params.get("id").map(String::as_str), Some("42"));
    ///
    /// assert!(Pattern::compile("/:id/:id").is_err());
    /// ```
    pub fn compile(pattern: &str) -> Result<Self, PatternError> {
        let compiled: Vec<Segment> = segments(pattern).map(classify_segment).collect();

        let mut seen = HashSet::new();
        for (idx, segment) in compiled.iter().enumerate() {
            match segment {
                Segment::Param(name) if name.is_empty() => {
                    return Err(PatternError::EmptyParam {
                        pattern: pattern.to_string(),
                    });
                }
                Segment::Wildcard(_) if idx + 1 != compiled.len() => {
                    return Err(PatternError::WildcardNotLast {
                        pattern: pattern.to_string(),
                    });
                }
                Segment::Param(name) | Segment::Wildcard(name) => {
                    if !seen.insert(name.as_str()) {
                        return Err(PatternError::DuplicateParam {
                            pattern: pattern.to_string(),
                            name: name.clone(),
                        });
                    }
                }
                Segment::Static(_) => {}
            }
        }

        Ok(Self {
            source: pattern.to_string(),
            segments: compiled,
        })
    }

    /// The pattern string this was compiled from
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Names of every parameter (and wildcard) in declaration order
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Param(name) | Segment::Wildcard(name) => Some(name.as_str()),
            Segment::Static(_) => None,
        })
    }

    /// Matches a path (no query string) against this pattern
    ///
    /// Returns the bound parameters, or `None` on any segment or count mismatch.
    pub fn match_path(&self, path: &str) -> Option<Params> {
        let path_segments: Vec<&str> = segments(path).collect();

        // Tail-recursive helper walking both sequences in lockstep
        fn match_segments(
            pattern: &[Segment],
            path: &[&str],
            mut params: Params,
        ) -> Option<Params> {
            let Some((segment, rest)) = pattern.split_first() else {
                // Consumed all pattern segments: success only if path is consumed too
                return path.is_empty().then_some(params);
            };

            match segment {
                Segment::Wildcard(name) => {
                    if path.is_empty() {
                        return None;
                    }
                    let joined = path
                        .iter()
                        .map(|s| decode_component(s))
                        .collect::<Vec<_>>()
                        .join("/");
                    params.insert(name.clone(), joined);
                    Some(params)
                }
                Segment::Param(name) => {
                    let (value, remaining) = path.split_first()?;
                    params.insert(name.clone(), decode_component(value));
                    match_segments(rest, remaining, params)
                }
                Segment::Static(literal) => {
                    let (value, remaining) = path.split_first()?;
                    if literal != value {
                        return None;
                    }
                    match_segments(rest, remaining, params)
                }
            }
        }

        match_segments(&self.segments, &path_segments, Params::new())
    }
}

/// Compiles a pattern into a standalone matching function
///
/// ```
/// use pathway_router::route::pattern::compile;
///
/// let matcher = compile("/about").unwrap();
/// assert!(matcher("/about/").is_some());
/// assert!(matcher("/About").is_none());
/// ```
pub fn compile(pattern: &str) -> Result<impl Fn(&str) -> Option<Params>, PatternError> {
    let compiled = Pattern::compile(pattern)?;
    Ok(move |path: &str| compiled.match_path(path))
}
