// File: src/error.rs
// Purpose: Typed faults raised while compiling patterns and dispatching routes

use thiserror::Error;

/// Failure to compile a route pattern
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("parameter '{name}' appears more than once in pattern '{pattern}'")]
    DuplicateParam { pattern: String, name: String },

    #[error("parameter without a name in pattern '{pattern}'")]
    EmptyParam { pattern: String },

    #[error("wildcard must be the last segment of pattern '{pattern}'")]
    WildcardNotLast { pattern: String },
}

/// Everything that can go wrong between a navigation event and a rendered page
#[derive(Debug, Error)]
pub enum RouterError {
    #[error(transparent)]
    InvalidPattern(#[from] PatternError),

    /// A props key outside `[A-Za-z0-9_$-]+`. Always reaches the caller of `dispatch`.
    #[error("Invalid prop name '{key}'.")]
    InvalidProp { key: String },

    /// Any other failure while a matched route was producing its page
    #[error("Unable to execute route '{pattern}'.")]
    RouteExecution {
        pattern: String,
        #[source]
        source: Box<RouterError>,
    },

    #[error("route callback failed: {0}")]
    Callback(#[source] anyhow::Error),

    #[error("render surface failed: {0}")]
    Render(#[source] anyhow::Error),

    #[error("route '{pattern}' does not match path '{path}'")]
    RouteMismatch { pattern: String, path: String },

    #[error("No route matched '{path}'.")]
    NoRouteMatched { path: String },

    #[error("Cannot create more than one Router instance.")]
    AlreadyConstructed,
}

impl RouterError {
    /// True for authoring bugs that must never be absorbed by the error template
    pub fn is_invalid_prop(&self) -> bool {
        matches!(self, RouterError::InvalidProp { .. })
    }
}
