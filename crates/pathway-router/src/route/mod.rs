//! Routes: a compiled pattern bound to a template and a data callback

pub mod callback;
pub mod pattern;

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::error::{PatternError, RouterError};
use crate::path::{normalize_path, parse_query, split_path_query, Params, QueryParams};
use crate::props::Props;

pub use callback::{Passthrough, RouteCallback};
pub use pattern::{Pattern, Segment};

/// Everything a route callback gets to see about the navigation it is answering
#[derive(Debug, Clone)]
pub struct Context {
    /// Full navigable URL at the time of dispatch
    pub url: String,
    /// The matched route (read-only)
    pub route: Arc<Route>,
    /// Bound pattern parameters
    pub params: Params,
    /// Parsed query string
    pub query: QueryParams,
}

impl Context {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }
}

/// A page to render: props to fill in, and optionally a template other than the route's own
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub props: Option<Props>,
    pub template: Option<String>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_props(mut self, props: Props) -> Self {
        self.props = Some(props);
        self
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }
}

/// What a route callback decided
#[derive(Debug, Clone, PartialEq)]
pub enum RouteResult {
    /// Matched structurally but declines; the next route is tried
    NotFound,
    Render(Page),
}

impl RouteResult {
    /// Render the route's own template with `props`
    pub fn props(props: Props) -> Self {
        RouteResult::Render(Page::new().with_props(props))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RouteResult::NotFound)
    }
}

impl From<Page> for RouteResult {
    fn from(page: Page) -> Self {
        RouteResult::Render(page)
    }
}

/// A registered route
pub struct Route {
    pattern: Pattern,
    template: String,
    callback: Arc<dyn RouteCallback>,
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("pattern", &self.pattern.as_str())
            .field("template", &self.template)
            .finish()
    }
}

impl Route {
    /// Creates a route with a data callback
    ///
    /// ```
    /// use pathway_router::{Context, Props, Route, RouteResult};
    ///
    /// let route = Route::new("/info/:id", "<p>{id}</p>", |ctx: Context| async move {
    ///     let id = ctx.param("id").unwrap_or_default().to_string();
    ///     Ok(RouteResult::props(Props::new().with("id", id)))
    /// })
    /// .unwrap();
    /// assert_eq!(route.pattern(), "/info/:id");
    /// ```
    pub fn new<F, Fut>(
        pattern: &str,
        template: impl Into<String>,
        callback: F,
    ) -> Result<Self, PatternError>
    where
        F: Fn(Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<RouteResult>> + Send + 'static,
    {
        Self::with_callback(pattern, template, callback)
    }

    /// Creates a route from any [`RouteCallback`] implementation
    pub fn with_callback<C>(
        pattern: &str,
        template: impl Into<String>,
        callback: C,
    ) -> Result<Self, PatternError>
    where
        C: RouteCallback + 'static,
    {
        Ok(Self {
            pattern: Pattern::compile(pattern)?,
            template: template.into(),
            callback: Arc::new(callback),
        })
    }

    /// Creates a route that renders its template unchanged
    pub fn passthrough(pattern: &str, template: impl Into<String>) -> Result<Self, PatternError> {
        Self::with_callback(pattern, template, Passthrough)
    }

    /// The pattern string this route was registered with
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// The route's own template
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Tests a navigable path (query string allowed) against this route
    pub fn matches(&self, path: &str) -> Option<Params> {
        let (path, _) = split_path_query(path);
        self.pattern.match_path(&normalize_path(path))
    }

    /// Runs the callback for `path`
    ///
    /// `url` is the full location handed to the callback's context. Fails with
    /// [`RouterError::RouteMismatch`] if `path` does not match this route.
    pub async fn execute(self: &Arc<Self>, path: &str, url: &str) -> Result<RouteResult, RouterError> {
        let params = self.matches(path).ok_or_else(|| RouterError::RouteMismatch {
            pattern: self.pattern().to_string(),
            path: path.to_string(),
        })?;

        let (_, query) = split_path_query(path);
        let ctx = Context {
            url: url.to_string(),
            route: Arc::clone(self),
            params,
            query: parse_query(query),
        };

        self.callback.call(ctx).await.map_err(RouterError::Callback)
    }
}
