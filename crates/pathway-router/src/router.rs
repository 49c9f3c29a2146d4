// File: src/router.rs
// Purpose: Route registry and the per-navigation dispatch loop

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, RwLock, Weak};
use tracing::{debug, instrument, warn};

use crate::error::RouterError;
use crate::host::{Host, LinkHandler, NavigationKind, NavigationListener};
use crate::options::AppOptions;
use crate::props::{flatten, FlatProps};
use crate::route::{Context, Route, RouteResult};
use crate::slot::{InstanceSlot, SlotClaim};
use crate::template::fill;
use crate::BoxFuture;

/// How a dispatch ended when it did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// A route produced the page
    Rendered { pattern: String },
    /// No route produced a page; the `default` template was rendered
    Default,
    /// A route failed and the `error` template was rendered in its place
    ErrorRendered { pattern: String },
    /// A newer dispatch started while this one was pending; nothing was rendered
    Superseded,
}

struct Inner {
    options: AppOptions,
    host: Arc<dyn Host>,
    routes: RwLock<Vec<Arc<Route>>>,
    sequence: AtomicU64,
    subscribed: AtomicBool,
    _claim: SlotClaim,
}

/// Client-side router handle
///
/// Cloning is cheap; all clones share the same routes and host. Only one
/// router may be alive per [`InstanceSlot`].
///
/// # Example
///
/// ```
/// use pathway_router::{AppOptions, Context, InstanceSlot, MemoryHost, Props, RouteResult, Router};
/// use std::sync::Arc;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let host = Arc::new(MemoryHost::new("/info/42"));
/// let slot = Arc::new(InstanceSlot::new());
/// let router = Router::with_slot(&slot, AppOptions::default(), host.clone()).unwrap();
///
/// router
///     .use_template("/", "<p>home</p>").unwrap()
///     .use_route("/info/:id", "<p>the id is {id}</p>", |ctx: Context| async move {
///         let id = ctx.param("id").unwrap_or_default().to_string();
///         Ok(RouteResult::props(Props::new().with("id", id)))
///     }).unwrap();
///
/// router.start().await.unwrap();
/// assert_eq!(host.html(), "<p>the id is 42</p>");
/// # }
/// ```
#[derive(Clone)]
pub struct Router {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("options", &self.inner.options)
            .field("routes", &self.routes().len())
            .finish()
    }
}

impl Router {
    /// Creates the process-wide router
    ///
    /// Fails with [`RouterError::AlreadyConstructed`] while another router
    /// created this way is still alive.
    pub fn new<H>(options: AppOptions, host: Arc<H>) -> Result<Self, RouterError>
    where
        H: Host + 'static,
    {
        Self::with_slot(&InstanceSlot::global(), options, host)
    }

    /// Creates a router occupying `slot` instead of the process-wide one
    pub fn with_slot<H>(
        slot: &Arc<InstanceSlot>,
        options: AppOptions,
        host: Arc<H>,
    ) -> Result<Self, RouterError>
    where
        H: Host + 'static,
    {
        let claim = slot.claim()?;
        debug!(?options, "router created");

        Ok(Self {
            inner: Arc::new(Inner {
                options,
                host,
                routes: RwLock::new(Vec::new()),
                sequence: AtomicU64::new(0),
                subscribed: AtomicBool::new(false),
                _claim: claim,
            }),
        })
    }

    fn from_inner(inner: Arc<Inner>) -> Self {
        Self { inner }
    }

    pub fn options(&self) -> &AppOptions {
        &self.inner.options
    }

    /// Registers a route; routes are tried in registration order
    pub fn add_route(&self, route: Route) -> &Self {
        debug!(pattern = route.pattern(), "route registered");
        self.inner
            .routes
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(Arc::new(route));
        self
    }

    /// Registers a route with a data callback (chainable)
    pub fn use_route<F, Fut>(
        &self,
        pattern: &str,
        template: impl Into<String>,
        callback: F,
    ) -> Result<&Self, RouterError>
    where
        F: Fn(Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<RouteResult>> + Send + 'static,
    {
        let route = Route::new(pattern, template, callback)?;
        Ok(self.add_route(route))
    }

    /// Registers a route that renders its template unchanged (chainable)
    pub fn use_template(&self, pattern: &str, template: impl Into<String>) -> Result<&Self, RouterError> {
        let route = Route::passthrough(pattern, template)?;
        Ok(self.add_route(route))
    }

    /// Snapshot of the registered routes, in order
    pub fn routes(&self) -> Vec<Arc<Route>> {
        self.inner
            .routes
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// The path dispatch would route right now: fragment or pathname, plus query string
    pub fn current_path(&self) -> String {
        let host = &self.inner.host;
        let base = if self.inner.options.hash {
            host.fragment()
        } else {
            host.pathname()
        };
        format!("{}{}", base, host.search())
    }

    /// Runs one dispatch cycle against the current location
    #[instrument(skip(self), level = "debug")]
    pub async fn dispatch(&self) -> Result<Dispatch, RouterError> {
        let sequence = self.inner.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let path = self.current_path();
        let url = self.inner.host.href();

        for route in self.routes() {
            if route.matches(&path).is_none() {
                continue;
            }
            debug!(pattern = route.pattern(), %path, "route matched");

            let html = match self.resolve(&route, &path, &url).await {
                Ok(Some(html)) => html,
                Ok(None) => {
                    debug!(pattern = route.pattern(), "route declined, falling through");
                    continue;
                }
                Err(err) => return self.fail(sequence, &route, err),
            };

            if self.is_stale(sequence) {
                debug!(pattern = route.pattern(), "dispatch superseded, discarding page");
                return Ok(Dispatch::Superseded);
            }

            return match self.render(&html) {
                Ok(()) => Ok(Dispatch::Rendered {
                    pattern: route.pattern().to_string(),
                }),
                Err(err) => self.fail(sequence, &route, err),
            };
        }

        if self.is_stale(sequence) {
            return Ok(Dispatch::Superseded);
        }

        match &self.inner.options.default {
            Some(default) => {
                debug!(%path, "no route matched, rendering default");
                self.render(default)?;
                Ok(Dispatch::Default)
            }
            None => Err(RouterError::NoRouteMatched { path }),
        }
    }

    /// Runs a matched route and turns its result into final HTML
    ///
    /// `Ok(None)` means the route declined.
    async fn resolve(&self, route: &Arc<Route>, path: &str, url: &str) -> Result<Option<String>, RouterError> {
        let page = match route.execute(path, url).await? {
            RouteResult::NotFound => return Ok(None),
            RouteResult::Render(page) => page,
        };

        let props = match &page.props {
            Some(props) => flatten(props)?,
            None => FlatProps::new(),
        };

        let template = page.template.as_deref().unwrap_or(route.template());
        let content = fill(template, &props);

        Ok(Some(match &self.inner.options.sanitizer {
            Some(sanitize) => sanitize(&content),
            None => content,
        }))
    }

    /// Applies the failure policy for a matched route
    fn fail(&self, sequence: u64, route: &Route, err: RouterError) -> Result<Dispatch, RouterError> {
        let err = if err.is_invalid_prop() {
            err
        } else {
            RouterError::RouteExecution {
                pattern: route.pattern().to_string(),
                source: Box::new(err),
            }
        };

        if self.is_stale(sequence) && !err.is_invalid_prop() {
            debug!(pattern = route.pattern(), error = %err, "stale dispatch failed, ignoring");
            return Ok(Dispatch::Superseded);
        }

        let Some(error_template) = &self.inner.options.error else {
            warn!(pattern = route.pattern(), error = %err, "route failed");
            return Err(err);
        };

        if !self.is_stale(sequence) {
            if let Err(render_err) = self.render(&error_template(&err)) {
                warn!(pattern = route.pattern(), error = %render_err, "error template failed to render");
                return Err(err);
            }
        }

        if err.is_invalid_prop() {
            warn!(pattern = route.pattern(), error = %err, "invalid props");
            return Err(err);
        }

        warn!(pattern = route.pattern(), error = %err, "route failed, error template rendered");
        Ok(Dispatch::ErrorRendered {
            pattern: route.pattern().to_string(),
        })
    }

    fn is_stale(&self, sequence: u64) -> bool {
        self.inner.sequence.load(Ordering::SeqCst) != sequence
    }

    /// Swaps the rendered content and rebinds in-page links
    fn render(&self, html: &str) -> Result<(), RouterError> {
        let host = &self.inner.host;
        host.replace(html).map_err(RouterError::Render)?;

        let bound = host.bind_links(&self.inner.options.attribute, self.link_handler());
        debug!(bound, attribute = %self.inner.options.attribute, "links bound");
        Ok(())
    }

    /// Navigates to `path` and dispatches
    #[instrument(skip(self), level = "debug")]
    pub async fn goto(&self, path: &str) -> Result<Dispatch, RouterError> {
        if self.inner.options.hash {
            self.inner.host.set_fragment(path);
        } else {
            self.inner.host.push_path(path);
        }
        self.dispatch().await
    }

    /// Dispatches once, then follows navigation changes
    ///
    /// The change subscription is installed at most once per router; calling
    /// `start` again only dispatches.
    pub async fn start(&self) -> Result<Dispatch, RouterError> {
        let outcome = self.dispatch().await?;

        if self.inner.subscribed.swap(true, Ordering::SeqCst) {
            debug!("already listening for navigation changes");
            return Ok(outcome);
        }

        let kind = if self.inner.options.hash {
            NavigationKind::FragmentChange
        } else {
            NavigationKind::HistoryPop
        };
        self.inner.host.subscribe(kind, self.navigation_listener());
        debug!(?kind, "listening for navigation changes");

        Ok(outcome)
    }

    // Host callbacks hold a weak handle so the host never keeps the router alive

    fn weak(&self) -> Weak<Inner> {
        Arc::downgrade(&self.inner)
    }

    fn link_handler(&self) -> LinkHandler {
        let weak = self.weak();
        Arc::new(move |target: String| -> BoxFuture<'static, ()> {
            let weak = weak.clone();
            Box::pin(async move {
                let Some(inner) = weak.upgrade() else { return };
                if let Err(err) = Router::from_inner(inner).goto(&target).await {
                    warn!(%target, error = %err, "navigation failed");
                }
            })
        })
    }

    fn navigation_listener(&self) -> NavigationListener {
        let weak = self.weak();
        Arc::new(move || -> BoxFuture<'static, ()> {
            let weak = weak.clone();
            Box::pin(async move {
                let Some(inner) = weak.upgrade() else { return };
                if let Err(err) = Router::from_inner(inner).dispatch().await {
                    warn!(error = %err, "dispatch after navigation change failed");
                }
            })
        })
    }
}
