//! # Pathway Router
//!
//! A client-side navigation router:
//! - Path patterns with named parameters (`/info/:id`) and trailing wildcards (`/docs/*rest`)
//! - Async route callbacks producing props for a template
//! - Explicit fallthrough (`RouteResult::NotFound`) to the next matching route
//! - Nested props flattened into dotted placeholders (`{user.name}`)
//! - Default and error templates, optional sanitizer
//! - Hash or path based locations, in-page links rebound after every render
//!
//! The browser (or any other environment) is reached only through the
//! [`host`] traits; [`MemoryHost`] implements them in process.
//!
//! ## Dispatch
//!
//! On every navigation the router walks its routes in registration order.
//! The first route whose pattern matches runs its callback; if the callback
//! returns [`RouteResult::NotFound`] the next matching route is tried.
//! A rendered page stops the walk. With nothing rendered, the `default`
//! template is used, or dispatch fails with [`RouterError::NoRouteMatched`].
//!
//! ## Example
//!
//! ```
//! use pathway_router::{AppOptions, Context, InstanceSlot, MemoryHost, Props, RouteResult, Router};
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), pathway_router::RouterError> {
//! let host = Arc::new(MemoryHost::new("/nowhere"));
//! let slot = Arc::new(InstanceSlot::new());
//! let router = Router::with_slot(&slot, AppOptions::new().with_default("404"), host.clone())?;
//!
//! router
//!     .use_template("/", r#"<a goto="/about">about</a>"#)?
//!     .use_template("/about", "<p>about</p>")?
//!     .use_route("/info/:id", "<p>{id}</p>", |ctx: Context| async move {
//!         if ctx.param("id") == Some("0") {
//!             return Ok(RouteResult::NotFound);
//!         }
//!         let id = ctx.param("id").unwrap_or_default().to_string();
//!         Ok(RouteResult::props(Props::new().with("id", id)))
//!     })?;
//!
//! router.start().await?;
//! assert_eq!(host.html(), "404");
//!
//! router.goto("/info/7").await?;
//! assert_eq!(host.html(), "<p>7</p>");
//! # Ok(())
//! # }
//! ```

use std::future::Future;
use std::pin::Pin;

// ============================================================================
// Module Declarations
// ============================================================================

mod error;
pub mod host;
mod options;
pub mod path;
mod props;
pub mod route;
mod router;
mod slot;
mod template;

pub use error::{PatternError, RouterError};
pub use host::{Host, MemoryHost, NavigationKind};
pub use options::{AppOptions, ErrorTemplate, RouterConfig, Sanitizer, DEFAULT_LINK_ATTRIBUTE};
pub use path::{normalize_path, parse_query, Params, QueryParams};
pub use props::{flatten, is_valid_prop_name, FlatProps, Props, Value};
pub use route::pattern::{compile, Pattern, Segment};
pub use route::{Context, Page, Passthrough, Route, RouteCallback, RouteResult};
pub use router::{Dispatch, Router};
pub use slot::InstanceSlot;
pub use template::fill;

/// Boxed, sendable future used at the host boundary
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
