//! Route callbacks
//!
//! Any `Fn(Context) -> impl Future<Output = anyhow::Result<RouteResult>>` is a
//! callback, so plain async closures can be registered directly.

use async_trait::async_trait;
use std::future::Future;

use super::{Context, Page, RouteResult};

/// Produces the page for a matched route
#[async_trait]
pub trait RouteCallback: Send + Sync {
    async fn call(&self, ctx: Context) -> anyhow::Result<RouteResult>;
}

#[async_trait]
impl<F, Fut> RouteCallback for F
where
    F: Fn(Context) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<RouteResult>> + Send + 'static,
{
    async fn call(&self, ctx: Context) -> anyhow::Result<RouteResult> {
        (self)(ctx).await
    }
}

/// Installed when a route is registered without a callback: renders the route's template as-is
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

#[async_trait]
impl RouteCallback for Passthrough {
    async fn call(&self, ctx: Context) -> anyhow::Result<RouteResult> {
        Ok(Page::new().with_template(ctx.route.template()).into())
    }
}
