// File: src/app.rs
// Purpose: The demo application the CLI drives

use anyhow::Result;
use pathway_router::{Context, Props, RouteResult, Router};

const HOME: &str = r#"
    <p>hello world</p>

    <a goto="/about">click me</a>

    <a goto="/nowhere">also me</a>
"#;

const ABOUT: &str = r#"
    <p>foo bar baz</p>

    <a goto="/">click me</a>
"#;

const INFO: &str = r#"
    <p>the id is {id}</p>
    <p>{nested.object}</p>
"#;

/// Registers `/`, `/about` and `/info/:id`
///
/// `/info/:id` declines non-numeric ids so they fall through to the default template.
pub fn register(router: &Router) -> Result<()> {
    router
        .use_template("/", HOME)?
        .use_template("/about", ABOUT)?
        .use_route("/info/:id", INFO, info)?;
    Ok(())
}

async fn info(ctx: Context) -> Result<RouteResult> {
    let id = ctx.param("id").unwrap_or_default();
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_digit()) {
        tracing::debug!(%id, "not a numeric id");
        return Ok(RouteResult::NotFound);
    }

    let props = Props::new()
        .with("id", id)
        .with("nested", Props::new().with("object", "errors"));
    Ok(RouteResult::props(props))
}
