//! Dispatch tests for pathway-router
//!
//! Tests are organized by feature area and cover:
//! - Registration order and fallthrough
//! - Context (params, query, url)
//! - Default template and the no-route fault
//! - Error template and the failure policy
//! - Links, history and fragment navigation
//! - Stale dispatches and the instance slot

use pathway_router::*;
use pathway_router::host::Location;
use pretty_assertions::assert_eq;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

const HOME: &str = r#"<p>hello world</p> <a goto="/about">click me</a> <a goto="/nowhere">also me</a>"#;
const ABOUT: &str = r#"<p>foo bar baz</p> <a goto="/">click me</a>"#;

fn router_at(path: &str, options: AppOptions) -> (Router, Arc<MemoryHost>) {
    let host = Arc::new(MemoryHost::new(path));
    let slot = Arc::new(InstanceSlot::new());
    let router = Router::with_slot(&slot, options, host.clone()).unwrap();
    (router, host)
}

/// Registers `/`, `/about` and `/info/:id`
fn demo_routes(router: &Router) {
    router
        .use_template("/", HOME)
        .unwrap()
        .use_template("/about", ABOUT)
        .unwrap()
        .use_route("/info/:id", "<p>the id is {id}</p>", |ctx: Context| async move {
            let id = ctx.param("id").unwrap_or_default().to_string();
            Ok(RouteResult::props(
                Props::new()
                    .with("id", id)
                    .with("nested", Props::new().with("object", "errors")),
            ))
        })
        .unwrap();
}

// ============================================================================
// Registration order and fallthrough
// ============================================================================

#[tokio::test]
async fn test_first_registered_match_wins() {
    let (router, host) = router_at("/users/new", AppOptions::default());
    router
        .use_template("/users/:id", "<p>user {id}</p>")
        .unwrap()
        .use_template("/users/new", "<p>new user</p>")
        .unwrap();

    let outcome = router.dispatch().await.unwrap();
    assert_eq!(outcome, Dispatch::Rendered { pattern: "/users/:id".to_string() });
    // Passthrough renders the raw template: no props, placeholder kept
    assert_eq!(host.html(), "<p>user {id}</p>");
}

#[tokio::test]
async fn test_not_found_falls_through_in_order() {
    let (router, host) = router_at("/info/0", AppOptions::default());
    let calls = Arc::new(Mutex::new(Vec::new()));

    let log = calls.clone();
    router
        .use_route("/info/:id", "<p>{id}</p>", move |ctx: Context| {
            let log = log.clone();
            async move {
                log.lock().unwrap().push("lookup");
                if ctx.param("id") == Some("0") {
                    return Ok(RouteResult::NotFound);
                }
                Ok(RouteResult::props(Props::new().with("id", ctx.param("id"))))
            }
        })
        .unwrap();

    let log = calls.clone();
    router
        .use_route("/info/:id", "<p>no such id</p>", move |_ctx: Context| {
            let log = log.clone();
            async move {
                log.lock().unwrap().push("fallback");
                Ok(RouteResult::Render(Page::new()))
            }
        })
        .unwrap();

    let outcome = router.dispatch().await.unwrap();
    assert_eq!(outcome, Dispatch::Rendered { pattern: "/info/:id".to_string() });
    assert_eq!(host.html(), "<p>no such id</p>");
    assert_eq!(*calls.lock().unwrap(), vec!["lookup", "fallback"]);
}

#[tokio::test]
async fn test_all_routes_decline_uses_default() {
    let (router, host) = router_at("/x", AppOptions::new().with_default("404"));
    router
        .use_route("/x", "never", |_ctx: Context| async move { Ok(RouteResult::NotFound) })
        .unwrap();

    assert_eq!(router.dispatch().await.unwrap(), Dispatch::Default);
    assert_eq!(host.html(), "404");
}

#[tokio::test]
async fn test_override_template() {
    let (router, host) = router_at("/info/9", AppOptions::default());
    router
        .use_route("/info/:id", "<p>natural</p>", |ctx: Context| async move {
            let page = Page::new()
                .with_template(format!("<h1>{{id}}</h1> was {}", ctx.route.template()))
                .with_props(Props::new().with("id", ctx.param("id")));
            Ok(RouteResult::from(page))
        })
        .unwrap();

    router.dispatch().await.unwrap();
    assert_eq!(host.html(), "<h1>9</h1> was <p>natural</p>");
}

// ============================================================================
// Context
// ============================================================================

#[tokio::test]
async fn test_context_params_query_and_url() {
    let (router, _host) = router_at("/info/42?x=y&x=z&q=a+b", AppOptions::default());
    let seen = Arc::new(Mutex::new(None));

    let sink = seen.clone();
    router
        .use_route("/info/:id", "", move |ctx: Context| {
            let sink = sink.clone();
            async move {
                *sink.lock().unwrap() = Some(ctx.clone());
                Ok(RouteResult::NotFound)
            }
        })
        .unwrap();

    assert!(matches!(
        router.dispatch().await,
        Err(RouterError::NoRouteMatched { .. })
    ));

    let ctx = seen.lock().unwrap().clone().unwrap();
    assert_eq!(ctx.param("id"), Some("42"));
    assert_eq!(ctx.query_param("x"), Some("z"));
    assert_eq!(ctx.query_param("q"), Some("a b"));
    assert_eq!(ctx.url, "http://localhost/info/42?x=y&x=z&q=a+b");
    assert_eq!(ctx.route.pattern(), "/info/:id");
}

#[tokio::test]
async fn test_execute_rejects_mismatched_path() {
    let route = Arc::new(Route::passthrough("/about", "").unwrap());
    let err = route.execute("/other", "http://localhost/other").await.unwrap_err();
    assert!(matches!(err, RouterError::RouteMismatch { .. }));
}

// ============================================================================
// Default template and the no-route fault
// ============================================================================

#[tokio::test]
async fn test_nowhere_without_default_rejects() {
    let (router, host) = router_at("/nowhere", AppOptions::default());
    demo_routes(&router);

    match router.start().await {
        Err(RouterError::NoRouteMatched { path }) => assert_eq!(path, "/nowhere"),
        other => panic!("expected NoRouteMatched, got {:?}", other),
    }
    assert_eq!(host.render_count(), 0);
}

#[tokio::test]
async fn test_nowhere_with_default_renders_it() {
    let (router, host) = router_at("/nowhere", AppOptions::new().with_default("404"));
    demo_routes(&router);

    assert_eq!(router.start().await.unwrap(), Dispatch::Default);
    assert_eq!(host.html(), "404");
}

#[tokio::test]
async fn test_info_route_fills_props() {
    let (router, host) = router_at("/info/42", AppOptions::default());
    demo_routes(&router);

    router.start().await.unwrap();
    assert_eq!(host.html(), "<p>the id is 42</p>");
}

#[tokio::test]
async fn test_param_holding_placeholder_is_rendered_literally() {
    let (router, host) = router_at("/info/%7Bnested.object%7D", AppOptions::default());
    demo_routes(&router);

    router.start().await.unwrap();
    assert_eq!(host.html(), "<p>the id is {nested.object}</p>");
}

// ============================================================================
// Error template and the failure policy
// ============================================================================

fn error_options() -> AppOptions {
    AppOptions::new().with_error(|err| format!("<p class=\"error\">{}</p>", err))
}

#[tokio::test]
async fn test_callback_failure_absorbed_by_error_template() {
    let (router, host) = router_at("/boom", error_options());
    router
        .use_route("/boom", "", |_ctx: Context| async move {
            Err(anyhow::anyhow!("database unavailable"))
        })
        .unwrap()
        .use_template("/:any", "<p>catch all</p>")
        .unwrap();

    let outcome = router.dispatch().await.unwrap();
    assert_eq!(outcome, Dispatch::ErrorRendered { pattern: "/boom".to_string() });
    // No further route is tried after a failure
    assert_eq!(host.html(), "<p class=\"error\">Unable to execute route '/boom'.</p>");
}

#[tokio::test]
async fn test_callback_failure_without_error_template_propagates() {
    let (router, host) = router_at("/boom", AppOptions::default());
    router
        .use_route("/boom", "", |_ctx: Context| async move { Err(anyhow::anyhow!("nope")) })
        .unwrap();

    match router.dispatch().await {
        Err(RouterError::RouteExecution { pattern, source }) => {
            assert_eq!(pattern, "/boom");
            assert!(matches!(*source, RouterError::Callback(_)));
        }
        other => panic!("expected RouteExecution, got {:?}", other),
    }
    assert_eq!(host.render_count(), 0);
}

fn bad_props_route(router: &Router) {
    router
        .use_route("/bad", "<p>{ok}</p>", |_ctx: Context| async move {
            Ok(RouteResult::props(
                Props::new().with("ok", 1).with("bad key", 2),
            ))
        })
        .unwrap();
}

#[tokio::test]
async fn test_invalid_prop_rendered_then_reraised() {
    let (router, host) = router_at("/bad", error_options());
    bad_props_route(&router);

    match router.dispatch().await {
        Err(RouterError::InvalidProp { key }) => assert_eq!(key, "bad key"),
        other => panic!("expected InvalidProp, got {:?}", other),
    }
    assert_eq!(host.html(), "<p class=\"error\">Invalid prop name 'bad key'.</p>");
}

#[tokio::test]
async fn test_invalid_prop_without_error_template() {
    let (router, host) = router_at("/bad", AppOptions::default());
    bad_props_route(&router);

    assert!(matches!(
        router.dispatch().await,
        Err(RouterError::InvalidProp { .. })
    ));
    assert_eq!(host.render_count(), 0);
}

#[tokio::test]
async fn test_render_failure_is_execution_fault() {
    let (router, host) = router_at("/about", AppOptions::default());
    demo_routes(&router);
    host.set_fail_renders(true);

    match router.dispatch().await {
        Err(RouterError::RouteExecution { source, .. }) => {
            assert!(matches!(*source, RouterError::Render(_)));
        }
        other => panic!("expected RouteExecution, got {:?}", other),
    }
}

#[tokio::test]
async fn test_error_template_render_failure_propagates() {
    let (router, host) = router_at("/about", error_options());
    demo_routes(&router);
    host.set_fail_renders(true);

    assert!(matches!(
        router.dispatch().await,
        Err(RouterError::RouteExecution { .. })
    ));
}

// ============================================================================
// Links, history and fragment navigation
// ============================================================================

#[tokio::test]
async fn test_dispatch_twice_is_idempotent() {
    let (router, host) = router_at("/", AppOptions::default());
    demo_routes(&router);

    router.dispatch().await.unwrap();
    let first_html = host.html();
    let first_links = host.links();

    router.dispatch().await.unwrap();
    assert_eq!(host.html(), first_html);
    assert_eq!(host.links(), first_links);
    assert_eq!(host.links(), vec!["/about", "/nowhere"]);
    assert_eq!(host.render_count(), 2);
}

#[tokio::test]
async fn test_click_navigates_and_rebinds() {
    let (router, host) = router_at("/", AppOptions::new().with_default("404"));
    demo_routes(&router);
    router.start().await.unwrap();

    assert!(host.click("/about").await);
    assert_eq!(host.html(), ABOUT);
    assert_eq!(host.links(), vec!["/"]);
    assert_eq!(host.history(), vec!["/", "/about"]);

    // Old bindings are gone with the old content
    assert!(!host.click("/nowhere").await);

    assert!(host.click("/").await);
    assert_eq!(host.html(), HOME);
}

#[tokio::test]
async fn test_custom_link_attribute() {
    let (router, host) = router_at("/", AppOptions::new().with_attribute("data-nav"));
    router
        .use_template("/", r#"<a data-nav="/about">x</a> <a goto="/ignored">y</a>"#)
        .unwrap()
        .use_template("/about", "about")
        .unwrap();
    router.start().await.unwrap();

    assert_eq!(host.links(), vec!["/about"]);
    assert!(host.click("/about").await);
    assert_eq!(host.html(), "about");
}

#[tokio::test]
async fn test_history_pop_redispatches() {
    let (router, host) = router_at("/", AppOptions::default());
    demo_routes(&router);
    router.start().await.unwrap();

    router.goto("/info/7").await.unwrap();
    assert_eq!(host.html(), "<p>the id is 7</p>");

    assert!(host.back().await);
    assert_eq!(host.html(), HOME);

    assert!(host.forward().await);
    assert_eq!(host.html(), "<p>the id is 7</p>");
}

#[tokio::test]
async fn test_hash_mode_routes_on_fragment() {
    let host = Arc::new(MemoryHost::with_fragment("#/about"));
    let slot = Arc::new(InstanceSlot::new());
    let router = Router::with_slot(&slot, AppOptions::new().with_hash(true), host.clone()).unwrap();
    demo_routes(&router);

    router.start().await.unwrap();
    assert_eq!(host.html(), ABOUT);
    assert_eq!(host.listener_count(NavigationKind::FragmentChange), 1);
    assert_eq!(host.listener_count(NavigationKind::HistoryPop), 0);

    router.goto("/info/3?tab=x").await.unwrap();
    assert_eq!(host.fragment(), "/info/3?tab=x");
    assert_eq!(host.html(), "<p>the id is 3</p>");
    // Hash navigation never pushes path entries
    assert_eq!(host.history(), vec!["/"]);

    host.change_fragment("/").await;
    assert_eq!(host.html(), HOME);
}

#[tokio::test]
async fn test_start_subscribes_once() {
    let (router, host) = router_at("/", AppOptions::default());
    demo_routes(&router);

    router.start().await.unwrap();
    router.start().await.unwrap();
    assert_eq!(host.listener_count(NavigationKind::HistoryPop), 1);
    assert_eq!(host.render_count(), 2);
}

// ============================================================================
// Stale dispatches and the instance slot
// ============================================================================

#[tokio::test]
async fn test_superseded_dispatch_renders_nothing() {
    let (router, host) = router_at("/slow", AppOptions::default());
    let started = Arc::new(Notify::new());
    let gate = Arc::new(Notify::new());

    let (on_start, wait) = (started.clone(), gate.clone());
    router
        .use_route("/slow", "<p>slow</p>", move |_ctx: Context| {
            let (on_start, wait) = (on_start.clone(), wait.clone());
            async move {
                on_start.notify_one();
                wait.notified().await;
                Ok(RouteResult::Render(Page::new()))
            }
        })
        .unwrap()
        .use_template("/fast", "<p>fast</p>")
        .unwrap();

    let pending = tokio::spawn({
        let router = router.clone();
        async move { router.dispatch().await }
    });

    started.notified().await;
    router.goto("/fast").await.unwrap();
    assert_eq!(host.html(), "<p>fast</p>");

    gate.notify_one();
    let outcome = pending.await.unwrap().unwrap();
    assert_eq!(outcome, Dispatch::Superseded);
    assert_eq!(host.html(), "<p>fast</p>");
    assert_eq!(host.render_count(), 1);
}

#[test]
fn test_one_router_per_slot() {
    let slot = Arc::new(InstanceSlot::new());
    let first = Router::with_slot(&slot, AppOptions::default(), Arc::new(MemoryHost::default())).unwrap();

    let second = Router::with_slot(&slot, AppOptions::default(), Arc::new(MemoryHost::default()));
    assert!(matches!(second, Err(RouterError::AlreadyConstructed)));

    // Clones share the claim; dropping every handle frees it
    let clone = first.clone();
    drop(first);
    assert!(slot.is_taken());
    drop(clone);
    assert!(Router::with_slot(&slot, AppOptions::default(), Arc::new(MemoryHost::default())).is_ok());
}

#[test]
fn test_global_router_is_singleton() {
    let first = Router::new(AppOptions::default(), Arc::new(MemoryHost::default())).unwrap();
    let second = Router::new(AppOptions::default(), Arc::new(MemoryHost::default()));
    assert!(matches!(second, Err(RouterError::AlreadyConstructed)));
    drop(first);
}
