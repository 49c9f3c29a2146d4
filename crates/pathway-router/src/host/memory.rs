// File: src/host/memory.rs
// Purpose: In-process host with a history stack, a fragment and a text render surface

use regex::Regex;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{LinkHandler, Location, NavigationKind, NavigationListener, NavigationNotifier, RenderSurface};
use crate::path::split_path_query;

const ORIGIN: &str = "http://localhost";

#[derive(Default)]
struct State {
    history: Vec<String>,
    index: usize,
    fragment: String,
    listeners: Vec<(NavigationKind, NavigationListener)>,
    html: String,
    links: Vec<String>,
    handler: Option<LinkHandler>,
    renders: usize,
    fail_renders: bool,
}

/// A host that lives entirely in memory
///
/// Setting the fragment or pushing a path does not fire listeners (the router
/// dispatches on its own after writing the location). [`MemoryHost::back`],
/// [`MemoryHost::forward`] and [`MemoryHost::change_fragment`] simulate user
/// navigation and do fire them.
pub struct MemoryHost {
    state: Mutex<State>,
}

impl MemoryHost {
    /// Starts at `path` (may carry a query string)
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(State {
                history: vec![path.into()],
                ..State::default()
            }),
        }
    }

    /// Starts at `/` with the given fragment
    pub fn with_fragment(fragment: impl Into<String>) -> Self {
        let host = Self::new("/");
        host.lock().fragment = fragment.into().trim_start_matches('#').to_string();
        host
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn current_entry(&self) -> String {
        let state = self.lock();
        state.history.get(state.index).cloned().unwrap_or_else(|| "/".to_string())
    }

    /// Currently rendered markup
    pub fn html(&self) -> String {
        self.lock().html.clone()
    }

    /// Link targets bound after the last render
    pub fn links(&self) -> Vec<String> {
        self.lock().links.clone()
    }

    /// How many times content was replaced
    pub fn render_count(&self) -> usize {
        self.lock().renders
    }

    /// All history entries, oldest first
    pub fn history(&self) -> Vec<String> {
        self.lock().history.clone()
    }

    pub fn listener_count(&self, kind: NavigationKind) -> usize {
        self.lock().listeners.iter().filter(|(k, _)| *k == kind).count()
    }

    /// Makes every subsequent `replace` fail
    pub fn set_fail_renders(&self, fail: bool) {
        self.lock().fail_renders = fail;
    }

    /// Steps back one history entry and notifies `HistoryPop` listeners
    pub async fn back(&self) -> bool {
        let moved = {
            let mut state = self.lock();
            if state.index == 0 {
                false
            } else {
                state.index -= 1;
                true
            }
        };
        if moved {
            self.notify(NavigationKind::HistoryPop).await;
        }
        moved
    }

    /// Steps forward one history entry and notifies `HistoryPop` listeners
    pub async fn forward(&self) -> bool {
        let moved = {
            let mut state = self.lock();
            if state.index + 1 >= state.history.len() {
                false
            } else {
                state.index += 1;
                true
            }
        };
        if moved {
            self.notify(NavigationKind::HistoryPop).await;
        }
        moved
    }

    /// Simulates the user editing the fragment
    pub async fn change_fragment(&self, fragment: &str) {
        self.set_fragment(fragment);
        self.notify(NavigationKind::FragmentChange).await;
    }

    /// Activates the bound link pointing at `target`
    ///
    /// Returns false when no bound link carries that target.
    pub async fn click(&self, target: &str) -> bool {
        let handler = {
            let state = self.lock();
            if !state.links.iter().any(|link| link == target) {
                return false;
            }
            state.handler.clone()
        };
        match handler {
            Some(handler) => {
                handler(target.to_string()).await;
                true
            }
            None => false,
        }
    }

    async fn notify(&self, kind: NavigationKind) {
        // Listeners run without the lock held; they read the location back
        let listeners: Vec<NavigationListener> = self
            .lock()
            .listeners
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, listener)| listener.clone())
            .collect();

        for listener in listeners {
            listener().await;
        }
    }
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Location for MemoryHost {
    fn pathname(&self) -> String {
        let entry = self.current_entry();
        let (path, _) = split_path_query(&entry);
        if path.is_empty() {
            "/".to_string()
        } else {
            path.to_string()
        }
    }

    fn fragment(&self) -> String {
        self.lock().fragment.clone()
    }

    fn search(&self) -> String {
        let entry = self.current_entry();
        let (_, query) = split_path_query(&entry);
        if query.is_empty() {
            String::new()
        } else {
            format!("?{}", query)
        }
    }

    fn href(&self) -> String {
        let fragment = self.fragment();
        let mut href = format!("{}{}{}", ORIGIN, self.pathname(), self.search());
        if !fragment.is_empty() {
            href.push('#');
            href.push_str(&fragment);
        }
        href
    }

    fn push_path(&self, path: &str) {
        let mut state = self.lock();
        // Pushing discards any forward entries
        let keep = state.index + 1;
        state.history.truncate(keep);
        state.history.push(path.to_string());
        state.index = state.history.len() - 1;
    }

    fn set_fragment(&self, fragment: &str) {
        self.lock().fragment = fragment.trim_start_matches('#').to_string();
    }
}

impl NavigationNotifier for MemoryHost {
    fn subscribe(&self, kind: NavigationKind, listener: NavigationListener) {
        self.lock().listeners.push((kind, listener));
    }
}

impl RenderSurface for MemoryHost {
    fn replace(&self, html: &str) -> anyhow::Result<()> {
        let mut state = self.lock();
        if state.fail_renders {
            anyhow::bail!("render surface rejected content");
        }
        state.html = html.to_string();
        state.links.clear();
        state.handler = None;
        state.renders += 1;
        Ok(())
    }

    fn bind_links(&self, attribute: &str, handler: LinkHandler) -> usize {
        let mut state = self.lock();
        let links = scan_links(&state.html, attribute);
        let bound = links.len();
        state.links = links;
        state.handler = Some(handler);
        bound
    }
}

/// Values of `attribute` on every tag in `html`, skipping empty ones
///
/// Values may be double-quoted, single-quoted or bare. Only the first
/// occurrence of `attribute` inside a tag is read.
fn scan_links(html: &str, attribute: &str) -> Vec<String> {
    let pattern = format!(
        r#"<[^>]*?\s{}\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+))"#,
        regex::escape(attribute)
    );
    let Ok(needle) = Regex::new(&pattern) else {
        return Vec::new();
    };

    needle
        .captures_iter(html)
        .filter_map(|caps| {
            caps.get(1)
                .or_else(|| caps.get(2))
                .or_else(|| caps.get(3))
                .map(|v| v.as_str().to_string())
        })
        .filter(|target| !target.is_empty())
        .collect()
}
