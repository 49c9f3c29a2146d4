//! Host collaborators
//!
//! The router never touches a browser directly. It reads and writes the
//! location, subscribes to navigation changes and swaps rendered markup
//! through these traits. [`memory::MemoryHost`] implements all of them in
//! process for tests and the CLI.

pub mod memory;

use std::sync::Arc;

use crate::BoxFuture;

pub use memory::MemoryHost;

/// Which navigation notification to listen for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavigationKind {
    /// The location fragment changed (hash routing)
    FragmentChange,
    /// The user moved back/forward through history (path routing)
    HistoryPop,
}

/// Invoked after each navigation change
pub type NavigationListener = Arc<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>;

/// Invoked with a link's target path when the link is activated
pub type LinkHandler = Arc<dyn Fn(String) -> BoxFuture<'static, ()> + Send + Sync>;

/// Reads and writes the current location
pub trait Location: Send + Sync {
    /// Path part of the location, e.g. `/info/42`
    fn pathname(&self) -> String;

    /// Fragment without the leading `#`
    fn fragment(&self) -> String;

    /// Query string including its leading `?`, or empty
    fn search(&self) -> String;

    /// Full URL
    fn href(&self) -> String;

    /// Pushes a new history entry without reloading
    fn push_path(&self, path: &str);

    /// Replaces the fragment
    fn set_fragment(&self, fragment: &str);
}

/// Delivers navigation-change notifications
pub trait NavigationNotifier: Send + Sync {
    fn subscribe(&self, kind: NavigationKind, listener: NavigationListener);
}

/// Where rendered markup ends up
pub trait RenderSurface: Send + Sync {
    /// Clears previously rendered content and installs `html` in one step.
    /// Bindings attached to the old content are gone afterwards.
    fn replace(&self, html: &str) -> anyhow::Result<()>;

    /// Attaches `handler` to every element carrying `attribute`, returning how many were bound
    fn bind_links(&self, attribute: &str, handler: LinkHandler) -> usize;
}

/// Everything the router needs from its environment
pub trait Host: Location + NavigationNotifier + RenderSurface {}

impl<T: Location + NavigationNotifier + RenderSurface> Host for T {}
