// File: src/options.rs
// Purpose: Router options and the serializable configuration they can be loaded from

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::error::RouterError;

/// Attribute marking in-page navigation links when none is configured
pub const DEFAULT_LINK_ATTRIBUTE: &str = "goto";

/// Maps a dispatch failure to the HTML rendered in its place
pub type ErrorTemplate = Arc<dyn Fn(&RouterError) -> String + Send + Sync>;

/// Post-processes final HTML before it reaches the render surface
pub type Sanitizer = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Options fixed at router construction
#[derive(Clone)]
pub struct AppOptions {
    /// Route on the location fragment instead of the path
    pub hash: bool,

    /// Rendered when no route produces a page
    pub default: Option<String>,

    /// Rendered when a matched route fails
    pub error: Option<ErrorTemplate>,

    /// Attribute whose value is the target of an in-page link
    pub attribute: String,

    /// Applied to route output before rendering
    pub sanitizer: Option<Sanitizer>,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            hash: false,
            default: None,
            error: None,
            attribute: DEFAULT_LINK_ATTRIBUTE.to_string(),
            sanitizer: None,
        }
    }
}

impl fmt::Debug for AppOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppOptions")
            .field("hash", &self.hash)
            .field("default", &self.default)
            .field("error", &self.error.is_some())
            .field("attribute", &self.attribute)
            .field("sanitizer", &self.sanitizer.is_some())
            .finish()
    }
}

impl AppOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hash(mut self, hash: bool) -> Self {
        self.hash = hash;
        self
    }

    pub fn with_default(mut self, template: impl Into<String>) -> Self {
        self.default = Some(template.into());
        self
    }

    /// Sets the error template
    ///
    /// ```
    /// use pathway_router::AppOptions;
    ///
    /// let options = AppOptions::new().with_error(|err| format!("<p>{}</p>", err));
    /// assert!(options.error.is_some());
    /// ```
    pub fn with_error<F>(mut self, error: F) -> Self
    where
        F: Fn(&RouterError) -> String + Send + Sync + 'static,
    {
        self.error = Some(Arc::new(error));
        self
    }

    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = attribute.into();
        self
    }

    pub fn with_sanitizer<F>(mut self, sanitizer: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.sanitizer = Some(Arc::new(sanitizer));
        self
    }
}

/// The serializable subset of [`AppOptions`], read from `pathway.toml`
///
/// ```
/// use pathway_router::RouterConfig;
///
/// let config = RouterConfig::from_toml_str("hash = true\ndefault = \"404\"").unwrap();
/// assert!(config.hash);
/// assert_eq!(config.attribute, "goto");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouterConfig {
    #[serde(default)]
    pub hash: bool,

    #[serde(default)]
    pub default: Option<String>,

    #[serde(default = "default_attribute")]
    pub attribute: String,
}

fn default_attribute() -> String {
    DEFAULT_LINK_ATTRIBUTE.to_string()
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            hash: false,
            default: None,
            attribute: default_attribute(),
        }
    }
}

impl RouterConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse router config")
    }

    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        Self::from_toml_str(&content)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn into_options(self) -> AppOptions {
        AppOptions {
            hash: self.hash,
            default: self.default,
            attribute: self.attribute,
            ..AppOptions::default()
        }
    }
}

impl From<RouterConfig> for AppOptions {
    fn from(config: RouterConfig) -> Self {
        config.into_options()
    }
}
