//! slideframe
//!
//! An embeddable Google Slides viewer with a fullscreen toggle that keeps
//! working where the platform fullscreen API does not (mobile Safari refuses
//! it for iframes' containers, some embedded browsers lack it entirely).
//!
//! # Features
//!
//! - **URL resolution**: regular and "publish to web" links become a fixed,
//!   non-autoplaying embed URL
//! - **Fullscreen fallback**: platform fullscreen when allowed, simulated
//!   fullscreen otherwise, with mobile chrome hiding and orientation resync
//! - **Pluggable platform**: the browser is reached through small traits, with
//!   an in-memory backend for tests and a `web` backend for wasm32
//!
//! # Example
//!
//! ```
//! use slideframe::headless::{FullscreenSupport, HeadlessEvents, HeadlessViewport, ManualScheduler};
//! use slideframe::{EmbedConfig, SlidesWidget};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = EmbedConfig::new("https://docs.google.com/presentation/d/1AbC_23-xyz/edit");
//! let mut widget = SlidesWidget::new(
//!     config,
//!     HeadlessViewport::new(FullscreenSupport::RejectSync),
//!     ManualScheduler::new(),
//! )?;
//! widget.mount(&HeadlessEvents::new());
//!
//! widget.toggle_fullscreen();
//! assert!(widget.is_fullscreen());
//! assert!(widget.render_html().contains("Exit fullscreen"));
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub mod error;
pub use error::{Error, Result};

pub mod fullscreen;
pub mod headless;
pub mod platform;
pub mod render;
pub mod resolver;
pub mod widget;

// Browser backend over web-sys; only meaningful on wasm32
#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub mod web;

pub use fullscreen::{FullscreenController, FullscreenOptions, FullscreenState, ToggleOutcome};
pub use render::View;
pub use resolver::{resolve, PresentationRef};
pub use widget::SlidesWidget;

/// Attribute names consumers may put on the widget container besides the
/// `data-*` and `aria-*` families
const PLAIN_ATTRIBUTES: [&str; 4] = ["id", "role", "style", "title"];

/// Configuration for one widget instance
///
/// `url` is required when deserializing; everything else has a default.
///
/// # Examples
///
/// ```
/// let cfg: slideframe::EmbedConfig = serde_json::from_str(
///     r#"{"url": "https://docs.google.com/presentation/d/abc/edit", "class": "rounded"}"#,
/// ).unwrap();
/// assert_eq!(cfg.class.as_deref(), Some("rounded"));
/// assert!(cfg.fullscreen.hide_chrome);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmbedConfig {
    /// Google Slides presentation URL as the user supplied it
    pub url: String,
    /// Extra classes appended after the widget's own
    #[serde(default)]
    pub class: Option<String>,
    /// Accessible title for the embedded frame
    #[serde(default)]
    pub title: Option<String>,
    /// Extra attributes for the container element (`data-*`, `aria-*`,
    /// `id`, `role`, `style`, `title`), used to integrate with UI libraries
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    /// Simulated fullscreen tuning
    #[serde(default)]
    pub fullscreen: FullscreenOptions,
}

impl EmbedConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into(), ..Default::default() }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_fullscreen(mut self, options: FullscreenOptions) -> Self {
        self.fullscreen = options;
        self
    }

    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let config: EmbedConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the container attributes. The URL is not validated here: an
    /// unrecognized URL is a runtime state rendered as a placeholder.
    pub fn validate(&self) -> Result<()> {
        for name in self.attributes.keys() {
            if !is_allowed_attribute(name) {
                return Err(Error::ConfigError(format!("attribute {:?} is not allowed on the widget container", name)));
            }
        }
        Ok(())
    }
}

fn is_allowed_attribute(name: &str) -> bool {
    if PLAIN_ATTRIBUTES.contains(&name) {
        return true;
    }
    let suffix = name.strip_prefix("data-").or_else(|| name.strip_prefix("aria-"));
    match suffix {
        Some(rest) => {
            !rest.is_empty()
                && rest.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
                // reserved for the widget's own markers
                && !name.starts_with("data-slideframe")
                && name != "data-fullscreen"
        }
        None => false,
    }
}
