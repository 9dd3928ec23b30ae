//! Fullscreen control with a simulated fallback
//!
//! The controller prefers the platform fullscreen API. When the container
//! has no request method, or the platform refuses the request (common on
//! mobile Safari), it emulates fullscreen by taking over the page root style,
//! re-laying out the embedded frame after the next render pass and nudging
//! the scroll position so mobile browsers hide their address bar.

mod controller;
mod state;

pub use controller::{Fallback, FullscreenController, ToggleOutcome};
pub use state::{FullscreenMode, FullscreenState};

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tuning for simulated fullscreen
///
/// The default is the full profile used on mobile; [`FullscreenOptions::minimal`]
/// only suppresses scrolling and re-lays out the frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FullscreenOptions {
    /// Pin the page root to fixed positioning at full viewport size
    pub pin_viewport: bool,
    /// Nudge the scroll position to collapse mobile browser chrome
    pub hide_chrome: bool,
    /// Delay before the second chrome-hiding nudge
    pub chrome_retry_ms: u64,
    /// Delay after an orientation change before re-measuring
    pub orientation_settle_ms: u64,
    /// Treat window resizes like orientation changes
    pub resize_as_orientation: bool,
}

impl Default for FullscreenOptions {
    fn default() -> Self {
        Self {
            pin_viewport: true,
            hide_chrome: true,
            chrome_retry_ms: 100,
            orientation_settle_ms: 300,
            resize_as_orientation: true,
        }
    }
}

impl FullscreenOptions {
    pub fn minimal() -> Self {
        Self {
            pin_viewport: false,
            hide_chrome: false,
            resize_as_orientation: false,
            ..Self::default()
        }
    }

    pub fn chrome_retry(&self) -> Duration {
        Duration::from_millis(self.chrome_retry_ms)
    }

    pub fn orientation_settle(&self) -> Duration {
        Duration::from_millis(self.orientation_settle_ms)
    }
}
