//! Two-flag fullscreen state

use serde::Serialize;

/// Platform and simulated fullscreen flags.
///
/// The flags are independent: external events may set either one at any
/// time, and the widget counts as fullscreen while at least one is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FullscreenState {
    /// The browser reports a fullscreen element
    pub platform: bool,
    /// The widget is emulating fullscreen with page styling
    pub simulated: bool,
}

/// Which mechanism currently holds the viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FullscreenMode {
    Off,
    Platform,
    Simulated,
    /// Both at once, e.g. platform fullscreen entered from outside the widget
    /// while simulated fullscreen was active. Toggling exits platform first.
    Both,
}

impl FullscreenState {
    pub fn is_fullscreen(&self) -> bool {
        self.platform || self.simulated
    }

    pub fn mode(&self) -> FullscreenMode {
        match (self.platform, self.simulated) {
            (false, false) => FullscreenMode::Off,
            (true, false) => FullscreenMode::Platform,
            (false, true) => FullscreenMode::Simulated,
            (true, true) => FullscreenMode::Both,
        }
    }
}
