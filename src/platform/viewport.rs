//! Viewport control surface the fullscreen controller drives

use serde::{Deserialize, Serialize};

/// Inline style of the page root that simulated fullscreen takes over.
///
/// Empty strings mean "not set inline", which is the state a fresh page is in.
/// The overflow longhands are kept beside the shorthand: a page may set only
/// one axis inline, which reads back as an empty shorthand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootStyle {
    pub overflow: String,
    pub overflow_x: String,
    pub overflow_y: String,
    pub position: String,
    pub width: String,
    pub height: String,
}

impl RootStyle {
    pub fn is_empty(&self) -> bool {
        self.overflow.is_empty()
            && self.overflow_x.is_empty()
            && self.overflow_y.is_empty()
            && self.position.is_empty()
            && self.width.is_empty()
            && self.height.is_empty()
    }

    /// Same style with page scrolling suppressed
    pub fn with_scroll_suppressed(mut self) -> Self {
        self.overflow = "hidden".to_string();
        self.overflow_x = "hidden".to_string();
        self.overflow_y = "hidden".to_string();
        self
    }

    /// Same style pinned to the full viewport, which keeps mobile browser
    /// chrome from sliding back in while the page is "scrolled"
    pub fn pinned(mut self) -> Self {
        self.position = "fixed".to_string();
        self.width = "100%".to_string();
        self.height = "100%".to_string();
        self
    }
}

/// Identifies one platform fullscreen request so late rejections can be
/// matched against the request that is still current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn new(id: u64) -> Self {
        RequestTicket(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Immediate outcome of asking the platform for fullscreen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestStatus {
    /// Submitted; success arrives as a fullscreen-change event and failure
    /// through `FullscreenController::on_request_rejected`
    Pending,
    /// Refused synchronously
    Rejected(String),
}

/// Browser operations needed by the fullscreen controller.
///
/// Implementations wrap a real document (see the `web` backend) or an
/// in-memory model (see [`crate::headless::HeadlessViewport`]).
pub trait ViewportController {
    /// Whether the element that should go fullscreen exists
    fn has_container(&self) -> bool;

    /// Whether the platform currently reports a fullscreen element
    fn fullscreen_element_active(&self) -> bool;

    /// Whether the container exposes a fullscreen request method at all
    fn fullscreen_supported(&self) -> bool;

    /// Ask the platform to put the container in fullscreen
    fn request_fullscreen(&mut self, ticket: RequestTicket) -> RequestStatus;

    /// Ask the platform to leave fullscreen
    fn exit_fullscreen(&mut self);

    fn root_style(&self) -> RootStyle;

    fn set_root_style(&mut self, style: &RootStyle);

    /// Dispatch a synthetic resize so embedded content re-measures itself.
    ///
    /// The synthetic event must not be delivered back to the widget's own
    /// resize subscription.
    fn notify_resize(&mut self);

    /// Nudge the scroll position so mobile browsers collapse their address bar
    fn hide_chrome(&mut self);
}
