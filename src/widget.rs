//! The slides widget: URL resolution, fullscreen control and view in one unit

use log::debug;

use crate::fullscreen::{FullscreenController, ToggleOutcome};
use crate::platform::{
    EventKind, EventSource, RequestTicket, Scheduler, Subscription, Task, TaskHandle,
    ViewportController,
};
use crate::render::{
    self, FrameView, PlaceholderView, ToggleControl, View, BASE_CLASSES, DEFAULT_FRAME_TITLE,
    FULLSCREEN_CLASSES, INVALID_URL_TEXT, PLACEHOLDER_CLASSES,
};
use crate::resolver::{self, PresentationRef};
use crate::{EmbedConfig, Result};

/// One embedded presentation with its fullscreen toggle.
///
/// The widget is inert until [`mount`](Self::mount)ed: browser events are
/// only observed through the subscriptions taken there, and
/// [`unmount`](Self::unmount) releases them together with any simulated
/// fullscreen styling.
pub struct SlidesWidget<V, S> {
    config: EmbedConfig,
    presentation: Option<PresentationRef>,
    embed_url: String,
    controller: FullscreenController<V, S>,
    subscriptions: Vec<Subscription>,
}

impl<V: ViewportController, S: Scheduler> SlidesWidget<V, S> {
    pub fn new(config: EmbedConfig, viewport: V, scheduler: S) -> Result<Self> {
        config.validate()?;
        let controller = FullscreenController::new(viewport, scheduler, config.fullscreen.clone());
        let mut widget = Self {
            config,
            presentation: None,
            embed_url: String::new(),
            controller,
            subscriptions: Vec::new(),
        };
        widget.resolve();
        Ok(widget)
    }

    pub fn config(&self) -> &EmbedConfig {
        &self.config
    }

    /// Point the widget at a different presentation.
    ///
    /// Fullscreen carries over to a recognized URL. An unrecognized one shows
    /// the placeholder, which has no toggle, so fullscreen is left first.
    /// Returns whether the new URL was recognized.
    pub fn set_url(&mut self, url: impl Into<String>) -> bool {
        let url = url.into();
        if url != self.config.url {
            self.config.url = url;
            self.resolve();
        }
        if self.presentation.is_none() {
            self.controller.reset();
            if self.controller.viewport().fullscreen_element_active() {
                self.controller.viewport_mut().exit_fullscreen();
            }
        }
        self.presentation.is_some()
    }

    pub fn presentation(&self) -> Option<&PresentationRef> {
        self.presentation.as_ref()
    }

    /// Embed URL, or the empty string when the configured URL is invalid
    pub fn embed_url(&self) -> &str {
        &self.embed_url
    }

    pub fn controller(&self) -> &FullscreenController<V, S> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut FullscreenController<V, S> {
        &mut self.controller
    }

    pub fn is_fullscreen(&self) -> bool {
        self.controller.is_fullscreen()
    }

    /// Subscribe to fullscreen, orientation and resize events.
    ///
    /// Mounting an already mounted widget is a no-op, so listeners are never
    /// registered twice.
    pub fn mount(&mut self, source: &dyn EventSource) {
        if self.is_mounted() {
            debug!("widget already mounted");
            return;
        }
        self.subscriptions = EventKind::ALL.iter().map(|kind| source.subscribe(*kind)).collect();
    }

    /// Release all subscriptions and leave simulated fullscreen
    pub fn unmount(&mut self) {
        self.subscriptions.clear();
        self.controller.reset();
    }

    pub fn is_mounted(&self) -> bool {
        !self.subscriptions.is_empty()
    }

    /// Deliver a browser event. Events the widget is not subscribed to are
    /// dropped; returns whether the event was handled.
    pub fn handle_event(&mut self, kind: EventKind) -> bool {
        if !self.subscriptions.iter().any(|s| s.kind() == kind) {
            debug!("ignoring {} while unsubscribed", kind.dom_name());
            return false;
        }
        self.controller.handle_event(kind);
        true
    }

    /// The toggle control's action
    pub fn toggle_fullscreen(&mut self) -> ToggleOutcome {
        if self.presentation.is_none() {
            // the placeholder has no frame to make fullscreen
            return ToggleOutcome::NoContainer;
        }
        self.controller.toggle()
    }

    pub fn on_fullscreen_rejected(&mut self, ticket: RequestTicket, reason: &str) -> bool {
        self.controller.on_request_rejected(ticket, reason)
    }

    pub fn run_task(&mut self, handle: TaskHandle, task: Task) -> bool {
        self.controller.run_task(handle, task)
    }

    pub fn view(&self) -> View {
        let consumer = self.config.class.as_deref().unwrap_or("");
        let attributes = self.config.attributes.clone();
        if self.embed_url.is_empty() {
            return View::Placeholder(PlaceholderView {
                class: render::merge_classes([BASE_CLASSES, PLACEHOLDER_CLASSES, consumer]),
                attributes,
                text: INVALID_URL_TEXT,
            });
        }

        let fullscreen = self.is_fullscreen();
        let fullscreen_classes = if fullscreen { FULLSCREEN_CLASSES } else { "" };
        View::Frame(FrameView {
            class: render::merge_classes([BASE_CLASSES, fullscreen_classes, consumer]),
            attributes,
            src: self.embed_url.clone(),
            title: self.config.title.clone().unwrap_or_else(|| DEFAULT_FRAME_TITLE.to_string()),
            fullscreen,
            toggle: ToggleControl::for_state(fullscreen),
        })
    }

    pub fn render_html(&self) -> String {
        render::to_html(&self.view())
    }

    fn resolve(&mut self) {
        self.presentation = resolver::resolve(&self.config.url);
        if self.presentation.is_none() {
            log::warn!("Invalid Google Slides URL: {:?}", self.config.url);
        }
        self.embed_url = resolver::embed_url(self.presentation.as_ref());
    }
}
