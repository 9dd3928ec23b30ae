//! Browser backend over `web-sys`
//!
//! Mounts a widget into a host element of the current document. Browser
//! callbacks (event listeners, timers, animation frames, the fullscreen
//! request promise) reach the widget through a weak [`WidgetLink`], so the
//! widget is dropped as soon as its [`SlidesHandle`] is.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use gloo::events::EventListener;
use gloo::render::{request_animation_frame, AnimationFrame};
use gloo::timers::callback::Timeout;
use js_sys::{Function, Promise, Reflect};
use log::{debug, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Document, Element, Event, HtmlElement, Window};

use crate::platform::{
    EventKind, EventSource, RequestStatus, RequestTicket, RootStyle, Scheduler, Subscription,
    Task, TaskHandle, ViewportController, When,
};
use crate::render::{View, ROOT_MARKER, TOGGLE_MARKER};
use crate::{EmbedConfig, Error, Result, SlidesWidget, ToggleOutcome};

pub type WebWidget = SlidesWidget<WebViewport, WebScheduler>;

const REQUEST_METHODS: [&str; 2] = ["requestFullscreen", "webkitRequestFullscreen"];

/// Late-bound weak reference from browser callbacks to the widget
#[derive(Clone, Default)]
struct WidgetLink(Rc<RefCell<Weak<RefCell<WebWidget>>>>);

impl WidgetLink {
    fn bind(&self, widget: &Rc<RefCell<WebWidget>>) {
        *self.0.borrow_mut() = Rc::downgrade(widget);
    }

    /// Run `f` on the widget and sync the DOM afterwards.
    ///
    /// Skipped when the widget is gone or already borrowed; the latter is a
    /// re-entrant dispatch such as the widget's own synthetic resize.
    fn with<R>(&self, f: impl FnOnce(&mut WebWidget) -> R) -> Option<R> {
        let widget = self.0.borrow().upgrade()?;
        let result = match widget.try_borrow_mut() {
            Ok(mut guard) => {
                let result = f(&mut guard);
                sync_dom(&guard);
                Some(result)
            }
            Err(_) => {
                debug!("skipping re-entrant widget callback");
                None
            }
        };
        result
    }
}

fn describe(err: &JsValue) -> String {
    err.as_string()
        .or_else(|| {
            Reflect::get(err, &JsValue::from_str("message"))
                .ok()
                .and_then(|m| m.as_string())
        })
        .unwrap_or_else(|| "fullscreen request failed".to_string())
}

/// [`ViewportController`] over the live document
pub struct WebViewport {
    window: Window,
    document: Document,
    container: Option<Element>,
    link: WidgetLink,
}

impl WebViewport {
    fn new(window: Window, document: Document, link: WidgetLink) -> Self {
        Self { window, document, container: None, link }
    }

    pub fn container(&self) -> Option<&Element> {
        self.container.as_ref()
    }

    fn set_container(&mut self, container: Option<Element>) {
        self.container = container;
    }

    fn request_method(&self) -> Option<(Element, Function)> {
        let container = self.container.clone()?;
        let method = REQUEST_METHODS.iter().find_map(|name| {
            Reflect::get(&container, &JsValue::from_str(name))
                .ok()?
                .dyn_into::<Function>()
                .ok()
        })?;
        Some((container, method))
    }

    fn root(&self) -> Option<HtmlElement> {
        self.document.document_element()?.dyn_into::<HtmlElement>().ok()
    }
}

impl ViewportController for WebViewport {
    fn has_container(&self) -> bool {
        self.container.as_ref().map(|c| c.is_connected()).unwrap_or(false)
    }

    fn fullscreen_element_active(&self) -> bool {
        if self.document.fullscreen_element().is_some() {
            return true;
        }
        Reflect::get(&self.document, &JsValue::from_str("webkitFullscreenElement"))
            .map(|el| !el.is_null() && !el.is_undefined())
            .unwrap_or(false)
    }

    fn fullscreen_supported(&self) -> bool {
        self.request_method().is_some()
    }

    fn request_fullscreen(&mut self, ticket: RequestTicket) -> RequestStatus {
        let Some((container, method)) = self.request_method() else {
            return RequestStatus::Rejected("requestFullscreen is not available".to_string());
        };
        match method.call0(&container) {
            Err(err) => RequestStatus::Rejected(describe(&err)),
            Ok(value) => {
                // older WebKit returns undefined instead of a promise
                if let Ok(promise) = value.dyn_into::<Promise>() {
                    let link = self.link.clone();
                    spawn_local(async move {
                        if let Err(err) = JsFuture::from(promise).await {
                            let reason = describe(&err);
                            if link.with(|w| w.on_fullscreen_rejected(ticket, &reason)) == Some(true) {
                                debug!("simulating fullscreen: {}", Error::FullscreenRejected(reason));
                            }
                        }
                    });
                }
                RequestStatus::Pending
            }
        }
    }

    fn exit_fullscreen(&mut self) {
        if self.document.fullscreen_element().is_some() {
            self.document.exit_fullscreen();
            return;
        }
        if let Ok(method) = Reflect::get(&self.document, &JsValue::from_str("webkitExitFullscreen"))
            .and_then(|m| m.dyn_into::<Function>())
        {
            if let Err(err) = method.call0(&self.document) {
                warn!("webkitExitFullscreen failed: {}", describe(&err));
            }
        }
    }

    fn root_style(&self) -> RootStyle {
        let Some(root) = self.root() else {
            return RootStyle::default();
        };
        let style = root.style();
        let get = |name: &str| style.get_property_value(name).unwrap_or_default();
        RootStyle {
            overflow: get("overflow"),
            overflow_x: get("overflow-x"),
            overflow_y: get("overflow-y"),
            position: get("position"),
            width: get("width"),
            height: get("height"),
        }
    }

    fn set_root_style(&mut self, root_style: &RootStyle) {
        let Some(root) = self.root() else {
            return;
        };
        let style = root.style();
        // the shorthand goes first so the longhands written after it win
        let properties = [
            ("overflow", &root_style.overflow),
            ("overflow-x", &root_style.overflow_x),
            ("overflow-y", &root_style.overflow_y),
            ("position", &root_style.position),
            ("width", &root_style.width),
            ("height", &root_style.height),
        ];
        for (name, value) in properties {
            let res = if value.is_empty() {
                style.remove_property(name).map(|_| ())
            } else {
                style.set_property(name, value)
            };
            if let Err(err) = res {
                warn!("failed to set root {}: {}", name, describe(&err));
            }
        }
    }

    fn notify_resize(&mut self) {
        // delivered synchronously; WidgetLink skips it for this widget
        match Event::new("resize") {
            Ok(event) => {
                let _ = self.window.dispatch_event(&event);
            }
            Err(err) => warn!("failed to create resize event: {}", describe(&err)),
        }
    }

    fn hide_chrome(&mut self) {
        self.window.scroll_to_with_x_and_y(0.0, 1.0);
    }
}

enum Pending {
    Timer(Timeout),
    Frame(AnimationFrame),
}

/// [`Scheduler`] over `setTimeout` and `requestAnimationFrame`
pub struct WebScheduler {
    next_id: u64,
    pending: HashMap<TaskHandle, Pending>,
    // handles whose callbacks already ran; pruned outside of those callbacks
    fired: Rc<RefCell<Vec<TaskHandle>>>,
    link: WidgetLink,
}

impl WebScheduler {
    fn new(link: WidgetLink) -> Self {
        Self { next_id: 0, pending: HashMap::new(), fired: Rc::default(), link }
    }

    fn prune(&mut self) {
        let fired: Vec<TaskHandle> = self.fired.borrow_mut().drain(..).collect();
        for handle in fired {
            self.pending.remove(&handle);
        }
    }
}

impl Scheduler for WebScheduler {
    fn schedule(&mut self, when: When, task: Task) -> TaskHandle {
        self.prune();
        self.next_id += 1;
        let handle = TaskHandle::new(self.next_id);
        let link = self.link.clone();
        let fired = Rc::clone(&self.fired);
        let run = move || {
            fired.borrow_mut().push(handle);
            link.with(|w| w.run_task(handle, task));
        };
        let pending = match when {
            When::NextFrame => Pending::Frame(request_animation_frame(move |_| run())),
            When::After(delay) => {
                let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
                Pending::Timer(Timeout::new(millis, run))
            }
        };
        self.pending.insert(handle, pending);
        handle
    }

    fn cancel(&mut self, handle: TaskHandle) {
        self.prune();
        // dropping a gloo Timeout or AnimationFrame cancels it
        self.pending.remove(&handle);
    }
}

/// [`EventSource`] over `window` and `document` listeners
pub struct WebEvents {
    window: Window,
    document: Document,
    link: WidgetLink,
}

impl EventSource for WebEvents {
    fn subscribe(&self, kind: EventKind) -> Subscription {
        let names: &[&'static str] = match kind {
            EventKind::FullscreenChange => &["fullscreenchange", "webkitfullscreenchange"],
            EventKind::OrientationChange => &["orientationchange"],
            EventKind::Resize => &["resize"],
        };
        let listeners: Vec<EventListener> = names
            .iter()
            .map(|name| {
                let link = self.link.clone();
                let callback = move |_: &Event| {
                    link.with(|w| w.handle_event(kind));
                };
                match kind {
                    EventKind::FullscreenChange => EventListener::new(&self.document, *name, callback),
                    _ => EventListener::new(&self.window, *name, callback),
                }
            })
            .collect();
        Subscription::new(kind, move || drop(listeners))
    }
}

/// Patch the mounted markup to the widget's current view without touching
/// the iframe, which would reload the presentation.
fn sync_dom(widget: &WebWidget) {
    let View::Frame(frame) = widget.view() else {
        return;
    };
    let Some(container) = widget.controller().viewport().container() else {
        return;
    };
    container.set_class_name(&frame.class);
    let _ = container.set_attribute("data-fullscreen", if frame.fullscreen { "true" } else { "false" });

    let selector = format!("[{}]", TOGGLE_MARKER);
    if let Ok(Some(button)) = container.query_selector(&selector) {
        let label = frame.toggle.label;
        let _ = button.set_attribute("aria-label", label);
        let _ = button.set_attribute("title", label);
        let _ = button.set_attribute("aria-pressed", if frame.toggle.pressed { "true" } else { "false" });
        // the icon is the button's only child
        button.set_inner_html(&frame.toggle.icon.svg());
    }
}

/// A widget mounted into a host element
#[wasm_bindgen]
pub struct SlidesHandle {
    host: Element,
    widget: Rc<RefCell<WebWidget>>,
    link: WidgetLink,
    events: WebEvents,
    click: Option<EventListener>,
}

impl SlidesHandle {
    /// Write the widget markup into the host, wire the toggle button and
    /// subscribe to browser events if not already subscribed
    fn attach(&mut self) {
        let mut widget = self.widget.borrow_mut();
        self.host.set_inner_html(&widget.render_html());
        let container = self
            .host
            .query_selector(&format!("[{}]", ROOT_MARKER))
            .ok()
            .flatten();
        widget.controller_mut().viewport_mut().set_container(container.clone());

        self.click = container
            .and_then(|c| c.query_selector(&format!("[{}]", TOGGLE_MARKER)).ok().flatten())
            .map(|button| {
                let link = self.link.clone();
                EventListener::new(&button, "click", move |_| {
                    if let Some(ToggleOutcome::EnteredSimulated(fallback)) = link.with(|w| w.toggle_fullscreen()) {
                        debug!("simulating fullscreen: {}", Error::from(fallback));
                    }
                })
            });
        widget.mount(&self.events);
    }
}

#[wasm_bindgen]
impl SlidesHandle {
    #[wasm_bindgen(js_name = isFullscreen)]
    pub fn is_fullscreen(&self) -> bool {
        self.widget.borrow().is_fullscreen()
    }

    #[wasm_bindgen(js_name = embedUrl)]
    pub fn embed_url(&self) -> String {
        self.widget.borrow().embed_url().to_string()
    }

    pub fn toggle(&self) {
        self.link.with(|w| w.toggle_fullscreen());
    }

    /// Switch presentations; the markup is rebuilt and an unmounted handle is
    /// mounted again. Returns whether the URL was recognized.
    #[wasm_bindgen(js_name = setUrl)]
    pub fn set_url(&mut self, url: String) -> bool {
        let recognized = {
            let mut widget = self.widget.borrow_mut();
            widget.controller_mut().reset();
            widget.set_url(url)
        };
        self.attach();
        recognized
    }

    /// Remove listeners, restore the page style and clear the host
    pub fn unmount(&mut self) {
        self.click = None;
        self.widget.borrow_mut().unmount();
        self.host.set_inner_html("");
    }
}

/// Mount a widget into `host`, replacing its content
pub fn mount_into(host: &Element, config: EmbedConfig) -> Result<SlidesHandle> {
    let window = web_sys::window().ok_or_else(|| Error::RenderError("no window".to_string()))?;
    let document = window
        .document()
        .ok_or_else(|| Error::RenderError("no document".to_string()))?;

    let link = WidgetLink::default();
    let viewport = WebViewport::new(window.clone(), document.clone(), link.clone());
    let scheduler = WebScheduler::new(link.clone());
    let widget = Rc::new(RefCell::new(SlidesWidget::new(config, viewport, scheduler)?));
    link.bind(&widget);

    let events = WebEvents { window, document, link: link.clone() };
    let mut handle = SlidesHandle { host: host.clone(), widget, link, events, click: None };
    handle.attach();
    Ok(handle)
}

/// JavaScript entry point: `mountSlides(element, url, className?)`
#[wasm_bindgen(js_name = mountSlides)]
pub fn mount_slides(host: Element, url: String, class: Option<String>) -> std::result::Result<SlidesHandle, JsValue> {
    let mut config = EmbedConfig::new(url);
    config.class = class;
    mount_into(&host, config).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// JavaScript entry point taking a JSON configuration
#[wasm_bindgen(js_name = mountSlidesWithConfig)]
pub fn mount_slides_with_config(host: Element, config_json: &str) -> std::result::Result<SlidesHandle, JsValue> {
    let config = EmbedConfig::from_json(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    mount_into(&host, config).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}
