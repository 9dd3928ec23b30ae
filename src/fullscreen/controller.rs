use log::debug;

use super::{FullscreenOptions, FullscreenState};
use crate::error::Error;
use crate::platform::{
    EventKind, RequestStatus, RequestTicket, RootStyle, Scheduler, Task, TaskHandle, TaskKind,
    ViewportController, When,
};

/// What a toggle did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// No container to make fullscreen; nothing happened
    NoContainer,
    /// Asked the platform to leave fullscreen; the change event will follow
    ExitRequested,
    /// Left simulated fullscreen
    ExitedSimulated,
    /// Platform request submitted and awaiting the browser
    Requested(RequestTicket),
    /// Entered simulated fullscreen instead of platform fullscreen
    EnteredSimulated(Fallback),
}

/// Why simulated fullscreen was used
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fallback {
    /// The container has no fullscreen request method
    Unsupported,
    /// The platform refused the request
    Rejected(String),
}

impl From<Fallback> for Error {
    fn from(fallback: Fallback) -> Self {
        match fallback {
            Fallback::Unsupported => Error::FullscreenRejected("fullscreen API unavailable".to_string()),
            Fallback::Rejected(reason) => Error::FullscreenRejected(reason),
        }
    }
}

/// Page root style held while simulated fullscreen is active.
///
/// Acquire and release form a strict pair; releasing restores the exact
/// style that was in place before acquisition.
#[derive(Debug)]
struct StyleLease {
    original: RootStyle,
}

impl StyleLease {
    fn acquire<V: ViewportController>(viewport: &mut V, pin: bool) -> Self {
        let original = viewport.root_style();
        let mut applied = original.clone().with_scroll_suppressed();
        if pin {
            applied = applied.pinned();
        }
        viewport.set_root_style(&applied);
        StyleLease { original }
    }

    fn release<V: ViewportController>(self, viewport: &mut V) {
        viewport.set_root_style(&self.original);
    }
}

/// Fullscreen state machine over an injected viewport and scheduler.
///
/// Every input is a method call: [`toggle`](Self::toggle) for the user
/// action, [`handle_event`](Self::handle_event) for subscribed browser events,
/// [`on_request_rejected`](Self::on_request_rejected) for a deferred platform
/// refusal and [`run_task`](Self::run_task) for scheduled work coming due.
pub struct FullscreenController<V, S> {
    viewport: V,
    scheduler: S,
    options: FullscreenOptions,
    state: FullscreenState,
    // bumped on every simulated enter/exit; tasks from older generations are inert
    generation: u64,
    tickets: u64,
    pending_request: Option<RequestTicket>,
    lease: Option<StyleLease>,
    tasks: Vec<TaskHandle>,
    resettle: Option<TaskHandle>,
}

impl<V: ViewportController, S: Scheduler> FullscreenController<V, S> {
    pub fn new(viewport: V, scheduler: S, options: FullscreenOptions) -> Self {
        Self {
            viewport,
            scheduler,
            options,
            state: FullscreenState::default(),
            generation: 0,
            tickets: 0,
            pending_request: None,
            lease: None,
            tasks: Vec::new(),
            resettle: None,
        }
    }

    pub fn state(&self) -> FullscreenState {
        self.state
    }

    pub fn is_fullscreen(&self) -> bool {
        self.state.is_fullscreen()
    }

    pub fn options(&self) -> &FullscreenOptions {
        &self.options
    }

    pub fn viewport(&self) -> &V {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut V {
        &mut self.viewport
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Number of scheduled tasks this controller still considers live
    pub fn pending_tasks(&self) -> usize {
        self.tasks.len()
    }

    /// The user-facing fullscreen toggle.
    ///
    /// Exit priority is platform first, then simulated. Entering prefers the
    /// platform API and falls back to simulated fullscreen when the request
    /// method is missing or refused.
    pub fn toggle(&mut self) -> ToggleOutcome {
        if !self.viewport.has_container() {
            debug!("fullscreen toggle ignored: no container");
            return ToggleOutcome::NoContainer;
        }

        if self.viewport.fullscreen_element_active() {
            debug!("requesting platform fullscreen exit");
            self.viewport.exit_fullscreen();
            return ToggleOutcome::ExitRequested;
        }

        if self.state.simulated {
            self.exit_simulated();
            return ToggleOutcome::ExitedSimulated;
        }

        if !self.viewport.fullscreen_supported() {
            debug!("platform fullscreen unavailable, simulating");
            self.enter_simulated();
            return ToggleOutcome::EnteredSimulated(Fallback::Unsupported);
        }

        self.tickets += 1;
        let ticket = RequestTicket::new(self.tickets);
        match self.viewport.request_fullscreen(ticket) {
            RequestStatus::Pending => {
                self.pending_request = Some(ticket);
                ToggleOutcome::Requested(ticket)
            }
            RequestStatus::Rejected(reason) => {
                debug!("platform fullscreen rejected ({}), simulating", reason);
                self.enter_simulated();
                ToggleOutcome::EnteredSimulated(Fallback::Rejected(reason))
            }
        }
    }

    /// A platform request was refused after the fact.
    ///
    /// Falls back to simulated fullscreen when `ticket` is still the current
    /// request. Returns whether simulated fullscreen was entered.
    pub fn on_request_rejected(&mut self, ticket: RequestTicket, reason: &str) -> bool {
        if self.pending_request != Some(ticket) {
            debug!("ignoring rejection for superseded request {}", ticket.id());
            return false;
        }
        self.pending_request = None;
        if self.state.simulated || self.viewport.fullscreen_element_active() {
            return false;
        }
        debug!("platform fullscreen rejected ({}), simulating", reason);
        self.enter_simulated();
        true
    }

    /// React to a subscribed browser event
    pub fn handle_event(&mut self, kind: EventKind) {
        match kind {
            EventKind::FullscreenChange => {
                let active = self.viewport.fullscreen_element_active();
                if active {
                    self.pending_request = None;
                }
                if active != self.state.platform {
                    debug!("platform fullscreen {}", if active { "entered" } else { "left" });
                }
                self.state.platform = active;
            }
            EventKind::OrientationChange => self.schedule_resettle(),
            EventKind::Resize => {
                if self.options.resize_as_orientation {
                    self.schedule_resettle();
                }
            }
        }
    }

    /// Run a task handed back by the scheduler. Returns whether it acted.
    pub fn run_task(&mut self, handle: TaskHandle, task: Task) -> bool {
        self.tasks.retain(|h| *h != handle);
        if self.resettle == Some(handle) {
            self.resettle = None;
        }
        if task.generation != self.generation || !self.state.simulated {
            debug!("dropping stale {:?} task", task.kind);
            return false;
        }

        match task.kind {
            TaskKind::Relayout => self.viewport.notify_resize(),
            TaskKind::ChromeRetry => self.viewport.hide_chrome(),
            TaskKind::Resettle => {
                if self.options.hide_chrome {
                    self.viewport.hide_chrome();
                }
                self.viewport.notify_resize();
            }
        }
        true
    }

    /// Drop everything tied to the widget's lifetime: pending work, the
    /// pending request and any simulated fullscreen styling.
    pub fn reset(&mut self) {
        if self.state.simulated {
            self.exit_simulated();
        }
        self.cancel_tasks();
        self.pending_request = None;
    }

    fn enter_simulated(&mut self) {
        if self.state.simulated {
            return;
        }
        self.state.simulated = true;
        self.generation += 1;
        self.lease = Some(StyleLease::acquire(&mut self.viewport, self.options.pin_viewport));

        self.schedule(When::NextFrame, TaskKind::Relayout);
        if self.options.hide_chrome {
            self.viewport.hide_chrome();
            // some browsers bring the chrome straight back after the first nudge
            self.schedule(When::After(self.options.chrome_retry()), TaskKind::ChromeRetry);
        }
        debug!("simulated fullscreen entered");
    }

    fn exit_simulated(&mut self) {
        self.state.simulated = false;
        self.generation += 1;
        self.cancel_tasks();
        if let Some(lease) = self.lease.take() {
            lease.release(&mut self.viewport);
        }
        debug!("simulated fullscreen left");
    }

    fn schedule_resettle(&mut self) {
        if !self.state.simulated {
            return;
        }
        if let Some(previous) = self.resettle.take() {
            self.tasks.retain(|h| *h != previous);
            self.scheduler.cancel(previous);
        }
        let handle = self.schedule(When::After(self.options.orientation_settle()), TaskKind::Resettle);
        self.resettle = Some(handle);
    }

    fn schedule(&mut self, when: When, kind: TaskKind) -> TaskHandle {
        let task = Task { kind, generation: self.generation };
        let handle = self.scheduler.schedule(when, task);
        self.tasks.push(handle);
        handle
    }

    fn cancel_tasks(&mut self) {
        for handle in self.tasks.drain(..) {
            self.scheduler.cancel(handle);
        }
        self.resettle = None;
    }
}
