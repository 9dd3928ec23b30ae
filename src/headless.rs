//! In-memory platform backend
//!
//! A deterministic model of the browser surface the widget needs: a page root
//! with an inline style, a fullscreen element whose changes are delivered
//! when the host calls `settle`, a virtual clock for timers and render frames,
//! and a listener registry that counts live subscriptions. Used by the test
//! suite and by the CLI `simulate` command.

use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::fullscreen::FullscreenController;
use crate::platform::{
    EventKind, EventSource, RequestStatus, RequestTicket, RootStyle, Scheduler, Subscription,
    Task, TaskHandle, ViewportController, When,
};

/// How the modelled browser answers fullscreen requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FullscreenSupport {
    /// Requests succeed once settled
    Granted,
    /// Requests throw immediately
    RejectSync,
    /// Requests return a promise that rejects once settled (mobile Safari)
    RejectAsync,
    /// No request method on the container
    Unsupported,
}

/// One call made against the viewport, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewportCall {
    RequestFullscreen(RequestTicket),
    ExitFullscreen,
    SetRootStyle(RootStyle),
    NotifyResize,
    HideChrome,
}

/// Deferred platform answer released by [`HeadlessViewport::settle`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformOutcome {
    Entered,
    Exited,
    Rejected(RequestTicket, String),
}

const REJECTION: &str = "NotAllowedError: fullscreen request denied";

/// In-memory [`ViewportController`]
#[derive(Debug, Clone)]
pub struct HeadlessViewport {
    support: FullscreenSupport,
    container: bool,
    fullscreen_element: bool,
    root_style: RootStyle,
    scroll_y: i32,
    journal: Vec<ViewportCall>,
    outcomes: VecDeque<PlatformOutcome>,
}

impl HeadlessViewport {
    pub fn new(support: FullscreenSupport) -> Self {
        Self {
            support,
            container: true,
            fullscreen_element: false,
            root_style: RootStyle::default(),
            scroll_y: 0,
            journal: Vec::new(),
            outcomes: VecDeque::new(),
        }
    }

    pub fn support(&self) -> FullscreenSupport {
        self.support
    }

    pub fn set_container(&mut self, present: bool) {
        self.container = present;
    }

    /// Change the fullscreen element outside of the widget (user gesture,
    /// another script); the host still has to deliver the change event.
    pub fn force_fullscreen_element(&mut self, active: bool) {
        self.fullscreen_element = active;
    }

    pub fn journal(&self) -> &[ViewportCall] {
        &self.journal
    }

    pub fn resize_count(&self) -> usize {
        self.count(|c| matches!(c, ViewportCall::NotifyResize))
    }

    pub fn chrome_nudges(&self) -> usize {
        self.count(|c| matches!(c, ViewportCall::HideChrome))
    }

    pub fn scroll_y(&self) -> i32 {
        self.scroll_y
    }

    /// Whether platform answers are waiting to be delivered
    pub fn has_pending_outcomes(&self) -> bool {
        !self.outcomes.is_empty()
    }

    /// Release deferred platform answers, applying their effect on the
    /// fullscreen element, and return them for delivery to the widget.
    pub fn settle(&mut self) -> Vec<PlatformOutcome> {
        let outcomes: Vec<_> = self.outcomes.drain(..).collect();
        for outcome in &outcomes {
            match outcome {
                PlatformOutcome::Entered => self.fullscreen_element = true,
                PlatformOutcome::Exited => self.fullscreen_element = false,
                PlatformOutcome::Rejected(..) => {}
            }
        }
        outcomes
    }

    fn count(&self, pred: impl Fn(&ViewportCall) -> bool) -> usize {
        self.journal.iter().filter(|c| pred(c)).count()
    }
}

impl Default for HeadlessViewport {
    fn default() -> Self {
        Self::new(FullscreenSupport::Granted)
    }
}

impl ViewportController for HeadlessViewport {
    fn has_container(&self) -> bool {
        self.container
    }

    fn fullscreen_element_active(&self) -> bool {
        self.fullscreen_element
    }

    fn fullscreen_supported(&self) -> bool {
        self.support != FullscreenSupport::Unsupported
    }

    fn request_fullscreen(&mut self, ticket: RequestTicket) -> RequestStatus {
        self.journal.push(ViewportCall::RequestFullscreen(ticket));
        match self.support {
            FullscreenSupport::Granted => {
                self.outcomes.push_back(PlatformOutcome::Entered);
                RequestStatus::Pending
            }
            FullscreenSupport::RejectAsync => {
                self.outcomes.push_back(PlatformOutcome::Rejected(ticket, REJECTION.to_string()));
                RequestStatus::Pending
            }
            FullscreenSupport::RejectSync => RequestStatus::Rejected(REJECTION.to_string()),
            FullscreenSupport::Unsupported => {
                RequestStatus::Rejected("requestFullscreen is not available".to_string())
            }
        }
    }

    fn exit_fullscreen(&mut self) {
        self.journal.push(ViewportCall::ExitFullscreen);
        if self.fullscreen_element {
            self.outcomes.push_back(PlatformOutcome::Exited);
        }
    }

    fn root_style(&self) -> RootStyle {
        self.root_style.clone()
    }

    fn set_root_style(&mut self, style: &RootStyle) {
        self.journal.push(ViewportCall::SetRootStyle(style.clone()));
        self.root_style = style.clone();
    }

    fn notify_resize(&mut self) {
        self.journal.push(ViewportCall::NotifyResize);
    }

    fn hide_chrome(&mut self) {
        self.journal.push(ViewportCall::HideChrome);
        self.scroll_y = 1;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Due {
    Frame,
    At(Duration),
}

/// Scheduler over a virtual clock; nothing runs until the host advances it
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now: Duration,
    next_id: u64,
    queue: BTreeMap<TaskHandle, (Due, Task)>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    /// Tasks scheduled and not yet run or cancelled
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Remove every task waiting for a render frame
    pub fn take_frame(&mut self) -> Vec<(TaskHandle, Task)> {
        let due: Vec<TaskHandle> = self
            .queue
            .iter()
            .filter(|(_, (when, _))| *when == Due::Frame)
            .map(|(h, _)| *h)
            .collect();
        due.into_iter()
            .filter_map(|h| self.queue.remove(&h).map(|(_, task)| (h, task)))
            .collect()
    }

    /// Remove the earliest timer due at or before `until`, moving the clock
    /// to its deadline
    pub fn pop_due(&mut self, until: Duration) -> Option<(TaskHandle, Task)> {
        let (handle, at) = self
            .queue
            .iter()
            .filter_map(|(h, (when, _))| match when {
                Due::At(at) if *at <= until => Some((*h, *at)),
                _ => None,
            })
            .min_by_key(|(h, at)| (*at, *h))?;
        self.now = self.now.max(at);
        self.queue.remove(&handle).map(|(_, task)| (handle, task))
    }

    /// Move the clock forward without running anything
    pub fn set_now(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, when: When, task: Task) -> TaskHandle {
        self.next_id += 1;
        let handle = TaskHandle::new(self.next_id);
        let due = match when {
            When::NextFrame => Due::Frame,
            When::After(delay) => Due::At(self.now + delay),
        };
        self.queue.insert(handle, (due, task));
        handle
    }

    fn cancel(&mut self, handle: TaskHandle) {
        self.queue.remove(&handle);
    }
}

/// Listener registry that counts live subscriptions per event kind
#[derive(Debug, Clone, Default)]
pub struct HeadlessEvents {
    listeners: Rc<RefCell<BTreeMap<EventKind, usize>>>,
}

impl HeadlessEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.borrow().get(&kind).copied().unwrap_or(0)
    }

    pub fn total_listeners(&self) -> usize {
        self.listeners.borrow().values().sum()
    }
}

impl EventSource for HeadlessEvents {
    fn subscribe(&self, kind: EventKind) -> Subscription {
        *self.listeners.borrow_mut().entry(kind).or_insert(0) += 1;
        let listeners = Rc::clone(&self.listeners);
        Subscription::new(kind, move || {
            if let Some(count) = listeners.borrow_mut().get_mut(&kind) {
                *count = count.saturating_sub(1);
            }
        })
    }
}

impl FullscreenController<HeadlessViewport, ManualScheduler> {
    /// Complete a render pass, running the tasks that waited for it
    pub fn render_frame(&mut self) -> usize {
        let due = self.scheduler_mut().take_frame();
        let ran = due.len();
        for (handle, task) in due {
            self.run_task(handle, task);
        }
        ran
    }

    /// Advance the virtual clock, running timers in deadline order. Timers
    /// scheduled by those tasks run too if they fall inside the window.
    pub fn advance(&mut self, by: Duration) -> usize {
        let until = self.scheduler().now() + by;
        let mut ran = 0;
        while let Some((handle, task)) = self.scheduler_mut().pop_due(until) {
            self.run_task(handle, task);
            ran += 1;
        }
        self.scheduler_mut().set_now(until);
        ran
    }

    /// Deliver deferred platform answers straight to the controller
    pub fn settle_platform(&mut self) {
        for outcome in self.viewport_mut().settle() {
            match outcome {
                PlatformOutcome::Entered | PlatformOutcome::Exited => {
                    self.handle_event(EventKind::FullscreenChange)
                }
                PlatformOutcome::Rejected(ticket, reason) => {
                    self.on_request_rejected(ticket, &reason);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::TaskKind;

    fn task(kind: TaskKind) -> Task {
        Task { kind, generation: 1 }
    }

    #[test]
    fn scheduler_orders_timers_by_deadline() {
        let mut s = ManualScheduler::new();
        let late = s.schedule(When::After(Duration::from_millis(300)), task(TaskKind::Resettle));
        let early = s.schedule(When::After(Duration::from_millis(100)), task(TaskKind::ChromeRetry));
        let frame = s.schedule(When::NextFrame, task(TaskKind::Relayout));

        let until = Duration::from_millis(500);
        assert_eq!(s.pop_due(until).map(|(h, _)| h), Some(early));
        assert_eq!(s.now(), Duration::from_millis(100));
        assert_eq!(s.pop_due(until).map(|(h, _)| h), Some(late));
        assert_eq!(s.pop_due(until), None);
        assert_eq!(s.take_frame().into_iter().map(|(h, _)| h).collect::<Vec<_>>(), vec![frame]);
        assert_eq!(s.pending(), 0);
    }

    #[test]
    fn cancelled_tasks_never_come_due() {
        let mut s = ManualScheduler::new();
        let h = s.schedule(When::After(Duration::from_millis(10)), task(TaskKind::ChromeRetry));
        s.cancel(h);
        s.cancel(h);
        assert_eq!(s.pop_due(Duration::from_secs(1)), None);
    }

    #[test]
    fn viewport_defers_platform_answers() {
        let mut vp = HeadlessViewport::new(FullscreenSupport::Granted);
        assert_eq!(vp.request_fullscreen(RequestTicket::new(1)), RequestStatus::Pending);
        assert!(!vp.fullscreen_element_active());
        assert_eq!(vp.settle(), vec![PlatformOutcome::Entered]);
        assert!(vp.fullscreen_element_active());

        vp.exit_fullscreen();
        assert!(vp.fullscreen_element_active());
        vp.settle();
        assert!(!vp.fullscreen_element_active());
    }

    #[test]
    fn viewport_rejections() {
        let mut vp = HeadlessViewport::new(FullscreenSupport::RejectSync);
        assert!(matches!(vp.request_fullscreen(RequestTicket::new(1)), RequestStatus::Rejected(_)));
        assert!(!vp.has_pending_outcomes());

        let mut vp = HeadlessViewport::new(FullscreenSupport::RejectAsync);
        let t = RequestTicket::new(7);
        assert_eq!(vp.request_fullscreen(t), RequestStatus::Pending);
        assert!(matches!(vp.settle().as_slice(), [PlatformOutcome::Rejected(tk, _)] if *tk == t));
        assert!(!vp.fullscreen_element_active());
    }

    #[test]
    fn events_count_live_subscriptions() {
        let events = HeadlessEvents::new();
        let a = events.subscribe(EventKind::Resize);
        let b = events.subscribe(EventKind::Resize);
        assert_eq!(events.listener_count(EventKind::Resize), 2);
        drop(a);
        assert_eq!(events.listener_count(EventKind::Resize), 1);
        drop(b);
        assert_eq!(events.total_listeners(), 0);
    }

    #[test]
    fn support_parses_from_kebab_case() {
        let s: FullscreenSupport = serde_json::from_str("\"reject-async\"").unwrap();
        assert_eq!(s, FullscreenSupport::RejectAsync);
    }
}
