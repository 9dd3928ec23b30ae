//! Browser event subscriptions scoped to a mounted widget

use std::fmt;

/// Process-wide notifications the widget listens to while mounted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    FullscreenChange,
    OrientationChange,
    /// Backup signal for browsers that do not fire orientation changes
    Resize,
}

impl EventKind {
    pub const ALL: [EventKind; 3] = [
        EventKind::FullscreenChange,
        EventKind::OrientationChange,
        EventKind::Resize,
    ];

    /// DOM event type name
    pub fn dom_name(&self) -> &'static str {
        match self {
            EventKind::FullscreenChange => "fullscreenchange",
            EventKind::OrientationChange => "orientationchange",
            EventKind::Resize => "resize",
        }
    }
}

/// A live listener registration. Dropping it removes the listener.
pub struct Subscription {
    kind: EventKind,
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Wrap a registration; `release` runs exactly once, on drop
    pub fn new(kind: EventKind, release: impl FnOnce() + 'static) -> Self {
        Self { kind, release: Some(Box::new(release)) }
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("kind", &self.kind).finish()
    }
}

/// Something that can register listeners for [`EventKind`]s
pub trait EventSource {
    fn subscribe(&self, kind: EventKind) -> Subscription;
}
