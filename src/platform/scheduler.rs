//! Deferred work used by simulated fullscreen

use std::time::Duration;

/// Handle returned by a [`Scheduler`] for one scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle(u64);

impl TaskHandle {
    pub fn new(id: u64) -> Self {
        TaskHandle(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    /// After the render pass that applied the fullscreen styling
    Relayout,
    /// Second chrome-hiding nudge
    ChromeRetry,
    /// Orientation or resize has settled
    Resettle,
}

/// A unit of deferred work tagged with the simulated-fullscreen generation it
/// belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Task {
    pub kind: TaskKind,
    pub generation: u64,
}

/// When a task should run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum When {
    /// Once the next render pass has completed
    NextFrame,
    /// After a delay
    After(Duration),
}

/// Timer and frame scheduling.
///
/// The scheduler only decides *when*; once a task is due the host hands it
/// back through `FullscreenController::run_task` with its handle.
pub trait Scheduler {
    fn schedule(&mut self, when: When, task: Task) -> TaskHandle;

    /// Cancel a task. Unknown or already-fired handles are ignored.
    fn cancel(&mut self, handle: TaskHandle);
}
