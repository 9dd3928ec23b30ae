//! Platform API surface: viewport control, scheduling and event subscriptions
//!
//! This module contains the traits a host implements to run the widget. The
//! crate ships an in-memory implementation in [`crate::headless`] used by the
//! tests and the CLI, and a browser implementation behind the `web` feature.

pub mod events;
pub mod scheduler;
pub mod viewport;

pub use events::{EventKind, EventSource, Subscription};
pub use scheduler::{Scheduler, Task, TaskHandle, TaskKind, When};
pub use viewport::{RequestStatus, RequestTicket, RootStyle, ViewportController};
