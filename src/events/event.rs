//! # Events emitted by the task manager.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Admission events**: a task was spawned or rejected
//! - **Lifecycle events**: task execution flow (starting, stopped, failed, timeout)
//! - **Shutdown events**: shutdown requested and how it ended
//!
//! The [`Event`] struct carries additional metadata such as timestamps, task name,
//! task id, reasons, and durations.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use taskherd::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::TaskFailed)
//!     .with_task("rescore")
//!     .with_task_id(3)
//!     .with_reason("boom")
//!     .with_elapsed(Duration::from_millis(40));
//!
//! assert_eq!(ev.kind, EventKind::TaskFailed);
//! assert_eq!(ev.task.as_deref(), Some("rescore"));
//! assert_eq!(ev.reason.as_deref(), Some("boom"));
//! assert_eq!(ev.elapsed_ms, Some(40));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of manager events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `task`: subscriber name
    /// - `reason`: panic message
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `task`: subscriber name
    /// - `reason`: "full" or "closed"
    SubscriberOverflow,

    // === Admission events ===
    /// Task admitted; its worker is about to start.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `task_id`: manager-local id (spawn order, 1-based)
    /// - `timeout_ms`: task deadline, if any
    TaskSpawned,

    /// Spawn rejected because the manager is shutting down.
    ///
    /// Sets:
    /// - `task`: task name
    SpawnRejected,

    // === Task lifecycle events ===
    /// Task `run` is starting.
    ///
    /// Sets:
    /// - `task`, `task_id`
    TaskStarting,

    /// Task `run` returned `Ok(())` or `Err(Canceled)`.
    ///
    /// Sets:
    /// - `task`, `task_id`
    /// - `elapsed_ms`: wall-clock duration of `run`
    TaskStopped,

    /// Task `run` returned an error or panicked.
    ///
    /// Sets:
    /// - `task`, `task_id`
    /// - `reason`: error message
    /// - `elapsed_ms`: wall-clock duration of `run`
    TaskFailed,

    /// Task deadline elapsed and its context was cancelled.
    ///
    /// The task keeps running until it observes cancellation.
    ///
    /// Sets:
    /// - `task`, `task_id`
    /// - `timeout_ms`: the deadline that elapsed
    TimeoutHit,

    // === Shutdown events ===
    /// Shutdown requested; every task context has been cancelled.
    ShutdownRequested,

    /// All tasks returned within the grace period.
    AllStoppedWithin,

    /// Grace period elapsed with tasks still running.
    ///
    /// Sets:
    /// - `reason`: names of the tasks still running
    GraceExceeded,
}

/// Manager event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Name of the task, if applicable.
    pub task: Option<Arc<str>>,
    /// Manager-local task id, if applicable.
    pub task_id: Option<u64>,
    /// Human-readable reason (errors, overflow details, etc.).
    pub reason: Option<Arc<str>>,
    /// Task timeout in milliseconds.
    pub timeout_ms: Option<u32>,
    /// Task run duration in milliseconds.
    pub elapsed_ms: Option<u32>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            task: None,
            task_id: None,
            reason: None,
            timeout_ms: None,
            elapsed_ms: None,
        }
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a task name.
    #[inline]
    pub fn with_task(mut self, task: impl Into<Arc<str>>) -> Self {
        self.task = Some(task.into());
        self
    }

    /// Attaches a manager-local task id.
    #[inline]
    pub fn with_task_id(mut self, id: u64) -> Self {
        self.task_id = Some(id);
        self
    }

    /// Attaches a timeout duration (stored as milliseconds).
    #[inline]
    pub fn with_timeout(mut self, d: Duration) -> Self {
        self.timeout_ms = Some(millis(d));
        self
    }

    /// Attaches a run duration (stored as milliseconds).
    #[inline]
    pub fn with_elapsed(mut self, d: Duration) -> Self {
        self.elapsed_ms = Some(millis(d));
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_task(subscriber)
            .with_reason(reason)
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_task(subscriber)
            .with_reason(info)
    }
}

fn millis(d: Duration) -> u32 {
    d.as_millis().min(u128::from(u32::MAX)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = Event::new(EventKind::TaskStarting);
        let b = Event::new(EventKind::TaskStopped);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_durations_saturate_at_u32() {
        let ev = Event::new(EventKind::TimeoutHit).with_timeout(Duration::from_secs(u64::MAX));
        assert_eq!(ev.timeout_ms, Some(u32::MAX));
    }
}
