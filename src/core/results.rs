//! # Task outcomes and their append-only log.
//!
//! [`TaskResult`] is the immutable record of one finished task run.
//! [`ResultLog`] is the manager-owned collection results are appended to,
//! in completion order.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::error::TaskError;

/// Outcome of one task run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskResult {
    name: String,
    error: Option<TaskError>,
    duration: Duration,
}

impl TaskResult {
    pub(crate) fn new(name: impl Into<String>, error: Option<TaskError>, duration: Duration) -> Self {
        Self {
            name: name.into(),
            error,
            duration,
        }
    }

    /// Name of the task that produced this result.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Error returned by the task (or recorded for a panic), `None` on success.
    pub fn error(&self) -> Option<&TaskError> {
        self.error.as_ref()
    }

    /// Wall-clock duration of the task's `run`.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Returns `true` if the task returned `Ok(())`.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Append-only, mutex-guarded list of results.
#[derive(Debug, Default)]
pub(crate) struct ResultLog {
    items: Mutex<Vec<TaskResult>>,
}

impl ResultLog {
    pub(crate) fn push(&self, result: TaskResult) {
        self.lock().push(result);
    }

    /// Point-in-time copy of every result recorded so far.
    pub(crate) fn snapshot(&self) -> Vec<TaskResult> {
        self.lock().clone()
    }

    // Pushes never leave the vector half-written, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, Vec<TaskResult>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
