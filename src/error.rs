//! Error types used by the task manager and by tasks.
//!
//! This module defines two enums:
//!
//! - [`ManagerError`] - errors raised by the [`TaskManager`](crate::TaskManager) itself.
//! - [`TaskError`] - errors returned from (or recorded for) individual task executions.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logs and metrics.

use std::any::Any;
use std::borrow::Cow;
use std::time::Duration;

use thiserror::Error;

/// # Errors produced by the task manager.
///
/// Task failures never surface here; they are recorded per task in
/// [`TaskResult::error`](crate::TaskResult::error).
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ManagerError {
    /// Shutdown grace period elapsed while some tasks were still running.
    ///
    /// The tasks were cancelled; they simply did not return in time.
    #[error("shutdown grace {grace:?} exceeded; still running: {stuck:?}")]
    GraceExceeded {
        /// The grace period passed to `shutdown`.
        grace: Duration,
        /// Sorted names of the tasks that had not returned.
        stuck: Vec<String>,
    },

    /// `spawn` was called after `shutdown`.
    #[error("task {task:?} rejected: manager is shutting down")]
    ShuttingDown {
        /// Name of the rejected task.
        task: Cow<'static, str>,
    },

    /// `spawn` was called outside of a Tokio runtime.
    #[error("task {task:?} rejected: no tokio runtime available")]
    NoRuntime {
        /// Name of the rejected task.
        task: Cow<'static, str>,
    },
}

impl ManagerError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use taskherd::ManagerError;
    /// use std::time::Duration;
    ///
    /// let err = ManagerError::GraceExceeded { grace: Duration::from_secs(5), stuck: vec![] };
    /// assert_eq!(err.as_label(), "manager_grace_exceeded");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ManagerError::GraceExceeded { .. } => "manager_grace_exceeded",
            ManagerError::ShuttingDown { .. } => "manager_shutting_down",
            ManagerError::NoRuntime { .. } => "manager_no_runtime",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ManagerError::GraceExceeded { grace, stuck } => {
                format!("grace exceeded after {grace:?}; stuck tasks={stuck:?}")
            }
            ManagerError::ShuttingDown { task } => format!("spawn after shutdown: {task}"),
            ManagerError::NoRuntime { task } => format!("spawn without runtime: {task}"),
        }
    }
}

/// # Errors produced by task execution.
///
/// Returned from [`Task::run`](crate::Task::run) and stored verbatim in the
/// matching [`TaskResult`](crate::TaskResult). None of them is fatal to the manager.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// Task execution failed.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// Task observed cancellation of its context and returned early.
    #[error("context cancelled")]
    Canceled,

    /// Task body panicked; the panic was caught by the manager.
    #[error("task panicked: {info}")]
    Panicked {
        /// Panic payload rendered as text.
        info: String,
    },
}

impl TaskError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use taskherd::TaskError;
    ///
    /// let err = TaskError::Fail { error: "boom".into() };
    /// assert_eq!(err.as_label(), "task_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::Fail { .. } => "task_failed",
            TaskError::Canceled => "task_canceled",
            TaskError::Panicked { .. } => "task_panicked",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            TaskError::Fail { error } => format!("error: {error}"),
            TaskError::Canceled => "context cancelled".to_string(),
            TaskError::Panicked { info } => format!("panic: {info}"),
        }
    }

    /// Returns `true` if the task stopped because its context was cancelled.
    pub fn is_canceled(&self) -> bool {
        matches!(self, TaskError::Canceled)
    }
}

/// Renders a caught panic payload as text.
pub(crate) fn panic_info(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_error_labels_are_stable() {
        assert_eq!(TaskError::Canceled.as_label(), "task_canceled");
        assert_eq!(
            TaskError::Panicked { info: "x".into() }.as_label(),
            "task_panicked"
        );
        assert!(TaskError::Canceled.is_canceled());
        assert!(!TaskError::Fail { error: "x".into() }.is_canceled());
    }

    #[test]
    fn test_grace_exceeded_message_lists_stuck_tasks() {
        let err = ManagerError::GraceExceeded {
            grace: Duration::from_millis(500),
            stuck: vec!["rescore".to_string()],
        };
        assert!(err.to_string().contains("rescore"));
        assert!(err.as_message().contains("500ms"));
    }

    #[test]
    fn test_rejection_errors_carry_task_name() {
        let err = ManagerError::ShuttingDown { task: "ping".into() };
        assert_eq!(err.as_label(), "manager_shutting_down");
        assert!(err.to_string().contains("ping"));
    }

    #[test]
    fn test_panic_info_downcasts_common_payloads() {
        let s: Box<dyn Any + Send> = Box::new("static");
        assert_eq!(panic_info(s.as_ref()), "static");

        let owned: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_info(owned.as_ref()), "owned");

        let other: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_info(other.as_ref()), "unknown panic");
    }
}
