//! # Task abstraction.
//!
//! This module defines the [`Task`] trait (async, cancelable, time-bounded).
//! The common handle type is [`TaskRef`], an `Arc<dyn Task>` suitable for sharing across the runtime.
//!
//! A task receives a [`CancellationToken`] and must observe it to stop cooperatively:
//! the token fires when the task's [`run_timeout`](Task::run_timeout) elapses or when the
//! manager shuts down, whichever comes first.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::TaskError;

/// Shared handle to a task object.
pub type TaskRef = Arc<dyn Task>;

/// # Asynchronous, cancelable, time-bounded unit of work.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use tokio_util::sync::CancellationToken;
/// use async_trait::async_trait;
/// use taskherd::{Task, TaskError};
///
/// struct Demo;
///
/// #[async_trait]
/// impl Task for Demo {
///     fn name(&self) -> &str { "demo" }
///
///     fn timeout(&self) -> Duration { Duration::from_secs(1) }
///
///     async fn run(&self, ctx: CancellationToken) -> Result<(), TaskError> {
///         if ctx.is_cancelled() {
///             return Err(TaskError::Canceled);
///         }
///         // do work...
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Task: Send + Sync + 'static {
    /// Returns a human-readable label. Not required to be unique.
    fn name(&self) -> &str;

    /// Returns the task's configured timeout.
    ///
    /// `Duration::ZERO` means no deadline. This is not the "expire immediately" zero of
    /// deadline-from-now APIs; use a small positive value for that.
    fn timeout(&self) -> Duration;

    /// Returns how long a whole [`run`](Task::run) call is allotted before the manager
    /// cancels its context. Defaults to [`timeout`](Task::timeout).
    ///
    /// Tasks that apply `timeout` themselves (per invocation, per attempt) return
    /// `Duration::ZERO` here.
    fn run_timeout(&self) -> Duration {
        self.timeout()
    }

    /// Executes the task until completion or cancellation.
    ///
    /// Implementations should await `ctx.cancelled()` (or poll `ctx.is_cancelled()`)
    /// and return promptly once it fires; the manager cannot abort a task that ignores it.
    async fn run(&self, ctx: CancellationToken) -> Result<(), TaskError>;
}
