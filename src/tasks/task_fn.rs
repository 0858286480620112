//! # Function-backed one-shot task (`FuncTask`)
//!
//! [`FuncTask`] wraps a closure `F: Fn(CancellationToken) -> Fut`, producing a fresh
//! future per run.
//!
//! ## Concurrency semantics
//! - Each call to [`Task::run`] creates a **new** future that owns its state.
//! - There is no hidden mutation between runs; share state explicitly with `Arc<...>`
//!   inside the closure.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use taskherd::{FuncTask, Task, TaskError};
//!
//! let t = FuncTask::new("worker", Duration::from_secs(2), |ctx: CancellationToken| async move {
//!     if ctx.is_cancelled() {
//!         return Err(TaskError::Canceled);
//!     }
//!     // do work...
//!     Ok(())
//! });
//!
//! assert_eq!(t.name(), "worker");
//! assert_eq!(t.timeout(), Duration::from_secs(2));
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::config::ManagerConfig;
use crate::error::TaskError;
use crate::tasks::base::BaseTask;
use crate::tasks::task::Task;

/// Function-backed one-shot task.
#[derive(Debug)]
pub struct FuncTask<F> {
    base: BaseTask,
    f: F,
}

impl<F> FuncTask<F> {
    /// Creates a new function-backed task.
    ///
    /// A `timeout` of `Duration::ZERO` leaves the task without a deadline; it is only
    /// cancelled by shutdown. See [`BaseTask::new`].
    ///
    /// Prefer [`FuncTask::arc`] when you immediately need a [`TaskRef`](crate::TaskRef).
    pub fn new(name: impl Into<Cow<'static, str>>, timeout: Duration, f: F) -> Self {
        Self {
            base: BaseTask::new(name, timeout),
            f,
        }
    }

    /// Creates the task and returns it behind an `Arc`.
    pub fn arc(name: impl Into<Cow<'static, str>>, timeout: Duration, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, timeout, f))
    }

    /// Creates a task whose timeout is inherited from the manager config.
    ///
    /// Uses [`ManagerConfig::default_timeout`], so `0s` in config means no deadline.
    pub fn with_defaults(name: impl Into<Cow<'static, str>>, cfg: &ManagerConfig, f: F) -> Self {
        Self::new(name, cfg.default_timeout().unwrap_or(Duration::ZERO), f)
    }
}

#[async_trait]
impl<F, Fut> Task for FuncTask<F>
where
    F: Fn(CancellationToken) -> Fut + Send + Sync + 'static, // Fn, not FnMut
    Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
{
    fn name(&self) -> &str {
        self.base.name()
    }

    fn timeout(&self) -> Duration {
        self.base.timeout()
    }

    async fn run(&self, ctx: CancellationToken) -> Result<(), TaskError> {
        (self.f)(ctx).await
    }
}
