//! # Name and deadline holder shared by task variants.
//!
//! [`BaseTask`] does not implement [`Task`](crate::Task) on its own; it is embedded by
//! [`FuncTask`](crate::FuncTask) and [`ScheduledTask`](crate::ScheduledTask) (or by your own
//! task types) to provide the `name`/`timeout` accessors.

use std::borrow::Cow;
use std::time::Duration;

/// Name and timeout accessors for task types.
///
/// ## Example
/// ```rust
/// use std::time::Duration;
/// use taskherd::BaseTask;
///
/// let base = BaseTask::new("rescore", Duration::from_secs(2));
/// assert_eq!(base.name(), "rescore");
/// assert_eq!(base.timeout(), Duration::from_secs(2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseTask {
    name: Cow<'static, str>,
    timeout: Duration,
}

impl BaseTask {
    /// Creates a new holder with the given name and timeout.
    ///
    /// `Duration::ZERO` means **no deadline**, not one that has already expired. Callers
    /// used to deadline-from-now APIs, where a zero timeout cancels straight away, should
    /// pass a small positive duration to get that behavior.
    pub fn new(name: impl Into<Cow<'static, str>>, timeout: Duration) -> Self {
        Self {
            name: name.into(),
            timeout,
        }
    }

    /// Returns the task name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the task timeout (`Duration::ZERO` = none).
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub(crate) fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }
}
