//! # Task abstractions.
//!
//! This module provides the task-related types:
//! - [`Task`] - trait for implementing async cancelable, time-bounded tasks
//! - [`TaskRef`] - shared reference to a task (`Arc<dyn Task>`)
//! - [`BaseTask`] - name/timeout holder embedded by the task variants
//! - [`FuncTask`] - one-shot task backed by a closure
//! - [`ScheduledTask`] - periodic task re-invoking a closure on a fixed interval

mod base;
mod scheduled;
mod task;
mod task_fn;

pub use base::BaseTask;
pub use scheduled::ScheduledTask;
pub use task::{Task, TaskRef};
pub use task_fn::FuncTask;
