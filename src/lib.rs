//! # taskherd
//!
//! **taskherd** runs named units of async work concurrently, bounds each one by its own
//! deadline, collects their results and shuts them all down within a bounded grace period.
//!
//! Periodic housekeeping (re-scoring stale records, pinging providers, refreshing a status
//! view) is expressed the same way as one-shot work: a [`Task`] whose `run` takes a
//! [`CancellationToken`](tokio_util::sync::CancellationToken).
//!
//! ## Architecture
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌───────────────┐
//!     │   FuncTask   │   │   FuncTask   │   │ ScheduledTask │
//!     │  (one-shot)  │   │  (one-shot)  │   │  (periodic)   │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬────────┘
//!            ▼ spawn            ▼ spawn            ▼ spawn
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  TaskManager                                                      │
//! │  - runtime token (parent of every task context)                   │
//! │  - TaskTracker (one worker per spawn, waited on by shutdown)      │
//! │  - ResultLog (append-only, completion order)                      │
//! │  - Bus (broadcast events) ──► SubscriberSet ──► LogWriter, ...    │
//! └──────┬──────────────────┬──────────────────┬──────────────────────┘
//!        ▼                  ▼                  ▼
//!     run_once           run_once           run_once
//!   (deadline,         (deadline,         (deadline,
//!    panic capture)     panic capture)     panic capture)
//!        │                  │                  │
//!        └──────────────────┴──────────────────┴──► TaskResult { name, error, duration }
//! ```
//!
//! ### Cancellation
//! Each task context is cancelled by whichever comes first:
//! - the task's own [`Task::run_timeout`] (`0s` = none);
//! - [`TaskManager::shutdown`], which cancels every context immediately and then waits
//!   up to `grace` for the workers to return.
//!
//! A task that ignores its context cannot be aborted; `shutdown` then reports
//! [`ManagerError::GraceExceeded`] and the task records its result whenever it returns.
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                          |
//! |-------------------|--------------------------------------------------------------|---------------------------------------------|
//! | **Tasks**         | One-shot and periodic tasks built from closures.             | [`Task`], [`FuncTask`], [`ScheduledTask`]   |
//! | **Manager**       | Admission, concurrent execution, results, graceful shutdown. | [`TaskManager`], [`TaskResult`]             |
//! | **Errors**        | Typed errors for the manager and for tasks.                  | [`ManagerError`], [`TaskError`]             |
//! | **Subscriber API**| Hook into lifecycle events (logging, metrics, custom).        | [`Subscribe`], [`LogWriter`]                |
//! | **Configuration** | Grace, bus capacity, default task timeout.                   | [`ManagerConfig`]                           |
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use taskherd::{FuncTask, ScheduledTask, TaskError, TaskManager};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let manager = TaskManager::new();
//!
//!     manager.spawn(FuncTask::new("import", Duration::from_secs(5), |ctx: CancellationToken| async move {
//!         if ctx.is_cancelled() {
//!             return Err(TaskError::Canceled);
//!         }
//!         Ok(())
//!     }))?;
//!
//!     manager.spawn(ScheduledTask::new("rescore-stale", Duration::from_millis(50), |_ctx: CancellationToken| async {
//!         Ok::<(), TaskError>(())
//!     }))?;
//!
//!     tokio::time::sleep(Duration::from_millis(120)).await;
//!     manager.shutdown(Duration::from_secs(1)).await?;
//!
//!     for result in manager.results() {
//!         println!("{} took {:?}: {:?}", result.name(), result.duration(), result.error());
//!     }
//!     Ok(())
//! }
//! ```

mod config;
mod core;
mod error;
mod events;
mod subscribers;
mod tasks;

// ---- Public re-exports ----

pub use config::ManagerConfig;
pub use crate::core::{TaskManager, TaskManagerBuilder, TaskResult};
pub use error::{ManagerError, TaskError};
pub use events::{Bus, Event, EventKind};
pub use subscribers::{LogWriter, Subscribe, SubscriberSet};
pub use tasks::{BaseTask, FuncTask, ScheduledTask, Task, TaskRef};
