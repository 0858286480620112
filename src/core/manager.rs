//! # TaskManager: admission, concurrent execution, result collection and shutdown.
//!
//! The [`TaskManager`] runs every spawned [`Task`] on its own Tokio task, bounds each one
//! by its deadline, records a [`TaskResult`] when it returns, and coordinates a
//! bounded-time graceful shutdown.
//!
//! ## Architecture
//! ```text
//! spawn(task)
//!   ├─► admission check (rejected after shutdown)
//!   ├─► task_count += 1                       (synchronous)
//!   ├─► ctx = runtime_token.child_token()      (cancelled by shutdown)
//!   └─► tracker.spawn(worker)
//!          └─► run_once(task, ctx)             (cancels ctx on task deadline)
//!                 └─► running.remove(id) → results.push(TaskResult)
//!
//! shutdown(grace)
//!   ├─► close admission, publish ShutdownRequested (first call only)
//!   ├─► runtime_token.cancel()                 → every task ctx fires now
//!   └─► timeout(grace, tracker.wait()):
//!          ├─ Ok        → AllStoppedWithin, Ok(())
//!          └─ elapsed   → GraceExceeded, Err(GraceExceeded { stuck })
//! ```
//!
//! ## Rules
//! - One worker per admitted `spawn`; no pooling, queueing or backpressure.
//! - Results appear in **completion order**.
//! - `grace` only bounds the wait; cancellation is already in effect when waiting starts.
//! - Tasks that ignore cancellation cannot be aborted: they keep running past `shutdown`
//!   and still record their result when they return.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use taskherd::{FuncTask, TaskError, TaskManager};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let manager = TaskManager::new();
//!
//!     manager.spawn(FuncTask::new("hello", Duration::from_secs(2), |_ctx: CancellationToken| async {
//!         Ok::<(), TaskError>(())
//!     }))?;
//!     assert_eq!(manager.task_count(), 1);
//!
//!     manager.shutdown(Duration::from_secs(2)).await?;
//!     assert_eq!(manager.results().len(), 1);
//!     Ok(())
//! }
//! ```

use std::mem;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tokio::time;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::config::ManagerConfig;
use crate::core::builder::TaskManagerBuilder;
use crate::core::results::{ResultLog, TaskResult};
use crate::core::running::RunningSet;
use crate::core::{runner, shutdown};
use crate::error::ManagerError;
use crate::events::{Bus, Event, EventKind};
use crate::tasks::{Task, TaskRef};

/// Runs tasks concurrently, collects their results and shuts them down.
pub struct TaskManager {
    cfg: ManagerConfig,
    bus: Bus,
    /// Parent of every per-task context.
    runtime_token: CancellationToken,
    /// Stops the subscriber listener.
    listener_token: CancellationToken,
    tracker: TaskTracker,
    /// `true` while spawns are admitted.
    accepting: RwLock<bool>,
    spawned: AtomicUsize,
    results: Arc<ResultLog>,
    running: Arc<RunningSet>,
}

impl TaskManager {
    /// Creates a manager with the default config and no subscribers.
    ///
    /// Does not require a Tokio runtime; `spawn` does.
    pub fn new() -> Self {
        Self::builder(ManagerConfig::default()).build()
    }

    /// Returns a builder for a manager with custom config and subscribers.
    pub fn builder(cfg: ManagerConfig) -> TaskManagerBuilder {
        TaskManagerBuilder::new(cfg)
    }

    pub(crate) fn new_internal(
        cfg: ManagerConfig,
        bus: Bus,
        listener_token: CancellationToken,
    ) -> Self {
        Self {
            cfg,
            bus,
            runtime_token: CancellationToken::new(),
            listener_token,
            tracker: TaskTracker::new(),
            accepting: RwLock::new(true),
            spawned: AtomicUsize::new(0),
            results: Arc::new(ResultLog::default()),
            running: Arc::new(RunningSet::default()),
        }
    }

    /// Starts `task` on its own Tokio task and returns immediately.
    ///
    /// See [`spawn_ref`](Self::spawn_ref).
    pub fn spawn<T: Task>(&self, task: T) -> Result<(), ManagerError> {
        self.spawn_ref(Arc::new(task))
    }

    /// Starts a shared task on its own Tokio task and returns immediately.
    ///
    /// The task receives a context that is cancelled when its
    /// [`run_timeout`](Task::run_timeout) elapses or when [`shutdown`](Self::shutdown) is called.
    ///
    /// ### Errors
    /// - [`ManagerError::ShuttingDown`] once `shutdown` has been called
    /// - [`ManagerError::NoRuntime`] outside a Tokio runtime
    ///
    /// Rejected calls do not change [`task_count`](Self::task_count).
    pub fn spawn_ref(&self, task: TaskRef) -> Result<(), ManagerError> {
        let Ok(handle) = Handle::try_current() else {
            return Err(ManagerError::NoRuntime {
                task: task.name().to_owned().into(),
            });
        };

        // Held until the worker is tracked, so `shutdown` cannot slip in between.
        let accepting = self.accepting.read().unwrap_or_else(PoisonError::into_inner);
        if !*accepting {
            self.bus
                .publish(Event::new(EventKind::SpawnRejected).with_task(task.name()));
            return Err(ManagerError::ShuttingDown {
                task: task.name().to_owned().into(),
            });
        }

        let id = self.spawned.fetch_add(1, Ordering::SeqCst) as u64 + 1;
        let name: Arc<str> = Arc::from(task.name());
        self.running.insert(id, Arc::clone(&name));
        self.bus.publish(
            Event::new(EventKind::TaskSpawned)
                .with_task(name)
                .with_task_id(id)
                .with_timeout(task.run_timeout()),
        );

        let ctx = self.runtime_token.child_token();
        let bus = self.bus.clone();
        let results = Arc::clone(&self.results);
        let running = Arc::clone(&self.running);

        self.tracker.spawn_on(
            async move {
                let result = runner::run_once(task.as_ref(), id, ctx, &bus).await;
                running.remove(id);
                results.push(result);
            },
            &handle,
        );
        drop(accepting);
        Ok(())
    }

    /// Returns a copy of every result recorded so far, in completion order.
    pub fn results(&self) -> Vec<TaskResult> {
        self.results.snapshot()
    }

    /// Returns how many tasks were admitted by `spawn` in total.
    pub fn task_count(&self) -> usize {
        self.spawned.load(Ordering::SeqCst)
    }

    /// Returns how many admitted tasks have not recorded a result yet.
    pub fn running_count(&self) -> usize {
        self.running.len()
    }

    /// Returns `true` once `shutdown` has been called.
    pub fn is_shutting_down(&self) -> bool {
        !*self.accepting.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the manager configuration.
    pub fn config(&self) -> &ManagerConfig {
        &self.cfg
    }

    /// Creates a receiver for events published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<Event>> {
        self.bus.subscribe()
    }

    /// Cancels every task and waits up to `grace` for all of them to return.
    ///
    /// Cancellation happens immediately, regardless of each task's own deadline.
    /// Further `spawn` calls are rejected. Calling `shutdown` again is allowed and
    /// simply waits again with the new grace.
    ///
    /// ### Errors
    /// [`ManagerError::GraceExceeded`] if some task has not returned within `grace`.
    /// Those tasks stay cancelled and record their results whenever they return.
    pub async fn shutdown(&self, grace: Duration) -> Result<(), ManagerError> {
        self.begin_shutdown(None);
        self.wait_with_grace(grace).await
    }

    /// Waits for SIGINT/SIGTERM/SIGQUIT (Ctrl-C elsewhere), then shuts down with
    /// [`ManagerConfig::grace`].
    ///
    /// If signal listeners cannot be registered, shuts down right away.
    pub async fn shutdown_on_signal(&self) -> Result<(), ManagerError> {
        let reason = match shutdown::wait_for_signal().await {
            Ok(signal) => signal.to_string(),
            Err(e) => format!("signal registration failed: {e}"),
        };
        self.begin_shutdown(Some(reason));
        self.wait_with_grace(self.cfg.grace).await
    }

    fn begin_shutdown(&self, reason: Option<String>) {
        let was_accepting = {
            let mut accepting = self.accepting.write().unwrap_or_else(PoisonError::into_inner);
            mem::replace(&mut *accepting, false)
        };
        if was_accepting {
            let mut ev = Event::new(EventKind::ShutdownRequested);
            if let Some(reason) = reason {
                ev = ev.with_reason(reason);
            }
            self.bus.publish(ev);
        }
        self.runtime_token.cancel();
        self.tracker.close();
    }

    async fn wait_with_grace(&self, grace: Duration) -> Result<(), ManagerError> {
        match time::timeout(grace, self.tracker.wait()).await {
            Ok(()) => {
                self.bus.publish(Event::new(EventKind::AllStoppedWithin));
                Ok(())
            }
            Err(_elapsed) => {
                let stuck = self.running.snapshot();
                self.bus
                    .publish(Event::new(EventKind::GraceExceeded).with_reason(stuck.join(",")));
                Err(ManagerError::GraceExceeded { grace, stuck })
            }
        }
    }
}

impl Default for TaskManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TaskManager {
    fn drop(&mut self) {
        self.runtime_token.cancel();
        self.listener_token.cancel();
    }
}
