//! # Run a single task to completion.
//!
//! Executes one [`Task::run`] call with its deadline, catches panics, publishes
//! lifecycle events to the [`Bus`] and produces the [`TaskResult`].
//!
//! ## Event flow
//! ```text
//! Success / cooperative cancel:
//!   TaskStarting → task.run() → Ok(()) | Err(Canceled) → TaskStopped
//!
//! Failure / panic:
//!   TaskStarting → task.run() → Err(e) | panic → TaskFailed
//!
//! Deadline:
//!   timeout elapsed → cancel ctx → TimeoutHit → keep awaiting task.run()
//!                                              → TaskStopped | TaskFailed
//! ```
//!
//! ## Rules
//! - The deadline only **cancels the context**; the future is never dropped early, so a
//!   task that ignores cancellation still runs to completion and still gets a result.
//! - Always publishes **exactly one** terminal event: `TaskStopped` or `TaskFailed`.
//! - `duration` covers the whole `run` call, including time spent after the deadline.

use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures::FutureExt;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;

use crate::core::results::TaskResult;
use crate::error::{TaskError, panic_info};
use crate::events::{Bus, Event, EventKind};
use crate::tasks::Task;

/// Runs `task` once under `ctx` and returns its result.
///
/// `ctx` must be a token owned by this run: it is cancelled when the task deadline elapses.
pub(crate) async fn run_once(
    task: &dyn Task,
    id: u64,
    ctx: CancellationToken,
    bus: &Bus,
) -> TaskResult {
    let name = task.name();
    bus.publish(
        Event::new(EventKind::TaskStarting)
            .with_task(name)
            .with_task_id(id),
    );

    let started = Instant::now();
    let fut = AssertUnwindSafe(task.run(ctx.clone())).catch_unwind();
    tokio::pin!(fut);

    let outcome = match deadline(task.run_timeout()) {
        Some(dur) => match time::timeout(dur, &mut fut).await {
            Ok(out) => out,
            Err(_elapsed) => {
                ctx.cancel();
                publish_timeout(bus, name, id, dur);
                fut.await
            }
        },
        None => fut.await,
    };
    let elapsed = started.elapsed();

    let res = outcome.unwrap_or_else(|panic| {
        Err(TaskError::Panicked {
            info: panic_info(&*panic),
        })
    });

    match &res {
        Ok(()) | Err(TaskError::Canceled) => publish_stopped(bus, name, id, elapsed),
        Err(e) => publish_failed(bus, name, id, elapsed, e),
    }
    TaskResult::new(name, res.err(), elapsed)
}

/// `Duration::ZERO` means no deadline.
fn deadline(timeout: Duration) -> Option<Duration> {
    Some(timeout).filter(|d| *d > Duration::ZERO)
}

fn publish_stopped(bus: &Bus, name: &str, id: u64, elapsed: Duration) {
    bus.publish(
        Event::new(EventKind::TaskStopped)
            .with_task(name)
            .with_task_id(id)
            .with_elapsed(elapsed),
    );
}

fn publish_failed(bus: &Bus, name: &str, id: u64, elapsed: Duration, err: &TaskError) {
    bus.publish(
        Event::new(EventKind::TaskFailed)
            .with_task(name)
            .with_task_id(id)
            .with_elapsed(elapsed)
            .with_reason(err.to_string()),
    );
}

fn publish_timeout(bus: &Bus, name: &str, id: u64, dur: Duration) {
    bus.publish(
        Event::new(EventKind::TimeoutHit)
            .with_task(name)
            .with_task_id(id)
            .with_timeout(dur),
    );
}
