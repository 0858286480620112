//! # Periodic task (`ScheduledTask`)
//!
//! [`ScheduledTask`] re-invokes a closure on a fixed interval until its context is cancelled.
//!
//! ## Flow
//! ```text
//! run(ctx)
//!   loop {
//!     ├─► wait for next tick ──── ctx cancelled ──► return Err(Canceled)
//!     ├─► ticks += 1, tick_ctx = ctx.child_token()
//!     └─► f(tick_ctx).await                 (tick_ctx cancelled after `timeout`)
//!           ├─ Ok  ──► continue
//!           └─ Err ──► failures += 1, debug record, continue
//!   }
//! ```
//!
//! ## Rules
//! - The first invocation happens one `interval` after `run` starts.
//! - Invocations are strictly sequential; a slow invocation delays the next one and
//!   missed ticks are skipped, never replayed.
//! - A failing invocation never stops the schedule.
//! - [`Task::timeout`] bounds **each invocation** (`0s` = unbounded). When it elapses the
//!   invocation's context is cancelled and the loop waits for it to return.
//! - The schedule itself runs until shutdown: [`Task::run_timeout`] is always `0s`.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use taskherd::{ScheduledTask, Task, TaskError};
//!
//! let ping = ScheduledTask::new("provider-ping", Duration::from_secs(30), |_ctx: CancellationToken| async {
//!     // check provider health...
//!     Ok::<(), TaskError>(())
//! })
//! .with_timeout(Duration::from_secs(5));
//!
//! assert_eq!(ping.interval(), Duration::from_secs(30));
//! assert_eq!(ping.timeout(), Duration::from_secs(5));
//! assert_eq!(ping.run_timeout(), Duration::ZERO);
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::error::TaskError;
use crate::tasks::base::BaseTask;
use crate::tasks::task::Task;

/// Shortest accepted interval; tokio timers reject a zero period.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Periodic task backed by a closure.
pub struct ScheduledTask<F> {
    base: BaseTask,
    interval: Duration,
    f: F,
    ticks: AtomicU64,
    failures: AtomicU64,
}

impl<F> ScheduledTask<F> {
    /// Creates a periodic task with no deadline of its own.
    ///
    /// Intervals shorter than 1ms are raised to 1ms.
    pub fn new(name: impl Into<Cow<'static, str>>, interval: Duration, f: F) -> Self {
        Self {
            base: BaseTask::new(name, Duration::ZERO),
            interval: interval.max(MIN_INTERVAL),
            f,
            ticks: AtomicU64::new(0),
            failures: AtomicU64::new(0),
        }
    }

    /// Bounds every invocation of the closure by `timeout` (`0s` = unbounded).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.base.set_timeout(timeout);
        self
    }

    /// Wraps the task in an `Arc`, keeping a handle for reading counters.
    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Returns the scheduling interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Number of invocations started so far.
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    /// Number of invocations that returned an error.
    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl<F, Fut> Task for ScheduledTask<F>
where
    F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
{
    fn name(&self) -> &str {
        self.base.name()
    }

    fn timeout(&self) -> Duration {
        self.base.timeout()
    }

    fn run_timeout(&self) -> Duration {
        Duration::ZERO
    }

    async fn run(&self, ctx: CancellationToken) -> Result<(), TaskError> {
        let mut ticker = time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                _ = ctx.cancelled() => return Err(TaskError::Canceled),
                _ = ticker.tick() => {}
            }

            let tick = self.ticks.fetch_add(1, Ordering::Relaxed) + 1;
            let res = self.invoke(ctx.child_token(), tick).await;

            // An invocation cut short by shutdown is not a failure.
            match res {
                Err(e) if !ctx.is_cancelled() => {
                    self.failures.fetch_add(1, Ordering::Relaxed);
                    tracing::debug!(task = self.base.name(), tick, error = %e, "scheduled tick failed");
                }
                _ => {}
            }
        }
    }
}

impl<F, Fut> ScheduledTask<F>
where
    F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
{
    /// Runs one invocation under `tick_ctx`, cancelling it once the per-invocation
    /// timeout elapses. The future is awaited to completion either way.
    async fn invoke(&self, tick_ctx: CancellationToken, tick: u64) -> Result<(), TaskError> {
        let fut = (self.f)(tick_ctx.clone());
        tokio::pin!(fut);

        let timeout = self.base.timeout();
        if timeout == Duration::ZERO {
            return fut.await;
        }
        match time::timeout(timeout, &mut fut).await {
            Ok(res) => res,
            Err(_elapsed) => {
                tick_ctx.cancel();
                tracing::debug!(task = self.base.name(), tick, ?timeout, "scheduled tick deadline hit");
                fut.await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn noop(_ctx: CancellationToken) -> impl Future<Output = Result<(), TaskError>> {
        async { Ok(()) }
    }

    #[test]
    fn test_with_timeout_is_independent_of_interval() {
        let t = ScheduledTask::new("watch", Duration::from_millis(100), noop);
        assert_eq!(t.timeout(), Duration::ZERO);

        let t = t.with_timeout(Duration::from_secs(5));
        assert_eq!(t.name(), "watch");
        assert_eq!(t.interval(), Duration::from_millis(100));
        assert_eq!(t.timeout(), Duration::from_secs(5));
        assert_eq!(t.run_timeout(), Duration::ZERO);
    }

    #[test]
    fn test_zero_interval_is_raised() {
        let t = ScheduledTask::new("busy", Duration::ZERO, noop);
        assert_eq!(t.interval(), MIN_INTERVAL);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_until_cancelled() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        let t = ScheduledTask::new("tick", Duration::from_millis(100), move |_ctx: CancellationToken| {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Ok::<(), TaskError>(())
            }
        })
        .into_arc();

        let ctx = CancellationToken::new();
        let runner = {
            let t = Arc::clone(&t);
            let ctx = ctx.clone();
            tokio::spawn(async move { t.run(ctx).await })
        };

        time::sleep(Duration::from_millis(350)).await;
        ctx.cancel();
        let res = runner.await.expect("join");

        assert_eq!(res, Err(TaskError::Canceled));
        assert_eq!(count.load(Ordering::SeqCst), 3);
        assert_eq!(t.ticks(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_tick_does_not_stop_schedule() {
        let t = ScheduledTask::new("flaky", Duration::from_millis(50), |_ctx: CancellationToken| async {
            Err::<(), _>(TaskError::Fail {
                error: "provider down".into(),
            })
        })
        .into_arc();

        let ctx = CancellationToken::new();
        let runner = {
            let t = Arc::clone(&t);
            let ctx = ctx.clone();
            tokio::spawn(async move { t.run(ctx).await })
        };

        time::sleep(Duration::from_millis(275)).await;
        ctx.cancel();
        let _ = runner.await.expect("join");

        assert_eq!(t.ticks(), 5);
        assert_eq!(t.failures(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invocations_never_overlap() {
        let active = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));
        let (a, m) = (Arc::clone(&active), Arc::clone(&max_seen));

        let t = ScheduledTask::new("slow", Duration::from_millis(10), move |_ctx: CancellationToken| {
            let (a, m) = (Arc::clone(&a), Arc::clone(&m));
            async move {
                let now = a.fetch_add(1, Ordering::SeqCst) + 1;
                m.fetch_max(now, Ordering::SeqCst);
                time::sleep(Duration::from_millis(35)).await;
                a.fetch_sub(1, Ordering::SeqCst);
                Ok::<(), TaskError>(())
            }
        });

        let ctx = CancellationToken::new();
        let stop = ctx.clone();
        tokio::spawn(async move {
            time::sleep(Duration::from_millis(300)).await;
            stop.cancel();
        });

        assert_eq!(t.run(ctx).await, Err(TaskError::Canceled));
        assert_eq!(max_seen.load(Ordering::SeqCst), 1);
        assert!(t.ticks() >= 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_tick_is_cancelled_at_its_deadline() {
        let waited = Arc::new(std::sync::Mutex::new(Vec::new()));
        let w = Arc::clone(&waited);
        let t = ScheduledTask::new("rescore", Duration::from_millis(100), move |tick_ctx: CancellationToken| {
            let w = Arc::clone(&w);
            async move {
                let started = Instant::now();
                tick_ctx.cancelled().await;
                w.lock().expect("waited lock").push(started.elapsed());
                Err::<(), _>(TaskError::Canceled)
            }
        })
        .with_timeout(Duration::from_millis(30))
        .into_arc();

        let ctx = CancellationToken::new();
        let runner = {
            let t = Arc::clone(&t);
            let ctx = ctx.clone();
            tokio::spawn(async move { t.run(ctx).await })
        };

        // Ticks at 100ms and 200ms, each cut off 30ms later.
        time::sleep(Duration::from_millis(250)).await;
        assert!(!ctx.is_cancelled());
        ctx.cancel();
        assert_eq!(runner.await.expect("join"), Err(TaskError::Canceled));

        let waited = waited.lock().expect("waited lock").clone();
        assert_eq!(waited.len(), 2);
        for d in waited {
            assert!(d >= Duration::from_millis(30) && d < Duration::from_millis(100), "{d:?}");
        }
        assert_eq!(t.ticks(), 2);
        assert_eq!(t.failures(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_mid_tick_is_not_a_failure() {
        let t = ScheduledTask::new("export", Duration::from_millis(10), |tick_ctx: CancellationToken| async move {
            tick_ctx.cancelled().await;
            Err::<(), _>(TaskError::Canceled)
        })
        .into_arc();

        let ctx = CancellationToken::new();
        let runner = {
            let t = Arc::clone(&t);
            let ctx = ctx.clone();
            tokio::spawn(async move { t.run(ctx).await })
        };

        time::sleep(Duration::from_millis(50)).await;
        ctx.cancel();
        assert_eq!(runner.await.expect("join"), Err(TaskError::Canceled));
        assert_eq!(t.ticks(), 1);
        assert_eq!(t.failures(), 0);
    }
}
