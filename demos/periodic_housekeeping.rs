//! # Example: periodic_housekeeping
//!
//! Runs the background jobs of an idea-scoring tool on one [`TaskManager`]:
//! - `rescore-stale`: periodic job re-scoring stale ideas (fails now and then)
//! - `provider-ping`: periodic health check against an LLM provider
//! - `import-batch`: one-shot job with its own deadline
//! - `stubborn-export`: one-shot job that ignores cancellation
//!
//! Events are logged through [`LogWriter`] on a `tracing_subscriber` fmt layer.
//! After a few seconds (or on Ctrl-C) the manager shuts down with a bounded grace.
//!
//! ## Flow
//! ```text
//! main()
//!   ├─► spawn rescore-stale, provider-ping, import-batch, stubborn-export
//!   ├─► wait 3s or a termination signal
//!   ├─► shutdown(grace = 1s)
//!   │     ├─ cooperative tasks return Err(Canceled)
//!   │     └─ stubborn-export is still running → GraceExceeded (warned, not fatal)
//!   └─► print every TaskResult
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=debug cargo run --example periodic_housekeeping
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use taskherd::{
    FuncTask, LogWriter, ManagerConfig, ScheduledTask, Subscribe, TaskError, TaskManager,
};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = ManagerConfig {
        grace: Duration::from_secs(1),
        timeout: Duration::from_secs(2),
        ..ManagerConfig::default()
    };
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let manager = TaskManager::builder(cfg.clone()).with_subscribers(subs).build();

    let pass = Arc::new(AtomicU64::new(0));
    let rescore = {
        let pass = Arc::clone(&pass);
        ScheduledTask::new("rescore-stale", Duration::from_millis(400), move |_ctx: CancellationToken| {
            let pass = Arc::clone(&pass);
            async move {
                let n = pass.fetch_add(1, Ordering::Relaxed) + 1;
                if n % 3 == 0 {
                    return Err(TaskError::Fail {
                        error: format!("scoring pass #{n}: database busy"),
                    });
                }
                tracing::info!(pass = n, "re-scored stale ideas");
                Ok(())
            }
        })
        .into_arc()
    };
    manager.spawn_ref(rescore.clone())?;

    manager.spawn(ScheduledTask::new(
        "provider-ping",
        Duration::from_millis(700),
        |ctx: CancellationToken| async move {
            tokio::select! {
                _ = tokio::time::sleep(Duration::from_millis(50)) => {
                    tracing::info!("provider healthy");
                    Ok(())
                }
                _ = ctx.cancelled() => Err(TaskError::Canceled),
            }
        },
    )
    // each ping gets 200ms; the schedule itself runs until shutdown
    .with_timeout(Duration::from_millis(200)))?;

    manager.spawn(FuncTask::with_defaults("import-batch", &cfg, |ctx: CancellationToken| async move {
        // Takes longer than the 2s default deadline; stops when told to.
        tokio::select! {
            _ = tokio::time::sleep(Duration::from_secs(10)) => Ok(()),
            _ = ctx.cancelled() => Err(TaskError::Canceled),
        }
    }))?;

    manager.spawn(FuncTask::new(
        "stubborn-export",
        Duration::from_secs(1),
        |_ctx: CancellationToken| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<(), TaskError>(())
        },
    ))?;

    tokio::select! {
        _ = tokio::time::sleep(Duration::from_secs(3)) => {}
        _ = tokio::signal::ctrl_c() => {}
    }

    if let Err(e) = manager.shutdown(cfg.grace).await {
        tracing::warn!(error = %e, label = e.as_label(), "shutdown incomplete; exiting anyway");
    }

    println!(
        "spawned={} finished={} rescore ticks={} failures={}",
        manager.task_count(),
        manager.results().len(),
        rescore.ticks(),
        rescore.failures(),
    );
    for r in manager.results() {
        match r.error() {
            None => println!("  {:<16} ok      {:?}", r.name(), r.duration()),
            Some(e) => println!("  {:<16} {:<7} {:?}", r.name(), e.as_label(), r.duration()),
        }
    }
    Ok(())
}
