//! # LogWriter: events to `tracing`
//!
//! A subscriber that turns incoming [`Event`]s into `tracing` records, so the host
//! application decides formatting and filtering through its own subscriber.
//!
//! ## Levels
//! - `debug`: spawned, starting, stopped
//! - `info`: shutdown requested, all stopped within grace
//! - `warn`: task failed, timeout hit, spawn rejected, grace exceeded, subscriber overflow
//! - `error`: subscriber panicked
//!
//! ## Example
//! ```rust,no_run
//! use std::sync::Arc;
//! use taskherd::{LogWriter, ManagerConfig, Subscribe, TaskManager};
//!
//! # async fn demo() {
//! let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
//! let manager = TaskManager::builder(ManagerConfig::default())
//!     .with_subscribers(subs)
//!     .build();
//! # let _ = manager;
//! # }
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let task = e.task.as_deref().unwrap_or("-");
        let reason = e.reason.as_deref().unwrap_or("");

        match e.kind {
            EventKind::TaskSpawned => {
                tracing::debug!(task, id = e.task_id, timeout_ms = e.timeout_ms, "task spawned");
            }
            EventKind::TaskStarting => {
                tracing::debug!(task, id = e.task_id, "task starting");
            }
            EventKind::TaskStopped => {
                tracing::debug!(task, id = e.task_id, elapsed_ms = e.elapsed_ms, "task stopped");
            }
            EventKind::TaskFailed => {
                tracing::warn!(
                    task,
                    id = e.task_id,
                    elapsed_ms = e.elapsed_ms,
                    error = reason,
                    "task failed"
                );
            }
            EventKind::TimeoutHit => {
                tracing::warn!(task, id = e.task_id, timeout_ms = e.timeout_ms, "task deadline hit");
            }
            EventKind::SpawnRejected => {
                tracing::warn!(task, "spawn rejected: shutting down");
            }
            EventKind::ShutdownRequested => {
                tracing::info!("shutdown requested");
            }
            EventKind::AllStoppedWithin => {
                tracing::info!("all tasks stopped within grace");
            }
            EventKind::GraceExceeded => {
                tracing::warn!(stuck = reason, "shutdown grace exceeded");
            }
            EventKind::SubscriberOverflow => {
                tracing::warn!(subscriber = task, reason, "subscriber dropped event");
            }
            EventKind::SubscriberPanicked => {
                tracing::error!(subscriber = task, info = reason, "subscriber panicked");
            }
        }
    }

    fn name(&self) -> &'static str {
        "log-writer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().expect("capture lock").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn line(&self, msg: &str) -> String {
            let out = String::from_utf8(self.0.lock().expect("capture lock").clone()).expect("utf8");
            out.lines()
                .find(|l| l.contains(msg))
                .unwrap_or_else(|| panic!("no {msg:?} record in:\n{out}"))
                .to_string()
        }
    }

    #[tokio::test]
    async fn test_levels_follow_event_severity() {
        let captured = Captured::default();
        let sink = captured.clone();
        let collector = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .without_time()
            .with_writer(move || sink.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(collector);

        let writer = LogWriter::new();
        writer
            .on_event(&Event::new(EventKind::TaskStopped).with_task("import").with_task_id(1))
            .await;
        writer
            .on_event(
                &Event::new(EventKind::TaskFailed)
                    .with_task("import")
                    .with_task_id(2)
                    .with_reason("provider down"),
            )
            .await;
        writer
            .on_event(&Event::new(EventKind::GraceExceeded).with_reason("export,ping"))
            .await;
        writer.on_event(&Event::new(EventKind::ShutdownRequested)).await;

        assert!(captured.line("task stopped").contains("DEBUG"));

        let failed = captured.line("task failed");
        assert!(failed.contains("WARN"), "{failed}");
        assert!(failed.contains("provider down"), "{failed}");

        let grace = captured.line("shutdown grace exceeded");
        assert!(grace.contains("WARN"), "{grace}");
        assert!(grace.contains("export,ping"), "{grace}");

        assert!(captured.line("shutdown requested").contains("INFO"));
    }
}
