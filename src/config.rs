//! # Task manager configuration.
//!
//! Provides [`ManagerConfig`], the centralized settings for a [`TaskManager`](crate::TaskManager).
//!
//! Config is used in two ways:
//! 1. **Manager creation**: `TaskManager::builder(config).build()`
//! 2. **Task defaults**: `FuncTask::with_defaults(name, &config, f)`
//!
//! ## Sentinel values
//! - `timeout = 0s` → no per-task deadline
//! - `bus_capacity = 0` → clamped to 1

use std::time::Duration;

/// Configuration for a [`TaskManager`](crate::TaskManager).
///
/// ## Field semantics
/// - `grace`: How long [`shutdown_on_signal`](crate::TaskManager::shutdown_on_signal) waits for tasks to exit
/// - `bus_capacity`: Event bus ring buffer size (min 1)
/// - `timeout`: Default per-task deadline (`0s` = none)
///
/// All fields are public. Prefer the helper accessors over sprinkling sentinel checks.
#[derive(Clone, Debug)]
pub struct ManagerConfig {
    /// Maximum time to wait for cancelled tasks to exit on a signal-driven shutdown.
    ///
    /// Explicit calls to [`shutdown`](crate::TaskManager::shutdown) pass their own grace.
    pub grace: Duration,

    /// Capacity of the event bus broadcast channel.
    ///
    /// Receivers lagging by more than `bus_capacity` events skip the oldest ones.
    pub bus_capacity: usize,

    /// Default per-task timeout.
    ///
    /// - `Duration::ZERO` = no deadline
    /// - `> 0` = the task context is cancelled after this long
    pub timeout: Duration,
}

impl ManagerConfig {
    /// Returns the default per-task timeout as an `Option`.
    #[inline]
    pub fn default_timeout(&self) -> Option<Duration> {
        if self.timeout == Duration::ZERO {
            None
        } else {
            Some(self.timeout)
        }
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for ManagerConfig {
    /// Default configuration:
    ///
    /// - `grace = 30s`
    /// - `bus_capacity = 1024`
    /// - `timeout = 0s` (no deadline)
    fn default() -> Self {
        Self {
            grace: Duration::from_secs(30),
            bus_capacity: 1024,
            timeout: Duration::ZERO,
        }
    }
}
