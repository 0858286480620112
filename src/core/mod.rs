//! Manager core: execution and lifecycle.
//!
//! The public API from this module is [`TaskManager`] (with its builder) and [`TaskResult`].
//!
//! Internal modules:
//! - [`manager`]: admission, result collection, graceful shutdown;
//! - [`runner`]: runs one task with its deadline, panic capture and event publishing;
//! - [`results`]: result records and the append-only log;
//! - [`running`]: ids and names of tasks still executing;
//! - [`shutdown`]: cross-platform termination signal handling;
//! - [`builder`]: manager construction and subscriber wiring.

mod builder;
mod manager;
mod results;
mod runner;
mod running;
mod shutdown;

pub use builder::TaskManagerBuilder;
pub use manager::TaskManager;
pub use results::TaskResult;
