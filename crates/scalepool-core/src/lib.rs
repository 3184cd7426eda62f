//! # scalepool-core
//!
//! Platform-agnostic data model for a self-scaling worker pool: the job
//! queue, the worker roster, the metric ring, trace snapshots, and the
//! controller's tunable parameters.
//!
//! This crate contains no thread-spawning or syscall-tracing code — that
//! lives in `scalepool-trace` and `scalepool-runtime`. Keeping the data
//! model free of OS calls means it can be unit-tested without touching a
//! real tracee or a real OS thread.
//!
//! ## Modules
//!
//! - `constants` - pool-wide limits and thresholds
//! - `error` - error types for construction and validation
//! - `env` - environment variable utilities
//! - `log` - kernel-style debug logging macros
//! - `job` - the tagged job union and scale commands
//! - `queue` - the single-mutex FIFO job queue
//! - `roster` - the live worker roster
//! - `snapshot` - trace snapshots and derived intervals
//! - `metric` - the bounded interval-datapoint ring
//! - `params` - controller tunables and the override-string parser

pub mod constants;
pub mod env;
pub mod error;
#[macro_use]
pub mod log;
pub mod job;
pub mod metric;
pub mod params;
pub mod queue;
pub mod roster;
pub mod snapshot;

pub use error::{CoreError, CoreResult};
pub use job::{Job, ScaleCommand, UserJob};
pub use metric::{IntervalDatapoint, MetricRing};
pub use params::AdapterTunables;
pub use queue::JobQueue;
pub use roster::{Worker, WorkerRoster};
pub use snapshot::{SyscallCounter, TraceInterval, TraceSnapshot};
