//! # scalepool
//!
//! A self-scaling pool of OS-thread workers driven by a workload-observing
//! feedback controller.
//!
//! This crate is the public entry point; `scalepool-core`, `scalepool-trace`
//! and `scalepool-runtime` hold the data model, the trace-capability
//! abstraction, and the worker/pool/adapter implementation respectively.
//!
//! ## Quick start
//!
//! ```ignore
//! use scalepool::{AdapterParamsBuilder, Pool, PoolConfig};
//! use scalepool_trace::MmapTraceCapability;
//! use std::sync::Arc;
//!
//! let trace = Arc::new(MmapTraceCapability::new());
//! let params = AdapterParamsBuilder::new()
//!     .interval_ms(1000)
//!     .step_size(1)
//!     .observed_syscalls(vec![libc::SYS_read as i32, libc::SYS_write as i32])
//!     .build()
//!     .expect("valid tunables");
//!
//! let pool = Pool::create(4, PoolConfig::from_env(), Some((params, trace)))
//!     .expect("pool construction");
//! pool.submit(|| println!("hello from a worker"));
//! pool.wait();
//! pool.destroy();
//! ```

mod builder;
mod error;

pub use builder::AdapterParamsBuilder;
pub use error::{PoolError, PoolResult};

pub use scalepool_runtime::{AdapterParams, MetricFn, Pool, PoolConfig};

pub use scalepool_core::{
    AdapterTunables, CoreError, CoreResult, IntervalDatapoint, Job, MetricRing, ScaleCommand,
    SyscallCounter, TraceInterval, TraceSnapshot,
};

pub use scalepool_trace::{
    FakeTraceCapability, MmapTraceCapability, TraceCapability, TraceError, TraceHandle, TraceResult,
};
