//! # scalepool-trace
//!
//! The trace capability abstraction: the adapter's only window into kernel
//! syscall activity for a pool's workers.
//!
//! - `capability` - the `TraceCapability` trait and its opaque handle
//! - `error` - registration/availability errors
//! - `shared_region` - fixed-offset decode/encode over a mapped region
//! - `mmap_capability` - a real, anonymously-mapped capability implementation
//! - `fake` - a deterministic in-memory double for tests

pub mod capability;
pub mod error;
pub mod fake;
pub mod mmap_capability;
pub mod shared_region;

pub use capability::{TraceCapability, TraceHandle};
pub use error::{TraceError, TraceResult};
pub use fake::FakeTraceCapability;
pub use mmap_capability::MmapTraceCapability;
pub use shared_region::SharedRegion;
