//! The `TraceCapability` trait: the adapter's entire view of the kernel's
//! per-tracee syscall accounting.
//!
//! Grounded in `lib_traceset/traceset.h`'s free functions
//! (`register_traceset`, `register_traceset_target`,
//! `deregister_traceset_target`, `deregister_traceset`) and in the
//! teacher's habit of putting the trait in a `-core`/abstraction crate with
//! implementations living elsewhere (`ksvc_core::io_backend::IoBackend`,
//! implemented by `ksvc_module::fixed_pool`'s backends). A registration
//! returns an opaque [`TraceHandle`] instead of the C API's bare `int
//! traceset_id`, so a capability implementation can carry whatever context
//! (an fd, a mapped region, a syscall count) it needs to answer later calls.

use crate::error::TraceResult;
use scalepool_core::TraceSnapshot;

/// An opaque registration token returned by [`TraceCapability::register`].
/// Carries the syscall count so `snapshot` knows how many per-syscall
/// counters to decode without the caller re-supplying the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceHandle {
    pub(crate) id: u64,
    pub(crate) num_syscalls: usize,
}

impl TraceHandle {
    pub fn num_syscalls(&self) -> usize {
        self.num_syscalls
    }
}

/// Read-only access to cumulative kernel syscall accounting for a set of
/// tracee pids, as described by `spec.md` §6's trace capability contract.
///
/// Implementations must be safe to call from the pool's adapter-lock
/// holder only — `spec.md` §4.4 never calls these concurrently for the
/// same handle, so implementors are not required to support concurrent
/// `snapshot` calls against one handle, only `Send + Sync` to move the
/// capability itself into the pool.
pub trait TraceCapability: Send + Sync {
    /// Begin tracing `syscall_nrs` for the (initially empty) target set.
    /// Targets are added with [`add_target`](Self::add_target).
    fn register(&self, syscall_nrs: &[i32]) -> TraceResult<TraceHandle>;

    /// Add `pid` to the set of traced targets. Returns `false` if the pid
    /// is already a target or the attach failed.
    fn add_target(&self, handle: &TraceHandle, pid: i32) -> bool;

    /// Remove `pid` from the traced set. Its accumulated counts are
    /// retained in future snapshots (`spec.md` §6).
    fn remove_target(&self, handle: &TraceHandle, pid: i32) -> bool;

    /// Read the current cumulative counters for `handle`.
    fn snapshot(&self, handle: &TraceHandle) -> TraceSnapshot;

    /// Tear down a registration. `handle` must not be used afterward.
    fn deregister(&self, handle: TraceHandle);
}
