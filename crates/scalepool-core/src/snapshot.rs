//! Trace snapshots and the interval derived from two successive snapshots.
//!
//! Grounded in `dynamic_traceset/lib_traceset/traceset.h`'s `traceset`
//! struct (`amount_targets`, `read_bytes`, `write_bytes`, and a parallel
//! array of `(count, total_time)` per traced syscall) and
//! `scaling.c`'s `diff_traceset`/`copy_traceset`. `spec.md` §9 calls out
//! "Callback into untyped interval data" as a structural issue to fix; here
//! the interval handed to the user's metric callback is an explicit,
//! documented struct instead of a raw buffer the caller must decode.

use std::ops::Sub;

/// Per-syscall cumulative accounting: call count and accumulated time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyscallCounter {
    pub count: u32,
    pub total_time_ns: u64,
}

impl Sub for SyscallCounter {
    type Output = SyscallCounter;

    fn sub(self, rhs: SyscallCounter) -> SyscallCounter {
        SyscallCounter {
            count: self.count.saturating_sub(rhs.count),
            total_time_ns: self.total_time_ns.saturating_sub(rhs.total_time_ns),
        }
    }
}

/// Cumulative counters captured at a point in time, matching the shared
/// region layout documented in `spec.md` §6: `target_count`, `read_bytes`,
/// `write_bytes`, then one `SyscallCounter` per observed syscall number (in
/// the same order as `AdapterParams::observed_syscalls`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceSnapshot {
    pub target_count: u32,
    pub read_bytes: u64,
    pub write_bytes: u64,
    pub syscalls: Vec<SyscallCounter>,
}

impl TraceSnapshot {
    pub fn zeroed(num_syscalls: usize) -> Self {
        Self {
            target_count: 0,
            read_bytes: 0,
            write_bytes: 0,
            syscalls: vec![SyscallCounter::default(); num_syscalls],
        }
    }

    /// Scalar field-by-field subtraction (`self` assumed later-in-time than
    /// `earlier`), matching `diff_traceset`. Saturating, since the trace
    /// capability's counters are monotonically non-decreasing per
    /// `spec.md` §6 except when targets are removed, in which case their
    /// contribution is retained rather than subtracted out.
    pub fn diff(&self, earlier: &TraceSnapshot) -> TraceSnapshot {
        let syscalls = self
            .syscalls
            .iter()
            .zip(earlier.syscalls.iter())
            .map(|(later, earlier)| *later - *earlier)
            .collect();
        TraceSnapshot {
            target_count: self.target_count,
            read_bytes: self.read_bytes.saturating_sub(earlier.read_bytes),
            write_bytes: self.write_bytes.saturating_sub(earlier.write_bytes),
            syscalls,
        }
    }
}

/// The interval datum handed to the user's `calc_scale_metric` /
/// `calc_idle_metric` callbacks (`AdapterParams`, `spec.md` §3).
///
/// `syscalls` is parallel to the `observed_syscalls` list the adapter was
/// configured with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceInterval {
    pub start_ms: u64,
    pub end_ms: u64,
    pub read_bytes: u64,
    pub write_bytes: u64,
    pub target_count: u32,
    pub syscalls: Vec<SyscallCounter>,
}

impl TraceInterval {
    pub fn duration_ms(&self) -> u64 {
        self.end_ms.saturating_sub(self.start_ms)
    }
}
