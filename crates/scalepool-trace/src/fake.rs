//! `FakeTraceCapability` — a deterministic in-memory [`TraceCapability`]
//! double for adapter unit tests.
//!
//! Plain `Mutex`-guarded state rather than a simulated memory mapping:
//! there is no kernel or process boundary to cross in a test, so there is
//! nothing for `SharedRegion`'s volatile-load machinery to buy here. Tests
//! drive the counters directly with [`FakeTraceCapability::advance`]
//! instead of waiting on a real tracer.

use crate::capability::{TraceCapability, TraceHandle};
use crate::error::{TraceError, TraceResult};
use scalepool_core::TraceSnapshot;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

struct FakeRegistration {
    targets: Vec<i32>,
    snapshot: TraceSnapshot,
}

/// A capability whose counters only ever change when a test calls
/// [`advance`](Self::advance), making adapter decisions fully reproducible.
pub struct FakeTraceCapability {
    next_id: AtomicU64,
    registrations: Mutex<HashMap<u64, FakeRegistration>>,
}

impl Default for FakeTraceCapability {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeTraceCapability {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(0),
            registrations: Mutex::new(HashMap::new()),
        }
    }

    /// The handle of the sole live registration, for callers (typically
    /// integration tests) that only ever register once and don't have
    /// their own copy of the `TraceHandle` a downstream component such as
    /// an `Adapter` registered internally.
    ///
    /// # Panics
    /// Panics if there is not exactly one live registration.
    pub fn only_handle(&self) -> TraceHandle {
        let regs = self.registrations.lock().unwrap();
        let mut ids = regs.keys().copied();
        let id = ids.next().expect("no live registration");
        assert!(ids.next().is_none(), "more than one live registration");
        TraceHandle {
            id,
            num_syscalls: regs[&id].snapshot.syscalls.len(),
        }
    }

    /// Add `delta` to the accumulated counters for `handle`, as a real
    /// tracer would between two snapshots. `delta.target_count` is ignored;
    /// the live target count always comes from `add_target`/`remove_target`.
    pub fn advance(&self, handle: &TraceHandle, delta: &TraceSnapshot) {
        let mut regs = self.registrations.lock().unwrap();
        if let Some(reg) = regs.get_mut(&handle.id) {
            reg.snapshot.read_bytes += delta.read_bytes;
            reg.snapshot.write_bytes += delta.write_bytes;
            for (counter, d) in reg.snapshot.syscalls.iter_mut().zip(delta.syscalls.iter()) {
                counter.count += d.count;
                counter.total_time_ns += d.total_time_ns;
            }
        }
    }
}

impl TraceCapability for FakeTraceCapability {
    fn register(&self, syscall_nrs: &[i32]) -> TraceResult<TraceHandle> {
        if syscall_nrs.is_empty() {
            return Err(TraceError::RegistrationFailed(
                "no syscalls requested".to_string(),
            ));
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.registrations.lock().unwrap().insert(
            id,
            FakeRegistration {
                targets: Vec::new(),
                snapshot: TraceSnapshot::zeroed(syscall_nrs.len()),
            },
        );
        Ok(TraceHandle {
            id,
            num_syscalls: syscall_nrs.len(),
        })
    }

    fn add_target(&self, handle: &TraceHandle, pid: i32) -> bool {
        let mut regs = self.registrations.lock().unwrap();
        let Some(reg) = regs.get_mut(&handle.id) else {
            return false;
        };
        if reg.targets.contains(&pid) {
            return false;
        }
        reg.targets.push(pid);
        reg.snapshot.target_count = reg.targets.len() as u32;
        true
    }

    fn remove_target(&self, handle: &TraceHandle, pid: i32) -> bool {
        let mut regs = self.registrations.lock().unwrap();
        let Some(reg) = regs.get_mut(&handle.id) else {
            return false;
        };
        let before = reg.targets.len();
        reg.targets.retain(|&t| t != pid);
        let removed = reg.targets.len() != before;
        if removed {
            reg.snapshot.target_count = reg.targets.len() as u32;
        }
        removed
    }

    fn snapshot(&self, handle: &TraceHandle) -> TraceSnapshot {
        self.registrations
            .lock()
            .unwrap()
            .get(&handle.id)
            .map(|r| r.snapshot.clone())
            .unwrap_or_else(|| TraceSnapshot::zeroed(handle.num_syscalls))
    }

    fn deregister(&self, handle: TraceHandle) {
        self.registrations.lock().unwrap().remove(&handle.id);
    }
}
