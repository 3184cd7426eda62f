//! `MmapTraceCapability` — a [`TraceCapability`] backed by an anonymously
//! mapped [`SharedRegion`], owning its own memory end to end (unlike
//! `SharedRegion` itself, which only decodes memory someone else mapped).
//!
//! Registration and target bookkeeping are real: each `register` call maps
//! a fresh region sized for the requested syscalls, and `add_target` /
//! `remove_target` maintain the live target count visible in `decode()`'s
//! `target_count` field under a per-registration lock — the one piece of
//! accounting a userspace capability can always do itself. The
//! read/write-byte and per-syscall counters are left at zero unless a
//! deployment's sampler writes into the same mapping (e.g. by calling
//! [`SharedRegion::encode`] from the side that actually observes syscalls);
//! this mirrors `ksvc_module::MmapSharedPage`, which likewise only decodes
//! a page some other writer populates.

use crate::capability::{TraceCapability, TraceHandle};
use crate::error::{TraceError, TraceResult};
use crate::shared_region::{region_len, SharedRegion};
use nix::sys::mman::{mmap_anonymous, munmap, MapFlags, ProtFlags};
use scalepool_core::TraceSnapshot;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::ptr::NonNull;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

struct Registration {
    region: SharedRegion,
    len: usize,
    targets: Vec<i32>,
}

// Safety: the mapping is exclusively owned by this `Registration` and
// accessed only through `SharedRegion`'s volatile load/store helpers.
unsafe impl Send for Registration {}

pub struct MmapTraceCapability {
    next_id: AtomicU64,
    registrations: Mutex<HashMap<u64, Registration>>,
}

impl Default for MmapTraceCapability {
    fn default() -> Self {
        Self::new()
    }
}

impl MmapTraceCapability {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(0),
            registrations: Mutex::new(HashMap::new()),
        }
    }
}

impl TraceCapability for MmapTraceCapability {
    fn register(&self, syscall_nrs: &[i32]) -> TraceResult<TraceHandle> {
        let len = region_len(syscall_nrs.len());
        let len_nz = NonZeroUsize::new(len.max(1))
            .ok_or_else(|| TraceError::RegistrationFailed("zero-length region".to_string()))?;
        let ptr: NonNull<std::ffi::c_void> = unsafe {
            mmap_anonymous(
                None,
                len_nz,
                ProtFlags::PROT_READ | ProtFlags::PROT_WRITE,
                MapFlags::MAP_PRIVATE,
            )
            .map_err(|e| TraceError::Unavailable(e.to_string()))?
        };
        let region = unsafe { SharedRegion::from_ptr(ptr.as_ptr() as *mut u8, syscall_nrs.len()) };
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.registrations.lock().unwrap().insert(
            id,
            Registration {
                region,
                len,
                targets: Vec::new(),
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
        reg.region.set_target_count(reg.targets.len() as u32);
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
            reg.region.set_target_count(reg.targets.len() as u32);
        }
        removed
    }

    fn snapshot(&self, handle: &TraceHandle) -> TraceSnapshot {
        let regs = self.registrations.lock().unwrap();
        match regs.get(&handle.id) {
            Some(reg) => reg.region.decode(),
            None => TraceSnapshot::zeroed(handle.num_syscalls),
        }
    }

    fn deregister(&self, handle: TraceHandle) {
        let mut regs = self.registrations.lock().unwrap();
        if let Some(reg) = regs.remove(&handle.id) {
            if let Some(ptr) = NonNull::new(reg.region.raw_ptr() as *mut std::ffi::c_void) {
                unsafe {
                    let _ = munmap(ptr, reg.len);
                }
            }
        }
    }
}
