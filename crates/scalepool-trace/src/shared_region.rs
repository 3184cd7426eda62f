//! `SharedRegion` — a decoder/encoder for the fixed-offset trace layout
//! described in `spec.md` §6: `target_count(u32)`, `read_bytes(u64)`,
//! `write_bytes(u64)`, then one `(count u32, total_time u64)` pair per
//! observed syscall, in the order the capability was registered with.
//!
//! Adapted directly from `ksvc_module::mmap_shared_page::MmapSharedPage`:
//! a raw pointer into memory some other component owns, read through
//! `ptr::read_volatile` at pre-computed byte offsets. There, the kernel
//! module is the sole writer and `MmapSharedPage` only decodes; here,
//! `SharedRegion` plays the same role so any real deployment need only
//! `mmap` its tracer's region (a kernel module's char device, a `ptrace`
//! sampler's shared buffer, …) and hand the pointer to
//! [`SharedRegion::from_ptr`] — this crate never assumes which.
//!
//! Field padding mirrors the teacher's `repr(C)` shared-page convention:
//! every field is placed on its natural alignment boundary, so the u32
//! `count` of each syscall entry is padded to 8 bytes before the u64
//! `total_time` that follows it.

use scalepool_core::{SyscallCounter, TraceSnapshot};
use std::ptr;

const HEADER_LEN: usize = 24; // target_count(4, padded to 8) + read_bytes(8) + write_bytes(8)
const ENTRY_LEN: usize = 16; // count(4, padded to 8) + total_time(8)

mod offset {
    pub const TARGET_COUNT: usize = 0;
    pub const READ_BYTES: usize = 8;
    pub const WRITE_BYTES: usize = 16;
    pub const SYSCALLS: usize = super::HEADER_LEN;
}

/// The byte length of a region sized for `num_syscalls` observed syscalls.
pub fn region_len(num_syscalls: usize) -> usize {
    HEADER_LEN + num_syscalls * ENTRY_LEN
}

/// A read/write view over a trace region laid out per `spec.md` §6.
///
/// Does not own the memory it points at — the caller (or a higher-level
/// capability implementation) is responsible for mapping and unmapping it.
pub struct SharedRegion {
    ptr: *mut u8,
    num_syscalls: usize,
}

// Safety: every access is a volatile load/store at a fixed offset; the
// region itself carries no interior pointers or non-`Send` payload.
unsafe impl Send for SharedRegion {}
unsafe impl Sync for SharedRegion {}

impl SharedRegion {
    /// Wrap a pointer to an already-mapped region of at least
    /// `region_len(num_syscalls)` bytes.
    ///
    /// # Safety
    /// `ptr` must be valid, writable, and mapped for at least
    /// `region_len(num_syscalls)` bytes for the lifetime of the returned
    /// `SharedRegion`.
    pub unsafe fn from_ptr(ptr: *mut u8, num_syscalls: usize) -> Self {
        Self { ptr, num_syscalls }
    }

    #[inline(always)]
    unsafe fn read_u32(&self, offset: usize) -> u32 {
        ptr::read_volatile(self.ptr.add(offset) as *const u32)
    }

    #[inline(always)]
    unsafe fn read_u64(&self, offset: usize) -> u64 {
        ptr::read_volatile(self.ptr.add(offset) as *const u64)
    }

    #[inline(always)]
    unsafe fn write_u32(&self, offset: usize, value: u32) {
        ptr::write_volatile(self.ptr.add(offset) as *mut u32, value);
    }

    #[inline(always)]
    unsafe fn write_u64(&self, offset: usize, value: u64) {
        ptr::write_volatile(self.ptr.add(offset) as *mut u64, value);
    }

    /// The wrapped pointer, for a capability implementation that owns the
    /// mapping and needs to unmap it later.
    pub fn raw_ptr(&self) -> *mut u8 {
        self.ptr
    }

    pub fn target_count(&self) -> u32 {
        unsafe { self.read_u32(offset::TARGET_COUNT) }
    }

    pub fn set_target_count(&self, count: u32) {
        unsafe { self.write_u32(offset::TARGET_COUNT, count) }
    }

    /// Decode the region into an owned, typed snapshot.
    pub fn decode(&self) -> TraceSnapshot {
        let mut syscalls = Vec::with_capacity(self.num_syscalls);
        for i in 0..self.num_syscalls {
            let base = offset::SYSCALLS + i * ENTRY_LEN;
            unsafe {
                syscalls.push(SyscallCounter {
                    count: self.read_u32(base),
                    total_time_ns: self.read_u64(base + 8),
                });
            }
        }
        unsafe {
            TraceSnapshot {
                target_count: self.read_u32(offset::TARGET_COUNT),
                read_bytes: self.read_u64(offset::READ_BYTES),
                write_bytes: self.read_u64(offset::WRITE_BYTES),
                syscalls,
            }
        }
    }

    /// Overwrite the region with the contents of `snapshot`. Used by a
    /// writer-side capability implementation (e.g. a userspace sampler that
    /// owns the same mapping) — never by the adapter, which only decodes.
    pub fn encode(&self, snapshot: &TraceSnapshot) {
        unsafe {
            self.write_u32(offset::TARGET_COUNT, snapshot.target_count);
            self.write_u64(offset::READ_BYTES, snapshot.read_bytes);
            self.write_u64(offset::WRITE_BYTES, snapshot.write_bytes);
        }
        for (i, counter) in snapshot.syscalls.iter().enumerate().take(self.num_syscalls) {
            let base = offset::SYSCALLS + i * ENTRY_LEN;
            unsafe {
                self.write_u32(base, counter.count);
                self.write_u64(base + 8, counter.total_time_ns);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_region<F: FnOnce(SharedRegion)>(num_syscalls: usize, f: F) {
        let mut buf = vec![0u8; region_len(num_syscalls)];
        let region = unsafe { SharedRegion::from_ptr(buf.as_mut_ptr(), num_syscalls) };
        f(region);
    }

    #[test]
    fn round_trips_through_encode_decode() {
        with_region(2, |region| {
            let snapshot = TraceSnapshot {
                target_count: 3,
                read_bytes: 4096,
                write_bytes: 2048,
                syscalls: vec![
                    SyscallCounter { count: 10, total_time_ns: 500 },
                    SyscallCounter { count: 20, total_time_ns: 900 },
                ],
            };
            region.encode(&snapshot);
            assert_eq!(region.decode(), snapshot);
        });
    }

    #[test]
    fn set_target_count_is_visible_in_decode() {
        with_region(0, |region| {
            region.set_target_count(7);
            assert_eq!(region.decode().target_count, 7);
        });
    }
}
