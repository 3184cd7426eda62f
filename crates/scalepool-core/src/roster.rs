//! The live worker roster.
//!
//! Grounded in `adaptive_tpool.c`'s `worker_list` (a singly linked list of
//! `struct worker` nodes, manually unlinked with `free()` in
//! `remove_worker`). Per `spec.md` §9 ("Ownership of jobs and workers via
//! raw pointers and singly linked lists with manual `free`") we replace it
//! with a value-owning `Vec<Worker>` behind one mutex — the "roster mutex"
//! of `spec.md` §5, held only during insert/unlink and never across a user
//! job.

use std::sync::Mutex;
use std::thread::JoinHandle;

/// One live worker: a stable `wid` (never reused within a pool's lifetime),
/// its OS-thread join handle, and the kernel task id it registered as a
/// tracee under (`-1` until the worker has learned its own tid at start-up).
pub struct Worker {
    pub wid: u64,
    pub kernel_tid: i32,
    pub handle: Option<JoinHandle<()>>,
}

impl Worker {
    pub fn new(wid: u64) -> Self {
        Self {
            wid,
            kernel_tid: -1,
            handle: None,
        }
    }
}

struct RosterInner {
    workers: Vec<Worker>,
    max_id: Option<u64>,
}

/// The pool's worker roster. Only the pool (and, transitively, the worker
/// loop acting on the pool's behalf) mutates this.
pub struct WorkerRoster {
    inner: Mutex<RosterInner>,
}

impl Default for WorkerRoster {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkerRoster {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(RosterInner {
                workers: Vec::new(),
                max_id: None,
            }),
        }
    }

    /// Allocate the next `wid` (`max_id + 1`, or `0` if the roster is
    /// empty) without yet inserting a worker for it. Reserving the id
    /// before the thread is spawned lets the spawning closure capture its
    /// own `wid`.
    pub fn allocate_wid(&self) -> u64 {
        let mut inner = self.inner.lock().unwrap();
        let next = match inner.max_id {
            Some(id) => id + 1,
            None => 0,
        };
        inner.max_id = Some(next);
        next
    }

    /// Insert a spawned worker into the roster.
    pub fn insert(&self, worker: Worker) {
        let mut inner = self.inner.lock().unwrap();
        inner.workers.push(worker);
    }

    /// Atomically check the `max` ceiling and reserve the next `wid` in one
    /// roster-lock critical section, inserting a placeholder `Worker` (no
    /// thread handle yet) to claim the slot immediately. A separate
    /// check-then-allocate would let two concurrent callers both observe
    /// `amount() < max` and both proceed, pinning the roster above `max`
    /// permanently instead of only while a single scale command is being
    /// processed. Returns `None` if the roster is already at `max`.
    pub fn try_reserve_wid(&self, max: usize) -> Option<u64> {
        let mut inner = self.inner.lock().unwrap();
        if inner.workers.len() >= max {
            return None;
        }
        let next = match inner.max_id {
            Some(id) => id + 1,
            None => 0,
        };
        inner.max_id = Some(next);
        inner.workers.push(Worker::new(next));
        Some(next)
    }

    /// Attach a spawned thread's join handle to a worker reserved by
    /// [`try_reserve_wid`](Self::try_reserve_wid).
    pub fn set_handle(&self, wid: u64, handle: JoinHandle<()>) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(w) = inner.workers.iter_mut().find(|w| w.wid == wid) {
            w.handle = Some(handle);
        }
    }

    /// Unlink and return the worker with the given `wid`, if present.
    pub fn remove(&self, wid: u64) -> Option<Worker> {
        let mut inner = self.inner.lock().unwrap();
        let pos = inner.workers.iter().position(|w| w.wid == wid)?;
        Some(inner.workers.remove(pos))
    }

    /// Record the kernel task id a worker learned for itself at start-up.
    pub fn set_kernel_tid(&self, wid: u64, tid: i32) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(w) = inner.workers.iter_mut().find(|w| w.wid == wid) {
            w.kernel_tid = tid;
        }
    }

    /// Current live worker count (`amount` in `spec.md` §3).
    pub fn amount(&self) -> usize {
        self.inner.lock().unwrap().workers.len()
    }

    /// Highest `wid` ever allocated.
    pub fn max_id(&self) -> Option<u64> {
        self.inner.lock().unwrap().max_id
    }

    /// Drain every worker out of the roster, returning their join handles
    /// for the caller to wait on. Used by `Pool::destroy`.
    pub fn drain(&self) -> Vec<Worker> {
        let mut inner = self.inner.lock().unwrap();
        inner.workers.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wids_assigned_sequentially_from_zero() {
        let roster = WorkerRoster::new();
        assert_eq!(roster.allocate_wid(), 0);
        assert_eq!(roster.allocate_wid(), 1);
        assert_eq!(roster.allocate_wid(), 2);
        assert_eq!(roster.max_id(), Some(2));
    }

    #[test]
    fn insert_and_remove_tracks_amount() {
        let roster = WorkerRoster::new();
        let wid = roster.allocate_wid();
        roster.insert(Worker::new(wid));
        assert_eq!(roster.amount(), 1);
        let removed = roster.remove(wid).unwrap();
        assert_eq!(removed.wid, wid);
        assert_eq!(roster.amount(), 0);
    }

    #[test]
    fn try_reserve_wid_declines_at_ceiling_and_counts_immediately() {
        let roster = WorkerRoster::new();
        let a = roster.try_reserve_wid(2).expect("below ceiling");
        assert_eq!(roster.amount(), 1); // counted as soon as reserved, not once running
        let b = roster.try_reserve_wid(2).expect("still below ceiling");
        assert_ne!(a, b);
        assert_eq!(roster.amount(), 2);
        assert!(roster.try_reserve_wid(2).is_none());
        assert_eq!(roster.amount(), 2);
    }

    #[test]
    fn wid_never_reused_after_removal() {
        let roster = WorkerRoster::new();
        let a = roster.allocate_wid();
        roster.insert(Worker::new(a));
        roster.remove(a);
        let b = roster.allocate_wid();
        assert_ne!(a, b);
        assert_eq!(b, a + 1);
    }
}
