//! The job queue: a single-mutex FIFO of tagged `Job`s with a dedicated
//! push-front for scale commands.
//!
//! Grounded in `adaptive_tpool.c`'s `jobqueue` (a singly linked list guarded
//! by a CAS spin-lock: `while (!atomic_compare_exchange_weak(&lock, ...))`).
//! Per `spec.md` §9 ("Multiple concurrency primitives used inconsistently")
//! we replace the CAS spin-lock over a hand-rolled linked list with a single
//! `Mutex<VecDeque<Job>>` plus a `Condvar` for wake-on-push, matching the
//! teacher's own preferred primitive set (`SchedMutex`/`SpinLock` — one lock
//! type per concern, no mixed CAS/spin/mutex patterns).

use crate::job::{Job, ScaleCommand};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Condvar, Mutex};
use std::time::Duration;

/// Thread-safe FIFO of [`Job`]s.
///
/// `push_user` appends at the tail; `push_scale`/`push_scale_n` prepend at
/// the head, so scale commands preempt queued user jobs (the spec's
/// intentional ordering exception — see `spec.md` §3 and §5).
pub struct JobQueue {
    inner: Mutex<VecDeque<Job>>,
    not_empty: Condvar,
    /// Advisory length, kept in sync under `inner`'s lock. Read outside the
    /// lock only as a hint (`spec.md` §4.1: "size is read outside the lock
    /// only as an advisory hint").
    len_hint: AtomicUsize,
}

impl Default for JobQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl JobQueue {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(VecDeque::new()),
            not_empty: Condvar::new(),
            len_hint: AtomicUsize::new(0),
        }
    }

    /// Append a user job at the tail. Always succeeds — the `bool` return
    /// is kept for parity with the C API's `tpool_submit_job` in
    /// `spec.md` §6, whose only other failure mode (a null function) is
    /// rejected before a `Job` is ever constructed.
    pub fn push_user(&self, job: Job) -> bool {
        debug_assert!(job.is_user());
        let mut guard = self.inner.lock().unwrap();
        guard.push_back(job);
        self.len_hint.store(guard.len(), Ordering::Relaxed);
        self.not_empty.notify_one();
        true
    }

    /// Prepend a single scale command at the head.
    pub fn push_scale(&self, cmd: ScaleCommand) -> bool {
        let mut guard = self.inner.lock().unwrap();
        guard.push_front(Job::scale(cmd));
        self.len_hint.store(guard.len(), Ordering::Relaxed);
        self.not_empty.notify_one();
        true
    }

    /// Prepend `count` copies of `cmd` under a single lock acquisition, so
    /// they land grouped together at the head in the order pushed
    /// (`spec.md` §4.3: "preserving head order (scale commands group
    /// together at the head)").
    pub fn push_scale_n(&self, cmd: ScaleCommand, count: usize) {
        if count == 0 {
            return;
        }
        let mut guard = self.inner.lock().unwrap();
        for _ in 0..count {
            guard.push_front(Job::scale(cmd));
        }
        self.len_hint.store(guard.len(), Ordering::Relaxed);
        self.not_empty.notify_all();
    }

    /// Remove and return the head, or `None` if empty. Never blocks.
    pub fn pop(&self) -> Option<Job> {
        let mut guard = self.inner.lock().unwrap();
        let job = guard.pop_front();
        self.len_hint.store(guard.len(), Ordering::Relaxed);
        job
    }

    /// Wait up to `timeout` for the queue to become non-empty (or for
    /// `should_wake` to start returning `true`, checked each time the wait
    /// is re-armed), then pop. Used by the worker loop's park step
    /// (`spec.md` §4.2 step 3 / §5 "Workers suspend ... waiting for work").
    pub fn pop_blocking<F>(&self, timeout: Duration, should_wake: F) -> Option<Job>
    where
        F: Fn() -> bool,
    {
        let mut guard = self.inner.lock().unwrap();
        while guard.is_empty() && !should_wake() {
            let (g, _timeout_result) = self.not_empty.wait_timeout(guard, timeout).unwrap();
            guard = g;
        }
        let job = guard.pop_front();
        self.len_hint.store(guard.len(), Ordering::Relaxed);
        job
    }

    /// Release every queued job in FIFO order without executing it, and
    /// reset the size to zero. Used by `Pool::destroy` (`spec.md` §4.3).
    pub fn drain(&self) -> Vec<Job> {
        let mut guard = self.inner.lock().unwrap();
        let drained = guard.drain(..).collect();
        self.len_hint.store(0, Ordering::Relaxed);
        drained
    }

    /// Advisory length hint, safe to read without locking.
    pub fn len_hint(&self) -> usize {
        self.len_hint.load(Ordering::Relaxed)
    }

    /// Wake every thread parked in `pop_blocking` (used when `stopping` is
    /// set so parked workers notice immediately rather than waiting out
    /// their backoff timeout).
    pub fn wake_all(&self) {
        self.not_empty.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::ScaleCommand;
    use std::sync::atomic::AtomicU32;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn fifo_order_for_user_jobs() {
        let q = JobQueue::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        for i in 0..5 {
            let order = Arc::clone(&order);
            q.push_user(Job::user(move || order.lock().unwrap().push(i)));
        }
        for _ in 0..5 {
            if let Some(Job::User(f)) = q.pop() {
                f();
            }
        }
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn scale_commands_preempt_to_head() {
        let q = JobQueue::new();
        q.push_user(Job::user(|| {}));
        q.push_scale(ScaleCommand::Clone);
        match q.pop() {
            Some(Job::Scale(ScaleCommand::Clone)) => {}
            other => panic!("expected scale command at head, got {other:?}"),
        }
    }

    #[test]
    fn push_scale_n_groups_at_head_in_order() {
        let q = JobQueue::new();
        q.push_user(Job::user(|| {}));
        q.push_scale_n(ScaleCommand::Terminate, 3);
        for _ in 0..3 {
            match q.pop() {
                Some(Job::Scale(ScaleCommand::Terminate)) => {}
                other => panic!("expected Terminate, got {other:?}"),
            }
        }
        assert!(matches!(q.pop(), Some(Job::User(_))));
    }

    #[test]
    fn drain_empties_and_does_not_execute() {
        let q = JobQueue::new();
        let ran = Arc::new(AtomicU32::new(0));
        for _ in 0..10 {
            let ran = Arc::clone(&ran);
            q.push_user(Job::user(move || {
                ran.fetch_add(1, Ordering::SeqCst);
            }));
        }
        let drained = q.drain();
        assert_eq!(drained.len(), 10);
        assert_eq!(q.len_hint(), 0);
        assert_eq!(ran.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn pop_blocking_wakes_on_push() {
        let q = Arc::new(JobQueue::new());
        let q2 = Arc::clone(&q);
        let handle = thread::spawn(move || q2.pop_blocking(Duration::from_secs(5), || false));
        thread::sleep(Duration::from_millis(20));
        q.push_user(Job::user(|| {}));
        let job = handle.join().unwrap();
        assert!(matches!(job, Some(Job::User(_))));
    }
}
