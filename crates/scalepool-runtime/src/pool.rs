//! The pool facade: `create`, `submit`, `wait`, `scale`, `destroy`.
//!
//! Grounded in `adaptive_tpool.c`'s `tpool_create_2` / `tpool_submit_job` /
//! `tpool_wait` / `tpool_scale` / `tpool_destroy`. `tpool_wait`'s busy-spin
//! (`while(num_busy_threads != 0 || jobqueue.size != 0) {}`) becomes a short
//! sleep loop — still simple, still lock-free, but no longer pegging a
//! core while idle (`spec.md` §9 doesn't call this out directly, but it is
//! the same "inconsistent primitive" smell the redesign note targets
//! elsewhere, and a busy-spin has no equivalent anywhere else in the
//! teacher's own codebase).

use crate::adapter::{Adapter, AdapterParams};
use crate::config::PoolConfig;
use crate::worker;
use scalepool_core::{CoreError, CoreResult, Job, ScaleCommand};
use scalepool_trace::TraceCapability;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Shared pool state every worker thread and the `Pool` facade both hold a
/// reference to.
pub(crate) struct PoolInner {
    pub(crate) queue: scalepool_core::JobQueue,
    pub(crate) roster: scalepool_core::WorkerRoster,
    pub(crate) num_busy_threads: AtomicUsize,
    pub(crate) num_panicked_jobs: AtomicUsize,
    pub(crate) stopping: AtomicBool,
    pub(crate) adapter: Option<Adapter>,
    pub(crate) config: PoolConfig,
    /// Kernel tid of the thread that called `Pool::create` (`spec.md` §3's
    /// `creator_tid`) — recorded for diagnostics; the pool never traces it.
    pub(crate) creator_tid: i32,
}

impl PoolInner {
    /// Push scale commands for `delta`. The `max_workers` ceiling and the
    /// floor-of-1 are enforced where each command is dispatched, not here
    /// (`spec.md` §4.2) — pushing more `Terminate`s than there are workers
    /// is harmless, since the excess are silently ignored at the floor.
    pub(crate) fn scale(&self, delta: i32) -> bool {
        if delta == 0 {
            return true;
        }
        let cmd = if delta > 0 {
            ScaleCommand::Clone
        } else {
            ScaleCommand::Terminate
        };
        self.queue.push_scale_n(cmd, delta.unsigned_abs() as usize);
        true
    }
}

/// A self-scaling pool of OS-thread workers.
pub struct Pool {
    inner: Arc<PoolInner>,
}

/// Interval `Pool::wait` sleeps between observing the busy-count and queue
/// size together. Short enough not to add perceptible latency, long enough
/// not to burn a core the way `tpool_wait`'s C busy-spin does.
const WAIT_POLL_INTERVAL: Duration = Duration::from_micros(200);

impl Pool {
    /// Create a pool of `initial_size` workers, optionally wired to a
    /// feedback controller. `initial_size` must be in `1..=max_workers`
    /// (`spec.md` §4.3); construction is atomic — on error, nothing is
    /// spawned.
    pub fn create(
        initial_size: usize,
        config: PoolConfig,
        adapter_params: Option<(AdapterParams, Arc<dyn TraceCapability>)>,
    ) -> CoreResult<Self> {
        if initial_size == 0 || initial_size > config.max_workers {
            return Err(CoreError::InvalidWorkerCount(initial_size));
        }

        let adapter = adapter_params.map(|(params, trace)| Adapter::new(params, trace));
        let creator_tid = unsafe { libc::syscall(libc::SYS_gettid) as i32 };

        let inner = Arc::new(PoolInner {
            queue: scalepool_core::JobQueue::new(),
            roster: scalepool_core::WorkerRoster::new(),
            num_busy_threads: AtomicUsize::new(0),
            num_panicked_jobs: AtomicUsize::new(0),
            stopping: AtomicBool::new(false),
            adapter,
            config,
            creator_tid,
        });

        for _ in 0..initial_size {
            let wid = inner.roster.allocate_wid();
            worker::spawn_worker(Arc::clone(&inner), wid);
        }

        Ok(Self { inner })
    }

    /// Submit a closure for execution on whichever worker pops it next.
    /// Never blocks.
    pub fn submit<F>(&self, f: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        self.inner.queue.push_user(Job::user(f))
    }

    /// Submit a raw C-ABI-style job, matching `spec.md` §6's
    /// `pool_submit(tfunc, arg)` table. Returns `false` for a null `f`
    /// without ever constructing a `Job`.
    pub fn submit_raw(
        &self,
        f: Option<extern "C" fn(*mut std::ffi::c_void)>,
        arg: *mut std::ffi::c_void,
    ) -> bool {
        struct SendPtr(*mut std::ffi::c_void);
        // Safety: the caller attests `arg` is safe to hand to `f` on
        // whatever thread ends up executing it, per the raw-job contract.
        unsafe impl Send for SendPtr {}

        match Self::validate_raw_job(f) {
            Ok(f) => {
                let arg = SendPtr(arg);
                self.submit(move || {
                    let arg = arg;
                    f(arg.0)
                })
            }
            Err(_) => false,
        }
    }

    fn validate_raw_job(
        f: Option<extern "C" fn(*mut std::ffi::c_void)>,
    ) -> CoreResult<extern "C" fn(*mut std::ffi::c_void)> {
        f.ok_or(CoreError::NullFunction)
    }

    /// Block until no worker is busy and the queue is empty, observed
    /// together. No guarantee about jobs submitted after this call returns
    /// (`spec.md` §4.3, matching `tpool_wait`'s own documented caveat).
    pub fn wait(&self) {
        loop {
            let busy = self.inner.num_busy_threads.load(Ordering::SeqCst);
            let queued = self.inner.queue.len_hint();
            if busy == 0 && queued == 0 {
                return;
            }
            std::thread::sleep(WAIT_POLL_INTERVAL);
        }
    }

    /// Push `|delta|` scale commands: positive grows, negative shrinks.
    /// Always succeeds; out-of-range commands are clamped away as each is
    /// dispatched (`spec.md` §4.2).
    pub fn scale(&self, delta: i32) -> bool {
        self.inner.scale(delta)
    }

    /// Current number of live workers.
    pub fn num_threads(&self) -> usize {
        self.inner.roster.amount()
    }

    /// Current number of workers executing a user job.
    pub fn num_busy_threads(&self) -> usize {
        self.inner.num_busy_threads.load(Ordering::SeqCst)
    }

    /// Cumulative count of submitted jobs whose closure panicked. A
    /// diagnostic only — the panic is always caught and the worker survives
    /// (`spec.md` §7).
    pub fn num_panicked_jobs(&self) -> usize {
        self.inner.num_panicked_jobs.load(Ordering::SeqCst)
    }

    /// Signal shutdown, drop every queued job without executing it, and
    /// block until every worker has exited (`tpool_destroy`).
    pub fn destroy(self) {
        self.inner.stopping.store(true, Ordering::SeqCst);
        let _dropped = self.inner.queue.drain();
        self.inner.queue.wake_all();
        loop {
            if self.inner.roster.amount() == 0 {
                break;
            }
            std::thread::sleep(WAIT_POLL_INTERVAL);
        }
    }
}
