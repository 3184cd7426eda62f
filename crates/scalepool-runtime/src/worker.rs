//! The worker loop.
//!
//! Line-for-line grounded in `adaptive_tpool.c`'s `worker_function`: register
//! as a tracee, loop checking for scaling advice and popping jobs until
//! told to stop, then unlink and deregister on the way out. The CAS
//! spin-loops around `jobqueue->lock`, `count_lock`, and `workers.lock` are
//! replaced by `JobQueue`'s mutex+condvar and `WorkerRoster`'s mutex,
//! matching the single-primitive-per-concern remedy in `spec.md` §9.

use crate::adapter::Adapter;
use crate::pool::PoolInner;
use scalepool_core::{job::ScaleCommand, Job};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

fn current_kernel_tid() -> i32 {
    // Safety: SYS_gettid takes no arguments and cannot fail.
    unsafe { libc::syscall(libc::SYS_gettid) as i32 }
}

/// Check for and apply one round of scaling advice, mirroring
/// `adaptive_tpool.c`'s `check_scaling`: a non-blocking peek
/// (`ready_for_update`), a non-blocking claim (`try_lock`), the decision
/// itself, then `unlock` before acting on the advice so the adapter is
/// never held while `Pool::scale` takes the queue lock.
fn check_scaling(pool: &PoolInner, adapter: &Adapter, wid: u64) {
    if !adapter.ready_for_update() || !adapter.try_lock(wid) {
        return;
    }
    let advice = adapter.get_scale_advice();
    adapter.unlock();
    if advice != 0 {
        pool.scale(advice);
    }
}

/// Spawn one additional worker, matching `add_extra_worker`'s
/// `wid = max_id + 1` allocation. The ceiling check and the reservation of
/// the new `wid` happen under a single roster-lock critical section
/// (`WorkerRoster::try_reserve_wid`), so two workers racing to clone at
/// `amount() == max_workers - 1` can't both win and leave the roster
/// permanently above `max_workers` (`spec.md` §4.2's Clone clamp).
fn handle_clone(pool: &Arc<PoolInner>) {
    match pool.roster.try_reserve_wid(pool.config.max_workers) {
        Some(wid) => spawn_reserved_worker(Arc::clone(pool), wid),
        None => scalepool_core::spdebug!("clone declined: pool already at max_workers"),
    }
}

/// The body of one worker's OS thread, from registration to exit.
pub fn run(pool: Arc<PoolInner>, wid: u64) {
    scalepool_core::log::set_worker_id(wid as u32);
    let tid = current_kernel_tid();
    pool.roster.set_kernel_tid(wid, tid);
    if let Some(adapter) = pool.adapter.as_ref() {
        adapter.add_tracee(tid);
    }
    scalepool_core::spinfo!("worker {wid} starting (tid {tid})");

    let mut park_timeout_ms = pool.config.park_timeout_min_ms;

    'outer: while !pool.stopping.load(Ordering::SeqCst) {
        if let Some(adapter) = pool.adapter.as_ref() {
            check_scaling(&pool, adapter, wid);
        }

        let job = pool.queue.pop_blocking(Duration::from_millis(park_timeout_ms), || {
            pool.stopping.load(Ordering::SeqCst)
        });

        let Some(job) = job else {
            park_timeout_ms = (park_timeout_ms * 2).min(pool.config.park_timeout_max_ms);
            continue;
        };
        park_timeout_ms = pool.config.park_timeout_min_ms;

        if pool.stopping.load(Ordering::SeqCst) {
            break 'outer;
        }

        match job {
            Job::User(f) => {
                pool.num_busy_threads.fetch_add(1, Ordering::SeqCst);
                // A panicking job must not take the worker down with it —
                // `spec.md` §7: "user-function runtime anomalies must not
                // propagate out of the worker loop."
                if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(f)) {
                    pool.num_panicked_jobs.fetch_add(1, Ordering::SeqCst);
                    scalepool_core::sperror!("worker {wid} job panicked: {}", panic_message(&payload));
                }
                pool.num_busy_threads.fetch_sub(1, Ordering::SeqCst);
            }
            Job::Scale(ScaleCommand::Clone) => handle_clone(&pool),
            Job::Scale(ScaleCommand::Terminate) => {
                if pool.roster.amount() > 1 {
                    break 'outer;
                }
                scalepool_core::spdebug!("worker {wid} ignoring terminate: floor of 1 worker reached");
            }
        }
    }

    pool.roster.remove(wid);
    if let Some(adapter) = pool.adapter.as_ref() {
        adapter.remove_tracee(tid);
    }
    scalepool_core::spinfo!("worker {wid} exiting");
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Allocate a `wid` and spawn an OS thread running [`run`] for it,
/// inserting the resulting `Worker` into the roster. Used for the initial
/// batch of workers at pool creation, where `initial_size` was already
/// validated against `max_workers` and there is no concurrent cloning to
/// race against.
pub fn spawn_worker(pool: Arc<PoolInner>, wid: u64) {
    let mut worker = scalepool_core::Worker::new(wid);
    let thread_pool = Arc::clone(&pool);
    let handle = std::thread::Builder::new()
        .name(format!("scalepool-worker-{wid}"))
        .spawn(move || run(thread_pool, wid))
        .expect("failed to spawn worker thread");
    worker.handle = Some(handle);
    pool.roster.insert(worker);
}

/// Spawn the OS thread for a `wid` whose placeholder `Worker` was already
/// reserved (and counted) by `WorkerRoster::try_reserve_wid`. Used by
/// `handle_clone`, where the reservation must happen before the thread
/// spawn so the ceiling check and the slot claim are atomic.
fn spawn_reserved_worker(pool: Arc<PoolInner>, wid: u64) {
    let thread_pool = Arc::clone(&pool);
    let handle = std::thread::Builder::new()
        .name(format!("scalepool-worker-{wid}"))
        .spawn(move || run(thread_pool, wid))
        .expect("failed to spawn worker thread");
    pool.roster.set_handle(wid, handle);
}
