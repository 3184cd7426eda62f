//! Cross-thread submitter contention: many threads pushing into the same
//! queue concurrently, verified against what each submitter actually
//! observes rather than the single-thread FIFO checks in `queue.rs`.

use scalepool_runtime::{Pool, PoolConfig};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

const SUBMITTERS: usize = 8;
const JOBS_PER_SUBMITTER: usize = 1000;

/// `spec.md` §8 scenario S3: 8 submitter threads each push 1000 jobs
/// (8000 total); every submitter's own jobs must still run in the order it
/// pushed them, even though the jobs of all 8 submitters are interleaved in
/// one shared queue and popped by multiple workers at once. Each job checks
/// its own sequence number against a per-submitter "next expected" counter
/// rather than just recording completion order, so a reorder is caught at
/// the point it happens instead of relying on a best-effort sort afterward.
#[test]
fn eight_concurrent_submitters_each_observe_fifo_order() {
    let pool = Arc::new(Pool::create(4, PoolConfig::default(), None).unwrap());
    let next_expected: Arc<Vec<Mutex<usize>>> =
        Arc::new((0..SUBMITTERS).map(|_| Mutex::new(0)).collect());
    let out_of_order = Arc::new(AtomicUsize::new(0));
    let completed = Arc::new(AtomicUsize::new(0));

    let submitters: Vec<_> = (0..SUBMITTERS)
        .map(|submitter_id| {
            let pool = Arc::clone(&pool);
            let next_expected = Arc::clone(&next_expected);
            let out_of_order = Arc::clone(&out_of_order);
            let completed = Arc::clone(&completed);
            thread::spawn(move || {
                for seq in 0..JOBS_PER_SUBMITTER {
                    let next_expected = Arc::clone(&next_expected);
                    let out_of_order = Arc::clone(&out_of_order);
                    let completed = Arc::clone(&completed);
                    assert!(pool.submit(move || {
                        let mut expected = next_expected[submitter_id].lock().unwrap();
                        if *expected != seq {
                            out_of_order.fetch_add(1, Ordering::SeqCst);
                        }
                        *expected = seq + 1;
                        completed.fetch_add(1, Ordering::SeqCst);
                    }));
                }
            })
        })
        .collect();

    for submitter in submitters {
        submitter.join().unwrap();
    }
    pool.wait();

    assert_eq!(completed.load(Ordering::SeqCst), SUBMITTERS * JOBS_PER_SUBMITTER);
    assert_eq!(out_of_order.load(Ordering::SeqCst), 0);

    Arc::try_unwrap(pool)
        .unwrap_or_else(|_| panic!("pool still has outstanding clones"))
        .destroy();
}

/// `spec.md` property 5 / the pool-level half of scenario S1: a scale
/// command must preempt already-queued user jobs rather than wait behind
/// them, so a clone issued while 1000 jobs sit ahead of it in the queue
/// takes effect almost immediately instead of only after the backlog
/// drains. Jobs sleep briefly rather than block forever, since a worker
/// only checks for scaling advice between jobs — preemption jumps the
/// queue, it doesn't interrupt a job already running.
#[test]
fn scale_command_preempts_a_deep_backlog_of_queued_jobs() {
    let pool = Pool::create(2, PoolConfig::default(), None).unwrap();
    let completed = Arc::new(AtomicUsize::new(0));
    for _ in 0..1000 {
        let completed = Arc::clone(&completed);
        pool.submit(move || {
            thread::sleep(std::time::Duration::from_millis(2));
            completed.fetch_add(1, Ordering::SeqCst);
        });
    }

    assert!(pool.scale(1));
    thread::sleep(std::time::Duration::from_millis(20));
    // The scale command jumped ahead of the 1000-deep backlog, so a third
    // worker is live long before the two original workers could have
    // drained anywhere near the full queue at 2ms/job.
    assert_eq!(pool.num_threads(), 3);
    assert!(completed.load(Ordering::SeqCst) < 900);

    pool.wait();
    assert_eq!(completed.load(Ordering::SeqCst), 1000);
    pool.destroy();
}
