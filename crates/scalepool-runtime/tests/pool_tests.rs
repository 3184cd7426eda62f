//! Integration tests for the pool facade, grounded in the scenarios
//! `adaptive_tpool.c`'s author exercised manually (a fixed-size pool
//! chewing through a large job batch, `tpool_wait`'s "no busy threads, no
//! queue" barrier, `tpool_scale`'s explicit resize, and `tpool_destroy`'s
//! drain-without-execute guarantee).

use scalepool_runtime::{Pool, PoolConfig};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[test]
fn static_pool_runs_every_submitted_job_exactly_once() {
    let pool = Pool::create(4, PoolConfig::default(), None).unwrap();
    let counter = Arc::new(AtomicUsize::new(0));
    for _ in 0..10_000 {
        let counter = Arc::clone(&counter);
        assert!(pool.submit(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
    }
    pool.wait();
    assert_eq!(counter.load(Ordering::SeqCst), 10_000);
    pool.destroy();
}

#[test]
fn wait_returns_only_once_queue_and_busy_count_are_both_zero() {
    let pool = Pool::create(2, PoolConfig::default(), None).unwrap();
    let counter = Arc::new(AtomicUsize::new(0));
    for _ in 0..50 {
        let counter = Arc::clone(&counter);
        pool.submit(move || {
            std::thread::sleep(Duration::from_micros(200));
            counter.fetch_add(1, Ordering::SeqCst);
        });
    }
    pool.wait();
    assert_eq!(counter.load(Ordering::SeqCst), 50);
    assert_eq!(pool.num_busy_threads(), 0);
    pool.destroy();
}

#[test]
fn scale_up_grows_the_live_worker_count() {
    let pool = Pool::create(2, PoolConfig::default(), None).unwrap();
    assert!(pool.scale(3));
    // Scale commands are ordinary queue entries; give workers a moment to
    // pop and act on them.
    std::thread::sleep(Duration::from_millis(100));
    assert_eq!(pool.num_threads(), 5);
    pool.destroy();
}

#[test]
fn scale_down_respects_the_floor_of_one_worker() {
    let pool = Pool::create(2, PoolConfig::default(), None).unwrap();
    assert!(pool.scale(-5));
    std::thread::sleep(Duration::from_millis(100));
    assert_eq!(pool.num_threads(), 1);
    pool.destroy();
}

#[test]
fn scale_respects_max_workers_ceiling() {
    let config = PoolConfig::default().max_workers(4);
    let pool = Pool::create(2, config, None).unwrap();
    assert!(pool.scale(10));
    std::thread::sleep(Duration::from_millis(100));
    assert_eq!(pool.num_threads(), 4);
    pool.destroy();
}

#[test]
fn destroy_drains_queue_without_executing_remaining_jobs() {
    let pool = Pool::create(2, PoolConfig::default(), None).unwrap();
    let started = Arc::new(AtomicUsize::new(0));
    // Keep both workers permanently busy so none of the 100 queued jobs
    // below gets a chance to run before destroy observes `stopping`.
    for _ in 0..2 {
        let started = Arc::clone(&started);
        pool.submit(move || {
            started.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(Duration::from_secs(5));
        });
    }
    while started.load(Ordering::SeqCst) < 2 {
        std::thread::sleep(Duration::from_millis(1));
    }
    let completed = Arc::new(AtomicUsize::new(0));
    for _ in 0..100 {
        let completed = Arc::clone(&completed);
        pool.submit(move || {
            completed.fetch_add(1, Ordering::SeqCst);
        });
    }
    pool.destroy();
    assert_eq!(completed.load(Ordering::SeqCst), 0);
}

#[test]
fn submit_raw_rejects_null_function() {
    let pool = Pool::create(1, PoolConfig::default(), None).unwrap();
    assert!(!pool.submit_raw(None, std::ptr::null_mut()));
    pool.destroy();
}

#[test]
fn panicking_job_does_not_take_down_the_worker() {
    let pool = Pool::create(1, PoolConfig::default(), None).unwrap();
    pool.submit(|| panic!("boom"));
    pool.wait();
    let counter = Arc::new(AtomicUsize::new(0));
    let counter2 = Arc::clone(&counter);
    pool.submit(move || {
        counter2.fetch_add(1, Ordering::SeqCst);
    });
    pool.wait();
    assert_eq!(counter.load(Ordering::SeqCst), 1);
    assert_eq!(pool.num_panicked_jobs(), 1);
    pool.destroy();
}
