//! End-to-end tests against the public facade only — no direct dependency
//! on `scalepool-runtime` internals.

use scalepool::{AdapterParamsBuilder, FakeTraceCapability, Pool, PoolConfig, TraceCapability};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[test]
fn pool_runs_submitted_jobs_via_the_facade_alone() {
    let pool = Pool::create(2, PoolConfig::default(), None).unwrap();
    let counter = Arc::new(AtomicUsize::new(0));
    for _ in 0..200 {
        let counter = Arc::clone(&counter);
        pool.submit(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
    }
    pool.wait();
    assert_eq!(counter.load(Ordering::SeqCst), 200);
    pool.destroy();
}

#[test]
fn builder_rejects_malformed_override_string() {
    let err = AdapterParamsBuilder::new().override_string("not_a_number");
    assert!(err.is_err());
}

#[test]
fn pool_with_builder_and_fake_capability_scales_up() {
    let trace = Arc::new(FakeTraceCapability::new());
    let trace_dyn: Arc<dyn TraceCapability> = trace.clone();
    let params = AdapterParamsBuilder::new()
        .interval_ms(5)
        .step_size(1)
        .observed_syscalls(vec![0])
        .scale_metric(|interval| interval.read_bytes as f64)
        .idle_metric(|_| 0.0)
        .build()
        .unwrap();

    let pool = Pool::create(1, PoolConfig::default(), Some((params, trace_dyn))).unwrap();
    let handle = trace.only_handle();

    for i in 1..=6u64 {
        trace.advance(
            &handle,
            &scalepool::TraceSnapshot {
                target_count: 0,
                read_bytes: i * 10_000,
                write_bytes: 0,
                syscalls: vec![scalepool::SyscallCounter::default()],
            },
        );
        std::thread::sleep(Duration::from_millis(10));
    }

    std::thread::sleep(Duration::from_millis(50));
    assert!(pool.num_threads() > 1);
    pool.destroy();
}
