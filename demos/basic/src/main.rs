//! Basic scalepool example.
//!
//! Demonstrates submitting jobs to a static pool, waiting for drain,
//! manually requesting a scale-up, and then letting the feedback
//! controller drive scaling on its own against a simulated workload.

use scalepool::{AdapterParamsBuilder, FakeTraceCapability, Pool, PoolConfig, TraceCapability};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn main() {
    manual_scaling_demo();
    adapter_driven_demo();
}

fn manual_scaling_demo() {
    println!("=== scalepool basic example ===\n");

    let config = PoolConfig::from_env().max_workers(8);
    let pool = Pool::create(2, config, None).expect("pool construction");

    let completed = Arc::new(AtomicUsize::new(0));
    let total_jobs = 20;

    println!("Submitting {total_jobs} jobs to a 2-worker pool...");
    for i in 0..total_jobs {
        let completed = Arc::clone(&completed);
        pool.submit(move || {
            println!("[job {i}] running");
            completed.fetch_add(1, Ordering::SeqCst);
        });
    }
    pool.wait();
    println!(
        "\n{}/{total_jobs} jobs completed, {} workers live\n",
        completed.load(Ordering::SeqCst),
        pool.num_threads()
    );

    println!("Requesting a manual scale-up of +3 workers...");
    pool.scale(3);
    std::thread::sleep(std::time::Duration::from_millis(100));
    println!("Now running with {} workers\n", pool.num_threads());

    println!("Requesting a scale-down of -10 workers (clamped at the floor of 1)...");
    pool.scale(-10);
    std::thread::sleep(std::time::Duration::from_millis(100));
    println!("Now running with {} workers\n", pool.num_threads());

    pool.destroy();
    println!("=== Manual scaling demo complete ===\n");
}

/// A `MmapTraceCapability` needs a real tracer writing into its shared
/// page to have anything interesting to report, which this demo doesn't
/// have. `FakeTraceCapability` lets us simulate a tracer instead, so the
/// controller's own scale-up/rollback behavior is visible without one.
fn adapter_driven_demo() {
    println!("=== scalepool adapter-driven example ===\n");

    let trace = Arc::new(FakeTraceCapability::new());
    let trace_for_adapter: Arc<dyn TraceCapability> = trace.clone();
    let params = AdapterParamsBuilder::new()
        .interval_ms(20)
        .step_size(1)
        .observed_syscalls(vec![libc::SYS_read as i32])
        .scale_metric(|interval| interval.read_bytes as f64)
        .build()
        .expect("valid adapter tunables");

    let pool = Pool::create(1, PoolConfig::default(), Some((params, trace_for_adapter)))
        .expect("pool construction");
    let handle = trace.only_handle();

    println!("Simulating a rising read-byte workload...");
    for step in 1..=8u64 {
        trace.advance(
            &handle,
            &scalepool::TraceSnapshot {
                target_count: 0,
                read_bytes: step * 50_000,
                write_bytes: 0,
                syscalls: vec![scalepool::SyscallCounter::default()],
            },
        );
        std::thread::sleep(std::time::Duration::from_millis(25));
        println!("  step {step}: {} workers live", pool.num_threads());
    }

    pool.destroy();
    println!("=== Adapter-driven demo complete ===");
}
