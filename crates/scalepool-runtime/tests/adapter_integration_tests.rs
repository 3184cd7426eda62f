//! End-to-end checks that a `Pool` wired to an `Adapter` actually scales
//! itself, not just that the two pieces work in isolation.

use scalepool_core::AdapterTunables;
use scalepool_runtime::{AdapterParams, Pool, PoolConfig};
use scalepool_trace::FakeTraceCapability;
use std::sync::Arc;
use std::time::Duration;

#[test]
fn pool_with_adapter_scales_up_on_rising_activity() {
    let trace = Arc::new(FakeTraceCapability::new());
    let trace_for_adapter: Arc<dyn scalepool_trace::TraceCapability> = trace.clone();
    let params = AdapterParams {
        tunables: AdapterTunables {
            interval_ms: 5,
            step_size: 1,
            observed_syscalls: vec![0],
        },
        calc_scale_metric: Box::new(|interval| interval.read_bytes as f64),
        calc_idle_metric: Box::new(|_| 0.0),
    };
    let pool = Pool::create(1, PoolConfig::default(), Some((params, trace_for_adapter))).unwrap();

    let handle = trace.only_handle();
    for i in 1..=6u64 {
        // Every interval's cumulative counters are higher than the last by
        // an increasing amount, so the relative-change threshold is always
        // cleared and the controller keeps recommending growth.
        trace.advance(
            &handle,
            &scalepool_core::TraceSnapshot {
                target_count: 0,
                read_bytes: i * 10_000,
                write_bytes: 0,
                syscalls: vec![scalepool_core::SyscallCounter::default()],
            },
        );
        std::thread::sleep(Duration::from_millis(10));
    }

    std::thread::sleep(Duration::from_millis(50));
    assert!(pool.num_threads() > 1);
    pool.destroy();
}
