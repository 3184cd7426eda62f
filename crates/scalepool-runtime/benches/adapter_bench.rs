//! Microbenchmark for the hot path a live worker runs on every poll:
//! `ready_for_update` plus a full `get_scale_advice` cycle against a fake
//! trace capability, so regressions in the ring/decision logic show up
//! before they cost real scheduling latency.

use criterion::{criterion_group, criterion_main, Criterion};
use scalepool_core::{AdapterTunables, SyscallCounter, TraceSnapshot};
use scalepool_runtime::AdapterParams;
use scalepool_trace::FakeTraceCapability;
use std::sync::Arc;

fn bench_get_scale_advice(c: &mut Criterion) {
    let trace = Arc::new(FakeTraceCapability::new());
    let params = AdapterParams {
        tunables: AdapterTunables {
            interval_ms: 0,
            step_size: 1,
            observed_syscalls: vec![0],
        },
        calc_scale_metric: Box::new(|interval| interval.read_bytes as f64),
        calc_idle_metric: Box::new(|_| 0.0),
    };
    let adapter = scalepool_runtime::adapter::Adapter::new(params, trace.clone());
    let handle = trace.only_handle();

    let mut bytes = 0u64;
    c.bench_function("adapter_get_scale_advice", |b| {
        b.iter(|| {
            bytes += 10_000;
            trace.advance(
                &handle,
                &TraceSnapshot {
                    target_count: 0,
                    read_bytes: bytes,
                    write_bytes: 0,
                    syscalls: vec![SyscallCounter::default()],
                },
            );
            adapter.get_scale_advice()
        });
    });
}

criterion_group!(benches, bench_get_scale_advice);
criterion_main!(benches);
