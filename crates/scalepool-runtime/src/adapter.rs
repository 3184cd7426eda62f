//! The feedback controller: turns two successive trace snapshots into a
//! signed scaling delta.
//!
//! Grounded in `scaling.c`'s `trace_adaptor` / `ta_*` functions:
//! `ta_ready_for_update` (time-due check), `ta_lock`/`ta_unlock` (CAS over
//! an `int` storing `-1` unlocked or the holding worker's id),
//! `ta_get_scale_advice` → `update_snapshot` → `determine_scale_advice`.
//! Per `spec.md` §9 ("Global adapter state shared across pools") each
//! `Pool` now owns its own `Adapter` instead of reaching into a process
//! singleton, and the lock is a single `AtomicI64` rather than the C
//! struct's inconsistent mix of primitives elsewhere in the codebase.

use scalepool_core::constants::{NEGLIGIBLE_DIFFERENCE_THRESHOLD, RELATIVE_CHANGE_THRESHOLD};
use scalepool_core::{AdapterTunables, IntervalDatapoint, MetricRing, TraceInterval, TraceSnapshot};
use scalepool_trace::{TraceCapability, TraceHandle};
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

/// A metric callback: derives one scalar from an observed interval.
/// Boxed rather than generic so `AdapterParams` can be built at runtime
/// from caller-supplied closures, matching `trace_adaptor_params`'s
/// function-pointer field.
pub type MetricFn = Box<dyn Fn(&TraceInterval) -> f64 + Send + Sync + 'static>;

/// Full controller configuration: the parseable numeric [`AdapterTunables`]
/// plus the two metric callbacks a string can't carry.
pub struct AdapterParams {
    pub tunables: AdapterTunables,
    pub calc_scale_metric: MetricFn,
    pub calc_idle_metric: MetricFn,
}

impl std::fmt::Debug for AdapterParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterParams")
            .field("tunables", &self.tunables)
            .field("calc_scale_metric", &"<fn>")
            .field("calc_idle_metric", &"<fn>")
            .finish()
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

struct AdapterState {
    previous_snapshot: TraceSnapshot,
    last_snapshot_ms: u64,
    metric_ring: MetricRing,
}

/// Per-pool feedback controller. One `Adapter` is created per `Pool` that
/// asks for scaling (`spec.md` §4.3's optional `adapter_params`).
pub struct Adapter {
    params: AdapterParams,
    trace: Arc<dyn TraceCapability>,
    handle: TraceHandle,
    state: Mutex<AdapterState>,
    /// `-1` unlocked, otherwise the `wid` of the holding worker — mirrors
    /// `trace_adaptor::lock`'s sentinel convention.
    lock: AtomicI64,
    /// Largest `reset_metric` observed so far. Recorded for diagnostics;
    /// never consulted by `decide` (`spec.md`'s idle-metric open question:
    /// recorded but not acted on by the scaling decision itself).
    idle_metric_max_bits: AtomicU64,
}

impl Adapter {
    pub fn new(params: AdapterParams, trace: Arc<dyn TraceCapability>) -> Self {
        let handle = trace
            .register(&params.tunables.observed_syscalls)
            .expect("trace capability registration failed");
        let num_syscalls = params.tunables.observed_syscalls.len();
        Self {
            params,
            trace,
            handle,
            state: Mutex::new(AdapterState {
                previous_snapshot: TraceSnapshot::zeroed(num_syscalls),
                last_snapshot_ms: now_ms(),
                metric_ring: MetricRing::new(),
            }),
            lock: AtomicI64::new(-1),
            idle_metric_max_bits: AtomicU64::new(0f64.to_bits()),
        }
    }

    /// Begin tracing a worker's kernel tid (`ta_add_tracee`).
    pub fn add_tracee(&self, tid: i32) -> bool {
        self.trace.add_target(&self.handle, tid)
    }

    /// Stop tracing a worker's kernel tid (`ta_remove_tracee`).
    pub fn remove_tracee(&self, tid: i32) -> bool {
        self.trace.remove_target(&self.handle, tid)
    }

    /// Advisory, lock-free check for whether enough time has passed and the
    /// adapter isn't already held — callers still need [`try_lock`] before
    /// calling [`get_scale_advice`], since this alone does not claim the
    /// lock (`ta_ready_for_update`).
    pub fn ready_for_update(&self) -> bool {
        let due = {
            let state = self.state.lock().unwrap();
            state.last_snapshot_ms + self.params.tunables.interval_ms
        };
        now_ms() >= due && self.lock.load(Ordering::SeqCst) == -1
    }

    /// Non-blocking attempt to claim the adapter for `wid`. Returns `false`
    /// immediately on contention rather than waiting (`spec.md` §4.4: "Try
    /// -acquire exclusive adapter lock").
    pub fn try_lock(&self, wid: u64) -> bool {
        self.lock
            .compare_exchange(-1, wid as i64, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    pub fn unlock(&self) {
        self.lock.store(-1, Ordering::SeqCst);
    }

    /// Compute this interval's scaling delta. Must only be called by the
    /// worker that currently holds the adapter lock (`try_lock` returned
    /// `true`); unlocking afterward is the caller's responsibility, exactly
    /// as `check_scaling` does around `ta_get_scale_advice` in the original.
    pub fn get_scale_advice(&self) -> i32 {
        let mut state = self.state.lock().unwrap();
        let now = now_ms();
        if now < state.last_snapshot_ms + self.params.tunables.interval_ms {
            return 0;
        }

        let live_before = self.trace.snapshot(&self.handle);
        if live_before.target_count != state.previous_snapshot.target_count {
            // Target set changed since the last snapshot: resync and skip
            // this interval rather than diff across a discontinuity.
            state.previous_snapshot = live_before;
            state.last_snapshot_ms = now;
            return 0;
        }

        let diff = live_before.diff(&state.previous_snapshot);
        let start_ms = state.last_snapshot_ms;
        state.previous_snapshot = live_before.clone();
        state.last_snapshot_ms = now;

        let live_after = self.trace.snapshot(&self.handle);
        if live_after.target_count != live_before.target_count {
            // Target set changed mid-snapshot: keep the resync, report no advice.
            state.previous_snapshot = live_after;
            return 0;
        }

        let interval = TraceInterval {
            start_ms,
            end_ms: now,
            read_bytes: diff.read_bytes,
            write_bytes: diff.write_bytes,
            target_count: live_before.target_count,
            syscalls: diff.syscalls,
        };
        let scale_metric = (self.params.calc_scale_metric)(&interval);
        let reset_metric = (self.params.calc_idle_metric)(&interval);
        self.record_idle_metric_max(reset_metric);

        state.metric_ring.insert(IntervalDatapoint {
            scale_metric,
            reset_metric,
            target_count: interval.target_count,
            time_ms: now,
        });

        self.decide(&state.metric_ring)
    }

    fn decide(&self, ring: &MetricRing) -> i32 {
        match ring.size() {
            0 => 0,
            1 => self.params.tunables.step_size as i32,
            _ => {
                let curr = ring.newest().expect("size >= 2 implies a newest entry");
                let prev = ring.previous().expect("size >= 2 implies a previous entry");
                let d = curr.scale_metric - prev.scale_metric;
                let r_rel = if prev.scale_metric != 0.0 {
                    d / prev.scale_metric
                } else {
                    0.0
                };
                if d.abs() < NEGLIGIBLE_DIFFERENCE_THRESHOLD {
                    0
                } else if d >= 0.0 && r_rel >= RELATIVE_CHANGE_THRESHOLD {
                    self.params.tunables.step_size as i32
                } else if d < 0.0 && r_rel <= -RELATIVE_CHANGE_THRESHOLD {
                    prev.target_count as i32 - curr.target_count as i32
                } else {
                    0
                }
            }
        }
    }

    fn record_idle_metric_max(&self, value: f64) {
        let mut current = f64::from_bits(self.idle_metric_max_bits.load(Ordering::Relaxed));
        while value > current {
            match self.idle_metric_max_bits.compare_exchange_weak(
                current.to_bits(),
                value.to_bits(),
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(observed) => current = f64::from_bits(observed),
            }
        }
    }

    /// Largest `reset_metric` observed so far. Diagnostic only.
    pub fn idle_metric_max(&self) -> f64 {
        f64::from_bits(self.idle_metric_max_bits.load(Ordering::Relaxed))
    }
}

impl Drop for Adapter {
    fn drop(&mut self) {
        self.trace.deregister(self.handle);
    }
}
