//! A fluent builder over [`AdapterParams`], the way `SchedulerConfig`'s own
//! `num_workers`/`debug_logging` chain builds up a config one field at a
//! time before the runtime is constructed.

use crate::error::{PoolError, PoolResult};
use scalepool_core::{AdapterTunables, TraceInterval};
use scalepool_runtime::{AdapterParams, MetricFn};

/// Builds an [`AdapterParams`] from tunables plus the two metric callbacks
/// a controller-parameter string can never carry (`spec.md` §6).
///
/// Both metric callbacks default to summing the interval's `read_bytes` and
/// `write_bytes` if never set — a reasonable workload signal when the
/// caller has no syscall-specific metric of their own.
pub struct AdapterParamsBuilder {
    tunables: AdapterTunables,
    calc_scale_metric: Option<MetricFn>,
    calc_idle_metric: Option<MetricFn>,
}

fn default_metric() -> MetricFn {
    Box::new(|interval: &TraceInterval| (interval.read_bytes + interval.write_bytes) as f64)
}

impl Default for AdapterParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AdapterParamsBuilder {
    pub fn new() -> Self {
        Self {
            tunables: AdapterTunables::default(),
            calc_scale_metric: None,
            calc_idle_metric: None,
        }
    }

    pub fn interval_ms(mut self, interval_ms: u64) -> Self {
        self.tunables.interval_ms = interval_ms;
        self
    }

    pub fn step_size(mut self, step_size: u32) -> Self {
        self.tunables.step_size = step_size;
        self
    }

    pub fn observed_syscalls(mut self, syscall_nrs: Vec<i32>) -> Self {
        self.tunables.observed_syscalls = syscall_nrs;
        self
    }

    /// Apply the `spec.md` §6 comma-separated controller-parameter string
    /// (`"interval_ms,step_size[,syscall_nr]*"`) on top of whatever has
    /// already been set. An empty string is a no-op.
    pub fn override_string(mut self, s: &str) -> PoolResult<Self> {
        self.tunables = self.tunables.apply_override_string(s)?;
        Ok(self)
    }

    pub fn scale_metric<F>(mut self, f: F) -> Self
    where
        F: Fn(&TraceInterval) -> f64 + Send + Sync + 'static,
    {
        self.calc_scale_metric = Some(Box::new(f));
        self
    }

    pub fn idle_metric<F>(mut self, f: F) -> Self
    where
        F: Fn(&TraceInterval) -> f64 + Send + Sync + 'static,
    {
        self.calc_idle_metric = Some(Box::new(f));
        self
    }

    pub fn build(self) -> PoolResult<AdapterParams> {
        self.tunables.validate().map_err(PoolError::from)?;
        Ok(AdapterParams {
            tunables: self.tunables,
            calc_scale_metric: self.calc_scale_metric.unwrap_or_else(default_metric),
            calc_idle_metric: self.calc_idle_metric.unwrap_or_else(default_metric),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metric_sums_read_and_write_bytes() {
        let params = AdapterParamsBuilder::new().build().unwrap();
        let interval = TraceInterval {
            start_ms: 0,
            end_ms: 1,
            read_bytes: 10,
            write_bytes: 5,
            target_count: 1,
            syscalls: vec![],
        };
        assert_eq!((params.calc_scale_metric)(&interval), 15.0);
    }

    #[test]
    fn override_string_and_explicit_setters_compose() {
        let params = AdapterParamsBuilder::new()
            .override_string("500,2")
            .unwrap()
            .observed_syscalls(vec![0, 1])
            .build()
            .unwrap();
        assert_eq!(params.tunables.interval_ms, 500);
        assert_eq!(params.tunables.step_size, 2);
        assert_eq!(params.tunables.observed_syscalls, vec![0, 1]);
    }

    #[test]
    fn zero_step_size_is_rejected_at_build() {
        let err = AdapterParamsBuilder::new().step_size(0).build().unwrap_err();
        assert!(matches!(err, PoolError::Core(_)));
    }
}
