//! Pool-wide ambient configuration.
//!
//! Grounded in `gvthread_runtime::config::SchedulerConfig`: a plain struct
//! with a `Default` impl computing sane platform-derived defaults, a
//! builder-style `with_*` API, and a `validate()` that rejects
//! out-of-range values before anything is spawned. `from_env()` is new —
//! none of the teacher's configs read the environment directly — but the
//! env accessors themselves (`env_get`, `env_get_bool`) are the teacher's
//! own `gvthread_core::env` helpers, carried into `scalepool_core::env`.

use scalepool_core::constants::MAX_WORKERS;
use scalepool_core::env::env_get;

/// Pool-level tunables that are not part of the controller's scaling
/// algorithm (those live in `scalepool_core::AdapterTunables`): the worker
/// idle-park backoff schedule and the hard cap on live workers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    /// Hard ceiling on simultaneously live workers (`spec.md` §3, §4.2's
    /// "Clone above this limit is silently dropped").
    pub max_workers: usize,
    /// Shortest a worker parks before re-checking the queue when it finds
    /// it empty.
    pub park_timeout_min_ms: u64,
    /// Longest a worker parks before re-checking the queue; the backoff
    /// doubles from `park_timeout_min_ms` on each consecutive empty check,
    /// capped here.
    pub park_timeout_max_ms: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_workers: MAX_WORKERS,
            park_timeout_min_ms: 1,
            park_timeout_max_ms: 50,
        }
    }
}

impl PoolConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a `PoolConfig` from `SCALEPOOL_MAX_WORKERS`,
    /// `SCALEPOOL_PARK_TIMEOUT_MIN_MS`, and `SCALEPOOL_PARK_TIMEOUT_MAX_MS`,
    /// falling back to [`PoolConfig::default`] for anything unset or
    /// unparseable.
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            max_workers: env_get("SCALEPOOL_MAX_WORKERS", default.max_workers),
            park_timeout_min_ms: env_get(
                "SCALEPOOL_PARK_TIMEOUT_MIN_MS",
                default.park_timeout_min_ms,
            ),
            park_timeout_max_ms: env_get(
                "SCALEPOOL_PARK_TIMEOUT_MAX_MS",
                default.park_timeout_max_ms,
            ),
        }
    }

    pub fn max_workers(mut self, n: usize) -> Self {
        self.max_workers = n;
        self
    }

    pub fn park_timeout_min_ms(mut self, ms: u64) -> Self {
        self.park_timeout_min_ms = ms;
        self
    }

    pub fn park_timeout_max_ms(mut self, ms: u64) -> Self {
        self.park_timeout_max_ms = ms;
        self
    }

    pub fn validate(&self) -> Result<(), &'static str> {
        if self.max_workers == 0 {
            return Err("max_workers must be at least 1");
        }
        if self.max_workers > MAX_WORKERS {
            return Err("max_workers exceeds the hard pool ceiling");
        }
        if self.park_timeout_min_ms == 0 {
            return Err("park_timeout_min_ms must be at least 1");
        }
        if self.park_timeout_max_ms < self.park_timeout_min_ms {
            return Err("park_timeout_max_ms must be >= park_timeout_min_ms");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(PoolConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_zero_max_workers() {
        assert!(PoolConfig::default().max_workers(0).validate().is_err());
    }

    #[test]
    fn rejects_max_workers_above_ceiling() {
        assert!(PoolConfig::default()
            .max_workers(MAX_WORKERS + 1)
            .validate()
            .is_err());
    }

    #[test]
    fn rejects_inverted_backoff_bounds() {
        assert!(PoolConfig::default()
            .park_timeout_min_ms(50)
            .park_timeout_max_ms(10)
            .validate()
            .is_err());
    }
}
