//! Controller tuning parameters and the comma-separated override string
//! described in `spec.md` §6.
//!
//! The numeric half of `AdapterParams` is split out as [`AdapterTunables`]
//! so it can be parsed, defaulted, and tested independently of the
//! non-`Clone`, non-`Debug` metric callbacks that live alongside it in
//! `scalepool_runtime::adapter::AdapterParams`.

use crate::error::CoreError;

/// Default minimum elapsed time between adapter snapshots.
pub const DEFAULT_INTERVAL_MS: u64 = 1000;

/// Default magnitude of a bootstrap/continue scaling delta.
pub const DEFAULT_STEP_SIZE: u32 = 1;

/// The numeric controller tunables from `spec.md` §3's `AdapterParams`:
/// everything except the two metric callbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterTunables {
    /// Minimum elapsed time between snapshots.
    pub interval_ms: u64,
    /// Magnitude of a bootstrap/continue scaling delta. Must be positive.
    pub step_size: u32,
    /// Syscall numbers the trace capability should account for.
    pub observed_syscalls: Vec<i32>,
}

impl Default for AdapterTunables {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_INTERVAL_MS,
            step_size: DEFAULT_STEP_SIZE,
            observed_syscalls: Vec::new(),
        }
    }
}

impl AdapterTunables {
    /// Apply a comma-separated controller-parameter string on top of
    /// `self`, per `spec.md` §6: "overrides defaults in field order;
    /// malformed strings are a fatal construction error."
    ///
    /// Field order: `interval_ms`, `step_size`, then zero or more trailing
    /// comma-separated syscall numbers that replace `observed_syscalls`
    /// wholesale (a closure can't be named from a string, so the override
    /// string only ever reaches the numeric/list fields — see DESIGN.md).
    /// An empty string is a no-op (equivalent to omitting the string per
    /// `spec.md` §6: "if present, overrides defaults").
    pub fn apply_override_string(mut self, s: &str) -> Result<Self, CoreError> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(self);
        }
        let fields: Vec<&str> = s.split(',').map(str::trim).collect();
        let malformed = || CoreError::MalformedParamString(s.to_string());

        if let Some(raw) = fields.first() {
            self.interval_ms = raw.parse::<u64>().map_err(|_| malformed())?;
        }
        if let Some(raw) = fields.get(1) {
            let step: u32 = raw.parse().map_err(|_| malformed())?;
            if step == 0 {
                return Err(malformed());
            }
            self.step_size = step;
        }
        if fields.len() > 2 {
            let mut syscalls = Vec::with_capacity(fields.len() - 2);
            for raw in &fields[2..] {
                syscalls.push(raw.parse::<i32>().map_err(|_| malformed())?);
            }
            self.observed_syscalls = syscalls;
        }
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.step_size == 0 {
            return Err(CoreError::MalformedParamString(
                "step_size must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_is_noop() {
        let base = AdapterTunables::default();
        let applied = base.clone().apply_override_string("").unwrap();
        assert_eq!(base, applied);
    }

    #[test]
    fn overrides_in_field_order() {
        let applied = AdapterTunables::default()
            .apply_override_string("250,4,1,21,9")
            .unwrap();
        assert_eq!(applied.interval_ms, 250);
        assert_eq!(applied.step_size, 4);
        assert_eq!(applied.observed_syscalls, vec![1, 21, 9]);
    }

    #[test]
    fn partial_override_leaves_trailing_fields_default() {
        let applied = AdapterTunables::default().apply_override_string("500").unwrap();
        assert_eq!(applied.interval_ms, 500);
        assert_eq!(applied.step_size, DEFAULT_STEP_SIZE);
    }

    #[test]
    fn malformed_string_is_fatal() {
        let err = AdapterTunables::default().apply_override_string("not_a_number").unwrap_err();
        assert!(matches!(err, CoreError::MalformedParamString(_)));
    }

    #[test]
    fn zero_step_size_rejected() {
        let err = AdapterTunables::default().apply_override_string("100,0").unwrap_err();
        assert!(matches!(err, CoreError::MalformedParamString(_)));
    }
}
