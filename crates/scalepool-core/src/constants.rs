//! Tunables and constants fixed by the pool's contract.
//!
//! These mirror `gvthread_core::constants`: plain `pub const`s, no
//! configuration layer of their own (that lives in `scalepool-runtime`'s
//! `PoolConfig`, which uses these as its compiled-in defaults).

/// Maximum number of live workers a single pool may hold.
pub const MAX_WORKERS: usize = 64;

/// Fixed capacity of the metric ring (K in the spec).
pub const METRIC_RING_CAPACITY: usize = 10;

/// Relative-change threshold the controller uses to decide whether an
/// interval's scale metric moved meaningfully.
pub const RELATIVE_CHANGE_THRESHOLD: f64 = 0.10;

/// Below this absolute delta between successive scale metrics, the
/// controller treats the change as numerical noise.
pub const NEGLIGIBLE_DIFFERENCE_THRESHOLD: f64 = 100.0 * f64::MIN_POSITIVE;
