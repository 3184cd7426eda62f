//! The bounded metric ring the adapter threads its scaling decisions
//! through.
//!
//! Grounded in `scaling.h`'s `metric_buffer` (a fixed `ring[METRIC_BUFFER_SIZE]`
//! array with `size`/`index_newest` and the `metric_buf_for_each_new_to_old`
//! macro for newest-to-oldest iteration). We keep the overwrite-oldest,
//! O(1)-insert, O(1)-access-by-offset contract but express "offset from
//! newest" as a safe `get_back` instead of the C macro's raw modular
//! arithmetic over a signed index that can go negative.

use crate::constants::METRIC_RING_CAPACITY;

/// One interval's worth of controller-visible data (`spec.md` §3).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntervalDatapoint {
    pub scale_metric: f64,
    pub reset_metric: f64,
    pub target_count: u32,
    pub time_ms: u64,
}

/// Fixed-capacity ring buffer of [`IntervalDatapoint`]s, overwriting the
/// oldest entry once full. `size` saturates at `METRIC_RING_CAPACITY`.
pub struct MetricRing {
    ring: [Option<IntervalDatapoint>; METRIC_RING_CAPACITY],
    /// Index in `ring` of the newest entry; meaningless while `size == 0`.
    index_newest: usize,
    size: usize,
}

impl Default for MetricRing {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricRing {
    pub fn new() -> Self {
        Self {
            ring: [None; METRIC_RING_CAPACITY],
            index_newest: 0,
            size: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        METRIC_RING_CAPACITY
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Insert a new datapoint, overwriting the oldest entry if the ring is
    /// already at capacity.
    pub fn insert(&mut self, datapoint: IntervalDatapoint) {
        let next = if self.size == 0 {
            self.index_newest
        } else {
            (self.index_newest + 1) % METRIC_RING_CAPACITY
        };
        self.ring[next] = Some(datapoint);
        self.index_newest = next;
        if self.size < METRIC_RING_CAPACITY {
            self.size += 1;
        }
    }

    /// Access a datapoint `steps_back` entries behind the newest: `0` is
    /// the newest (the spec's "offset 0"), `1` the previous ("offset -1"),
    /// and so on, wrapping within the live (not just allocated) entries.
    /// Returns `None` if `steps_back >= size`.
    pub fn get_back(&self, steps_back: usize) -> Option<&IntervalDatapoint> {
        if steps_back >= self.size {
            return None;
        }
        let idx = (self.index_newest + METRIC_RING_CAPACITY - steps_back) % METRIC_RING_CAPACITY;
        self.ring[idx].as_ref()
    }

    pub fn newest(&self) -> Option<&IntervalDatapoint> {
        self.get_back(0)
    }

    pub fn previous(&self) -> Option<&IntervalDatapoint> {
        self.get_back(1)
    }
}
