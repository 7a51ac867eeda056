//! Per-step performance metrics.
//!
//! [`StepMetrics`] captures timing and avalanche size for a single step or
//! relaxation pass so drivers can report or throttle on it.

/// Timing and work counters collected during one step.
///
/// Durations are in microseconds.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StepMetrics {
    /// Wall-clock time for the entire call, in microseconds.
    pub total_us: u64,
    /// Number of topples performed.
    pub topples: u64,
    /// Grains drained past the boundary.
    pub drained: u64,
    /// Largest work-queue length observed.
    pub peak_queue_len: usize,
    /// Whether the grid was already unstable and had to be rescanned to
    /// seed the work queue.
    pub rescanned: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let m = StepMetrics::default();
        assert_eq!(m.total_us, 0);
        assert_eq!(m.topples, 0);
        assert_eq!(m.drained, 0);
        assert_eq!(m.peak_queue_len, 0);
        assert!(!m.rescanned);
    }
}
