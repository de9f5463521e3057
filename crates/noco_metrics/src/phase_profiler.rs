//! Timing of named frame phases

use super::ring_buffer::RingBuffer;
use crate::SAMPLE_WINDOW;
use std::collections::HashMap;
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
pub struct PhaseProfiler {
    phases: HashMap<String, PhaseTiming>,
}

#[derive(Debug)]
struct PhaseTiming {
    total: Duration,
    recent: RingBuffer,
}

impl PhaseProfiler {
    pub fn new() -> Self {
        Self {
            phases: HashMap::new(),
        }
    }

    pub fn time_phase<F, R>(&mut self, name: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let start = Instant::now();
        let result = f();
        let elapsed = start.elapsed();

        let timing = self
            .phases
            .entry(name.to_string())
            .or_insert_with(|| PhaseTiming {
                total: Duration::ZERO,
                recent: RingBuffer::new(SAMPLE_WINDOW),
            });
        timing.total += elapsed;
        timing.recent.push(elapsed);
        result
    }

    /// Accumulated time spent in `name` since the last reset.
    pub fn total(&self, name: &str) -> Duration {
        self.phases
            .get(name)
            .map(|timing| timing.total)
            .unwrap_or(Duration::ZERO)
    }

    /// Rolling average over the last `SAMPLE_WINDOW` passes.
    pub fn average(&self, name: &str) -> Duration {
        self.phases
            .get(name)
            .map(|timing| timing.recent.average())
            .unwrap_or(Duration::ZERO)
    }

    pub fn reset(&mut self) {
        self.phases.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_each_phase() {
        let mut profiler = PhaseProfiler::new();
        let sum = profiler.time_phase("update", || (1..=4).sum::<u32>());
        profiler.time_phase("fixed_update", || ());

        assert_eq!(sum, 10);
        assert!(profiler.total("update") >= profiler.average("update"));
        assert_eq!(profiler.total("missing"), Duration::ZERO);
    }
}
