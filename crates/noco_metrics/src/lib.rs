//! Node Components Metrics - hook dispatch instrumentation
//!
//! Counts lifecycle hook calls and failures and times each frame phase.
//! Everything compiles to no-op stubs unless the `metrics` feature is on.
//!
//! # Usage
//!
//! ```ignore
//! use noco_metrics::{time_scope, HookCounter, PhaseProfiler};
//!
//! let mut profiler = PhaseProfiler::new();
//! let mut hooks = HookCounter::new();
//! time_scope!(profiler, "update", {
//!     hooks.record("update", 3, 0);
//! });
//! println!("update avg: {:?}", profiler.average("update"));
//! ```

#[cfg(feature = "metrics")]
mod hook_counter;
#[cfg(feature = "metrics")]
mod phase_profiler;
#[cfg(feature = "metrics")]
mod ring_buffer;

#[cfg(feature = "metrics")]
pub use hook_counter::{HookCounter, HookStats};
#[cfg(feature = "metrics")]
pub use phase_profiler::PhaseProfiler;

/// Number of samples kept per phase for rolling averages.
pub const SAMPLE_WINDOW: usize = 60;

/// Time a phase (zero-cost when metrics disabled). Use as a statement.
#[macro_export]
macro_rules! time_scope {
    ($profiler:expr, $name:expr, $body:block) => {
        #[cfg(feature = "metrics")]
        {
            $profiler.time_phase($name, || $body)
        }
        #[cfg(not(feature = "metrics"))]
        {
            $body
        }
    };
}

// ============================================================================
// No-op stubs when metrics disabled
// ============================================================================

#[cfg(not(feature = "metrics"))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HookStats {
    pub calls: usize,
    pub failures: usize,
}

#[cfg(not(feature = "metrics"))]
#[derive(Debug, Default)]
pub struct HookCounter;

#[cfg(not(feature = "metrics"))]
impl HookCounter {
    pub fn new() -> Self { Self }
    pub fn record(&mut self, _hook: &str, _calls: usize, _failures: usize) {}
    pub fn stats(&self, _hook: &str) -> HookStats { HookStats::default() }
    pub fn total_failures(&self) -> usize { 0 }
}

#[cfg(not(feature = "metrics"))]
#[derive(Debug, Default)]
pub struct PhaseProfiler;

#[cfg(not(feature = "metrics"))]
impl PhaseProfiler {
    pub fn new() -> Self { Self }
    pub fn time_phase<F, R>(&mut self, _name: &str, f: F) -> R where F: FnOnce() -> R { f() }
    pub fn total(&self, _name: &str) -> std::time::Duration { std::time::Duration::ZERO }
    pub fn average(&self, _name: &str) -> std::time::Duration { std::time::Duration::ZERO }
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_stubs_and_real_share_api() {
        let mut profiler = super::PhaseProfiler::new();
        let mut hooks = super::HookCounter::new();
        let value = profiler.time_phase("update", || 7);
        hooks.record("update", 1, 0);
        assert_eq!(value, 7);
        let _ = profiler.average("update");
        let _ = hooks.stats("update");
    }
}
