//! Per-hook call and failure counts

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HookStats {
    pub calls: usize,
    pub failures: usize,
}

#[derive(Debug, Default)]
pub struct HookCounter {
    hooks: HashMap<String, HookStats>,
}

impl HookCounter {
    pub fn new() -> Self {
        Self {
            hooks: HashMap::new(),
        }
    }

    /// Add one pass worth of calls and failures for `hook`.
    pub fn record(&mut self, hook: &str, calls: usize, failures: usize) {
        let stats = self.hooks.entry(hook.to_string()).or_default();
        stats.calls += calls;
        stats.failures += failures;
    }

    pub fn stats(&self, hook: &str) -> HookStats {
        self.hooks.get(hook).copied().unwrap_or_default()
    }

    pub fn total_failures(&self) -> usize {
        self.hooks.values().map(|stats| stats.failures).sum()
    }

    pub fn reset(&mut self) {
        self.hooks.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &HookStats)> {
        self.hooks.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulates_per_hook() {
        let mut counter = HookCounter::new();
        counter.record("update", 3, 1);
        counter.record("update", 3, 0);
        counter.record("fixed_update", 2, 2);

        assert_eq!(counter.stats("update"), HookStats { calls: 6, failures: 1 });
        assert_eq!(counter.total_failures(), 3);
        assert_eq!(counter.stats("start"), HookStats::default());
    }
}
