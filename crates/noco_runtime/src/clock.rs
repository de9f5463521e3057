//! Frame clock
//!
//! Variable-rate frames with a fixed 60Hz physics tick driven off an accumulator.

use std::time::Duration;

/// Fixed physics tick rate (60 Hz = 16.666ms per tick)
pub const TICK_RATE_HZ: u32 = 60;
pub const TICK_DURATION: Duration = Duration::from_micros(1_000_000 / TICK_RATE_HZ as u64);

/// Upper bound on physics ticks per frame, so a long stall can't spiral.
pub const MAX_TICKS_PER_FRAME: u32 = 5;

pub struct FrameClock {
    frame_count: u64,
    tick_count: u64,
    accumulator: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            frame_count: 0,
            tick_count: 0,
            accumulator: Duration::ZERO,
        }
    }

    /// Advance by one frame of length `frame`. Returns how many physics ticks are due.
    pub fn advance(&mut self, frame: Duration) -> u32 {
        self.frame_count += 1;
        self.accumulator += frame;
        let mut ticks = 0;
        while self.accumulator >= TICK_DURATION && ticks < MAX_TICKS_PER_FRAME {
            self.accumulator -= TICK_DURATION;
            ticks += 1;
        }
        if ticks == MAX_TICKS_PER_FRAME {
            self.accumulator = Duration::ZERO;
        }
        self.tick_count += u64::from(ticks);
        ticks
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_partial_ticks() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(Duration::from_millis(10)), 0);
        assert_eq!(clock.advance(Duration::from_millis(10)), 1);
        assert_eq!(clock.advance(Duration::from_millis(40)), 2);
        assert_eq!(clock.tick_count(), 3);
        assert_eq!(clock.frame_count(), 3);
    }

    #[test]
    fn tick_duration_follows_rate() {
        assert_eq!(TICK_DURATION, Duration::from_micros(16_666));
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(TICK_DURATION * TICK_RATE_HZ), MAX_TICKS_PER_FRAME);
    }

    #[test]
    fn long_stall_is_clamped() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(Duration::from_secs(1)), MAX_TICKS_PER_FRAME);
        assert_eq!(clock.advance(Duration::ZERO), 0);
    }
}
