//! Cycle pacing.
//!
//! The engine runs one detection cycle per host refresh. A `FrameScheduler`
//! is the host's refresh signal: it blocks until the next frame is due and
//! answers `false` once the host has no more frames to give.

use std::time::{Duration, Instant};

use crate::clock::ManualClock;

pub trait FrameScheduler {
    fn schedule_next_cycle(&mut self) -> bool;
}

/// Emulates a display refreshing at a fixed rate. Sleeps out whatever is
/// left of the frame budget since the previous cycle; a slow cycle simply
/// delays the next one.
pub struct RefreshScheduler {
    frame_budget: Duration,
    last_tick: Option<Instant>,
    remaining: Option<u64>,
}

impl RefreshScheduler {
    pub fn new(refresh_hz: u32) -> Self {
        let frame_budget = Duration::from_secs_f64(1.0 / refresh_hz.max(1) as f64);
        Self {
            frame_budget,
            last_tick: None,
            remaining: None,
        }
    }

    /// Stop after `cycles` refreshes.
    pub fn with_cycle_limit(mut self, cycles: u64) -> Self {
        self.remaining = Some(cycles);
        self
    }
}

impl FrameScheduler for RefreshScheduler {
    fn schedule_next_cycle(&mut self) -> bool {
        if let Some(remaining) = self.remaining.as_mut() {
            if *remaining == 0 {
                return false;
            }
            *remaining -= 1;
        }

        if let Some(last) = self.last_tick {
            let elapsed = last.elapsed();
            if elapsed < self.frame_budget {
                std::thread::sleep(self.frame_budget - elapsed);
            }
        }
        self.last_tick = Some(Instant::now());
        true
    }
}

/// Deterministic scheduler for tests: allows a fixed number of cycles and
/// optionally advances a `ManualClock` before each one.
pub struct StepScheduler {
    remaining: u64,
    clock: Option<(ManualClock, Duration)>,
}

impl StepScheduler {
    pub fn new(cycles: u64) -> Self {
        Self {
            remaining: cycles,
            clock: None,
        }
    }

    pub fn advancing(mut self, clock: ManualClock, per_cycle: Duration) -> Self {
        self.clock = Some((clock, per_cycle));
        self
    }
}

impl FrameScheduler for StepScheduler {
    fn schedule_next_cycle(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        if let Some((clock, step)) = &self.clock {
            clock.advance(*step);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_scheduler_counts_down_and_advances_clock() {
        let clock = ManualClock::new();
        let mut scheduler = StepScheduler::new(2).advancing(clock.clone(), Duration::from_millis(16));
        assert!(scheduler.schedule_next_cycle());
        assert!(scheduler.schedule_next_cycle());
        assert!(!scheduler.schedule_next_cycle());
        assert_eq!(clock.elapsed(), Duration::from_millis(32));
    }

    #[test]
    fn refresh_scheduler_paces_cycles() {
        let mut scheduler = RefreshScheduler::new(200).with_cycle_limit(3);
        let start = Instant::now();
        while scheduler.schedule_next_cycle() {}
        // Two waits of 5ms between three cycles.
        assert!(start.elapsed() >= Duration::from_millis(9));
    }
}
